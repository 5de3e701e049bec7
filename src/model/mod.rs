//! The structured, strongly typed representation of an HAProxy configuration.
//!
//! Every HAProxy section kind is represented by its own type. Map-keyed children (servers,
//! binds, server templates, nameservers, mailer entries, peer entries, userlist users/groups)
//! are normalized into [`std::collections::BTreeMap`]s keyed by their natural key; positional
//! children (rules, ACLs, filters, captures, log targets, switching rules, checks) are
//! `Vec`s, where index *is* identity. See [`crate::parser`] for how text becomes this model and
//! [`crate::compare`] for how two instances of it are diffed.

pub mod backend;
pub mod common;
pub mod frontend;
pub mod global;
pub mod mailers;
pub mod peers;
pub mod resolvers;
pub mod simple;
pub mod userlist;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use backend::Backend;
pub use common::{
    Acl,
    BackendSwitchingRule,
    Bind,
    Capture,
    Filter,
    HttpAfterResponseRule,
    HttpCheck,
    HttpRequestRule,
    HttpResponseRule,
    LogTarget,
    Server,
    ServerSwitchingRule,
    ServerTemplate,
    StickRule,
    TcpCheck,
    TcpRequestRule,
    TcpResponseRule,
};
pub use frontend::Frontend;
pub use global::{Defaults, Global};
pub use mailers::{MailerEntry, MailersSection};
pub use peers::{PeerEntry, PeerSection};
pub use resolvers::{Nameserver, Resolvers};
pub use simple::{Cache, CrtStore, FcgiApp, HttpErrorsSection, LogForward, Program, Ring};
pub use userlist::{Group, User, Userlist};

/// The top-level HAProxy configuration: a singleton `global`, ordered `defaults`, and every
/// other section kind keyed by name. Missing section kinds are empty collections, never
/// absent/null — callers never need to distinguish "no backends" from "backends not parsed".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredConfig {
    pub global: Option<Global>,
    pub defaults: BTreeMap<String, Defaults>,
    pub frontends: BTreeMap<String, Frontend>,
    pub backends: BTreeMap<String, Backend>,
    pub peers: BTreeMap<String, PeerSection>,
    pub resolvers: BTreeMap<String, Resolvers>,
    pub mailers: BTreeMap<String, MailersSection>,
    pub caches: BTreeMap<String, Cache>,
    pub rings: BTreeMap<String, Ring>,
    pub http_errors: BTreeMap<String, HttpErrorsSection>,
    pub userlists: BTreeMap<String, Userlist>,
    pub programs: BTreeMap<String, Program>,
    pub log_forwards: BTreeMap<String, LogForward>,
    pub fcgi_apps: BTreeMap<String, FcgiApp>,
    pub crt_stores: BTreeMap<String, CrtStore>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_config_has_empty_collections_not_missing_ones() {
        let cfg = StructuredConfig::default();
        assert!(cfg.global.is_none());
        assert!(cfg.frontends.is_empty());
        assert!(cfg.backends.is_empty());
    }

    #[test]
    fn structural_equality_is_order_independent_for_keyed_children() {
        let mut a = Backend::builder().name("web").build();
        a.servers.insert(
            "s1".into(),
            Server::builder().name("s1").address("10.0.0.1").build(),
        );
        a.servers.insert(
            "s2".into(),
            Server::builder().name("s2").address("10.0.0.2").build(),
        );

        let mut b = Backend::builder().name("web").build();
        b.servers.insert(
            "s2".into(),
            Server::builder().name("s2").address("10.0.0.2").build(),
        );
        b.servers.insert(
            "s1".into(),
            Server::builder().name("s1").address("10.0.0.1").build(),
        );

        assert_eq!(a, b);
    }
}
