//! Child entity types shared across section kinds.
//!
//! Map-keyed children (servers, binds, server templates, nameservers, mailer entries, peer
//! entries, userlist users/groups) carry their own natural key and live in a [`std::collections::BTreeMap`]
//! on their parent so iteration order — and therefore comparator output — is deterministic.
//! Positional children (rules, ACLs, filters, captures, log targets, switching rules, checks)
//! have no natural key; their index in the parent's `Vec` *is* their identity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// A backend server: `server <name> <address> [params...]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct Server {
    #[builder(!default)]
    pub name: String,
    pub address: String,
    pub port: Option<u16>,
    pub weight: Option<u32>,
    pub check: bool,
    pub backup: bool,
    pub maxconn: Option<u32>,
    pub ssl: bool,
    pub send_proxy: bool,
    pub maintenance: bool,
    /// Arbitrary additional params the model doesn't break out individually, preserved verbatim
    /// so round-tripping through the parser doesn't silently drop unrecognized keywords.
    pub extra_params: BTreeMap<String, String>,
}

/// A `server-template <prefix>` block, keyed by prefix rather than by a single server name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct ServerTemplate {
    #[builder(!default)]
    pub prefix: String,
    pub num_or_range: String,
    pub fqdn: String,
    pub port: Option<u16>,
    pub weight: Option<u32>,
    pub check: bool,
}

/// A `bind` line, keyed by its name (explicit `name` param, falling back to the address).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct Bind {
    #[builder(!default)]
    pub name: String,
    pub address: String,
    pub port: Option<u16>,
    pub ssl: bool,
    pub certificate: Option<String>,
    pub extra_params: BTreeMap<String, String>,
}

/// A positional ACL. Carries both a name (the comparator's primary key for add/delete/update
/// detection) and is additionally stored at a position, which is passed through to the API call
/// so a rename surfaces as delete-at-old-index plus create-at-new-index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct Acl {
    #[builder(!default)]
    pub name: String,
    pub criterion: String,
    pub value: String,
}

macro_rules! positional_rule {
    ($name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
        #[builder(field_defaults(default, setter(into)))]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            pub cond: Option<String>,
            pub cond_test: Option<String>,
            $(pub $field: $ty,)*
        }
    };
}

positional_rule!(HttpRequestRule { rule_type: String, raw: String });
positional_rule!(HttpResponseRule { rule_type: String, raw: String });
positional_rule!(HttpAfterResponseRule { rule_type: String, raw: String });
positional_rule!(TcpRequestRule { rule_type: String, raw: String });
positional_rule!(TcpResponseRule { rule_type: String, raw: String });
positional_rule!(StickRule { rule_type: String, raw: String });
positional_rule!(BackendSwitchingRule { name: String, raw: String });
positional_rule!(ServerSwitchingRule { name: String, raw: String });
positional_rule!(HttpCheck { check_type: String, raw: String });
positional_rule!(TcpCheck { check_type: String, raw: String });

/// A `filter` directive; positional, no natural key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub filter_type: String,
    pub raw: String,
}

/// A `declare capture` / `http-request capture` directive; positional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct Capture {
    pub expression: String,
    pub len: Option<u32>,
}

/// A `log` target line; positional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct LogTarget {
    pub address: String,
    pub facility: Option<String>,
    pub level: Option<String>,
}
