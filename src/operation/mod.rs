//! The atomic operation taxonomy (spec §3, §4.3) and its ordering contract (§4.2 `OrderOperations`).
//!
//! `Operation` is modelled as a single struct carrying a `kind` tag (Create/Update/Delete) and a
//! [`Payload`] sum type with one case per entity kind — rather than one Rust enum variant per
//! `(entity kind × kind)` triple, which would triple the variant count for no semantic gain once
//! `kind` already distinguishes Create/Update/Delete and `Payload::None` covers Delete's lack of
//! a body. This keeps the "tagged variant, not a trait object" shape the design favors (§9,
//! "Variant operations") without the combinatorial blowup.

pub mod priority;

use std::fmt;

use serde::Serialize;

use crate::model::{
    Acl, Backend, BackendSwitchingRule, Bind, Cache, Capture, CrtStore, Defaults, FcgiApp,
    Filter, Frontend, Global, Group, HttpAfterResponseRule, HttpCheck, HttpErrorsSection,
    HttpRequestRule, HttpResponseRule, LogForward, LogTarget, MailerEntry, MailersSection,
    Nameserver, PeerEntry, PeerSection, Program, Resolvers, Ring, Server, ServerSwitchingRule,
    ServerTemplate, StickRule, TcpCheck, TcpRequestRule, TcpResponseRule, User, Userlist,
};

/// Which of the three fundamental effects an [`Operation`] has.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    Create,
    Update,
    Delete,
}

/// Identifies the parent entity an [`Operation`] applies under, for both priority bookkeeping and
/// for the Dataplane client to build the right nested endpoint (e.g. `.../backends/web/servers`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParentRef {
    Frontend(String),
    Backend(String),
    Userlist(String),
    Peers(String),
    Resolvers(String),
    Mailers(String),
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentRef::Frontend(name) => write!(f, "frontend '{name}'"),
            ParentRef::Backend(name) => write!(f, "backend '{name}'"),
            ParentRef::Userlist(name) => write!(f, "userlist '{name}'"),
            ParentRef::Peers(name) => write!(f, "peers '{name}'"),
            ParentRef::Resolvers(name) => write!(f, "resolvers '{name}'"),
            ParentRef::Mailers(name) => write!(f, "mailers '{name}'"),
        }
    }
}

/// The typed body of a Create/Update operation. Carries exactly what the client needs to encode
/// the Dataplane API request; `None` is used for Delete, which needs only the operation's `key`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
#[allow(missing_docs)]
pub enum Payload {
    Global(Global),
    Defaults(Defaults),
    Frontend(Frontend),
    Backend(Backend),
    Bind(Bind),
    Acl(Acl),
    HttpRequestRule(HttpRequestRule),
    HttpResponseRule(HttpResponseRule),
    HttpAfterResponseRule(HttpAfterResponseRule),
    TcpRequestRule(TcpRequestRule),
    TcpResponseRule(TcpResponseRule),
    Filter(Filter),
    Capture(Capture),
    LogTarget(LogTarget),
    BackendSwitchingRule(BackendSwitchingRule),
    Server(Server),
    ServerTemplate(ServerTemplate),
    ServerSwitchingRule(ServerSwitchingRule),
    StickRule(StickRule),
    HttpCheck(HttpCheck),
    TcpCheck(TcpCheck),
    Userlist(Userlist),
    User(User),
    Group(Group),
    Peers(PeerSection),
    PeerEntry(PeerEntry),
    Resolvers(Resolvers),
    Nameserver(Nameserver),
    Mailers(MailersSection),
    MailerEntry(MailerEntry),
    Cache(Cache),
    Ring(Ring),
    HttpErrors(HttpErrorsSection),
    Program(Program),
    LogForward(LogForward),
    FcgiApp(FcgiApp),
    CrtStore(CrtStore),
    None,
}

/// One atomic Create/Update/Delete against a single entity (spec §3, "Operation").
///
/// Operations are immutable after construction; the comparator never mutates one once emitted.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub kind: OpKind,
    pub section_tag: &'static str,
    pub parent: Option<ParentRef>,
    pub key: String,
    /// Position within the parent's ordered list, for positional children (ACLs, rules, filters,
    /// captures, log targets, switching rules, checks, stick rules). `None` for keyed children.
    pub index: Option<usize>,
    pub priority: i32,
    pub description: String,
    pub payload: Payload,
}

impl Operation {
    pub fn create(
        section_tag: &'static str,
        parent: Option<ParentRef>,
        key: impl Into<String>,
        index: Option<usize>,
        priority: i32,
        payload: Payload,
    ) -> Self {
        Self::new(OpKind::Create, section_tag, parent, key, index, priority, payload)
    }

    pub fn update(
        section_tag: &'static str,
        parent: Option<ParentRef>,
        key: impl Into<String>,
        index: Option<usize>,
        priority: i32,
        payload: Payload,
    ) -> Self {
        Self::new(OpKind::Update, section_tag, parent, key, index, priority, payload)
    }

    pub fn delete(
        section_tag: &'static str,
        parent: Option<ParentRef>,
        key: impl Into<String>,
        index: Option<usize>,
        priority: i32,
    ) -> Self {
        Self::new(OpKind::Delete, section_tag, parent, key, index, priority, Payload::None)
    }

    fn new(
        kind: OpKind,
        section_tag: &'static str,
        parent: Option<ParentRef>,
        key: impl Into<String>,
        index: Option<usize>,
        priority: i32,
        payload: Payload,
    ) -> Self {
        let key = key.into();
        let description = describe(kind, section_tag, parent.as_ref(), &key);
        Self { kind, section_tag, parent, key, index, priority, description, payload }
    }

    /// Whether this is a server-entity Update — the sole condition under which the synchronizer
    /// may use the reload-free runtime path instead of opening a transaction (§4.5 step 4).
    pub fn is_runtime_eligible(&self) -> bool {
        self.kind == OpKind::Update && self.section_tag == "server"
    }
}

fn describe(kind: OpKind, section_tag: &str, parent: Option<&ParentRef>, key: &str) -> String {
    let verb = match kind {
        OpKind::Create => "Create",
        OpKind::Update => "Update",
        OpKind::Delete => "Delete",
    };
    match parent {
        Some(parent) => format!("{verb} {section_tag} '{key}' in {parent}"),
        None => format!("{verb} {section_tag} '{key}'"),
    }
}

/// Re-buckets a flat operation list into the order the synchronizer must execute it in (§4.2):
/// all Deletes (children before parents — priority descending), then all Creates (parents before
/// children — priority ascending), then all Updates (stable, dependency-irrelevant).
///
/// Both sorts are stable so operations of equal priority retain comparator emission order, which
/// keeps `compare` deterministic end to end (§8 testable property 1).
pub fn order_operations(mut operations: Vec<Operation>) -> Vec<Operation> {
    let mut deletes: Vec<Operation> = operations.iter().filter(|o| o.kind == OpKind::Delete).cloned().collect();
    let mut creates: Vec<Operation> = operations.iter().filter(|o| o.kind == OpKind::Create).cloned().collect();
    let updates: Vec<Operation> = operations.drain(..).filter(|o| o.kind == OpKind::Update).collect();

    deletes.sort_by(|a, b| b.priority.cmp(&a.priority));
    creates.sort_by(|a, b| a.priority.cmp(&b.priority));

    deletes.into_iter().chain(creates).chain(updates).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn op(kind: OpKind, priority: i32, tag: &'static str, key: &str) -> Operation {
        Operation::new(kind, tag, None, key, None, priority, Payload::None)
    }

    #[test]
    fn deletes_precede_creates_precede_updates() {
        let ops = vec![
            op(OpKind::Update, 30, "server", "srv1"),
            op(OpKind::Create, 20, "backend", "web"),
            op(OpKind::Delete, 10, "defaults", "old"),
        ];
        let ordered = order_operations(ops);
        assert_eq!(ordered[0].kind, OpKind::Delete);
        assert_eq!(ordered[1].kind, OpKind::Create);
        assert_eq!(ordered[2].kind, OpKind::Update);
    }

    #[test]
    fn parent_precedes_child_on_create_and_follows_on_delete() {
        let ops = vec![
            op(OpKind::Create, priority::SECTION_CHILD, "server", "srv1"),
            op(OpKind::Create, priority::NAMED_SECTION, "backend", "web"),
            op(OpKind::Delete, priority::SECTION_CHILD, "server", "srv1"),
            op(OpKind::Delete, priority::NAMED_SECTION, "backend", "web"),
        ];
        let ordered = order_operations(ops);
        let create_positions: Vec<_> = ordered
            .iter()
            .enumerate()
            .filter(|(_, o)| o.kind == OpKind::Create)
            .map(|(i, o)| (i, o.section_tag))
            .collect();
        assert_eq!(create_positions[0].1, "backend");
        assert_eq!(create_positions[1].1, "server");

        let delete_positions: Vec<_> = ordered
            .iter()
            .enumerate()
            .filter(|(_, o)| o.kind == OpKind::Delete)
            .map(|(i, o)| (i, o.section_tag))
            .collect();
        assert_eq!(delete_positions[0].1, "server");
        assert_eq!(delete_positions[1].1, "backend");
    }

    #[test]
    fn description_includes_parent_when_present() {
        let created = Operation::create(
            "server",
            Some(ParentRef::Backend("web".into())),
            "srv1",
            None,
            priority::SECTION_CHILD,
            Payload::None,
        );
        assert_eq!(created.description, "Create server 'srv1' in backend 'web'");

        let no_parent = Operation::create("backend", None, "web", None, priority::NAMED_SECTION, Payload::None);
        assert_eq!(no_parent.description, "Create backend 'web'");
    }

    #[test]
    fn runtime_eligibility_is_exactly_server_update() {
        let server_update = Operation::update("server", None, "srv1", None, priority::SECTION_CHILD, Payload::None);
        assert!(server_update.is_runtime_eligible());

        let server_create = Operation::create("server", None, "srv1", None, priority::SECTION_CHILD, Payload::None);
        assert!(!server_create.is_runtime_eligible());

        let backend_update = Operation::update("backend", None, "web", None, priority::NAMED_SECTION, Payload::None);
        assert!(!backend_update.is_runtime_eligible());
    }
}
