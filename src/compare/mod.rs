//! The structural differencing engine (spec §4.2): `compare(current, desired) -> Diff`.
//!
//! Dispatch follows the spec's fixed order across section kinds: `global` (singleton), `defaults`
//! (by name), section kinds with no nested collections worth breaking out, keyed-child sections
//! (resolvers, mailers, peers, userlists), then the fully decomposed `frontend`/`backend` kinds.
//! Every comparison reuses the model's derived structural equality (`PartialEq`) — see
//! [`crate::model`]'s module docs for why that buys correctness for free on new attributes.

mod backend;
mod frontend;
mod keyed_parent;
mod simple;
mod support;
mod userlist;

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::StructuredConfig;
use crate::operation::{order_operations, priority, OpKind, Operation, Payload};

/// The result of [`compare`]: an ordered operation list plus a summary derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Diff {
    pub operations: Vec<Operation>,
    pub summary: DiffSummary,
}

impl Diff {
    pub fn has_changes(&self) -> bool {
        !self.operations.is_empty()
    }
}

/// Counts derived from a [`Diff`]'s final operation list — never accumulated ad hoc during
/// comparison, so they can never drift from what's actually in `operations` (spec §4.2, last line).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiffSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub by_section: BTreeMap<&'static str, SectionCounts>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionCounts {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

fn summarize(operations: &[Operation]) -> DiffSummary {
    let mut summary = DiffSummary::default();
    for op in operations {
        let section_counts = summary.by_section.entry(op.section_tag).or_default();
        match op.kind {
            OpKind::Create => {
                summary.created += 1;
                section_counts.created += 1;
            }
            OpKind::Update => {
                summary.updated += 1;
                section_counts.updated += 1;
            }
            OpKind::Delete => {
                summary.deleted += 1;
                section_counts.deleted += 1;
            }
        }
    }
    summary
}

/// Compares two structured configurations and produces the minimal, dependency-ordered operation
/// list to transform `current` into `desired`. Both inputs must already be well-formed
/// [`StructuredConfig`] values — there's nothing to validate here beyond that (spec §4.2, "Both
/// inputs must be non-null").
pub fn compare(current: &StructuredConfig, desired: &StructuredConfig) -> Result<Diff> {
    let mut operations = Vec::new();

    compare_global(current, desired, &mut operations);

    simple::diff_named_map(&current.defaults, &desired.defaults, "defaults", priority::FOUNDATIONAL, Payload::Defaults, &mut operations);
    simple::diff_named_map(&current.caches, &desired.caches, "cache", priority::FOUNDATIONAL, Payload::Cache, &mut operations);
    simple::diff_named_map(&current.rings, &desired.rings, "ring", priority::FOUNDATIONAL, Payload::Ring, &mut operations);
    simple::diff_named_map(
        &current.http_errors,
        &desired.http_errors,
        "http_errors",
        priority::FOUNDATIONAL,
        Payload::HttpErrors,
        &mut operations,
    );
    simple::diff_named_map(&current.programs, &desired.programs, "program", priority::FOUNDATIONAL, Payload::Program, &mut operations);
    simple::diff_named_map(
        &current.log_forwards,
        &desired.log_forwards,
        "log_forward",
        priority::FOUNDATIONAL,
        Payload::LogForward,
        &mut operations,
    );
    simple::diff_named_map(&current.fcgi_apps, &desired.fcgi_apps, "fcgi_app", priority::FOUNDATIONAL, Payload::FcgiApp, &mut operations);
    simple::diff_named_map(
        &current.crt_stores,
        &desired.crt_stores,
        "crt_store",
        priority::FOUNDATIONAL,
        Payload::CrtStore,
        &mut operations,
    );

    keyed_parent::diff_resolvers(&current.resolvers, &desired.resolvers, &mut operations);
    keyed_parent::diff_mailers(&current.mailers, &desired.mailers, &mut operations);
    keyed_parent::diff_peers(&current.peers, &desired.peers, &mut operations);
    userlist::diff_userlists(&current.userlists, &desired.userlists, &mut operations);

    frontend::diff_frontends(&current.frontends, &desired.frontends, &mut operations);
    backend::diff_backends(&current.backends, &desired.backends, &mut operations);

    let operations = order_operations(operations);
    let summary = summarize(&operations);
    Ok(Diff { operations, summary })
}

fn compare_global(current: &StructuredConfig, desired: &StructuredConfig, operations: &mut Vec<Operation>) {
    let Some(desired_global) = &desired.global else {
        return;
    };
    if current.global.as_ref() != Some(desired_global) {
        operations.push(Operation::update(
            "global",
            None,
            "global",
            None,
            priority::GLOBAL,
            Payload::Global(desired_global.clone()),
        ));
    }
}

/// Validates that neither input is a degenerate placeholder the comparator can't meaningfully
/// diff — currently unused by `compare` itself (both inputs are always well-formed
/// `StructuredConfig` values by construction) but kept as the documented error path §4.2 calls
/// for, for callers that assemble a `StructuredConfig` by hand.
pub fn require_non_empty(config: &StructuredConfig) -> Result<()> {
    let is_empty = config.global.is_none()
        && config.defaults.is_empty()
        && config.frontends.is_empty()
        && config.backends.is_empty();
    if is_empty {
        return Err(Error::compare("configuration has no sections to compare"));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{Backend, Server};

    #[test]
    fn identity_round_trip_has_no_operations() {
        let mut config = StructuredConfig::default();
        let mut backend = Backend::builder().name("web").build();
        backend.servers.insert("srv1".into(), Server::builder().name("srv1").address("10.0.0.1").port(8080u16).build());
        config.backends.insert("web".to_string(), backend);

        let diff = compare(&config, &config).unwrap();
        assert!(!diff.has_changes());
    }

    #[test]
    fn compare_is_deterministic_across_invocations() {
        let mut current = StructuredConfig::default();
        let mut desired = StructuredConfig::default();
        desired.backends.insert("web".to_string(), Backend::builder().name("web").build());
        current.defaults.insert("base".to_string(), crate::model::Defaults::builder().name("base").build());

        let first = compare(&current, &desired).unwrap();
        let second = compare(&current, &desired).unwrap();
        assert_eq!(first.operations, second.operations);
    }

    #[test]
    fn summary_counts_are_derived_from_final_operations() {
        let current = StructuredConfig::default();
        let mut desired = StructuredConfig::default();
        desired.backends.insert("web".to_string(), Backend::builder().name("web").build());

        let diff = compare(&current, &desired).unwrap();
        assert_eq!(diff.summary.created, diff.operations.iter().filter(|o| o.kind == OpKind::Create).count());
    }
}
