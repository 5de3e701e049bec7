//! Dispatch step 4 (spec §4.2): section kinds whose only interesting content is a single keyed
//! child map. Children are compared first; the parent (with its child map cleared) is compared
//! second to decide whether a parent-level Update is also needed.

use std::collections::BTreeMap;

use crate::model::{MailersSection, PeerSection, Resolvers};
use crate::operation::{priority, Operation, ParentRef, Payload};

use super::support::diff_keyed;

pub(crate) fn diff_resolvers(
    current: &BTreeMap<String, Resolvers>,
    desired: &BTreeMap<String, Resolvers>,
    ops: &mut Vec<Operation>,
) {
    for (name, desired_section) in desired {
        let empty;
        let current_section = match current.get(name) {
            Some(s) => s,
            None => {
                ops.push(Operation::create(
                    "resolvers",
                    None,
                    name.clone(),
                    None,
                    priority::FOUNDATIONAL,
                    Payload::Resolvers(desired_section.without_children()),
                ));
                empty = Resolvers::builder().name(name).build();
                &empty
            }
        };
        diff_keyed(
            &current_section.nameservers,
            &desired_section.nameservers,
            "nameserver",
            Some(ParentRef::Resolvers(name.clone())),
            priority::FOUNDATIONAL_CHILD,
            Payload::Nameserver,
            ops,
        );
        if current.contains_key(name) && current_section.without_children() != desired_section.without_children() {
            ops.push(Operation::update(
                "resolvers",
                None,
                name.clone(),
                None,
                priority::FOUNDATIONAL,
                Payload::Resolvers(desired_section.without_children()),
            ));
        }
    }
    for (name, current_section) in current {
        if desired.contains_key(name) {
            continue;
        }
        let empty = Resolvers::builder().name(name).build();
        diff_keyed(
            &current_section.nameservers,
            &empty.nameservers,
            "nameserver",
            Some(ParentRef::Resolvers(name.clone())),
            priority::FOUNDATIONAL_CHILD,
            Payload::Nameserver,
            ops,
        );
        ops.push(Operation::delete("resolvers", None, name.clone(), None, priority::FOUNDATIONAL));
    }
}

pub(crate) fn diff_mailers(
    current: &BTreeMap<String, MailersSection>,
    desired: &BTreeMap<String, MailersSection>,
    ops: &mut Vec<Operation>,
) {
    for (name, desired_section) in desired {
        let empty;
        let current_section = match current.get(name) {
            Some(s) => s,
            None => {
                ops.push(Operation::create(
                    "mailers",
                    None,
                    name.clone(),
                    None,
                    priority::FOUNDATIONAL,
                    Payload::Mailers(desired_section.without_children()),
                ));
                empty = MailersSection::builder().name(name).build();
                &empty
            }
        };
        diff_keyed(
            &current_section.entries,
            &desired_section.entries,
            "mailer_entry",
            Some(ParentRef::Mailers(name.clone())),
            priority::FOUNDATIONAL_CHILD,
            Payload::MailerEntry,
            ops,
        );
        if current.contains_key(name) && current_section.without_children() != desired_section.without_children() {
            ops.push(Operation::update(
                "mailers",
                None,
                name.clone(),
                None,
                priority::FOUNDATIONAL,
                Payload::Mailers(desired_section.without_children()),
            ));
        }
    }
    for (name, current_section) in current {
        if desired.contains_key(name) {
            continue;
        }
        let empty = MailersSection::builder().name(name).build();
        diff_keyed(
            &current_section.entries,
            &empty.entries,
            "mailer_entry",
            Some(ParentRef::Mailers(name.clone())),
            priority::FOUNDATIONAL_CHILD,
            Payload::MailerEntry,
            ops,
        );
        ops.push(Operation::delete("mailers", None, name.clone(), None, priority::FOUNDATIONAL));
    }
}

pub(crate) fn diff_peers(
    current: &BTreeMap<String, PeerSection>,
    desired: &BTreeMap<String, PeerSection>,
    ops: &mut Vec<Operation>,
) {
    for (name, desired_section) in desired {
        let empty;
        let current_section = match current.get(name) {
            Some(s) => s,
            None => {
                ops.push(Operation::create(
                    "peers",
                    None,
                    name.clone(),
                    None,
                    priority::FOUNDATIONAL,
                    Payload::Peers(desired_section.without_children()),
                ));
                empty = PeerSection::builder().name(name).build();
                &empty
            }
        };
        diff_keyed(
            &current_section.entries,
            &desired_section.entries,
            "peer_entry",
            Some(ParentRef::Peers(name.clone())),
            priority::FOUNDATIONAL_CHILD,
            Payload::PeerEntry,
            ops,
        );
        if current.contains_key(name) && current_section.without_children() != desired_section.without_children() {
            ops.push(Operation::update(
                "peers",
                None,
                name.clone(),
                None,
                priority::FOUNDATIONAL,
                Payload::Peers(desired_section.without_children()),
            ));
        }
    }
    for (name, current_section) in current {
        if desired.contains_key(name) {
            continue;
        }
        let empty = PeerSection::builder().name(name).build();
        diff_keyed(
            &current_section.entries,
            &empty.entries,
            "peer_entry",
            Some(ParentRef::Peers(name.clone())),
            priority::FOUNDATIONAL_CHILD,
            Payload::PeerEntry,
            ops,
        );
        ops.push(Operation::delete("peers", None, name.clone(), None, priority::FOUNDATIONAL));
    }
}
