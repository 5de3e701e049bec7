//! Generic diff helpers shared by every section kind's comparator (spec §4.2).
//!
//! These are plain functions rather than a trait because each entity kind needs a different
//! [`Payload`] variant constructor; a trait would just relocate that closure into an impl block
//! without removing it.

use std::collections::BTreeMap;

use crate::model::Acl;
use crate::operation::{Operation, ParentRef, Payload};

/// Diffs a keyed child map (servers, binds, server templates, nameservers, mailer entries, peer
/// entries, userlist users/groups): desired-minus-current is Create, current-minus-desired is
/// Delete, the intersection is Update where unequal (§4.2, "Keyed children").
pub(crate) fn diff_keyed<T, F>(
    current: &BTreeMap<String, T>,
    desired: &BTreeMap<String, T>,
    tag: &'static str,
    parent: Option<ParentRef>,
    priority: i32,
    to_payload: F,
    ops: &mut Vec<Operation>,
) where
    T: Clone + PartialEq,
    F: Fn(T) -> Payload,
{
    for (name, value) in desired {
        match current.get(name) {
            None => ops.push(Operation::create(tag, parent.clone(), name.clone(), None, priority, to_payload(value.clone()))),
            Some(cur) if cur != value => {
                ops.push(Operation::update(tag, parent.clone(), name.clone(), None, priority, to_payload(value.clone())))
            }
            _ => {}
        }
    }
    for name in current.keys() {
        if !desired.contains_key(name) {
            ops.push(Operation::delete(tag, parent.clone(), name.clone(), None, priority));
        }
    }
}

/// Diffs a positional child sequence index-by-index: position *is* identity, no LCS/move
/// detection (§4.2, "Positional children").
pub(crate) fn diff_positional<T, F>(
    current: &[T],
    desired: &[T],
    tag: &'static str,
    parent: Option<ParentRef>,
    priority: i32,
    to_payload: F,
    ops: &mut Vec<Operation>,
) where
    T: Clone + PartialEq,
    F: Fn(T) -> Payload,
{
    let max = current.len().max(desired.len());
    for i in 0..max {
        match (current.get(i), desired.get(i)) {
            (Some(c), Some(d)) if c != d => {
                ops.push(Operation::update(tag, parent.clone(), i.to_string(), Some(i), priority, to_payload(d.clone())))
            }
            (Some(_), Some(_)) => {}
            (None, Some(d)) => ops.push(Operation::create(tag, parent.clone(), i.to_string(), Some(i), priority, to_payload(d.clone()))),
            (Some(_), None) => ops.push(Operation::delete(tag, parent.clone(), i.to_string(), Some(i), priority)),
            (None, None) => unreachable!("loop bound is max(current.len(), desired.len())"),
        }
    }
}

/// ACLs are the intentional exception to positional comparison: identity is the ACL's `name`, not
/// its index, so a rename surfaces as Delete(old index) + Create(new index) rather than an Update
/// (§4.2, "ACLs", and §8 testable property 10).
pub(crate) fn diff_acls(current: &[Acl], desired: &[Acl], parent: Option<ParentRef>, priority: i32, ops: &mut Vec<Operation>) {
    let current_by_name: BTreeMap<&str, (usize, &Acl)> =
        current.iter().enumerate().map(|(i, a)| (a.name.as_str(), (i, a))).collect();
    let desired_by_name: BTreeMap<&str, (usize, &Acl)> =
        desired.iter().enumerate().map(|(i, a)| (a.name.as_str(), (i, a))).collect();

    for (name, (idx, acl)) in &desired_by_name {
        match current_by_name.get(name) {
            None => ops.push(Operation::create("acl", parent.clone(), *name, Some(*idx), priority, Payload::Acl((*acl).clone()))),
            Some((_, cur)) if cur != acl => {
                ops.push(Operation::update("acl", parent.clone(), *name, Some(*idx), priority, Payload::Acl((*acl).clone())))
            }
            _ => {}
        }
    }
    for (name, (idx, _)) in &current_by_name {
        if !desired_by_name.contains_key(name) {
            ops.push(Operation::delete("acl", parent.clone(), *name, Some(*idx), priority));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn acl_rename_is_delete_plus_create_not_update() {
        let current = vec![Acl::builder().name("old_name").criterion("path_beg").value("/a").build()];
        let desired = vec![Acl::builder().name("new_name").criterion("path_beg").value("/a").build()];
        let mut ops = Vec::new();
        diff_acls(&current, &desired, None, 30, &mut ops);
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().any(|o| o.kind == crate::operation::OpKind::Delete && o.key == "old_name"));
        assert!(ops.iter().any(|o| o.kind == crate::operation::OpKind::Create && o.key == "new_name"));
    }

    #[test]
    fn positional_diff_is_index_aligned() {
        let current = vec!["a".to_string(), "b".to_string()];
        let desired = vec!["a".to_string(), "c".to_string(), "d".to_string()];
        let mut ops = Vec::new();
        diff_positional(&current, &desired, "thing", None, 30, |_: String| Payload::None, &mut ops);
        // index 1 differs (b -> c): Update; index 2 only in desired: Create.
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().any(|o| o.kind == crate::operation::OpKind::Update && o.index == Some(1)));
        assert!(ops.iter().any(|o| o.kind == crate::operation::OpKind::Create && o.index == Some(2)));
    }
}
