//! Dispatch steps 2 and 3 (spec §4.2): named sections with no nested collections worth breaking
//! out. Comparator behavior is identical to [`super::support::diff_keyed`] with no parent — it's
//! kept as its own thin wrapper so the section kinds dispatched here read as a deliberate list,
//! not an accident of generics.

use std::collections::BTreeMap;

use crate::operation::{Operation, Payload};

use super::support::diff_keyed;

pub(crate) fn diff_named_map<T, F>(
    current: &BTreeMap<String, T>,
    desired: &BTreeMap<String, T>,
    tag: &'static str,
    priority: i32,
    to_payload: F,
    ops: &mut Vec<Operation>,
) where
    T: Clone + PartialEq,
    F: Fn(T) -> Payload,
{
    diff_keyed(current, desired, tag, None, priority, to_payload, ops)
}
