use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// A user within a [`Userlist`], keyed by username.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[builder(!default)]
    pub username: String,
    pub password_hash: String,
    pub groups: Vec<String>,
}

/// A group within a [`Userlist`], keyed by group name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[builder(!default)]
    pub name: String,
    pub users: Vec<String>,
}

/// A named `userlist` section.
///
/// The comparator emits a `Userlist` Create operation *and* an explicit per-user Create for
/// each user on first creation, because the Dataplane API does not reliably persist users
/// embedded in the parent request body. On modification, per-user operations are used unless
/// group membership changed, in which case the whole userlist is recreated (`compare::userlist`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct Userlist {
    #[builder(!default)]
    pub name: String,
    pub users: BTreeMap<String, User>,
    pub groups: BTreeMap<String, Group>,
}

impl Userlist {
    pub(crate) fn without_children(&self) -> Self {
        Self {
            name: self.name.clone(),
            ..Default::default()
        }
    }

    /// The set of group names referenced by `users`, used to decide whether a modification
    /// requires a full userlist recreate rather than fine-grained per-user operations.
    pub(crate) fn group_membership_fingerprint(&self) -> BTreeMap<&str, &[String]> {
        self.users
            .iter()
            .map(|(name, u)| (name.as_str(), u.groups.as_slice()))
            .collect()
    }
}
