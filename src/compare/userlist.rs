//! `userlist` comparison (spec §4.2, "Userlists with http-auth dependents").
//!
//! A new userlist gets its own Create *plus* an explicit per-user Create, because the Dataplane
//! API does not reliably persist users embedded in the parent request body. On modification,
//! fine-grained per-user/per-group operations are used unless group membership changed, in which
//! case the whole userlist is recreated (Delete then Create) rather than trying to reconcile
//! membership change fallout one user at a time.

use std::collections::BTreeMap;

use crate::model::Userlist;
use crate::operation::{priority, Operation, ParentRef, Payload};

use super::support::diff_keyed;

pub(crate) fn diff_userlists(
    current: &BTreeMap<String, Userlist>,
    desired: &BTreeMap<String, Userlist>,
    ops: &mut Vec<Operation>,
) {
    for (name, desired_list) in desired {
        match current.get(name) {
            None => create_userlist(name, desired_list, ops),
            Some(current_list) if current_list == desired_list => {}
            Some(current_list) => {
                if current_list.group_membership_fingerprint() != desired_list.group_membership_fingerprint() {
                    delete_userlist(name, current_list, ops);
                    create_userlist(name, desired_list, ops);
                } else {
                    diff_keyed(
                        &current_list.users,
                        &desired_list.users,
                        "user",
                        Some(ParentRef::Userlist(name.clone())),
                        priority::FOUNDATIONAL_CHILD,
                        Payload::User,
                        ops,
                    );
                    diff_keyed(
                        &current_list.groups,
                        &desired_list.groups,
                        "group",
                        Some(ParentRef::Userlist(name.clone())),
                        priority::FOUNDATIONAL_CHILD,
                        Payload::Group,
                        ops,
                    );
                }
            }
        }
    }
    for (name, current_list) in current {
        if !desired.contains_key(name) {
            delete_userlist(name, current_list, ops);
        }
    }
}

fn create_userlist(name: &str, list: &Userlist, ops: &mut Vec<Operation>) {
    ops.push(Operation::create(
        "userlist",
        None,
        name.to_string(),
        None,
        priority::FOUNDATIONAL,
        Payload::Userlist(list.without_children()),
    ));
    for (username, user) in &list.users {
        ops.push(Operation::create(
            "user",
            Some(ParentRef::Userlist(name.to_string())),
            username.clone(),
            None,
            priority::FOUNDATIONAL_CHILD,
            Payload::User(user.clone()),
        ));
    }
    for (group_name, group) in &list.groups {
        ops.push(Operation::create(
            "group",
            Some(ParentRef::Userlist(name.to_string())),
            group_name.clone(),
            None,
            priority::FOUNDATIONAL_CHILD,
            Payload::Group(group.clone()),
        ));
    }
}

fn delete_userlist(name: &str, list: &Userlist, ops: &mut Vec<Operation>) {
    for group_name in list.groups.keys() {
        ops.push(Operation::delete(
            "group",
            Some(ParentRef::Userlist(name.to_string())),
            group_name.clone(),
            None,
            priority::FOUNDATIONAL_CHILD,
        ));
    }
    for username in list.users.keys() {
        ops.push(Operation::delete(
            "user",
            Some(ParentRef::Userlist(name.to_string())),
            username.clone(),
            None,
            priority::FOUNDATIONAL_CHILD,
        ));
    }
    ops.push(Operation::delete("userlist", None, name.to_string(), None, priority::FOUNDATIONAL));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::User;

    #[test]
    fn new_userlist_creates_parent_and_every_user() {
        let current = BTreeMap::new();
        let mut desired = BTreeMap::new();
        let mut list = Userlist::builder().name("auth_users").build();
        list.users.insert("admin".into(), User::builder().username("admin").password_hash("hash1").build());
        desired.insert("auth_users".to_string(), list);

        let mut ops = Vec::new();
        diff_userlists(&current, &desired, &mut ops);

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].section_tag, "userlist");
        assert_eq!(ops[1].section_tag, "user");
        assert_eq!(ops[1].key, "admin");
    }

    #[test]
    fn user_level_granularity_without_userlist_op() {
        let mut current_list = Userlist::builder().name("auth_users").build();
        current_list.users.insert("admin".into(), User::builder().username("admin").password_hash("hash1").build());
        let mut current = BTreeMap::new();
        current.insert("auth_users".to_string(), current_list);

        let mut desired_list = Userlist::builder().name("auth_users").build();
        desired_list.users.insert("admin".into(), User::builder().username("admin").password_hash("newhash").build());
        desired_list.users.insert("newuser".into(), User::builder().username("newuser").password_hash("hash3").build());
        let mut desired = BTreeMap::new();
        desired.insert("auth_users".to_string(), desired_list);

        let mut ops = Vec::new();
        diff_userlists(&current, &desired, &mut ops);

        assert!(ops.iter().all(|o| o.section_tag != "userlist"));
        assert!(ops.iter().any(|o| o.key == "newuser" && o.kind == crate::operation::OpKind::Create));
        assert!(ops.iter().any(|o| o.key == "admin" && o.kind == crate::operation::OpKind::Update));
    }

    #[test]
    fn group_membership_change_forces_full_recreate() {
        let mut current_list = Userlist::builder().name("auth_users").build();
        current_list.users.insert(
            "admin".into(),
            User::builder().username("admin").password_hash("hash1").groups(vec!["viewers".to_string()]).build(),
        );
        let mut current = BTreeMap::new();
        current.insert("auth_users".to_string(), current_list);

        let mut desired_list = Userlist::builder().name("auth_users").build();
        desired_list.users.insert(
            "admin".into(),
            User::builder().username("admin").password_hash("hash1").groups(vec!["admins".to_string()]).build(),
        );
        let mut desired = BTreeMap::new();
        desired.insert("auth_users".to_string(), desired_list);

        let mut ops = Vec::new();
        diff_userlists(&current, &desired, &mut ops);

        assert!(ops.iter().any(|o| o.section_tag == "userlist" && o.kind == crate::operation::OpKind::Delete));
        assert!(ops.iter().any(|o| o.section_tag == "userlist" && o.kind == crate::operation::OpKind::Create));
    }
}
