//! Full nested decomposition for `frontend` sections (spec §4.2 dispatch step 5).

use std::collections::BTreeMap;

use crate::model::Frontend;
use crate::operation::{priority, Operation, ParentRef, Payload};

use super::support::{diff_acls, diff_keyed, diff_positional};

pub(crate) fn diff_frontends(current: &BTreeMap<String, Frontend>, desired: &BTreeMap<String, Frontend>, ops: &mut Vec<Operation>) {
    for (name, desired_frontend) in desired {
        match current.get(name) {
            None => {
                ops.push(Operation::create(
                    "frontend",
                    None,
                    name.clone(),
                    None,
                    priority::NAMED_SECTION,
                    Payload::Frontend(desired_frontend.without_children()),
                ));
                let empty = Frontend::builder().name(name).build();
                diff_children(name, &empty, desired_frontend, ops);
            }
            Some(current_frontend) => {
                diff_children(name, current_frontend, desired_frontend, ops);
                if current_frontend.without_children() != desired_frontend.without_children() {
                    ops.push(Operation::update(
                        "frontend",
                        None,
                        name.clone(),
                        None,
                        priority::NAMED_SECTION,
                        Payload::Frontend(desired_frontend.without_children()),
                    ));
                }
            }
        }
    }
    for (name, current_frontend) in current {
        if desired.contains_key(name) {
            continue;
        }
        let empty = Frontend::builder().name(name).build();
        diff_children(name, current_frontend, &empty, ops);
        ops.push(Operation::delete("frontend", None, name.clone(), None, priority::NAMED_SECTION));
    }
}

fn diff_children(name: &str, current: &Frontend, desired: &Frontend, ops: &mut Vec<Operation>) {
    let parent = Some(ParentRef::Frontend(name.to_string()));

    diff_keyed(&current.binds, &desired.binds, "bind", parent.clone(), priority::SECTION_CHILD, Payload::Bind, ops);
    diff_acls(&current.acls, &desired.acls, parent.clone(), priority::SECTION_CHILD, ops);
    diff_positional(
        &current.http_request_rules,
        &desired.http_request_rules,
        "http_request_rule",
        parent.clone(),
        priority::SECTION_CHILD,
        Payload::HttpRequestRule,
        ops,
    );
    diff_positional(
        &current.http_response_rules,
        &desired.http_response_rules,
        "http_response_rule",
        parent.clone(),
        priority::SECTION_CHILD,
        Payload::HttpResponseRule,
        ops,
    );
    diff_positional(
        &current.http_after_response_rules,
        &desired.http_after_response_rules,
        "http_after_response_rule",
        parent.clone(),
        priority::SECTION_CHILD,
        Payload::HttpAfterResponseRule,
        ops,
    );
    diff_positional(
        &current.tcp_request_rules,
        &desired.tcp_request_rules,
        "tcp_request_rule",
        parent.clone(),
        priority::SECTION_CHILD,
        Payload::TcpRequestRule,
        ops,
    );
    diff_positional(
        &current.tcp_response_rules,
        &desired.tcp_response_rules,
        "tcp_response_rule",
        parent.clone(),
        priority::SECTION_CHILD,
        Payload::TcpResponseRule,
        ops,
    );
    diff_positional(&current.filters, &desired.filters, "filter", parent.clone(), priority::SECTION_CHILD, Payload::Filter, ops);
    diff_positional(
        &current.captures,
        &desired.captures,
        "capture",
        parent.clone(),
        priority::SECTION_CHILD,
        Payload::Capture,
        ops,
    );
    diff_positional(
        &current.log_targets,
        &desired.log_targets,
        "log_target",
        parent.clone(),
        priority::SECTION_CHILD,
        Payload::LogTarget,
        ops,
    );
    diff_positional(
        &current.backend_switching_rules,
        &desired.backend_switching_rules,
        "backend_switching_rule",
        parent,
        priority::SECTION_CHILD,
        Payload::BackendSwitchingRule,
        ops,
    );
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{Acl, Bind};

    #[test]
    fn new_frontend_creates_parent_without_children_then_children() {
        let current = BTreeMap::new();
        let mut desired = BTreeMap::new();
        let mut frontend = Frontend::builder().name("web").build();
        frontend.binds.insert("main".into(), Bind::builder().name("main").address("*").port(80u16).build());
        desired.insert("web".to_string(), frontend);

        let mut ops = Vec::new();
        diff_frontends(&current, &desired, &mut ops);

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].section_tag, "frontend");
        assert_eq!(ops[0].kind, crate::operation::OpKind::Create);
        assert_eq!(ops[1].section_tag, "bind");
    }

    #[test]
    fn acl_rename_within_frontend_is_delete_plus_create() {
        let mut current_frontend = Frontend::builder().name("web").build();
        current_frontend.acls.push(Acl::builder().name("old").criterion("path_beg").value("/a").build());
        let mut current = BTreeMap::new();
        current.insert("web".to_string(), current_frontend);

        let mut desired_frontend = Frontend::builder().name("web").build();
        desired_frontend.acls.push(Acl::builder().name("new").criterion("path_beg").value("/a").build());
        let mut desired = BTreeMap::new();
        desired.insert("web".to_string(), desired_frontend);

        let mut ops = Vec::new();
        diff_frontends(&current, &desired, &mut ops);
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().any(|o| o.kind == crate::operation::OpKind::Delete && o.key == "old"));
        assert!(ops.iter().any(|o| o.kind == crate::operation::OpKind::Create && o.key == "new"));
    }
}
