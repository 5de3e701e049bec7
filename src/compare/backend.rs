//! Full nested decomposition for `backend` sections (spec §4.2 dispatch step 5).

use std::collections::BTreeMap;

use crate::model::Backend;
use crate::operation::{priority, Operation, ParentRef, Payload};

use super::support::{diff_acls, diff_keyed, diff_positional};

pub(crate) fn diff_backends(current: &BTreeMap<String, Backend>, desired: &BTreeMap<String, Backend>, ops: &mut Vec<Operation>) {
    for (name, desired_backend) in desired {
        match current.get(name) {
            None => {
                ops.push(Operation::create(
                    "backend",
                    None,
                    name.clone(),
                    None,
                    priority::NAMED_SECTION,
                    Payload::Backend(desired_backend.without_children()),
                ));
                let empty = Backend::builder().name(name).build();
                diff_children(name, &empty, desired_backend, ops);
            }
            Some(current_backend) => {
                diff_children(name, current_backend, desired_backend, ops);
                if current_backend.without_children() != desired_backend.without_children() {
                    ops.push(Operation::update(
                        "backend",
                        None,
                        name.clone(),
                        None,
                        priority::NAMED_SECTION,
                        Payload::Backend(desired_backend.without_children()),
                    ));
                }
            }
        }
    }
    for (name, current_backend) in current {
        if desired.contains_key(name) {
            continue;
        }
        let empty = Backend::builder().name(name).build();
        diff_children(name, current_backend, &empty, ops);
        ops.push(Operation::delete("backend", None, name.clone(), None, priority::NAMED_SECTION));
    }
}

fn diff_children(name: &str, current: &Backend, desired: &Backend, ops: &mut Vec<Operation>) {
    let parent = Some(ParentRef::Backend(name.to_string()));

    diff_keyed(&current.servers, &desired.servers, "server", parent.clone(), priority::SECTION_CHILD, Payload::Server, ops);
    diff_keyed(
        &current.server_templates,
        &desired.server_templates,
        "server_template",
        parent.clone(),
        priority::SECTION_CHILD,
        Payload::ServerTemplate,
        ops,
    );
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
        &current.http_checks,
        &desired.http_checks,
        "http_check",
        parent.clone(),
        priority::SECTION_CHILD,
        Payload::HttpCheck,
        ops,
    );
    diff_positional(
        &current.tcp_checks,
        &desired.tcp_checks,
        "tcp_check",
        parent.clone(),
        priority::SECTION_CHILD,
        Payload::TcpCheck,
        ops,
    );
    diff_positional(
        &current.server_switching_rules,
        &desired.server_switching_rules,
        "server_switching_rule",
        parent.clone(),
        priority::SECTION_CHILD,
        Payload::ServerSwitchingRule,
        ops,
    );
    diff_positional(
        &current.stick_rules,
        &desired.stick_rules,
        "stick_rule",
        parent.clone(),
        priority::SECTION_CHILD,
        Payload::StickRule,
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
        parent,
        priority::SECTION_CHILD,
        Payload::LogTarget,
        ops,
    );
}
