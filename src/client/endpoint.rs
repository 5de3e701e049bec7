//! Maps an [`Operation`] to the Dataplane REST path and query parameters that carry it (spec
//! §6). The API is a conventional per-resource CRUD surface: collection path pluralizes the
//! section tag, child resources take their owning parent's name as a query parameter, and
//! positional children additionally take their index.

use crate::operation::{Operation, ParentRef};

pub(crate) struct Endpoint {
    pub(crate) path: String,
    pub(crate) query: Vec<(&'static str, String)>,
}

fn collection(section_tag: &str) -> &str {
    match section_tag {
        "global" => "global",
        "defaults" => "defaults",
        "frontend" => "frontends",
        "backend" => "backends",
        "bind" => "binds",
        "acl" => "acls",
        "http_request_rule" => "http_request_rules",
        "http_response_rule" => "http_response_rules",
        "http_after_response_rule" => "http_after_response_rules",
        "tcp_request_rule" => "tcp_request_rules",
        "tcp_response_rule" => "tcp_response_rules",
        "filter" => "filters",
        "capture" => "captures",
        "log_target" => "log_targets",
        "backend_switching_rule" => "backend_switching_rules",
        "server" => "servers",
        "server_template" => "server_templates",
        "server_switching_rule" => "server_switching_rules",
        "stick_rule" => "stick_rules",
        "http_check" => "http_checks",
        "tcp_check" => "tcp_checks",
        "userlist" => "userlists",
        "user" => "users",
        "group" => "groups",
        "peers" => "peers",
        "peer_entry" => "peer_entries",
        "resolvers" => "resolvers",
        "nameserver" => "nameservers",
        "mailers" => "mailers",
        "mailer_entry" => "mailer_entries",
        "cache" => "caches",
        "ring" => "rings",
        "http_errors" => "http_errors",
        "program" => "programs",
        "log_forward" => "log_forwards",
        "fcgi_app" => "fcgi_apps",
        "crt_store" => "crt_stores",
        other => other,
    }
}

fn parent_query(parent: &ParentRef) -> (&'static str, String) {
    match parent {
        ParentRef::Frontend(name) => ("frontend", name.clone()),
        ParentRef::Backend(name) => ("backend", name.clone()),
        ParentRef::Userlist(name) => ("userlist", name.clone()),
        ParentRef::Peers(name) => ("peers", name.clone()),
        ParentRef::Resolvers(name) => ("resolvers", name.clone()),
        ParentRef::Mailers(name) => ("mailers", name.clone()),
    }
}

/// Builds the path and query string for `op`, not including the `transaction_id` / API version
/// prefix — [`super::HttpDataplaneClient`] attaches those uniformly for every request.
pub(crate) fn endpoint_for(op: &Operation) -> Endpoint {
    let mut path = format!("/services/haproxy/configuration/{}", collection(op.section_tag));
    let mut query = Vec::new();

    if op.section_tag != "global" && op.index.is_none() {
        // Keyed entities (including the global singleton's sibling named sections) are addressed
        // by name on update/delete.
        if matches!(op.kind, crate::operation::OpKind::Update | crate::operation::OpKind::Delete) {
            path.push('/');
            path.push_str(&op.key);
        }
    } else if let Some(index) = op.index {
        if matches!(op.kind, crate::operation::OpKind::Update | crate::operation::OpKind::Delete) {
            query.push(("index", index.to_string()));
        }
    }

    if let Some(parent) = &op.parent {
        query.push(parent_query(parent));
    }

    Endpoint { path, query }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::operation::{priority, Payload};

    #[test]
    fn backend_create_has_no_suffix() {
        let op = Operation::create("backend", None, "web", None, priority::NAMED_SECTION, Payload::None);
        let endpoint = endpoint_for(&op);
        assert_eq!(endpoint.path, "/services/haproxy/configuration/backends");
    }

    #[test]
    fn server_update_carries_name_and_parent_query() {
        let op = Operation::update(
            "server",
            Some(ParentRef::Backend("web".into())),
            "srv1",
            None,
            priority::SECTION_CHILD,
            Payload::None,
        );
        let endpoint = endpoint_for(&op);
        assert_eq!(endpoint.path, "/services/haproxy/configuration/servers/srv1");
        assert!(endpoint.query.contains(&("backend", "web".to_string())));
    }

    #[test]
    fn positional_rule_delete_carries_index() {
        let op = Operation::delete(
            "http_request_rule",
            Some(ParentRef::Frontend("web".into())),
            "0",
            Some(0),
            priority::SECTION_CHILD,
        );
        let endpoint = endpoint_for(&op);
        assert_eq!(endpoint.path, "/services/haproxy/configuration/http_request_rules");
        assert!(endpoint.query.contains(&("index", "0".to_string())));
        assert!(endpoint.query.contains(&("frontend", "web".to_string())));
    }
}
