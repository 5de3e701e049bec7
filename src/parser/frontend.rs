use crate::model::{
    Acl, BackendSwitchingRule, Bind, Capture, Filter, Frontend, HttpAfterResponseRule,
    HttpRequestRule, HttpResponseRule, LogTarget, TcpRequestRule, TcpResponseRule,
};

use super::lexer::tokenize_line;
use super::values::{parse_u32, split_condition, split_host_port};

pub(crate) fn extract_frontend(name: &str, lines: &[&str]) -> Frontend {
    let mut frontend = Frontend::builder().name(name).build();
    for raw in lines {
        let tokens = tokenize_line(raw);
        let Some((head, rest)) = tokens.split_first() else {
            continue;
        };
        match *head {
            "bind" if !rest.is_empty() => {
                let (address, port) = split_host_port(rest[0]);
                let bind_name = rest
                    .iter()
                    .position(|t| *t == "name")
                    .and_then(|idx| rest.get(idx + 1))
                    .copied()
                    .unwrap_or(rest[0]);
                frontend.binds.insert(
                    bind_name.to_string(),
                    Bind::builder()
                        .name(bind_name)
                        .address(address)
                        .port(port)
                        .ssl(rest.contains(&"ssl"))
                        .certificate(
                            rest.iter()
                                .position(|t| *t == "crt")
                                .and_then(|idx| rest.get(idx + 1))
                                .map(|s| s.to_string()),
                        )
                        .build(),
                );
            }
            "acl" if rest.len() >= 2 => {
                frontend.acls.push(
                    Acl::builder()
                        .name(rest[0])
                        .criterion(rest[1])
                        .value(rest[2..].join(" "))
                        .build(),
                );
            }
            "http-request" if !rest.is_empty() => {
                let (body, cond, cond_test) = split_condition(rest);
                frontend.http_request_rules.push(
                    HttpRequestRule::builder()
                        .cond(cond)
                        .cond_test(cond_test)
                        .rule_type(body[0])
                        .raw(raw.trim())
                        .build(),
                );
            }
            "http-response" if !rest.is_empty() => {
                let (body, cond, cond_test) = split_condition(rest);
                frontend.http_response_rules.push(
                    HttpResponseRule::builder()
                        .cond(cond)
                        .cond_test(cond_test)
                        .rule_type(body[0])
                        .raw(raw.trim())
                        .build(),
                );
            }
            "http-after-response" if !rest.is_empty() => {
                let (body, cond, cond_test) = split_condition(rest);
                frontend.http_after_response_rules.push(
                    HttpAfterResponseRule::builder()
                        .cond(cond)
                        .cond_test(cond_test)
                        .rule_type(body[0])
                        .raw(raw.trim())
                        .build(),
                );
            }
            "tcp-request" if !rest.is_empty() => {
                let (body, cond, cond_test) = split_condition(rest);
                frontend.tcp_request_rules.push(
                    TcpRequestRule::builder()
                        .cond(cond)
                        .cond_test(cond_test)
                        .rule_type(body[0])
                        .raw(raw.trim())
                        .build(),
                );
            }
            "tcp-response" if !rest.is_empty() => {
                let (body, cond, cond_test) = split_condition(rest);
                frontend.tcp_response_rules.push(
                    TcpResponseRule::builder()
                        .cond(cond)
                        .cond_test(cond_test)
                        .rule_type(body[0])
                        .raw(raw.trim())
                        .build(),
                );
            }
            "filter" if !rest.is_empty() => {
                frontend.filters.push(
                    Filter::builder().filter_type(rest[0]).raw(raw.trim()).build(),
                );
            }
            "declare" if rest.first() == Some(&"capture") && rest.len() >= 2 => {
                let len = rest
                    .iter()
                    .position(|t| *t == "len")
                    .and_then(|idx| rest.get(idx + 1))
                    .and_then(|v| parse_u32(v));
                frontend.captures.push(
                    Capture::builder().expression(rest[1]).len(len).build(),
                );
            }
            "log" if !rest.is_empty() && rest[0] != "global" => {
                frontend.log_targets.push(
                    LogTarget::builder()
                        .address(rest[0])
                        .facility(rest.get(1).map(|s| s.to_string()))
                        .level(rest.get(2).map(|s| s.to_string()))
                        .build(),
                );
            }
            "use_backend" if !rest.is_empty() => {
                let (body, cond, cond_test) = split_condition(rest);
                frontend.backend_switching_rules.push(
                    BackendSwitchingRule::builder()
                        .name(body[0])
                        .cond(cond)
                        .cond_test(cond_test)
                        .raw(raw.trim())
                        .build(),
                );
            }
            "mode" => frontend.mode = rest.first().map(|s| s.to_string()),
            "default_backend" => frontend.default_backend = rest.first().map(|s| s.to_string()),
            "maxconn" => frontend.maxconn = rest.first().and_then(|v| parse_u32(v)),
            _ => {
                frontend.extra_params.insert(head.to_string(), rest.join(" "));
            }
        }
    }
    frontend
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extracts_bind_and_switching_rule() {
        let lines = vec!["bind *:80", "default_backend web", "use_backend api if { path_beg /api }"];
        let frontend = extract_frontend("main", &lines);
        assert_eq!(frontend.binds.len(), 1);
        assert_eq!(frontend.default_backend.as_deref(), Some("web"));
        assert_eq!(frontend.backend_switching_rules.len(), 1);
        assert_eq!(frontend.backend_switching_rules[0].name, "api");
        assert_eq!(frontend.backend_switching_rules[0].cond.as_deref(), Some("if"));
    }

    #[test]
    fn acl_carries_name_and_criterion() {
        let lines = vec!["acl is_api path_beg /api"];
        let frontend = extract_frontend("main", &lines);
        assert_eq!(frontend.acls.len(), 1);
        assert_eq!(frontend.acls[0].name, "is_api");
        assert_eq!(frontend.acls[0].criterion, "path_beg");
        assert_eq!(frontend.acls[0].value, "/api");
    }
}
