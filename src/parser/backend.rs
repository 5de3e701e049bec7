use crate::model::{
    Acl, Backend, Capture, Filter, HttpAfterResponseRule, HttpCheck, HttpRequestRule,
    HttpResponseRule, LogTarget, Server, ServerSwitchingRule, ServerTemplate, StickRule,
    TcpCheck, TcpRequestRule,
};

use super::lexer::tokenize_line;
use super::values::{parse_u32, split_condition, split_host_port};

pub(crate) fn extract_backend(name: &str, lines: &[&str]) -> Backend {
    let mut backend = Backend::builder().name(name).build();
    for raw in lines {
        let tokens = tokenize_line(raw);
        let Some((head, rest)) = tokens.split_first() else {
            continue;
        };
        match *head {
            "server" if rest.len() >= 2 => {
                let server_name = rest[0];
                let (address, port) = split_host_port(rest[1]);
                let mut server = Server::builder()
                    .name(server_name)
                    .address(address)
                    .port(port)
                    .check(rest.contains(&"check"))
                    .backup(rest.contains(&"backup"))
                    .ssl(rest.contains(&"ssl"))
                    .send_proxy(rest.iter().any(|t| t.starts_with("send-proxy")))
                    .maintenance(rest.contains(&"maint"))
                    .build();
                server.weight = rest
                    .iter()
                    .position(|t| *t == "weight")
                    .and_then(|idx| rest.get(idx + 1))
                    .and_then(|v| parse_u32(v));
                server.maxconn = rest
                    .iter()
                    .position(|t| *t == "maxconn")
                    .and_then(|idx| rest.get(idx + 1))
                    .and_then(|v| parse_u32(v));
                backend.servers.insert(server_name.to_string(), server);
            }
            "server-template" if rest.len() >= 3 => {
                let prefix = rest[0];
                let (fqdn, port) = split_host_port(rest[2]);
                backend.server_templates.insert(
                    prefix.to_string(),
                    ServerTemplate::builder()
                        .prefix(prefix)
                        .num_or_range(rest[1])
                        .fqdn(fqdn)
                        .port(port)
                        .check(rest.contains(&"check"))
                        .weight(
                            rest.iter()
                                .position(|t| *t == "weight")
                                .and_then(|idx| rest.get(idx + 1))
                                .and_then(|v| parse_u32(v)),
                        )
                        .build(),
                );
            }
            "acl" if rest.len() >= 2 => {
                backend.acls.push(
                    Acl::builder()
                        .name(rest[0])
                        .criterion(rest[1])
                        .value(rest[2..].join(" "))
                        .build(),
                );
            }
            "http-request" if !rest.is_empty() => {
                let (body, cond, cond_test) = split_condition(rest);
                backend.http_request_rules.push(
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
                backend.http_response_rules.push(
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
                backend.http_after_response_rules.push(
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
                backend.tcp_request_rules.push(
                    TcpRequestRule::builder()
                        .cond(cond)
                        .cond_test(cond_test)
                        .rule_type(body[0])
                        .raw(raw.trim())
                        .build(),
                );
            }
            "http-check" if !rest.is_empty() => {
                let (body, cond, cond_test) = split_condition(rest);
                backend.http_checks.push(
                    HttpCheck::builder()
                        .cond(cond)
                        .cond_test(cond_test)
                        .check_type(body[0])
                        .raw(raw.trim())
                        .build(),
                );
            }
            "tcp-check" if !rest.is_empty() => {
                let (body, cond, cond_test) = split_condition(rest);
                backend.tcp_checks.push(
                    TcpCheck::builder()
                        .cond(cond)
                        .cond_test(cond_test)
                        .check_type(body[0])
                        .raw(raw.trim())
                        .build(),
                );
            }
            "use-server" if !rest.is_empty() => {
                let (body, cond, cond_test) = split_condition(rest);
                backend.server_switching_rules.push(
                    ServerSwitchingRule::builder()
                        .name(body[0])
                        .cond(cond)
                        .cond_test(cond_test)
                        .raw(raw.trim())
                        .build(),
                );
            }
            "stick" if !rest.is_empty() => {
                let (body, cond, cond_test) = split_condition(rest);
                backend.stick_rules.push(
                    StickRule::builder()
                        .cond(cond)
                        .cond_test(cond_test)
                        .rule_type(body[0])
                        .raw(raw.trim())
                        .build(),
                );
            }
            "filter" if !rest.is_empty() => {
                backend.filters.push(Filter::builder().filter_type(rest[0]).raw(raw.trim()).build());
            }
            "log" if !rest.is_empty() && rest[0] != "global" => {
                backend.log_targets.push(
                    LogTarget::builder()
                        .address(rest[0])
                        .facility(rest.get(1).map(|s| s.to_string()))
                        .level(rest.get(2).map(|s| s.to_string()))
                        .build(),
                );
            }
            "declare" if rest.first() == Some(&"capture") && rest.len() >= 2 => {
                let len = rest
                    .iter()
                    .position(|t| *t == "len")
                    .and_then(|idx| rest.get(idx + 1))
                    .and_then(|v| parse_u32(v));
                backend.captures.push(Capture::builder().expression(rest[1]).len(len).build());
            }
            "mode" => backend.mode = rest.first().map(|s| s.to_string()),
            "balance" => backend.balance = rest.first().map(|s| s.to_string()),
            "timeout" if rest.len() >= 2 => match rest[0] {
                "connect" => backend.timeout_connect = parse_u32(rest[1]),
                "server" => backend.timeout_server = parse_u32(rest[1]),
                other => {
                    backend.extra_params.insert(format!("timeout {other}"), rest[1].to_string());
                }
            },
            _ => {
                backend.extra_params.insert(head.to_string(), rest.join(" "));
            }
        }
    }
    backend
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extracts_server_with_weight_and_flags() {
        let lines = vec!["server srv1 10.0.0.1:8080 weight 100 check"];
        let backend = extract_backend("web", &lines);
        let srv = &backend.servers["srv1"];
        assert_eq!(srv.address, "10.0.0.1");
        assert_eq!(srv.port, Some(8080));
        assert_eq!(srv.weight, Some(100));
        assert!(srv.check);
    }

    #[test]
    fn extracts_use_server_switching_rule() {
        let lines = vec!["use-server canary if { hdr(x-canary) -m found }"];
        let backend = extract_backend("web", &lines);
        assert_eq!(backend.server_switching_rules.len(), 1);
        assert_eq!(backend.server_switching_rules[0].name, "canary");
    }
}
