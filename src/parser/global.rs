use crate::model::{Defaults, Global, LogTarget};

use super::lexer::tokenize_line;
use super::values::parse_u32;

pub(crate) fn extract_global(lines: &[&str]) -> Global {
    let mut global = Global::builder().build();
    for raw in lines {
        let tokens = tokenize_line(raw);
        let Some((head, rest)) = tokens.split_first() else {
            continue;
        };
        match *head {
            "maxconn" => global.maxconn = rest.first().and_then(|v| parse_u32(v)),
            "nbthread" => global.nbthread = rest.first().and_then(|v| parse_u32(v)),
            "ssl-default-bind-ciphers" => global.ssl_default_bind_ciphers = Some(rest.join(" ")),
            "ssl-default-bind-options" => global.ssl_default_bind_options = Some(rest.join(" ")),
            "log" if !rest.is_empty() => global.log_targets.push(LogTarget::builder()
                .address(rest[0])
                .facility(rest.get(1).map(|s| s.to_string()))
                .level(rest.get(2).map(|s| s.to_string()))
                .build()),
            _ => {
                global.extra_params.insert(head.to_string(), rest.join(" "));
            }
        }
    }
    global
}

pub(crate) fn extract_defaults(name: &str, lines: &[&str]) -> Defaults {
    let mut defaults = Defaults::builder().name(name).build();
    for raw in lines {
        let tokens = tokenize_line(raw);
        let Some((head, rest)) = tokens.split_first() else {
            continue;
        };
        match *head {
            "mode" => defaults.mode = rest.first().map(|s| s.to_string()),
            "balance" => defaults.balance = rest.first().map(|s| s.to_string()),
            "timeout" if rest.len() >= 2 => match rest[0] {
                "connect" => defaults.timeout_connect = parse_u32(rest[1]),
                "client" => defaults.timeout_client = parse_u32(rest[1]),
                "server" => defaults.timeout_server = parse_u32(rest[1]),
                other => {
                    defaults.extra_params.insert(format!("timeout {other}"), rest[1].to_string());
                }
            },
            _ => {
                defaults.extra_params.insert(head.to_string(), rest.join(" "));
            }
        }
    }
    defaults
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extracts_scalar_global_fields() {
        let lines = vec!["maxconn 2000", "nbthread 4", "log 127.0.0.1:514 local0 info"];
        let global = extract_global(&lines);
        assert_eq!(global.maxconn, Some(2000));
        assert_eq!(global.nbthread, Some(4));
        assert_eq!(global.log_targets.len(), 1);
        assert_eq!(global.log_targets[0].address, "127.0.0.1:514");
    }

    #[test]
    fn extracts_defaults_timeouts() {
        let lines = vec!["mode http", "timeout connect 5000", "timeout client 30000"];
        let defaults = extract_defaults("my-defaults", &lines);
        assert_eq!(defaults.mode.as_deref(), Some("http"));
        assert_eq!(defaults.timeout_connect, Some(5000));
        assert_eq!(defaults.timeout_client, Some(30000));
    }
}
