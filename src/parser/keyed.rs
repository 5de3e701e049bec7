//! Extractors for section kinds whose only children are a single keyed-map collection:
//! `peers`/peer-entries, `resolvers`/nameservers, `mailers`/mailer-entries.

use crate::model::{MailerEntry, MailersSection, Nameserver, PeerEntry, PeerSection, Resolvers};

use super::lexer::tokenize_line;
use super::values::{parse_u32, split_host_port};

pub(crate) fn extract_peers(name: &str, lines: &[&str]) -> PeerSection {
    let mut section = PeerSection::builder().name(name).build();
    for raw in lines {
        let tokens = tokenize_line(raw);
        if tokens.first() != Some(&"peer") || tokens.len() < 3 {
            continue;
        }
        let entry_name = tokens[1];
        let (address, addr_port) = split_host_port(tokens[2]);
        section.entries.insert(
            entry_name.to_string(),
            PeerEntry::builder()
                .name(entry_name)
                .address(address)
                .port(addr_port)
                .build(),
        );
    }
    section
}

pub(crate) fn extract_resolvers(name: &str, lines: &[&str]) -> Resolvers {
    let mut section = Resolvers::builder().name(name).build();
    for raw in lines {
        let tokens = tokenize_line(raw);
        let Some((head, rest)) = tokens.split_first() else {
            continue;
        };
        match *head {
            "nameserver" if rest.len() >= 2 => {
                let (address, port) = split_host_port(rest[1]);
                section.nameservers.insert(
                    rest[0].to_string(),
                    Nameserver::builder().name(rest[0]).address(address).port(port).build(),
                );
            }
            "accepted_payload_size" => section.accepted_payload_size = rest.first().and_then(|v| parse_u32(v)),
            "hold" if rest.len() >= 2 && rest[0] == "valid" => {
                section.hold_valid = Some(rest[1].to_string())
            }
            _ => {}
        }
    }
    section
}

pub(crate) fn extract_mailers(name: &str, lines: &[&str]) -> MailersSection {
    let mut section = MailersSection::builder().name(name).build();
    for raw in lines {
        let tokens = tokenize_line(raw);
        let Some((head, rest)) = tokens.split_first() else {
            continue;
        };
        match *head {
            "mailer" if rest.len() >= 2 => {
                let (address, port) = split_host_port(rest[1]);
                section.entries.insert(
                    rest[0].to_string(),
                    MailerEntry::builder().name(rest[0]).address(address).port(port).build(),
                );
            }
            "timeout" if rest.len() >= 2 && rest[0] == "mail" => {
                section.timeout_mail = parse_u32(rest[1]);
            }
            _ => {}
        }
    }
    section
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extracts_peer_entries() {
        let lines = vec!["peer node1 10.0.0.1:1023", "peer node2 10.0.0.2:1023"];
        let section = extract_peers("cluster", &lines);
        assert_eq!(section.entries.len(), 2);
        assert_eq!(section.entries["node1"].port, Some(1023));
    }

    #[test]
    fn extracts_resolvers_fields() {
        let lines = vec!["nameserver dns1 10.0.0.53:53", "hold valid 10s"];
        let section = extract_resolvers("mydns", &lines);
        assert_eq!(section.nameservers.len(), 1);
        assert_eq!(section.hold_valid.as_deref(), Some("10s"));
    }

    #[test]
    fn extracts_mailer_entries() {
        let lines = vec!["mailer smtp1 10.0.0.5:25", "timeout mail 20s"];
        let section = extract_mailers("alerts", &lines);
        assert_eq!(section.entries.len(), 1);
        assert!(section.timeout_mail.is_none());
    }
}
