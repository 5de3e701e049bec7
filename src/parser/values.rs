//! Small token-level helpers shared by every per-section extractor in [`super::sections`].

/// Splits a trailing `if <cond_test...>` / `unless <cond_test...>` clause off the end of a rule's
/// token stream, as used by `http-request`, `tcp-request`, `use_backend`, `use-server`, and the
/// check/stick directives. Returns the remaining body tokens plus the condition keyword and test.
pub(crate) fn split_condition<'a>(tokens: &[&'a str]) -> (Vec<&'a str>, Option<String>, Option<String>) {
    if let Some(idx) = tokens.iter().position(|t| *t == "if" || *t == "unless") {
        let cond = tokens[idx].to_string();
        let cond_test = tokens[idx + 1..].join(" ");
        let cond_test = if cond_test.is_empty() { None } else { Some(cond_test) };
        (tokens[..idx].to_vec(), Some(cond), cond_test)
    } else {
        (tokens.to_vec(), None, None)
    }
}

/// Parses `host:port` or a bare `host`/`*` address, returning `(address, Option<port>)`.
pub(crate) fn split_host_port(addr: &str) -> (String, Option<u16>) {
    match addr.rsplit_once(':') {
        Some((host, port)) => match port.parse::<u16>() {
            Ok(p) => (host.to_string(), Some(p)),
            Err(_) => (addr.to_string(), None),
        },
        None => (addr.to_string(), None),
    }
}

/// Parses an unsigned integer parameter, returning `None` rather than failing the whole section
/// on a malformed value — the parser's partial-result policy (§4.1) applies per-directive too.
pub(crate) fn parse_u32(value: &str) -> Option<u32> {
    value.parse().ok()
}

pub(crate) fn parse_u16(value: &str) -> Option<u16> {
    value.parse().ok()
}

/// Records an unrecognized directive verbatim so round-tripping the parser never silently drops
/// a keyword the model doesn't break out individually.
pub(crate) fn record_extra(extra_params: &mut std::collections::BTreeMap<String, String>, tokens: &[&str]) {
    if let Some((key, rest)) = tokens.split_first() {
        extra_params.insert(key.to_string(), rest.join(" "));
    }
}
