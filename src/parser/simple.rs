//! Extractor for section kinds with no nested collections (§4.2 dispatch step 3): everything not
//! broken out individually lands in `extra_params`, keyed by directive.

use std::collections::BTreeMap;

use super::lexer::tokenize_line;

pub(crate) fn extract_extra_params(lines: &[&str]) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    for raw in lines {
        let tokens = tokenize_line(raw);
        if let Some((head, rest)) = tokens.split_first() {
            params.insert(head.to_string(), rest.join(" "));
        }
    }
    params
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn collects_every_directive_as_extra_param() {
        let lines = vec!["size 10m", "process master-worker"];
        let params = extract_extra_params(&lines);
        assert_eq!(params.get("size").map(String::as_str), Some("10m"));
        assert_eq!(params.get("process").map(String::as_str), Some("master-worker"));
    }
}
