//! Splits raw HAProxy configuration text into a sequence of sections, each consisting of a
//! header line (`<keyword> [name]`) and its body lines.
//!
//! Comments (`#...`) are stripped before splitting; blank lines are dropped. The resulting body
//! line indices reflect only the semantic (non-comment) directives, so interleaving a comment
//! between two rules does not perturb the positional index the comparator treats as identity
//! (spec §8, "Comment intermingling").

/// One top-level section: its keyword (`frontend`, `backend`, `global`, ...), an optional name
/// (`global` and `defaults` without a name have none), and its body lines in source order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawSection<'a> {
    pub keyword: &'a str,
    pub name: Option<&'a str>,
    pub lines: Vec<&'a str>,
}

/// A non-empty, comment-stripped, trimmed logical line, split into whitespace-delimited tokens.
pub(crate) fn tokenize_line(line: &str) -> Vec<&str> {
    let without_comment = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    without_comment.split_whitespace().collect()
}

const SECTION_KEYWORDS: &[&str] = &[
    "global",
    "defaults",
    "frontend",
    "backend",
    "peers",
    "resolvers",
    "mailers",
    "cache",
    "ring",
    "http-errors",
    "userlist",
    "program",
    "log-forward",
    "fcgi-app",
    "crt-store",
];

pub(crate) fn split_sections(text: &str) -> Vec<RawSection<'_>> {
    let mut sections = Vec::new();
    let mut current: Option<RawSection<'_>> = None;

    for raw_line in text.lines() {
        let tokens = tokenize_line(raw_line);
        if tokens.is_empty() {
            continue;
        }

        if SECTION_KEYWORDS.contains(&tokens[0]) {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(RawSection {
                keyword: tokens[0],
                name: tokens.get(1).copied(),
                lines: Vec::new(),
            });
            continue;
        }

        match current.as_mut() {
            Some(section) => section.lines.push(raw_line),
            // Directives appearing before any section header are not part of any named
            // section this model tracks; skip them rather than failing the whole parse.
            None => continue,
        }
    }

    if let Some(section) = current.take() {
        sections.push(section);
    }

    sections
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splits_on_known_keywords_only() {
        let text = "global\n  maxconn 100\nfrontend web\n  bind *:80\n";
        let sections = split_sections(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].keyword, "global");
        assert_eq!(sections[1].keyword, "frontend");
        assert_eq!(sections[1].name, Some("web"));
    }

    #[test]
    fn comment_lines_do_not_affect_positional_indices() {
        let text = "frontend web\n  acl is_api path_beg /api\n  # a comment\n  acl is_admin path_beg /admin\n";
        let sections = split_sections(text);
        assert_eq!(sections[0].lines.len(), 2);
    }
}
