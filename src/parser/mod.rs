//! Converts HAProxy configuration text into [`crate::model::StructuredConfig`] (spec §4.1).
//!
//! `parse` never aborts on a single bad section: a named section that cannot be extracted (for
//! instance, missing the name HAProxy requires for that keyword) is skipped and recorded as a
//! [`ParseDiagnostic`] rather than failing the whole parse. Only a structurally empty document is
//! a hard [`crate::error::Error`] — everything else degrades gracefully, since the comparator
//! needs to stay usable against imperfect/drifted remote state (SPEC_FULL.md §9, "partial parse
//! policy").

mod backend;
mod frontend;
mod global;
mod keyed;
mod lexer;
mod simple;
mod userlist;
mod values;

use crate::error::{Error, Result};
use crate::model::{Cache, CrtStore, FcgiApp, HttpErrorsSection, LogForward, Program, StructuredConfig};

use lexer::{split_sections, RawSection};

/// A section the parser could not extract, recorded instead of aborting the whole parse.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseDiagnostic {
    pub section: String,
    pub message: String,
}

impl ParseDiagnostic {
    fn missing_name(keyword: &str) -> Self {
        Self {
            section: keyword.to_string(),
            message: format!("`{keyword}` section has no name and was skipped"),
        }
    }
}

/// Parses `text` into a [`StructuredConfig`], returning any per-section diagnostics alongside it.
///
/// Fails only with [`crate::error::ErrorKind::Parse`] when `text` is empty or contains no
/// recognized section at all — an unrecoverable input, as opposed to a section-level issue that
/// degrades into a diagnostic.
pub fn parse(text: &str) -> Result<(StructuredConfig, Vec<ParseDiagnostic>)> {
    if text.trim().is_empty() {
        return Err(Error::parse("input configuration text is empty"));
    }

    let sections = split_sections(text);
    if sections.is_empty() {
        return Err(Error::parse("no recognized HAProxy section found"));
    }

    let mut config = StructuredConfig::default();
    let mut diagnostics = Vec::new();

    for section in sections {
        extract_into(&mut config, &mut diagnostics, section);
    }

    Ok((config, diagnostics))
}

fn extract_into<'a>(config: &mut StructuredConfig, diagnostics: &mut Vec<ParseDiagnostic>, section: RawSection<'a>) {
    if section.keyword == "global" {
        config.global = Some(global::extract_global(&section.lines));
        return;
    }

    let Some(name) = section.name else {
        diagnostics.push(ParseDiagnostic::missing_name(section.keyword));
        return;
    };

    match section.keyword {
        "defaults" => {
            config.defaults.insert(name.to_string(), global::extract_defaults(name, &section.lines));
        }
        "frontend" => {
            config
                .frontends
                .insert(name.to_string(), frontend::extract_frontend(name, &section.lines));
        }
        "backend" => {
            config
                .backends
                .insert(name.to_string(), backend::extract_backend(name, &section.lines));
        }
        "peers" => {
            config.peers.insert(name.to_string(), keyed::extract_peers(name, &section.lines));
        }
        "resolvers" => {
            config
                .resolvers
                .insert(name.to_string(), keyed::extract_resolvers(name, &section.lines));
        }
        "mailers" => {
            config
                .mailers
                .insert(name.to_string(), keyed::extract_mailers(name, &section.lines));
        }
        "userlist" => {
            config
                .userlists
                .insert(name.to_string(), userlist::extract_userlist(name, &section.lines));
        }
        "cache" => {
            config.caches.insert(
                name.to_string(),
                Cache::builder().name(name).extra_params(simple::extract_extra_params(&section.lines)).build(),
            );
        }
        "ring" => {
            config.rings.insert(
                name.to_string(),
                crate::model::Ring::builder()
                    .name(name)
                    .extra_params(simple::extract_extra_params(&section.lines))
                    .build(),
            );
        }
        "http-errors" => {
            config.http_errors.insert(
                name.to_string(),
                HttpErrorsSection::builder()
                    .name(name)
                    .extra_params(simple::extract_extra_params(&section.lines))
                    .build(),
            );
        }
        "program" => {
            config.programs.insert(
                name.to_string(),
                Program::builder().name(name).extra_params(simple::extract_extra_params(&section.lines)).build(),
            );
        }
        "log-forward" => {
            config.log_forwards.insert(
                name.to_string(),
                LogForward::builder()
                    .name(name)
                    .extra_params(simple::extract_extra_params(&section.lines))
                    .build(),
            );
        }
        "fcgi-app" => {
            config.fcgi_apps.insert(
                name.to_string(),
                FcgiApp::builder().name(name).extra_params(simple::extract_extra_params(&section.lines)).build(),
            );
        }
        "crt-store" => {
            config.crt_stores.insert(
                name.to_string(),
                CrtStore::builder().name(name).extra_params(simple::extract_extra_params(&section.lines)).build(),
            );
        }
        other => diagnostics.push(ParseDiagnostic {
            section: other.to_string(),
            message: format!("unrecognized section keyword `{other}`"),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_input_is_a_hard_error() {
        let err = parse("").unwrap_err();
        assert!(matches!(*err.kind, crate::error::ErrorKind::Parse { .. }));
    }

    #[test]
    fn parses_a_minimal_config_with_no_diagnostics() {
        let text = "global\n  maxconn 2000\nfrontend web\n  bind *:80\n  default_backend app\nbackend app\n  server srv1 10.0.0.1:8080 check\n";
        let (config, diagnostics) = parse(text).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(config.global.unwrap().maxconn, Some(2000));
        assert_eq!(config.frontends["web"].default_backend.as_deref(), Some("app"));
        assert_eq!(config.backends["app"].servers["srv1"].address, "10.0.0.1");
    }

    #[test]
    fn comment_intermingling_does_not_perturb_rule_order() {
        let text = "backend app\n  acl is_api path_beg /api\n  # unrelated comment\n  acl is_admin path_beg /admin\n";
        let (config, _) = parse(text).unwrap();
        let acls = &config.backends["app"].acls;
        assert_eq!(acls[0].name, "is_api");
        assert_eq!(acls[1].name, "is_admin");
    }

    #[test]
    fn unnamed_required_section_is_skipped_with_a_diagnostic() {
        let text = "frontend\n  bind *:80\n";
        let (config, diagnostics) = parse(text).unwrap();
        assert!(config.frontends.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].section, "frontend");
    }
}
