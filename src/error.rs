//! Contains the `Error` and `Result` types that `dataplane-sync` uses.

use std::{collections::HashSet, fmt, sync::Arc};

use serde::Deserialize;
use thiserror::Error;

/// Label attached to a [`VersionConflict`](ErrorKind::VersionConflict) so callers can recognize
/// the version-adapter retry loop is eligible to run again.
pub const VERSION_CONFLICT_RETRYABLE: &str = "VersionConflictRetryable";

/// Label attached to errors that occurred while a transaction was open, indicating the whole
/// sync attempt can be safely retried from scratch.
pub const TRANSIENT_SYNC_ERROR: &str = "TransientSyncError";

/// The result type for all fallible operations in the `dataplane-sync` crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while parsing, comparing, or synchronizing HAProxy configuration.
///
/// The inner [`ErrorKind`] is wrapped so the error can be cheaply cloned into both a per-operation
/// failure record and the aggregate [`SyncResult`](crate::sync::SyncResult).
#[derive(Clone, Debug, Error)]
#[error("{kind}")]
#[non_exhaustive]
pub struct Error {
    /// The specific kind of error that occurred.
    pub kind: Box<ErrorKind>,
    labels: HashSet<String>,
    #[source]
    source: Option<Arc<Error>>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
            labels: HashSet::new(),
            source: None,
        }
    }

    pub(crate) fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    pub(crate) fn with_source(mut self, source: Error) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Whether this error carries the given label.
    pub fn contains_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub(crate) fn version_conflict(expected: u64, actual: u64) -> Self {
        ErrorKind::VersionConflict { expected, actual }
            .into_error()
            .with_label(VERSION_CONFLICT_RETRYABLE)
    }

    pub(crate) fn parse(detail: impl Into<String>) -> Self {
        ErrorKind::Parse {
            detail: detail.into(),
        }
        .into_error()
    }

    pub(crate) fn compare(detail: impl Into<String>) -> Self {
        ErrorKind::Compare {
            detail: detail.into(),
        }
        .into_error()
    }

    pub(crate) fn is_version_conflict(&self) -> bool {
        matches!(self.kind.as_ref(), ErrorKind::VersionConflict { .. })
    }

    /// Whether this is a transport-level failure (as opposed to a server-reported rejection).
    pub fn is_network_error(&self) -> bool {
        matches!(self.kind.as_ref(), ErrorKind::Network { .. })
    }
}

/// The specific category of failure. See the crate's error-handling design: operation-level
/// failures are collected and reported rather than retried; only [`ErrorKind::VersionConflict`]
/// drives the synchronizer's retry loop.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input configuration text could not be parsed.
    #[error("failed to parse configuration: {detail}")]
    Parse { detail: String },

    /// The comparator was given invalid input (e.g. a null configuration).
    #[error("invalid input to comparator: {detail}")]
    Compare { detail: String },

    /// A transport-level failure talking to the Dataplane API.
    #[error("network error contacting {address}: {message}")]
    Network { address: String, message: String },

    /// The Dataplane API returned a body that could not be decoded.
    #[error("failed to decode Dataplane API response: {message}")]
    Decode { message: String },

    /// A commit was rejected because the transaction's base version no longer matches the
    /// remote configuration version.
    #[error("configuration version conflict: expected {expected}, remote is at {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    /// The remote HAProxy instance rejected the configuration at commit time.
    #[error("{message}")]
    ValidationFailure { message: String },

    /// A single operation failed while a transaction was open.
    #[error("operation {description:?} failed: {source}")]
    OperationFailure {
        description: String,
        #[source]
        source: Box<ErrorKind>,
    },

    /// Verification after a successful apply found the remote still diverges from desired state.
    #[error("post-sync verification found {residual_operations} residual operation(s)")]
    PostSyncMismatch { residual_operations: usize },

    /// The caller's deadline elapsed before the operation completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The caller's cancellation token was triggered.
    #[error("sync cancelled")]
    Cancelled,

    /// An argument supplied by the caller was invalid.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A value produced by caller code during a callback.
    #[error("custom error: {message}")]
    Custom { message: String },
}

impl ErrorKind {
    pub(crate) fn into_error(self) -> Error {
        Error::new(self)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let address = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        ErrorKind::Network {
            address,
            message: err.to_string(),
        }
        .into_error()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        ErrorKind::Decode {
            message: err.to_string(),
        }
        .into_error()
    }
}

/// A normalized representation of a validation error reported by the Dataplane API, used to
/// build the simplified message surfaced to the admission-webhook caller.
///
/// The Dataplane API reports two distinct shapes for a rejected configuration: a JSON-schema
/// violation (structured, with a `field`/`message` pair) and a raw HAProxy parser alert embedded
/// in an `errmsg` wrapping the offending line and its `[ALERT] ... parsing [haproxy.cfg:N]`
/// marker. Both are normalized into a single human string; anything else is passed through.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RemoteErrorBody {
    Schema {
        field: String,
        message: String,
    },
    Alert {
        errmsg: String,
    },
    Unknown,
}

impl fmt::Display for RemoteErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteErrorBody::Schema { field, message } => {
                write!(f, "{field}: {message}")
            }
            RemoteErrorBody::Alert { errmsg } => {
                write!(f, "{}", extract_alert_context(errmsg))
            }
            RemoteErrorBody::Unknown => write!(f, "unrecognized validation error"),
        }
    }
}

/// Retains the `[ALERT] ... parsing [haproxy.cfg:N]` line plus its immediately adjacent context
/// lines out of a larger HAProxy parser error dump, discarding the rest.
fn extract_alert_context(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();
    let alert_idx = lines.iter().position(|l| l.contains("[ALERT]") && l.contains("parsing ["));
    let Some(idx) = alert_idx else {
        return raw.trim().to_string();
    };
    let start = idx.saturating_sub(1);
    let end = (idx + 2).min(lines.len());
    lines[start..end].join("\n")
}

pub(crate) fn simplify_validation_message(body: &[u8]) -> String {
    match serde_json::from_slice::<RemoteErrorBody>(body) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn alert_context_keeps_surrounding_lines() {
        let raw = "line before\n[ALERT] (1) : parsing [haproxy.cfg:42] : 'frontend' unknown keyword 'bogus'\nline after\nline far after";
        let extracted = extract_alert_context(raw);
        assert!(extracted.contains("line before"));
        assert!(extracted.contains("[ALERT]"));
        assert!(extracted.contains("line after"));
        assert!(!extracted.contains("line far after"));
    }

    #[test]
    fn schema_error_simplified() {
        let body = br#"{"field": "servers[0].weight", "message": "must be >= 0"}"#;
        assert_eq!(
            simplify_validation_message(body),
            "servers[0].weight: must be >= 0"
        );
    }

    #[test]
    fn version_conflict_carries_retry_label() {
        let err = Error::version_conflict(5, 6);
        assert!(err.contains_label(VERSION_CONFLICT_RETRYABLE));
        assert!(err.is_version_conflict());
    }
}
