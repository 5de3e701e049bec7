//! The outcome of a [`super::Synchronizer`] call.

use std::time::Duration;

use crate::error::Error;

/// Which branch of the sync algorithm produced a [`SyncResult`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// `compare` found nothing to do (spec §4.5 step 1).
    NoChanges,
    /// `policy == DryRun`; nothing was sent to the remote API.
    DryRun,
    /// The diff was applied, possibly via the raw-push fallback.
    Applied,
}

/// One operation that failed during a sync attempt, recorded rather than retried (spec §7,
/// "operation-level failures are collected").
#[derive(Clone, Debug)]
pub struct OperationFailure {
    pub description: String,
    pub error: Error,
}

/// The result of a [`super::Synchronizer::sync`]/`sync_text`/`sync_operations` call.
#[derive(Clone, Debug)]
pub struct SyncResult {
    pub outcome: SyncOutcome,
    pub applied_operations: usize,
    pub failed_operations: Vec<OperationFailure>,
    pub reload_triggered: bool,
    pub reload_id: Option<String>,
    pub fallback_to_raw: bool,
    pub duration: Duration,
    /// Number of version-conflict retries the version-adapter loop performed.
    pub retries: u32,
    pub message: Option<String>,
}

impl SyncResult {
    pub(crate) fn no_changes(duration: Duration) -> Self {
        Self {
            outcome: SyncOutcome::NoChanges,
            applied_operations: 0,
            failed_operations: Vec::new(),
            reload_triggered: false,
            reload_id: None,
            fallback_to_raw: false,
            duration,
            retries: 0,
            message: None,
        }
    }

    pub(crate) fn dry_run(operation_count: usize, duration: Duration) -> Self {
        Self {
            outcome: SyncOutcome::DryRun,
            applied_operations: operation_count,
            failed_operations: Vec::new(),
            reload_triggered: false,
            reload_id: None,
            fallback_to_raw: false,
            duration,
            retries: 0,
            message: None,
        }
    }

    /// Whether every operation that was attempted succeeded (a partial apply under
    /// `continue_on_error` still reports its failures here).
    pub fn is_success(&self) -> bool {
        self.failed_operations.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_changes_result_has_zero_applied_operations() {
        let result = SyncResult::no_changes(Duration::ZERO);
        assert_eq!(result.outcome, SyncOutcome::NoChanges);
        assert_eq!(result.applied_operations, 0);
        assert!(result.is_success());
    }
}
