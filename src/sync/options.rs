//! Synchronizer configuration (spec §4.5), built the way the driver's `src/client/options.rs`
//! builds `ClientOptions`: a `TypedBuilder` struct with defaults kept as associated constants
//! next to the type they configure.

use typed_builder::TypedBuilder;

/// How aggressively [`super::Synchronizer`] is allowed to act on a diff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SyncPolicy {
    /// Compute and log the would-be operations; never contact the remote API.
    DryRun,
    /// Apply the diff, retrying a version conflict up to [`SyncOptions::DEFAULT_APPLY_RETRIES`]
    /// times.
    #[default]
    Apply,
    /// Apply the diff, retrying a version conflict until the caller's deadline elapses.
    ApplyForce,
}

impl SyncPolicy {
    /// `None` means unbounded (bounded only by the caller's deadline), per spec §4.5's policy
    /// table.
    pub fn max_retries(self) -> Option<u32> {
        match self {
            SyncPolicy::DryRun => Some(0),
            SyncPolicy::Apply => Some(SyncOptions::DEFAULT_APPLY_RETRIES),
            SyncPolicy::ApplyForce => None,
        }
    }

    pub fn applies(self) -> bool {
        !matches!(self, SyncPolicy::DryRun)
    }
}

/// Options governing one [`super::Synchronizer::sync`] call.
#[derive(Clone, Debug, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
pub struct SyncOptions {
    pub policy: SyncPolicy,
    /// When an operation fails outside a version conflict, keep applying the remaining ones
    /// instead of aborting the transaction immediately (spec §7, "Propagation policy").
    pub continue_on_error: bool,
    /// Reserved for a future pre-commit dry validation call; currently unused by the algorithm
    /// (no Dataplane endpoint validates a transaction before commit as of this engine's target
    /// API versions).
    pub validate_before_apply: bool,
    /// Permit falling back to a whole-text raw push when the transactional path is infeasible
    /// (spec §4.5 step 7, §9 "raw-push fallback trigger").
    #[builder(default = true)]
    pub allow_raw_fallback: bool,
    /// Treat a non-empty parser diagnostic list from [`super::Synchronizer::sync_text`] as fatal
    /// instead of a logged warning (spec §9, "partial parse policy" resolution).
    pub fail_on_parse_diagnostics: bool,
}

impl SyncOptions {
    pub const DEFAULT_APPLY_RETRIES: u32 = 3;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dry_run_never_retries() {
        assert_eq!(SyncPolicy::DryRun.max_retries(), Some(0));
        assert!(!SyncPolicy::DryRun.applies());
    }

    #[test]
    fn apply_force_retries_are_unbounded() {
        assert_eq!(SyncPolicy::ApplyForce.max_retries(), None);
    }

    #[test]
    fn apply_retries_three_times() {
        assert_eq!(SyncPolicy::Apply.max_retries(), Some(3));
    }
}
