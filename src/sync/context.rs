//! Cooperative cancellation and deadlines for a sync call (spec §5, "Suspension points").
//!
//! Modeled on the driver's use of a caller-supplied `Duration`/token rather than an internal
//! unbounded wait: every suspension point in [`super::Synchronizer`] checks `SyncContext::check`
//! before issuing the next network call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{ErrorKind, Result};

/// A cancellation flag shared between the caller and a running sync call.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Carries the deadline and cancellation token a [`super::Synchronizer`] call honors at every
/// suspension point. `ApplyForce`'s "unlimited retries" is bounded by this, not by the
/// synchronizer itself (spec §5, "Timeouts").
#[derive(Clone, Debug, Default)]
pub struct SyncContext {
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl SyncContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { deadline: Some(Instant::now() + timeout), cancellation: CancellationToken::new() }
    }

    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { deadline: None, cancellation }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Returns an error if the deadline has elapsed or cancellation was requested; `Ok(())`
    /// otherwise. Called before every network round-trip in the sync algorithm.
    pub fn check(&self) -> Result<()> {
        if self.cancellation.is_cancelled() {
            return Err(ErrorKind::Cancelled.into_error());
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(ErrorKind::DeadlineExceeded.into_error());
            }
        }
        Ok(())
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fresh_context_never_errors() {
        let ctx = SyncContext::new();
        assert!(ctx.check().is_ok());
    }

    #[test]
    fn cancelled_token_surfaces_cancelled_error() {
        let ctx = SyncContext::new();
        ctx.cancellation().cancel();
        let err = ctx.check().unwrap_err();
        assert!(matches!(*err.kind, ErrorKind::Cancelled));
    }

    #[test]
    fn elapsed_deadline_surfaces_deadline_exceeded() {
        let ctx = SyncContext::with_timeout(Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));
        let err = ctx.check().unwrap_err();
        assert!(matches!(*err.kind, ErrorKind::DeadlineExceeded));
    }
}
