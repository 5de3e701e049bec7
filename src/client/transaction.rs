//! The sync transaction state machine (spec §4.6), modeled on the driver's `ClientSession`
//! `Transaction`/`TransactionState` pair: a single owning struct holds the current state and
//! exposes explicit transition methods rather than letting callers poke at the state directly.
//!
//! `Idle -> Opened(version,id) -> Committing -> {Committed | Conflict | Aborted}`. Any state can
//! move to `Aborted`; the synchronizer guarantees that transition runs on every error path,
//! including cancellation, the way the driver's session guard aborts on scope exit.

/// A transaction's current state.
#[derive(Clone, Debug, PartialEq)]
pub enum TransactionState {
    Idle,
    Opened { base_version: u64, id: String },
    Committing { id: String },
    Committed { reload_triggered: bool, reload_id: Option<String> },
    Conflict { observed_version: u64 },
    Aborted,
}

/// Owns one sync transaction's lifecycle. A `Transaction` is used for exactly one attempt — the
/// version-adapter retry loop (§4.5 step 5) constructs a fresh one per attempt rather than
/// resetting this one, mirroring the driver's session transaction being reset only between
/// logically distinct transactions, never reused mid-retry.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    state: TransactionState,
}

impl Default for Transaction {
    fn default() -> Self {
        Self { state: TransactionState::Idle }
    }
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TransactionState {
        &self.state
    }

    pub fn id(&self) -> Option<&str> {
        match &self.state {
            TransactionState::Opened { id, .. } | TransactionState::Committing { id } => Some(id),
            _ => None,
        }
    }

    /// `Idle -> Opened`. Panics if called from any other state — a caller-logic error, not a
    /// runtime condition (mirrors the driver's `Transaction::start` precondition).
    pub fn open(&mut self, base_version: u64, id: impl Into<String>) {
        debug_assert!(matches!(self.state, TransactionState::Idle), "open() called outside Idle");
        self.state = TransactionState::Opened { base_version, id: id.into() };
    }

    /// `Opened -> Committing`. All per-operation calls against this transaction id succeeded.
    pub fn begin_commit(&mut self) {
        if let TransactionState::Opened { id, .. } = &self.state {
            self.state = TransactionState::Committing { id: id.clone() };
        }
    }

    /// `Committing -> Committed`.
    pub fn mark_committed(&mut self, reload_triggered: bool, reload_id: Option<String>) {
        self.state = TransactionState::Committed { reload_triggered, reload_id };
    }

    /// `Committing -> Conflict`, on a 409 from the commit endpoint.
    pub fn mark_conflict(&mut self, observed_version: u64) {
        self.state = TransactionState::Conflict { observed_version };
    }

    /// Any state `-> Aborted`. Safe to call repeatedly; idempotent once already `Aborted`.
    pub fn abort(&mut self) {
        self.state = TransactionState::Aborted;
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, TransactionState::Opened { .. } | TransactionState::Committing { .. })
    }
}
