//! Drives a [`crate::client::DataplaneTransport`] toward a desired configuration (spec §4.5).
//!
//! `Synchronizer` is generic over the transport rather than taking a concrete
//! [`crate::client::HttpDataplaneClient`], the same dependency-injection seam the driver uses to
//! unit test `Operation` implementations against canned responses (SPEC_FULL.md §10.4): the
//! version-adapter retry loop, runtime-path detection, and raw-push fallback below are exercised
//! against a fake transport in this module's tests.

pub mod context;
pub mod options;
pub mod result;

use std::time::Instant;

use crate::aux::AuxOperation;
use crate::client::transaction::Transaction;
use crate::client::{CommitOutcome, DataplaneTransport, TransactionHandle};
use crate::compare::compare;
use crate::error::{ErrorKind, Result};
use crate::model::StructuredConfig;
use crate::operation::Operation;
use crate::parser::parse;

pub use context::{CancellationToken, SyncContext};
pub use options::{SyncOptions, SyncPolicy};
pub use result::{OperationFailure, SyncOutcome, SyncResult};

/// Section kinds the Dataplane API's transaction engine is documented not to accept mid-transaction
/// (spec §9, "raw-push fallback trigger"). A diff touching any of these short-circuits straight to
/// the raw-push path instead of attempting — and exhausting retries on — a doomed transaction.
const UNSAFE_TRANSACTIONAL_SECTIONS: &[&str] = &["crt_store", "program"];

/// Drives one target HAProxy instance toward a desired [`StructuredConfig`] via `T`.
pub struct Synchronizer<T: DataplaneTransport> {
    transport: T,
}

impl<T: DataplaneTransport> Synchronizer<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Parses `current_text`/`desired_text`, logs any parser diagnostics, and delegates to
    /// [`Self::sync`]. The raw-push fallback (step 7) is only reachable through this entry point,
    /// since it needs `desired_text` verbatim — [`Self::sync`] operates on already-parsed input
    /// and has no text to fall back with.
    pub async fn sync_text(
        &self,
        ctx: &SyncContext,
        current_text: &str,
        desired_text: &str,
        options: &SyncOptions,
    ) -> Result<SyncResult> {
        let (current, current_diagnostics) = parse(current_text)?;
        let (desired, desired_diagnostics) = parse(desired_text)?;
        let mut diagnostic_count = 0usize;
        for diagnostic in current_diagnostics.iter().chain(&desired_diagnostics) {
            tracing::warn!(section = %diagnostic.section, message = %diagnostic.message, "parser skipped section");
            diagnostic_count += 1;
        }
        if diagnostic_count > 0 && options.fail_on_parse_diagnostics {
            return Err(ErrorKind::ValidationFailure {
                message: format!("{diagnostic_count} section(s) were skipped while parsing; refusing to sync"),
            }
            .into_error());
        }
        self.sync_inner(ctx, &current, &desired, options, Some(desired_text)).await
    }

    /// Operates on already-parsed configurations (spec §4.5). Cannot reach the raw-push fallback,
    /// since it has no source text to push — see [`Self::sync_text`].
    pub async fn sync(
        &self,
        ctx: &SyncContext,
        current: &StructuredConfig,
        desired: &StructuredConfig,
        options: &SyncOptions,
    ) -> Result<SyncResult> {
        self.sync_inner(ctx, current, desired, options, None).await
    }

    /// Executes a prebuilt operation list against a transaction the caller already opened
    /// (spec §4.5, `sync_operations(ctx, operations, tx)`).
    pub async fn sync_operations(
        &self,
        ctx: &SyncContext,
        operations: &[Operation],
        tx: &TransactionHandle,
        continue_on_error: bool,
    ) -> Result<(usize, Vec<OperationFailure>)> {
        self.execute_operations(ctx, operations, Some(&tx.id), continue_on_error).await
    }

    /// Applies a prebuilt auxiliary-file effect list (spec §4.5 step 3, §4.4's
    /// deletes-then-updates-then-creates ordering already baked into [`AuxDiff::into_operations`]).
    ///
    /// Building the diff itself needs the caller's view of current remote aux state (fingerprints
    /// for SSL certificates, byte content for everything else), which the entry points in spec
    /// §4.5 don't carry — callers call [`crate::aux::compare_by_content`] /
    /// [`crate::aux::compare_certificates`] themselves and run `sync_aux` ahead of [`Self::sync`]
    /// or [`Self::sync_text`] so referenced files exist before the config operations that need
    /// them commit.
    pub async fn sync_aux(&self, ctx: &SyncContext, operations: &[AuxOperation], continue_on_error: bool) -> Result<(usize, Vec<OperationFailure>)> {
        let mut applied = 0;
        let mut failed = Vec::new();
        for op in operations {
            ctx.check()?;
            match self.transport.apply_aux_operation(op).await {
                Ok(()) => {
                    applied += 1;
                    tracing::debug!(path = %op.path, "auxiliary file synced");
                }
                Err(err) if continue_on_error => {
                    tracing::warn!(path = %op.path, error = %err, "auxiliary file sync failed, continuing");
                    failed.push(OperationFailure { description: format!("aux:{}", op.path), error: err });
                }
                Err(err) => return Err(err),
            }
        }
        Ok((applied, failed))
    }

    async fn sync_inner(
        &self,
        ctx: &SyncContext,
        current: &StructuredConfig,
        desired: &StructuredConfig,
        options: &SyncOptions,
        desired_text: Option<&str>,
    ) -> Result<SyncResult> {
        let start = Instant::now();
        let span = tracing::info_span!("sync");
        let _entered = span.enter();

        let mut current = current.clone();
        let mut attempt: u32 = 0;

        loop {
            ctx.check()?;
            let diff = compare(&current, desired)?;
            if !diff.has_changes() {
                tracing::debug!("no changes, nothing to sync");
                return Ok(SyncResult::no_changes(start.elapsed()));
            }

            if !options.policy.applies() {
                tracing::info!(operations = diff.operations.len(), "dry run");
                return Ok(SyncResult::dry_run(diff.operations.len(), start.elapsed()));
            }

            let unsafe_sections = diff.operations.iter().any(|op| UNSAFE_TRANSACTIONAL_SECTIONS.contains(&op.section_tag));
            let shape_runtime_eligible = !diff.operations.is_empty() && diff.operations.iter().all(Operation::is_runtime_eligible);
            let runtime_eligible = shape_runtime_eligible && self.transport.capabilities().await?.contains(crate::client::Capabilities::RUNTIME_SERVERS);

            let attempt_outcome = if runtime_eligible {
                tracing::debug!("runtime-path eligible, applying without a transaction");
                self.apply_runtime(ctx, &diff.operations, options).await.map(|(applied, failed)| {
                    (applied, failed, CommitOutcome { reload_triggered: false, reload_id: None })
                })
            } else if unsafe_sections {
                tracing::debug!("diff touches an unsafe-for-transaction section, going straight to raw push");
                self.apply_raw(ctx, desired_text).await.map(|outcome| (diff.operations.len(), Vec::new(), outcome))
            } else {
                self.apply_transactional(ctx, &diff.operations, options).await
            };

            match attempt_outcome {
                Ok((applied, failed, outcome)) => {
                    if failed.is_empty() {
                        self.verify(ctx, desired).await?;
                    }
                    return Ok(SyncResult {
                        outcome: SyncOutcome::Applied,
                        applied_operations: applied,
                        failed_operations: failed,
                        reload_triggered: outcome.reload_triggered,
                        reload_id: outcome.reload_id,
                        fallback_to_raw: unsafe_sections,
                        duration: start.elapsed(),
                        retries: attempt,
                        message: None,
                    });
                }
                Err(err) if err.is_version_conflict() && !unsafe_sections => {
                    let retries_exhausted = match options.policy.max_retries() {
                        Some(max) => attempt >= max,
                        None => ctx.is_expired(),
                    };
                    if !retries_exhausted {
                        tracing::warn!(attempt, "version conflict at commit, retrying from comparison");
                        attempt += 1;
                        current = self.refetch(ctx).await?;
                        continue;
                    }

                    if options.allow_raw_fallback {
                        tracing::warn!("transactional retries exhausted, falling back to raw push");
                        let outcome = self.apply_raw(ctx, desired_text).await?;
                        self.verify(ctx, desired).await?;
                        return Ok(SyncResult {
                            outcome: SyncOutcome::Applied,
                            applied_operations: diff.operations.len(),
                            failed_operations: Vec::new(),
                            reload_triggered: outcome.reload_triggered,
                            reload_id: outcome.reload_id,
                            fallback_to_raw: true,
                            duration: start.elapsed(),
                            retries: attempt,
                            message: None,
                        });
                    }
                    return Err(err);
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn apply_runtime(
        &self,
        ctx: &SyncContext,
        operations: &[Operation],
        options: &SyncOptions,
    ) -> Result<(usize, Vec<OperationFailure>)> {
        self.execute_operations(ctx, operations, None, options.continue_on_error).await
    }

    async fn apply_transactional(
        &self,
        ctx: &SyncContext,
        operations: &[Operation],
        options: &SyncOptions,
    ) -> Result<(usize, Vec<OperationFailure>, CommitOutcome)> {
        ctx.check()?;
        let version = self.transport.configuration_version().await?;
        let handle = self.transport.open_transaction(version).await?;
        let mut tx = Transaction::new();
        tx.open(handle.base_version, handle.id.clone());
        tracing::debug!(id = %handle.id, base_version = handle.base_version, "transaction opened");

        let (applied, failed) = match self.execute_operations(ctx, operations, Some(&handle.id), options.continue_on_error).await {
            Ok(result) => result,
            Err(err) => {
                tx.abort();
                tracing::warn!(id = %handle.id, "transaction aborted after an operation failure");
                let _ = self.transport.abort_transaction(&handle).await;
                return Err(err);
            }
        };

        tx.begin_commit();
        match self.transport.commit_transaction(&handle).await {
            Ok(outcome) => {
                tx.mark_committed(outcome.reload_triggered, outcome.reload_id.clone());
                tracing::debug!(id = %handle.id, reload = outcome.reload_triggered, "transaction committed");
                Ok((applied, failed, outcome))
            }
            Err(err) => {
                if let ErrorKind::VersionConflict { actual, .. } = err.kind.as_ref() {
                    tx.mark_conflict(*actual);
                }
                tx.abort();
                tracing::warn!(id = %handle.id, "transaction aborted after a commit failure");
                let _ = self.transport.abort_transaction(&handle).await;
                Err(err)
            }
        }
    }

    async fn execute_operations(
        &self,
        ctx: &SyncContext,
        operations: &[Operation],
        tx_id: Option<&str>,
        continue_on_error: bool,
    ) -> Result<(usize, Vec<OperationFailure>)> {
        let mut applied = 0;
        let mut failed = Vec::new();
        for op in operations {
            ctx.check()?;
            match self.transport.apply_operation(op, tx_id).await {
                Ok(()) => {
                    applied += 1;
                    tracing::debug!(description = %op.description, "operation applied");
                }
                Err(err) if continue_on_error => {
                    tracing::warn!(description = %op.description, error = %err, "operation failed, continuing");
                    failed.push(OperationFailure { description: op.description.clone(), error: err });
                }
                Err(err) => return Err(err),
            }
        }
        Ok((applied, failed))
    }

    async fn apply_raw(&self, ctx: &SyncContext, desired_text: Option<&str>) -> Result<CommitOutcome> {
        ctx.check()?;
        let Some(text) = desired_text else {
            return Err(ErrorKind::InvalidArgument {
                message: "raw-push fallback requires the original configuration text; call sync_text instead of sync".to_string(),
            }
            .into_error());
        };
        self.transport.push_raw_configuration(text).await
    }

    async fn refetch(&self, ctx: &SyncContext) -> Result<StructuredConfig> {
        ctx.check()?;
        let text = self.transport.fetch_raw_configuration().await?;
        let (config, diagnostics) = parse(&text)?;
        for diagnostic in &diagnostics {
            tracing::warn!(section = %diagnostic.section, message = %diagnostic.message, "parser skipped section on refetch");
        }
        Ok(config)
    }

    /// Post-condition verification (spec §4.5 step 8): re-fetch, re-parse, re-compare. A
    /// non-empty residual diff is a hard, non-retried failure.
    async fn verify(&self, ctx: &SyncContext, desired: &StructuredConfig) -> Result<()> {
        let remote = self.refetch(ctx).await?;
        let residual = compare(&remote, desired)?;
        if residual.has_changes() {
            for op in &residual.operations {
                tracing::error!(description = %op.description, "post-sync verification found a residual operation");
            }
            return Err(ErrorKind::PostSyncMismatch { residual_operations: residual.operations.len() }.into_error());
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::client::Capabilities;
    use crate::model::{Backend, Server};

    /// A transport whose `remote_text` only moves to `synced_text` once an apply path actually
    /// takes effect (runtime apply, transactional commit, or raw push) — so tests that exercise
    /// retries see the same stale remote on every refetch until the apply genuinely succeeds, and
    /// the post-sync `verify()` step sees a remote that matches `desired` once it does.
    struct FakeTransport {
        api_version: &'static str,
        version: AtomicU32,
        commit_conflicts_remaining: AtomicU32,
        raw_pushes: AtomicU32,
        applied_ops: Mutex<Vec<String>>,
        fail_operation: Option<&'static str>,
        remote_text: Mutex<String>,
        synced_text: &'static str,
        synced: AtomicBool,
    }

    impl Default for FakeTransport {
        fn default() -> Self {
            Self {
                api_version: "3.2.0",
                version: AtomicU32::default(),
                commit_conflicts_remaining: AtomicU32::default(),
                raw_pushes: AtomicU32::default(),
                applied_ops: Mutex::default(),
                fail_operation: None,
                remote_text: Mutex::new("global\n".to_string()),
                synced_text: "backend web\n  server srv1 10.0.0.1:8080\n",
                synced: AtomicBool::new(false),
            }
        }
    }

    impl FakeTransport {
        fn mark_synced(&self) {
            if !self.synced.swap(true, Ordering::SeqCst) {
                *self.remote_text.lock().unwrap() = self.synced_text.to_string();
            }
        }
    }

    impl DataplaneTransport for FakeTransport {
        async fn capabilities(&self) -> Result<Capabilities> {
            Ok(Capabilities::from_version(self.api_version))
        }

        async fn configuration_version(&self) -> Result<u64> {
            Ok(self.version.load(Ordering::SeqCst) as u64)
        }

        async fn open_transaction(&self, version: u64) -> Result<TransactionHandle> {
            Ok(TransactionHandle { id: "tx-1".to_string(), base_version: version })
        }

        async fn commit_transaction(&self, tx: &TransactionHandle) -> Result<CommitOutcome> {
            if self.commit_conflicts_remaining.load(Ordering::SeqCst) > 0 {
                self.commit_conflicts_remaining.fetch_sub(1, Ordering::SeqCst);
                self.version.fetch_add(1, Ordering::SeqCst);
                return Err(crate::error::Error::version_conflict(tx.base_version, tx.base_version + 1));
            }
            self.mark_synced();
            Ok(CommitOutcome { reload_triggered: true, reload_id: Some("reload-1".to_string()) })
        }

        async fn abort_transaction(&self, _tx: &TransactionHandle) -> Result<()> {
            Ok(())
        }

        async fn apply_operation(&self, op: &Operation, tx_id: Option<&str>) -> Result<()> {
            if self.fail_operation == Some(op.section_tag) {
                return Err(ErrorKind::ValidationFailure { message: "rejected".to_string() }.into_error());
            }
            self.applied_ops.lock().unwrap().push(op.description.clone());
            if tx_id.is_none() {
                self.mark_synced();
            }
            Ok(())
        }

        async fn fetch_raw_configuration(&self) -> Result<String> {
            Ok(self.remote_text.lock().unwrap().clone())
        }

        async fn push_raw_configuration(&self, text: &str) -> Result<CommitOutcome> {
            self.raw_pushes.fetch_add(1, Ordering::SeqCst);
            *self.remote_text.lock().unwrap() = text.to_string();
            self.synced.store(true, Ordering::SeqCst);
            Ok(CommitOutcome { reload_triggered: true, reload_id: Some("reload-raw".to_string()) })
        }

        async fn apply_aux_operation(&self, _op: &crate::aux::AuxOperation) -> Result<()> {
            Ok(())
        }
    }

    fn backend_with_server() -> StructuredConfig {
        let mut config = StructuredConfig::default();
        let mut backend = Backend::builder().name("web").build();
        backend.servers.insert("srv1".into(), Server::builder().name("srv1").address("10.0.0.1").port(8080u16).build());
        config.backends.insert("web".to_string(), backend);
        config
    }

    #[tokio::test]
    async fn no_changes_short_circuits_before_contacting_the_api() {
        let synchronizer = Synchronizer::new(FakeTransport::default());
        let config = backend_with_server();
        let result = synchronizer.sync(&SyncContext::new(), &config, &config, &SyncOptions::builder().build()).await.unwrap();
        assert_eq!(result.outcome, SyncOutcome::NoChanges);
    }

    #[tokio::test]
    async fn dry_run_never_applies() {
        let synchronizer = Synchronizer::new(FakeTransport::default());
        let current = StructuredConfig::default();
        let desired = backend_with_server();
        let options = SyncOptions::builder().policy(SyncPolicy::DryRun).build();
        let result = synchronizer.sync(&SyncContext::new(), &current, &desired, &options).await.unwrap();
        assert_eq!(result.outcome, SyncOutcome::DryRun);
        assert_eq!(result.applied_operations, 2);
    }

    #[tokio::test]
    async fn runtime_path_is_used_for_a_lone_server_update() {
        let transport = FakeTransport {
            synced_text: "backend web\n  server srv1 10.0.0.1:8080 weight 200\n",
            ..FakeTransport::default()
        };
        let synchronizer = Synchronizer::new(transport);
        let mut current = StructuredConfig::default();
        let mut backend = Backend::builder().name("web").build();
        backend.servers.insert("srv1".into(), Server::builder().name("srv1").address("10.0.0.1").port(8080u16).weight(100u32).build());
        current.backends.insert("web".to_string(), backend.clone());

        let mut desired = StructuredConfig::default();
        let mut desired_backend = backend.clone();
        desired_backend.servers.get_mut("srv1").unwrap().weight = Some(200);
        desired.backends.insert("web".to_string(), desired_backend);

        let options = SyncOptions::builder().build();
        let result = synchronizer.sync(&SyncContext::new(), &current, &desired, &options).await.unwrap();
        assert!(!result.reload_triggered);
        assert_eq!(result.applied_operations, 1);
    }

    #[tokio::test]
    async fn runtime_path_is_skipped_when_the_remote_lacks_the_capability() {
        let transport = FakeTransport {
            api_version: "2.9.1",
            synced_text: "backend web\n  server srv1 10.0.0.1:8080 weight 200\n",
            ..FakeTransport::default()
        };
        let synchronizer = Synchronizer::new(transport);
        let mut current = StructuredConfig::default();
        let mut backend = Backend::builder().name("web").build();
        backend.servers.insert("srv1".into(), Server::builder().name("srv1").address("10.0.0.1").port(8080u16).weight(100u32).build());
        current.backends.insert("web".to_string(), backend.clone());

        let mut desired = StructuredConfig::default();
        let mut desired_backend = backend.clone();
        desired_backend.servers.get_mut("srv1").unwrap().weight = Some(200);
        desired.backends.insert("web".to_string(), desired_backend);

        let options = SyncOptions::builder().build();
        let result = synchronizer.sync(&SyncContext::new(), &current, &desired, &options).await.unwrap();
        assert!(result.reload_triggered, "a v2.x remote has no runtime-server endpoint; must go transactional");
    }

    #[tokio::test]
    async fn version_conflict_retries_then_succeeds() {
        let transport = FakeTransport { commit_conflicts_remaining: AtomicU32::new(2), ..FakeTransport::default() };
        let synchronizer = Synchronizer::new(transport);
        let current = StructuredConfig::default();
        let desired = backend_with_server();
        let options = SyncOptions::builder().build();
        let result = synchronizer.sync(&SyncContext::new(), &current, &desired, &options).await.unwrap();
        assert_eq!(result.retries, 2);
        assert_eq!(result.outcome, SyncOutcome::Applied);
    }

    #[tokio::test]
    async fn version_conflict_exhausting_retries_falls_back_to_raw_push() {
        let transport = FakeTransport { commit_conflicts_remaining: AtomicU32::new(10), ..FakeTransport::default() };
        let synchronizer = Synchronizer::new(transport);
        let desired = backend_with_server();
        let options = SyncOptions::builder().build();
        let result = synchronizer
            .sync_text(&SyncContext::new(), "global\n", "backend web\n  server srv1 10.0.0.1:8080\n", &options)
            .await
            .unwrap();
        assert!(result.fallback_to_raw);
    }

    #[tokio::test]
    async fn fail_on_parse_diagnostics_rejects_a_config_with_skipped_sections() {
        let synchronizer = Synchronizer::new(FakeTransport::default());
        let options = SyncOptions::builder().fail_on_parse_diagnostics(true).build();
        let err = synchronizer
            .sync_text(&SyncContext::new(), "global\n", "backend\n  server srv1 10.0.0.1:8080\n", &options)
            .await
            .unwrap_err();
        assert!(matches!(*err.kind, ErrorKind::ValidationFailure { .. }));
    }

    #[tokio::test]
    async fn sync_aux_applies_deletes_updates_and_creates_in_order() {
        use crate::aux::{compare_by_content, FileKind};
        use std::collections::BTreeMap;

        let synchronizer = Synchronizer::new(FakeTransport::default());
        let mut current = BTreeMap::new();
        current.insert("maps/old.map".to_string(), b"x\n".to_vec());
        current.insert("maps/hosts.map".to_string(), b"a b\n".to_vec());
        let mut desired = BTreeMap::new();
        desired.insert("maps/hosts.map".to_string(), b"a b c\n".to_vec());
        desired.insert("maps/new.map".to_string(), b"y\n".to_vec());

        let operations = compare_by_content(&current, &desired).into_operations(FileKind::MapFile);
        let (applied, failed) = synchronizer.sync_aux(&SyncContext::new(), &operations, false).await.unwrap();
        assert_eq!(applied, 3);
        assert!(failed.is_empty());
    }
}
