use serde::{Deserialize, Serialize};
use unitsync_core::SyncConfig;

use crate::debug::DebugLog;
use crate::fetch::UnitFetcher;
use crate::guard::{SyncGuard, SyncPermit};
use crate::pass::run_pass;
use crate::report::SyncReport;
use crate::store::ProductStore;

/// What started a pass. Persisted as `sync_runs.trigger_source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
    Scheduler,
    Manual,
    Cli,
}

impl TriggerSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerSource::Scheduler => "scheduler",
            TriggerSource::Manual => "manual",
            TriggerSource::Cli => "cli",
        }
    }
}

impl std::fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry point shared by the scheduler and manual triggers.
///
/// Every pass goes through the same [`SyncGuard`], so a trigger that fires
/// while another pass is running is skipped rather than interleaved. Each
/// pass records into its own [`DebugLog`] bounded by `debug_log_capacity`;
/// the retained entries come back on [`SyncReport::log`].
pub struct SyncService<F, S> {
    config: SyncConfig,
    fetcher: F,
    store: S,
    debug_log_capacity: usize,
    guard: SyncGuard,
}

impl<F, S> SyncService<F, S>
where
    F: UnitFetcher,
    S: ProductStore,
{
    pub fn new(config: SyncConfig, fetcher: F, store: S, debug_log_capacity: usize) -> Self {
        Self::with_guard(config, fetcher, store, debug_log_capacity, SyncGuard::new())
    }

    /// Like [`SyncService::new`], but contends on an existing guard.
    pub fn with_guard(
        config: SyncConfig,
        fetcher: F,
        store: S,
        debug_log_capacity: usize,
        guard: SyncGuard,
    ) -> Self {
        Self {
            config,
            fetcher,
            store,
            debug_log_capacity: debug_log_capacity.max(1),
            guard,
        }
    }

    /// Runs one pass unless another is in flight, in which case the report
    /// carries [`crate::SyncOutcome::Skipped`] and nothing is fetched.
    pub async fn trigger(&self, source: TriggerSource) -> SyncReport {
        let Some(permit) = self.try_permit() else {
            tracing::info!(%source, "sync pass already running; trigger skipped");
            return SyncReport::skipped();
        };
        self.run_with_permit(&permit, source).await
    }

    /// Claims the single-flight permit without running anything.
    #[must_use]
    pub fn try_permit(&self) -> Option<SyncPermit> {
        self.guard.try_acquire()
    }

    /// Runs a pass under a permit the caller already holds.
    pub async fn run_with_permit(&self, _permit: &SyncPermit, source: TriggerSource) -> SyncReport {
        tracing::info!(%source, mode = %self.config.reconcile_mode, "sync pass starting");
        let debug = DebugLog::new(self.debug_log_capacity);
        let mut report = run_pass(&self.config, &self.fetcher, &self.store, &debug).await;
        report.log = debug.entries();
        report
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.guard.is_running()
    }

    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Maximum debug entries kept per pass, and the row budget of the
    /// persisted `debug_log` table.
    #[must_use]
    pub fn debug_log_capacity(&self) -> usize {
        self.debug_log_capacity
    }
}
