use chrono::{DateTime, Utc};
use serde::Serialize;
use unitsync_core::DebugLogEntry;

/// Why a pass stopped before reconciling anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// Credentials missing.
    Configuration,
    /// Network, TLS, timeout, or non-2xx status.
    Transport,
    /// Body empty, not JSON, or not an array.
    Payload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncOutcome {
    Completed,
    Aborted { reason: AbortReason, message: String },
    /// Another pass held the guard; nothing was fetched.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Required fields missing; the store was never called.
    Record,
    /// The store failed to create or update the product.
    Persistence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    /// Zero-based position in the fetched array.
    pub index: usize,
    pub sku: Option<String>,
    pub kind: FailureKind,
    pub error: String,
}

/// Outcome and counters for one pass.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: SyncOutcome,
    /// Records in the validated payload.
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub failures: Vec<RecordFailure>,
    /// Debug entries written during this pass; empty when debugging is off.
    pub log: Vec<DebugLogEntry>,
}

impl SyncReport {
    pub(crate) fn begin() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            outcome: SyncOutcome::Completed,
            fetched: 0,
            created: 0,
            updated: 0,
            failures: Vec::new(),
            log: Vec::new(),
        }
    }

    pub(crate) fn skipped() -> Self {
        let mut report = Self::begin();
        report.outcome = SyncOutcome::Skipped;
        report
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.outcome == SyncOutcome::Completed
    }

    /// Products written by this pass, created or updated.
    #[must_use]
    pub fn records_processed(&self) -> usize {
        self.created + self.updated
    }

    #[must_use]
    pub fn failures_of(&self, kind: FailureKind) -> usize {
        self.failures.iter().filter(|f| f.kind == kind).count()
    }

    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        match &self.outcome {
            SyncOutcome::Completed => format!(
                "fetched {}, created {}, updated {}, skipped {}, failed {}",
                self.fetched,
                self.created,
                self.updated,
                self.failures_of(FailureKind::Record),
                self.failures_of(FailureKind::Persistence),
            ),
            SyncOutcome::Aborted { reason, message } => {
                format!("aborted ({reason:?}): {message}")
            }
            SyncOutcome::Skipped => "skipped: another sync pass is already running".to_owned(),
        }
    }
}
