//! One sync pass: credentials check, fetch, validate, then normalize and
//! reconcile each unit in order.

use chrono::Utc;
use unitsync_core::{DebugLogEntry, SyncConfig};
use unitsync_lightspeed::{normalize_unit, validate_response, RawUnitRecord};

use crate::debug::DebugLog;
use crate::error::SyncError;
use crate::fetch::UnitFetcher;
use crate::reconcile::{reconcile_product, ReconcileAction};
use crate::report::{FailureKind, RecordFailure, SyncOutcome, SyncReport};
use crate::store::ProductStore;

const MISSING_CREDENTIALS: &str =
    "API credentials are missing. Please provide both username and password.";

/// Runs a single pass and reports what happened.
///
/// Never fails: pass-level errors end the pass with
/// [`SyncOutcome::Aborted`], record-level errors are collected in
/// [`SyncReport::failures`] and the pass moves on to the next unit.
///
/// Debug entries are written to `debug` (and copied into the report) only
/// when `config.debug_enabled` is set. Tracing events are emitted either way.
///
/// Callers that may trigger passes concurrently should hold a
/// [`crate::SyncPermit`] for the duration of the call.
pub async fn run_pass<F, S>(
    config: &SyncConfig,
    fetcher: &F,
    store: &S,
    debug: &DebugLog,
) -> SyncReport
where
    F: UnitFetcher,
    S: ProductStore,
{
    let mut pass = PassContext {
        debug_enabled: config.debug_enabled,
        sink: debug,
        report: SyncReport::begin(),
    };

    if let Err(err) = execute(config, fetcher, store, &mut pass).await {
        match err.abort_reason() {
            Some(reason) => {
                tracing::error!(error = %err, ?reason, "sync pass aborted");
                pass.report.outcome = SyncOutcome::Aborted {
                    reason,
                    message: err.to_string(),
                };
            }
            None => tracing::warn!(error = %err, "record error reached pass level; pass kept"),
        }
    }

    let mut report = pass.report;
    report.finished_at = Utc::now();

    if report.is_completed() {
        tracing::info!(
            fetched = report.fetched,
            created = report.created,
            updated = report.updated,
            failures = report.failures.len(),
            "sync pass completed"
        );
    }

    report
}

struct PassContext<'a> {
    debug_enabled: bool,
    sink: &'a DebugLog,
    report: SyncReport,
}

impl PassContext<'_> {
    fn record(&mut self, message: impl Into<String>) {
        let entry = DebugLogEntry::now(message);
        tracing::debug!(message = %entry.message, "sync debug");
        if self.debug_enabled {
            self.sink.push(entry.clone());
            self.report.log.push(entry);
        }
    }

    fn fail_record(
        &mut self,
        index: usize,
        sku: Option<String>,
        kind: FailureKind,
        error: &SyncError,
    ) {
        self.report.failures.push(RecordFailure {
            index,
            sku,
            kind,
            error: error.to_string(),
        });
    }
}

async fn execute<F, S>(
    config: &SyncConfig,
    fetcher: &F,
    store: &S,
    pass: &mut PassContext<'_>,
) -> Result<(), SyncError>
where
    F: UnitFetcher,
    S: ProductStore,
{
    let credentials = &config.credentials;
    if !credentials.is_complete() {
        tracing::warn!("lightspeed credentials are not configured");
        pass.record(MISSING_CREDENTIALS);
        return Err(SyncError::Configuration(MISSING_CREDENTIALS.to_owned()));
    }

    pass.record("Lightspeed Inventory Sync Started");
    pass.record(format!("URL: {}", fetcher.endpoint()));
    pass.record(format!("Username: {}", credentials.username));
    pass.record(format!(
        "Password length: {}",
        credentials.password.chars().count()
    ));

    let response = match fetcher.fetch(credentials).await {
        Ok(response) => response,
        Err(err) => {
            pass.record(format!("Lightspeed Inventory Sync Error: {err}"));
            return Err(SyncError::Transport(err));
        }
    };

    pass.record(format!("Response Code: {}", response.status));
    pass.record(format!("Raw Response: {}", response.body));

    let units = match validate_response(&response) {
        Ok(units) => units,
        Err(err) if err.is_payload_error() => {
            pass.record(format!(
                "No valid data returned from the API or data is empty: {err}"
            ));
            return Err(SyncError::Payload(err));
        }
        Err(err) => {
            pass.record(format!("Lightspeed Inventory Sync Error: {err}"));
            return Err(SyncError::Transport(err));
        }
    };

    pass.record(format!(
        "Lightspeed Inventory Sync Data: {}",
        serde_json::to_string(&units).unwrap_or_default()
    ));

    pass.report.fetched = units.len();
    tracing::info!(units = units.len(), "lightspeed units fetched");

    for (index, unit) in units.iter().enumerate() {
        sync_unit(config, store, pass, index, unit).await;
    }

    pass.record(format!("Lightspeed Inventory Sync Finished: {}", pass.report.summary()));
    Ok(())
}

async fn sync_unit<S: ProductStore>(
    config: &SyncConfig,
    store: &S,
    pass: &mut PassContext<'_>,
    index: usize,
    unit: &RawUnitRecord,
) {
    let normalized = match normalize_unit(unit) {
        Ok(normalized) => normalized,
        Err(err) => {
            tracing::warn!(index, error = %err, "skipping unit with missing required fields");
            pass.record(format!("Missing required data for Unit: {}", unit.to_json()));
            let sku = unit.text("StockNumber");
            pass.fail_record(index, sku, FailureKind::Record, &SyncError::Record(err));
            return;
        }
    };

    let product = normalized.product;
    if !normalized.defaulted.is_empty() {
        pass.record(format!(
            "Unit {} missing optional fields, defaulted to empty: {}",
            product.sku,
            normalized.defaulted.join(", ")
        ));
    }

    match reconcile_product(store, &product, config.reconcile_mode).await {
        Ok((ReconcileAction::Created, stored)) => {
            tracing::debug!(sku = %product.sku, id = stored.id, "product created");
            pass.report.created += 1;
        }
        Ok((ReconcileAction::Updated, stored)) => {
            tracing::debug!(sku = %product.sku, id = stored.id, "product updated");
            pass.report.updated += 1;
        }
        Err(err) => {
            tracing::warn!(sku = %product.sku, error = %err, "failed to persist product");
            pass.record(format!("Failed to create product for Unit: {}", unit.to_json()));
            pass.fail_record(
                index,
                Some(product.sku.clone()),
                FailureKind::Persistence,
                &SyncError::Persistence(err),
            );
        }
    }
}
