//! Postgres-backed product store and `sync_runs` bookkeeping.

use sqlx::PgPool;
use unitsync_core::{NormalizedProduct, StoredProduct};
use unitsync_db::DbError;

use crate::error::StoreError;
use crate::fetch::UnitFetcher;
use crate::report::SyncReport;
use crate::service::{SyncService, TriggerSource};
use crate::store::ProductStore;

#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl ProductStore for PgProductStore {
    async fn find_by_sku(&self, sku: &str) -> Result<Option<StoredProduct>, StoreError> {
        let row = unitsync_db::find_product_by_sku(&self.pool, sku).await?;
        Ok(row.map(StoredProduct::from))
    }

    async fn create(&self, product: &NormalizedProduct) -> Result<StoredProduct, StoreError> {
        let row = unitsync_db::insert_product(&self.pool, product).await?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: i64,
        product: &NormalizedProduct,
    ) -> Result<StoredProduct, StoreError> {
        match unitsync_db::update_product(&self.pool, id, product).await {
            Ok(row) => Ok(row.into()),
            Err(DbError::NotFound) => Err(StoreError::NotFound { id }),
            Err(e) => Err(e.into()),
        }
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count = unitsync_db::count_products(&self.pool).await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

/// Runs a pass through `service` and records it as a `sync_runs` row.
///
/// Two locks keep passes single-flight: the service's in-process guard and a
/// Postgres advisory lock shared by every process on the same database. If
/// either is taken, the trigger is skipped and nothing is written.
///
/// The run moves `queued` → `running` → `succeeded` or `failed`, and its
/// final status is written before the pass's debug entries are appended to
/// `debug_log` and trimmed to the service's debug-log capacity. Debug-log
/// persistence is best effort and only logged when it fails.
///
/// # Errors
///
/// Returns [`DbError`] if the lock or `sync_runs` queries fail. The pass
/// itself never errors; its outcome is in the returned report.
pub async fn run_tracked_pass<F, S>(
    service: &SyncService<F, S>,
    pool: &PgPool,
    source: TriggerSource,
) -> Result<SyncReport, DbError>
where
    F: UnitFetcher,
    S: ProductStore,
{
    let Some(permit) = service.try_permit() else {
        tracing::info!(%source, "sync pass already running; trigger skipped");
        return Ok(SyncReport::skipped());
    };
    let Some(lock) = unitsync_db::try_acquire_sync_lock(pool).await? else {
        tracing::info!(%source, "sync pass running in another process; trigger skipped");
        return Ok(SyncReport::skipped());
    };

    let run = unitsync_db::create_sync_run(pool, source.as_str()).await?;
    unitsync_db::start_sync_run(pool, run.id).await?;

    let report = service.run_with_permit(&permit, source).await;

    if report.is_completed() {
        let processed = i32::try_from(report.records_processed()).unwrap_or(i32::MAX);
        unitsync_db::complete_sync_run(pool, run.id, processed).await?;
    } else {
        unitsync_db::fail_sync_run(pool, run.id, &report.summary()).await?;
    }

    persist_debug_log(pool, &report, service.debug_log_capacity()).await;

    if let Err(e) = lock.release().await {
        tracing::warn!(run_id = run.id, error = %e, "failed to release sync lock");
    }

    tracing::info!(
        run_id = run.id,
        public_id = %run.public_id,
        summary = %report.summary(),
        "sync run recorded"
    );

    Ok(report)
}

async fn persist_debug_log(pool: &PgPool, report: &SyncReport, capacity: usize) {
    if report.log.is_empty() {
        return;
    }
    if let Err(e) = unitsync_db::append_debug_entries(pool, &report.log).await {
        tracing::warn!(error = %e, entries = report.log.len(), "failed to persist debug log");
        return;
    }
    let keep = i64::try_from(capacity).unwrap_or(i64::MAX);
    if let Err(e) = unitsync_db::trim_debug_log(pool, keep).await {
        tracing::warn!(error = %e, "failed to trim debug log");
    }
}
