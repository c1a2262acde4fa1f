//! Background job scheduler.
//!
//! Registers the recurring inventory sync at server startup.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use unitsync_sync::{run_tracked_pass, TriggerSource};

use crate::api::AppState;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(state: AppState) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_sync_job(&scheduler, state).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the inventory sync every `fetch_interval_hours` hours.
///
/// The first run fires one interval after startup. A tick that lands while
/// any other pass is in flight, in this process or another, is skipped.
async fn register_sync_job(
    scheduler: &JobScheduler,
    state: AppState,
) -> Result<(), JobSchedulerError> {
    let interval = state.service.config().fetch_interval();
    let state = Arc::new(state);

    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let state = Arc::clone(&state);

        Box::pin(async move {
            tracing::info!("scheduler: starting inventory sync");
            match run_tracked_pass(&state.service, &state.pool, TriggerSource::Scheduler).await {
                Ok(report) => {
                    tracing::info!(summary = %report.summary(), "scheduler: inventory sync finished");
                }
                Err(e) => {
                    tracing::error!(error = %e, "scheduler: failed to record sync run");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(
        interval_secs = interval.as_secs(),
        "scheduler: inventory sync registered"
    );
    Ok(())
}
