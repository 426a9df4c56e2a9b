//! Background job scheduler.
//!
//! Registers the recurring provider refresh so zoom requests always cluster
//! the latest point set.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::store::ProviderStore;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is rejected, or the scheduler fails to start.
pub async fn build_scheduler(
    store: ProviderStore,
    refresh_cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_refresh_job(&scheduler, store, refresh_cron).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Reload the providers file on `refresh_cron` (six-field, UTC).
async fn register_refresh_job(
    scheduler: &JobScheduler,
    store: ProviderStore,
    refresh_cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(refresh_cron, move |_uuid, _lock| {
        let store = store.clone();

        Box::pin(async move {
            match store.reload().await {
                Ok(count) => tracing::debug!(count, "scheduler: provider refresh complete"),
                Err(e) => {
                    tracing::error!(error = %e, "scheduler: provider refresh failed; keeping previous snapshot");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
