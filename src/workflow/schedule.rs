//! Staging and scheduling: write the pending boot order, create the config
//! job, and poll the task service until the controller confirms the job is
//! scheduled.

use std::time::Duration;

use tokio::time::sleep;

use crate::cancel::CancelToken;
use crate::error::Error;
use crate::redfish::{BootMode, BootOrder, JobId, Management, RedfishError};

use super::classify::{ScheduleSignal, classify_schedule};

/// Delay between schedule-confirmation polls.
pub const SCHEDULE_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Write the desired order into the pending-settings resource. Fatal on any
/// rejection: a half-applied attribute set cannot be told apart from the
/// response alone, and retrying blind risks index corruption.
pub async fn stage_boot_order(
    api: &impl Management,
    mode: BootMode,
    order: &BootOrder,
) -> Result<(), Error> {
    match api.stage_boot_order(mode, order).await {
        Ok(()) => {
            eprintln!("  ✓ pending boot order staged ({} devices)", order.len());
            Ok(())
        }
        Err(RedfishError::UnexpectedStatus { status, body }) => Err(Error::Stage { status, body }),
        Err(e) => Err(e.into()),
    }
}

/// Create the configuration job that will apply the staged settings.
pub async fn create_config_job(api: &impl Management) -> Result<JobId, Error> {
    match api.create_config_job().await {
        Ok(job) => {
            eprintln!("  ✓ configuration job {job} created");
            Ok(job)
        }
        Err(RedfishError::UnexpectedStatus { status, body }) => {
            Err(Error::Schedule(format!("status {status}: {body}")))
        }
        Err(RedfishError::MissingJobId) => {
            Err(Error::Schedule("no job id found in the creation response".into()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Poll the task-service view of the job every ten seconds until the
/// controller confirms it is scheduled. No iteration bound: bounded in
/// practice by the operator, who can cancel at any poll boundary. A
/// Lifecycle Controller conflict stops the run — the job will start when
/// the controller frees up, and acting on it now would race the other
/// operation.
pub async fn confirm_schedule(
    api: &impl Management,
    job: &JobId,
    cancel: &CancelToken,
) -> Result<(), Error> {
    loop {
        cancel.check()?;
        let message = api.task_status(job).await?.unwrap_or_default();
        match classify_schedule(&message) {
            ScheduleSignal::Confirmed => {
                eprintln!("  ✓ job {job} marked as scheduled");
                return Ok(());
            }
            ScheduleSignal::Blocked => return Err(Error::ScheduleBlocked(message)),
            ScheduleSignal::Pending => {
                eprintln!("  · job not yet scheduled: {message}");
                sleep(SCHEDULE_POLL_INTERVAL).await;
            }
        }
    }
}
