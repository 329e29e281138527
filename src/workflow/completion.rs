//! Completion polling: watch the jobs view until the controller reports a
//! terminal state, under a hard 30-minute budget.
//!
//! A BIOS config job reboots the host and can take the controller off the
//! network mid-run, so every iteration re-establishes reachability before
//! asking for status. Time spent blocked on reachability is excluded from
//! the budget — a timeout here means the job overran, not that the network
//! flaked.

use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::cancel::CancelToken;
use crate::connectivity::{Reachability, wait_until_reachable};
use crate::error::Error;
use crate::redfish::{JobId, JobRecord, Management};

use super::classify::{CompletionSignal, classify_completion};

/// Delay between completion polls.
pub const COMPLETION_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Execution budget for the job, excluding reachability outages.
pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Poll the job every five seconds until it completes, fails, or the
/// budget runs out. Timeout is checked first each iteration, then failure
/// markers, then the success phrase — a record carrying both markers
/// classifies as failed.
pub async fn await_completion(
    api: &impl Management,
    monitor: &impl Reachability,
    job: &JobId,
    cancel: &CancelToken,
) -> Result<JobRecord, Error> {
    let mut deadline = Instant::now() + COMPLETION_TIMEOUT;
    loop {
        cancel.check()?;
        let blocked = wait_until_reachable(monitor, cancel).await?;
        // Push the deadline out by however long the controller was dark.
        deadline += blocked;
        if Instant::now() >= deadline {
            return Err(Error::Timeout);
        }
        let record = api.job_status(job).await?;
        match classify_completion(&record.message, &record.job_state) {
            CompletionSignal::Failed => {
                return Err(Error::JobFailed {
                    job_id: job.clone(),
                    message: record.message,
                });
            }
            CompletionSignal::Completed => {
                eprintln!("  ✓ job {job} completed successfully");
                return Ok(record);
            }
            CompletionSignal::Pending => {
                eprintln!(
                    "  · job running: \"{}\" (state {})",
                    record.message, record.job_state
                );
                sleep(COMPLETION_POLL_INTERVAL).await;
            }
        }
    }
}
