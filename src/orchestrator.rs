use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cancel::CancelToken;
use crate::connectivity::Reachability;
use crate::error::Error;
use crate::redfish::{BootMode, BootOrder, JobId, JobRecord, Management, RedfishError};
use crate::workflow;

/// State for one run, established by stage-and-schedule and threaded
/// through the remaining steps. Holding a `job_id` is the proof that the
/// controller accepted the job: no power action or completion poll can
/// happen without one.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowContext {
    /// Boot mode read once at workflow start; the controller owns this
    /// value and it is treated as immutable for the rest of the run.
    pub mode: BootMode,
    pub order: BootOrder,
    pub job_id: JobId,
    pub started_at: DateTime<Utc>,
}

/// How far the run took the configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowStatus {
    /// Job staged and confirmed; it executes on the next manual reboot.
    Scheduled,
    /// Host was power-cycled and the job ran to successful completion.
    Completed,
}

/// Record of a finished run, printed as the final output of `set`.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub job_id: JobId,
    pub boot_mode: BootMode,
    pub requested_order: Vec<String>,
    pub status: WorkflowStatus,
    /// Full job record as last observed, present when the run polled the
    /// job to completion.
    pub job: Option<JobRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_secs: i64,
}

impl WorkflowReport {
    fn from_context(ctx: &WorkflowContext, status: WorkflowStatus, job: Option<JobRecord>) -> Self {
        let finished_at = Utc::now();
        Self {
            job_id: ctx.job_id.clone(),
            boot_mode: ctx.mode,
            requested_order: ctx.order.devices().to_vec(),
            status,
            job,
            started_at: ctx.started_at,
            finished_at,
            duration_secs: (finished_at - ctx.started_at).num_seconds(),
        }
    }
}

/// Drives a boot-order change end to end: stage → create job → confirm
/// schedule → (optionally) restart the host and poll to completion.
pub struct BootOrderWorkflow<M, R> {
    api: M,
    monitor: R,
    cancel: CancelToken,
}

impl<M: Management, R: Reachability> BootOrderWorkflow<M, R> {
    pub fn new(api: M, monitor: R, cancel: CancelToken) -> Self {
        Self {
            api,
            monitor,
            cancel,
        }
    }

    /// Run the workflow. Without `reboot`, the job is left scheduled for
    /// the next manual reboot; with it, the host is power-cycled and the
    /// job polled to its terminal state.
    pub async fn run(&self, order: BootOrder, reboot: bool) -> Result<WorkflowReport, Error> {
        let ctx = self.stage_and_schedule(order).await?;
        if !reboot {
            eprintln!(
                "  · job {} remains scheduled and will execute on the next manual reboot",
                ctx.job_id
            );
            return Ok(WorkflowReport::from_context(
                &ctx,
                WorkflowStatus::Scheduled,
                None,
            ));
        }
        workflow::ensure_restart(&self.api, &self.cancel).await?;
        let record =
            workflow::await_completion(&self.api, &self.monitor, &ctx.job_id, &self.cancel).await?;
        Ok(WorkflowReport::from_context(
            &ctx,
            WorkflowStatus::Completed,
            Some(record),
        ))
    }

    async fn stage_and_schedule(&self, order: BootOrder) -> Result<WorkflowContext, Error> {
        self.cancel.check()?;
        if let Err(err) = self.api.check_support().await {
            return Err(match err {
                RedfishError::UnexpectedStatus { status, .. } => Error::Unsupported { status },
                e => e.into(),
            });
        }
        let mode = self.api.boot_mode().await?;
        eprintln!("  · controller reports {mode} boot mode");
        let started_at = Utc::now();
        workflow::stage_boot_order(&self.api, mode, &order).await?;
        let job_id = workflow::create_config_job(&self.api).await?;
        workflow::confirm_schedule(&self.api, &job_id, &self.cancel).await?;
        Ok(WorkflowContext {
            mode,
            order,
            job_id,
            started_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redfish::PowerState;
    use crate::workflow::testing::{FlakyMonitor, PowerPlan, ScriptedApi, record};

    fn order() -> BootOrder {
        BootOrder::parse("NIC.PxeDevice.1-1,Disk.SATAEmbedded.C-1").unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_only_run_skips_power_and_completion() {
        let api = ScriptedApi::new();
        let flow = BootOrderWorkflow::new(api, FlakyMonitor::always_up(), CancelToken::new());

        let report = flow.run(order(), false).await.unwrap();

        assert_eq!(report.status, WorkflowStatus::Scheduled);
        assert!(report.job.is_none());
        assert_eq!(report.job_id.as_str(), "JID_471269252011");
        assert_eq!(
            flow.api.calls(),
            ["check_support", "boot_mode", "stage", "create_job", "task_status"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn reboot_run_drives_power_and_polls_to_completion() {
        let api = ScriptedApi::new()
            .with_power_plan(PowerPlan::script(&[PowerState::On, PowerState::Off]))
            .with_job_polls(vec![
                record("Job in progress.", "Running"),
                record("Job completed successfully.", "Completed"),
            ]);
        let flow = BootOrderWorkflow::new(api, FlakyMonitor::always_up(), CancelToken::new());

        let report = flow.run(order(), true).await.unwrap();

        assert_eq!(report.status, WorkflowStatus::Completed);
        assert_eq!(
            report.job.unwrap().message,
            "Job completed successfully."
        );
        assert_eq!(
            flow.api.resets(),
            ["reset:GracefulShutdown", "reset:On"]
        );
        assert_eq!(flow.api.count("job_status"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn blocked_schedule_stops_before_any_power_action() {
        let api = ScriptedApi::new()
            .with_task_messages(&["Job cannot start: Lifecycle Controller in use"]);
        let flow = BootOrderWorkflow::new(api, FlakyMonitor::always_up(), CancelToken::new());

        let err = flow.run(order(), true).await.unwrap_err();

        assert!(matches!(err, Error::ScheduleBlocked(_)));
        assert!(flow.api.resets().is_empty());
        assert_eq!(flow.api.count("power_state"), 0);
        assert_eq!(flow.api.count("job_status"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stage_failure_never_creates_a_job() {
        let api = ScriptedApi::new().with_stage_error(400, "invalid attribute");
        let flow = BootOrderWorkflow::new(api, FlakyMonitor::always_up(), CancelToken::new());

        let err = flow.run(order(), true).await.unwrap_err();

        assert!(matches!(err, Error::Stage { .. }));
        assert_eq!(flow.api.count("create_job"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_preflight_maps_to_unsupported() {
        let api = ScriptedApi::new().with_support_error(404, "no such resource");
        let flow = BootOrderWorkflow::new(api, FlakyMonitor::always_up(), CancelToken::new());

        let err = flow.run(order(), false).await.unwrap_err();

        assert!(matches!(err, Error::Unsupported { status: 404 }));
        assert_eq!(flow.api.count("boot_mode"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_job_surfaces_with_its_id() {
        let api = ScriptedApi::new()
            .with_power_plan(PowerPlan::script(&[PowerState::Off]))
            .with_job_polls(vec![record("Job failed: invalid attribute value", "Failed")]);
        let flow = BootOrderWorkflow::new(api, FlakyMonitor::always_up(), CancelToken::new());

        let err = flow.run(order(), true).await.unwrap_err();

        match err {
            Error::JobFailed { job_id, message } => {
                assert_eq!(job_id.as_str(), "JID_471269252011");
                assert!(message.contains("failed"));
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn report_records_the_requested_order() {
        let api = ScriptedApi::new();
        let flow = BootOrderWorkflow::new(api, FlakyMonitor::always_up(), CancelToken::new());

        let report = flow.run(order(), false).await.unwrap();

        assert_eq!(
            report.requested_order,
            ["NIC.PxeDevice.1-1", "Disk.SATAEmbedded.C-1"]
        );
        assert_eq!(report.boot_mode, BootMode::Uefi);
        assert!(report.duration_secs >= 0);
    }
}
