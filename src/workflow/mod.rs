//! The change-and-apply workflow, step by step: stage the pending order,
//! create and confirm the configuration job, restart the host, and wait
//! for the job to finish. The steps are free functions over the
//! [`Management`](crate::redfish::Management) trait; `orchestrator` wires
//! them together.

pub mod classify;
pub mod completion;
pub mod power;
pub mod schedule;

pub use classify::{CompletionSignal, ScheduleSignal, classify_completion, classify_schedule};
pub use completion::await_completion;
pub use power::ensure_restart;
pub use schedule::{confirm_schedule, create_config_job, stage_boot_order};
