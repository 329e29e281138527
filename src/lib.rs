//! bootseq — configure a server's BIOS boot order through its management
//! controller's Redfish interface and drive the change to completion.
//!
//! The workflow stages the desired order into the controller's pending
//! settings, creates and confirms a configuration job, optionally
//! power-cycles the host, and polls the job to a terminal state while
//! tolerating transient loss of reachability to the controller. Usable as
//! a library (see [`orchestrator::BootOrderWorkflow`]) or through the
//! `bootseq` binary.

pub mod cancel;
pub mod cli;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod inventory;
pub mod orchestrator;
pub mod redfish;
pub mod ui;
pub mod workflow;

pub use cancel::CancelToken;
pub use error::Error;
pub use orchestrator::{BootOrderWorkflow, WorkflowReport, WorkflowStatus};
