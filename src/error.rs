//! Crate-level error taxonomy.
//!
//! Every fatal condition in the workflow maps to exactly one variant, and
//! every variant maps to a distinct process exit code so an outer
//! orchestrator can tell the failure classes apart without parsing output.
//! Transient network unreachability is deliberately absent: the
//! connectivity monitor absorbs it and it never surfaces as an error.

use thiserror::Error;

use crate::redfish::{InvalidBootOrder, JobId, RedfishError};

#[derive(Debug, Error)]
pub enum Error {
    /// The controller rejected the credentials (HTTP 401).
    #[error("authentication rejected by the controller; check credentials")]
    Authentication,

    /// An endpoint answered with a status outside its accepted set.
    #[error("unexpected status {status} from the controller: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Transport failure talking to the controller.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The controller answered, but not in a shape this tool understands.
    #[error("malformed controller response: {0}")]
    Malformed(String),

    /// The support preflight was rejected: this controller firmware does
    /// not expose the boot-sources resource.
    #[error("controller does not support boot-order configuration (preflight status {status})")]
    Unsupported { status: u16 },

    /// The pending-settings write was rejected. Not retried: a half-applied
    /// attribute set is indistinguishable from the response alone.
    #[error("failed to stage pending boot order (status {status}): {body}")]
    Stage { status: u16, body: String },

    /// Job creation failed or returned no job id.
    #[error("failed to create the configuration job: {0}")]
    Schedule(String),

    /// The Lifecycle Controller is busy with another maintenance operation.
    /// A legitimate "try later", not an alarm: check the job queue and make
    /// sure the server is off or out of POST, then re-run.
    #[error("configuration job blocked: {0}")]
    ScheduleBlocked(String),

    /// The power sub-protocol could not reach the expected state in budget.
    #[error("power transition failed: {0}")]
    PowerTransition(String),

    /// The controller reported a power state this tool does not model.
    #[error("unrecognized host power state reported by the controller: {0}")]
    UnknownPowerState(String),

    /// The controller marked the job as failed. Re-stage and re-schedule to
    /// retry.
    #[error("job {job_id} failed: {message}")]
    JobFailed { job_id: JobId, message: String },

    /// The 30-minute completion budget ran out.
    #[error("timed out waiting for the configuration job to complete")]
    Timeout,

    /// The run was cancelled cooperatively (Ctrl-C or caller request).
    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    InvalidBootOrder(#[from] InvalidBootOrder),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Distinct non-zero exit code per taxonomy member. Local failures
    /// (network, parse, input, config) share the generic code 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Network(_)
            | Error::Malformed(_)
            | Error::InvalidBootOrder(_)
            | Error::Config(_) => 1,
            Error::Authentication => 3,
            Error::UnexpectedStatus { .. } => 4,
            Error::Unsupported { .. } => 5,
            Error::Stage { .. } => 6,
            Error::Schedule(_) => 7,
            Error::ScheduleBlocked(_) => 8,
            Error::PowerTransition(_) => 9,
            Error::UnknownPowerState(_) => 10,
            Error::JobFailed { .. } => 11,
            Error::Timeout => 12,
            Error::Cancelled => 13,
        }
    }
}

impl From<RedfishError> for Error {
    fn from(err: RedfishError) -> Self {
        match err {
            RedfishError::Authentication => Error::Authentication,
            RedfishError::UnexpectedStatus { status, body } => {
                Error::UnexpectedStatus { status, body }
            }
            RedfishError::Network(e) => Error::Network(e),
            RedfishError::MissingJobId => {
                Error::Schedule("no job id found in the creation response".into())
            }
            RedfishError::Malformed(msg) => Error::Malformed(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn exit_codes_are_distinct_across_the_taxonomy() {
        let job_id = JobId::find_in("JID_1").unwrap();
        let errors = vec![
            Error::Authentication,
            Error::UnexpectedStatus {
                status: 500,
                body: String::new(),
            },
            Error::Unsupported { status: 404 },
            Error::Stage {
                status: 400,
                body: String::new(),
            },
            Error::Schedule(String::new()),
            Error::ScheduleBlocked(String::new()),
            Error::PowerTransition(String::new()),
            Error::UnknownPowerState(String::new()),
            Error::JobFailed {
                job_id,
                message: String::new(),
            },
            Error::Timeout,
            Error::Cancelled,
        ];
        let codes: HashSet<u8> = errors.iter().map(Error::exit_code).collect();
        assert_eq!(codes.len(), errors.len());
        assert!(!codes.contains(&0));
    }

    #[test]
    fn redfish_errors_map_onto_the_taxonomy() {
        assert!(matches!(
            Error::from(RedfishError::Authentication),
            Error::Authentication
        ));
        assert!(matches!(
            Error::from(RedfishError::MissingJobId),
            Error::Schedule(_)
        ));
        match Error::from(RedfishError::UnexpectedStatus {
            status: 503,
            body: "busy".into(),
        }) {
            Error::UnexpectedStatus { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "busy");
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn blocked_schedule_reads_as_advice_not_alarm() {
        let err = Error::ScheduleBlocked("Lifecycle Controller in use".into());
        assert!(err.to_string().contains("blocked"));
        assert_eq!(err.exit_code(), 8);
    }
}
