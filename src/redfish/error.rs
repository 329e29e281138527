//! Error type for the Redfish management client.
//!
//! Maps transport and status-code outcomes to typed variants:
//! - [`Authentication`](RedfishError::Authentication) — the controller
//!   returned HTTP 401, always terminal
//! - [`UnexpectedStatus`](RedfishError::UnexpectedStatus) — a status outside
//!   the accepted set for the call, carried with the response body
//! - [`Network`](RedfishError::Network) — the request never completed

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedfishError {
    /// HTTP 401 from any endpoint: bad credentials or an expired token.
    #[error("authentication rejected by the controller (HTTP 401); check credentials")]
    Authentication,

    /// The controller answered with a status outside the accepted set for
    /// this call. The body is kept for diagnosis.
    #[error("unexpected status {status} from the controller: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Transport failure (DNS, refused connection, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 200-class job-creation response that carries no `JID_` token.
    #[error("job created but no job id found in the response")]
    MissingJobId,

    /// A response that parsed as JSON but not into the expected shape.
    #[error("malformed controller response: {0}")]
    Malformed(String),
}
