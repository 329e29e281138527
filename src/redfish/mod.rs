pub mod client;
pub mod error;
pub mod types;

pub use client::{Credentials, Management, RedfishClient};
pub use error::RedfishError;
pub use types::{
    BootMode, BootOrder, InvalidBootOrder, JobId, JobRecord, PowerState, ResetType,
};
