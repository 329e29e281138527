use std::time::Duration;

use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;

use super::error::RedfishError;
use super::types::{
    BiosResource, BootMode, BootOrder, BootSourcesResource, CreateJobRequest, JobId, JobRecord,
    PowerState, ResetRequest, ResetType, SystemResource, TaskResource,
    pending_settings_payload,
};

const SYSTEM_PATH: &str = "/redfish/v1/Systems/System.Embedded.1";
const BIOS_PATH: &str = "/redfish/v1/Systems/System.Embedded.1/Bios";
const BIOS_SETTINGS_PATH: &str = "/redfish/v1/Systems/System.Embedded.1/Bios/Settings";
const BOOT_SOURCES_PATH: &str = "/redfish/v1/Systems/System.Embedded.1/BootSources";
const BOOT_SOURCES_SETTINGS_PATH: &str =
    "/redfish/v1/Systems/System.Embedded.1/BootSources/Settings";
const RESET_PATH: &str = "/redfish/v1/Systems/System.Embedded.1/Actions/ComputerSystem.Reset";
const JOBS_PATH: &str = "/redfish/v1/Managers/iDRAC.Embedded.1/Jobs";
const TASKS_PATH: &str = "/redfish/v1/TaskService/Tasks";

/// Credentials for the controller. A session token takes precedence over
/// basic auth when both are present.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub token: Option<String>,
}

/// Status and body of a controller response, plus the `Location` header
/// when the controller set one.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
    pub location: Option<String>,
}

/// The typed operations the workflow needs from the controller. Implemented
/// by [`RedfishClient`] over HTTP and by scripted doubles in tests.
#[allow(async_fn_in_trait)]
pub trait Management {
    /// Preflight: confirm the controller firmware exposes the boot-sources
    /// resource at all.
    async fn check_support(&self) -> Result<(), RedfishError>;
    async fn boot_mode(&self) -> Result<BootMode, RedfishError>;
    async fn boot_sources(&self, mode: BootMode) -> Result<Vec<Value>, RedfishError>;
    async fn stage_boot_order(&self, mode: BootMode, order: &BootOrder)
    -> Result<(), RedfishError>;
    async fn create_config_job(&self) -> Result<JobId, RedfishError>;
    /// Task-service view used while waiting for the schedule confirmation.
    async fn task_status(&self, job: &JobId) -> Result<Option<String>, RedfishError>;
    /// Jobs view used while waiting for completion.
    async fn job_status(&self, job: &JobId) -> Result<JobRecord, RedfishError>;
    async fn power_state(&self) -> Result<PowerState, RedfishError>;
    async fn reset(&self, reset_type: ResetType) -> Result<(), RedfishError>;
}

/// HTTP client for one iDRAC-class controller. Stateless beyond the
/// connection settings; safe to share by reference across workflow steps.
pub struct RedfishClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl RedfishClient {
    /// Connect to a controller by host name or address. `insecure` disables
    /// TLS certificate verification — an explicit operator choice for
    /// controllers with self-signed certificates, default off.
    pub fn connect(
        host: &str,
        credentials: Credentials,
        insecure: bool,
    ) -> Result<Self, RedfishError> {
        Self::build(format!("https://{host}"), credentials, insecure)
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(base_url: String, credentials: Credentials) -> Result<Self, RedfishError> {
        Self::build(base_url, credentials, false)
    }

    fn build(
        base_url: String,
        credentials: Credentials,
        insecure: bool,
    ) -> Result<Self, RedfishError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    fn authed(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let request = self.http.request(method, format!("{}{path}", self.base_url));
        match &self.credentials.token {
            Some(token) => request.header("X-Auth-Token", token),
            None => request.basic_auth(&self.credentials.username, Some(&self.credentials.password)),
        }
    }

    async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
        accepted: &[u16],
    ) -> Result<RawResponse, RedfishError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        if status == 401 {
            return Err(RedfishError::Authentication);
        }
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        if !accepted.contains(&status) {
            return Err(RedfishError::UnexpectedStatus { status, body });
        }
        Ok(RawResponse {
            status,
            body,
            location,
        })
    }

    pub async fn get(&self, path: &str, accepted: &[u16]) -> Result<RawResponse, RedfishError> {
        self.dispatch(self.authed(Method::GET, path), accepted).await
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        accepted: &[u16],
    ) -> Result<RawResponse, RedfishError> {
        self.dispatch(self.authed(Method::POST, path).json(payload), accepted)
            .await
    }

    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        accepted: &[u16],
    ) -> Result<RawResponse, RedfishError> {
        self.dispatch(self.authed(Method::PATCH, path).json(payload), accepted)
            .await
    }
}

fn parse<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, RedfishError> {
    serde_json::from_str(body).map_err(|e| RedfishError::Malformed(e.to_string()))
}

impl Management for RedfishClient {
    async fn check_support(&self) -> Result<(), RedfishError> {
        self.get(BOOT_SOURCES_PATH, &[200, 202]).await.map(|_| ())
    }

    async fn boot_mode(&self) -> Result<BootMode, RedfishError> {
        let response = self.get(BIOS_PATH, &[200]).await?;
        let bios: BiosResource = parse(&response.body)?;
        BootMode::from_report(&bios.attributes.boot_mode).ok_or_else(|| {
            RedfishError::Malformed(format!(
                "unrecognized boot mode {:?}",
                bios.attributes.boot_mode
            ))
        })
    }

    async fn boot_sources(&self, mode: BootMode) -> Result<Vec<Value>, RedfishError> {
        let response = self.get(BOOT_SOURCES_PATH, &[200, 202]).await?;
        let sources: BootSourcesResource = parse(&response.body)?;
        sources
            .attributes
            .entries(mode)
            .map(<[Value]>::to_vec)
            .ok_or_else(|| {
                RedfishError::Malformed(format!(
                    "boot sources carry no {} attribute",
                    mode.attribute_key()
                ))
            })
    }

    async fn stage_boot_order(
        &self,
        mode: BootMode,
        order: &BootOrder,
    ) -> Result<(), RedfishError> {
        let payload = pending_settings_payload(mode, order);
        self.patch(BOOT_SOURCES_SETTINGS_PATH, &payload, &[200])
            .await
            .map(|_| ())
    }

    async fn create_config_job(&self) -> Result<JobId, RedfishError> {
        let payload = CreateJobRequest {
            target_settings_uri: BIOS_SETTINGS_PATH.to_string(),
        };
        let response = self.post(JOBS_PATH, &payload, &[200]).await?;
        response
            .location
            .as_deref()
            .and_then(JobId::find_in)
            .or_else(|| JobId::find_in(&response.body))
            .ok_or(RedfishError::MissingJobId)
    }

    async fn task_status(&self, job: &JobId) -> Result<Option<String>, RedfishError> {
        let response = self.get(&format!("{TASKS_PATH}/{job}"), &[200, 202]).await?;
        let task: TaskResource = parse(&response.body)?;
        Ok(task.first_message().map(str::to_string))
    }

    async fn job_status(&self, job: &JobId) -> Result<JobRecord, RedfishError> {
        let response = self.get(&format!("{JOBS_PATH}/{job}"), &[200]).await?;
        parse(&response.body)
    }

    async fn power_state(&self) -> Result<PowerState, RedfishError> {
        let response = self.get(SYSTEM_PATH, &[200]).await?;
        let system: SystemResource = parse(&response.body)?;
        Ok(PowerState::from_report(&system.power_state))
    }

    async fn reset(&self, reset_type: ResetType) -> Result<(), RedfishError> {
        let payload = ResetRequest { reset_type };
        self.post(RESET_PATH, &payload, &[204]).await.map(|_| ())
    }
}
