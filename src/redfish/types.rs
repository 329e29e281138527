//! Wire types for the iDRAC Redfish resources this tool touches, plus the
//! small domain types (boot mode, boot order, job id, power state) the
//! workflow passes around.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Firmware interface standard reported by the BIOS resource. Decides which
/// attribute collection the boot order lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootMode {
    Uefi,
    Legacy,
}

impl BootMode {
    /// Map the controller's `Attributes.BootMode` string. The controller
    /// reports legacy BIOS mode as `"Bios"`.
    pub fn from_report(report: &str) -> Option<Self> {
        match report {
            "Uefi" => Some(BootMode::Uefi),
            "Bios" => Some(BootMode::Legacy),
            _ => None,
        }
    }

    /// Attribute key holding the boot sequence for this mode.
    pub fn attribute_key(&self) -> &'static str {
        match self {
            BootMode::Uefi => "UefiBootSeq",
            BootMode::Legacy => "BootSeq",
        }
    }
}

impl std::fmt::Display for BootMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootMode::Uefi => write!(f, "Uefi"),
            BootMode::Legacy => write!(f, "Bios"),
        }
    }
}

/// Rejected boot-order input. Raised before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBootOrder {
    #[error("boot order must contain at least one device identifier")]
    Empty,
    #[error("boot order contains a blank device identifier")]
    BlankEntry,
}

/// An ordered list of opaque boot-device identifiers; position 0 boots
/// first. Identifiers are controller-defined and never interpreted here
/// beyond being non-empty. Duplicates pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootOrder(Vec<String>);

impl BootOrder {
    pub fn new(devices: Vec<String>) -> Result<Self, InvalidBootOrder> {
        if devices.is_empty() {
            return Err(InvalidBootOrder::Empty);
        }
        if devices.iter().any(|d| d.trim().is_empty()) {
            return Err(InvalidBootOrder::BlankEntry);
        }
        Ok(Self(devices))
    }

    /// Parse the CLI encoding: comma-separated identifiers in priority order.
    pub fn parse(input: &str) -> Result<Self, InvalidBootOrder> {
        Self::new(input.split(',').map(|d| d.trim().to_string()).collect())
    }

    pub fn devices(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build the pending-settings PATCH body: each device gets a zero-based
/// `Index` equal to its position, under the attribute key for `mode`.
pub fn pending_settings_payload(mode: BootMode, order: &BootOrder) -> Value {
    let entries: Vec<Value> = order
        .devices()
        .iter()
        .enumerate()
        .map(|(index, id)| serde_json::json!({ "Index": index, "Id": id }))
        .collect();
    let mut attributes = serde_json::Map::new();
    attributes.insert(mode.attribute_key().to_string(), Value::Array(entries));
    serde_json::json!({ "Attributes": attributes })
}

/// Controller-issued job identifier (a `JID_...` token). Owned by the
/// controller; only observed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// Scan free text (a `Location` header or response body) for a job id
    /// token.
    pub fn find_in(text: &str) -> Option<Self> {
        let start = text.find("JID_")?;
        let token: String = text[start..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        (token.len() > "JID_".len()).then_some(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host power state as reported by the system resource. The controller is
/// authoritative; anything it reports beyond On/Off is carried verbatim and
/// treated as fatal by the power protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
    Unrecognized(String),
}

impl PowerState {
    pub fn from_report(report: &str) -> Self {
        match report {
            "On" => PowerState::On,
            "Off" => PowerState::Off,
            other => PowerState::Unrecognized(other.to_string()),
        }
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerState::On => write!(f, "On"),
            PowerState::Off => write!(f, "Off"),
            PowerState::Unrecognized(s) => write!(f, "{s}"),
        }
    }
}

/// Reset verbs accepted by the system reset action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResetType {
    GracefulShutdown,
    ForceOff,
    On,
}

/// Body for the `ComputerSystem.Reset` action.
#[derive(Debug, Clone, Serialize)]
pub struct ResetRequest {
    #[serde(rename = "ResetType")]
    pub reset_type: ResetType,
}

/// Body for the job-creation POST, naming the staged settings to apply.
#[derive(Debug, Clone, Serialize)]
pub struct CreateJobRequest {
    #[serde(rename = "TargetSettingsURI")]
    pub target_settings_uri: String,
}

/// BIOS resource, reduced to the attribute this tool reads.
#[derive(Debug, Clone, Deserialize)]
pub struct BiosResource {
    #[serde(rename = "Attributes")]
    pub attributes: BiosAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BiosAttributes {
    #[serde(rename = "BootMode")]
    pub boot_mode: String,
}

/// Boot-sources resource. The sequence lists carry controller-defined entry
/// objects (id, index, enabled flag, display name, ...) which are passed
/// through untyped for display.
#[derive(Debug, Clone, Deserialize)]
pub struct BootSourcesResource {
    #[serde(rename = "Attributes")]
    pub attributes: BootSourceAttributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootSourceAttributes {
    #[serde(rename = "UefiBootSeq", default)]
    pub uefi_boot_seq: Option<Vec<Value>>,
    #[serde(rename = "BootSeq", default)]
    pub boot_seq: Option<Vec<Value>>,
}

impl BootSourceAttributes {
    pub fn entries(&self, mode: BootMode) -> Option<&[Value]> {
        match mode {
            BootMode::Uefi => self.uefi_boot_seq.as_deref(),
            BootMode::Legacy => self.boot_seq.as_deref(),
        }
    }
}

/// System resource, reduced to the power state.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemResource {
    #[serde(rename = "PowerState")]
    pub power_state: String,
}

/// Task-service view of a job, polled during schedule confirmation.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskResource {
    #[serde(rename = "Messages", default)]
    pub messages: Vec<TaskMessage>,
}

impl TaskResource {
    pub fn first_message(&self) -> Option<&str> {
        self.messages.first().map(|m| m.message.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskMessage {
    #[serde(rename = "Message")]
    pub message: String,
}

/// Jobs view of a job, polled during completion. Fields beyond the two the
/// classifier needs are retained for the final report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "JobState", default)]
    pub job_state: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_mode_from_report() {
        assert_eq!(BootMode::from_report("Uefi"), Some(BootMode::Uefi));
        assert_eq!(BootMode::from_report("Bios"), Some(BootMode::Legacy));
        assert_eq!(BootMode::from_report("Dual"), None);
    }

    #[test]
    fn boot_order_rejects_empty() {
        assert_eq!(BootOrder::new(vec![]), Err(InvalidBootOrder::Empty));
        assert_eq!(BootOrder::parse(" , "), Err(InvalidBootOrder::BlankEntry));
    }

    #[test]
    fn boot_order_parse_preserves_priority() {
        let order = BootOrder::parse("NIC.PxeDevice.1-1, Disk.SATAEmbedded.C-1,Disk.SDInternal.1-1").unwrap();
        assert_eq!(
            order.devices(),
            [
                "NIC.PxeDevice.1-1",
                "Disk.SATAEmbedded.C-1",
                "Disk.SDInternal.1-1"
            ]
        );
    }

    #[test]
    fn boot_order_passes_duplicates_through() {
        let order = BootOrder::parse("A,A,B").unwrap();
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn pending_settings_indices_follow_position() {
        let order = BootOrder::parse("A,B,C").unwrap();
        let payload = pending_settings_payload(BootMode::Uefi, &order);
        let seq = payload["Attributes"]["UefiBootSeq"].as_array().unwrap();
        assert_eq!(seq.len(), 3);
        for (i, entry) in seq.iter().enumerate() {
            assert_eq!(entry["Index"], i);
        }
        assert_eq!(seq[0]["Id"], "A");
        assert_eq!(seq[2]["Id"], "C");
    }

    #[test]
    fn pending_settings_key_tracks_mode() {
        let order = BootOrder::parse("A").unwrap();
        let uefi = pending_settings_payload(BootMode::Uefi, &order);
        assert!(uefi["Attributes"].get("UefiBootSeq").is_some());
        assert!(uefi["Attributes"].get("BootSeq").is_none());

        let legacy = pending_settings_payload(BootMode::Legacy, &order);
        assert!(legacy["Attributes"].get("BootSeq").is_some());
        assert!(legacy["Attributes"].get("UefiBootSeq").is_none());
    }

    #[test]
    fn restaged_payload_supersedes_fully() {
        // A second staging carries the complete new order; nothing from the
        // first write survives into the payload.
        let second = BootOrder::parse("C,A,B").unwrap();
        let payload = pending_settings_payload(BootMode::Uefi, &second);
        let seq = payload["Attributes"]["UefiBootSeq"].as_array().unwrap();
        let ids: Vec<&str> = seq.iter().map(|e| e["Id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["C", "A", "B"]);
    }

    #[test]
    fn job_id_found_in_location_header() {
        let id = JobId::find_in("/redfish/v1/Managers/iDRAC.Embedded.1/Jobs/JID_471269252011").unwrap();
        assert_eq!(id.as_str(), "JID_471269252011");
    }

    #[test]
    fn job_id_found_in_body_text() {
        let body = r#"{"Id": "JID_471269252011", "Message": "created"}"#;
        assert_eq!(JobId::find_in(body).unwrap().as_str(), "JID_471269252011");
    }

    #[test]
    fn job_id_requires_token_after_prefix() {
        assert_eq!(JobId::find_in("no job here"), None);
        assert_eq!(JobId::find_in("JID_"), None);
    }

    #[test]
    fn power_state_from_report() {
        assert_eq!(PowerState::from_report("On"), PowerState::On);
        assert_eq!(PowerState::from_report("Off"), PowerState::Off);
        assert_eq!(
            PowerState::from_report("PoweringOn"),
            PowerState::Unrecognized("PoweringOn".into())
        );
    }

    #[test]
    fn reset_request_wire_format() {
        let body = serde_json::to_string(&ResetRequest {
            reset_type: ResetType::GracefulShutdown,
        })
        .unwrap();
        assert_eq!(body, r#"{"ResetType":"GracefulShutdown"}"#);

        let body = serde_json::to_string(&ResetRequest {
            reset_type: ResetType::ForceOff,
        })
        .unwrap();
        assert_eq!(body, r#"{"ResetType":"ForceOff"}"#);
    }

    #[test]
    fn create_job_request_wire_format() {
        let body = serde_json::to_string(&CreateJobRequest {
            target_settings_uri: "/redfish/v1/Systems/System.Embedded.1/Bios/Settings".into(),
        })
        .unwrap();
        assert!(body.contains(r#""TargetSettingsURI""#));
    }

    #[test]
    fn job_record_retains_unmodeled_fields() {
        let raw = r#"{
            "Id": "JID_471269252011",
            "JobState": "Running",
            "Message": "Job in progress.",
            "PercentComplete": 40
        }"#;
        let record: JobRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.message, "Job in progress.");
        assert_eq!(record.job_state, "Running");
        assert_eq!(record.extra["PercentComplete"], 40);

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["Id"], "JID_471269252011");
        assert_eq!(back["Message"], "Job in progress.");
    }

    #[test]
    fn task_resource_first_message() {
        let raw = r#"{"Messages": [{"Message": "Task successfully scheduled."}, {"Message": "older"}]}"#;
        let task: TaskResource = serde_json::from_str(raw).unwrap();
        assert_eq!(task.first_message(), Some("Task successfully scheduled."));

        let empty: TaskResource = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.first_message(), None);
    }

    #[test]
    fn boot_source_attributes_by_mode() {
        let raw = r#"{"Attributes": {"UefiBootSeq": [{"Id": "NIC.PxeDevice.1-1", "Index": 0}]}}"#;
        let sources: BootSourcesResource = serde_json::from_str(raw).unwrap();
        assert_eq!(sources.attributes.entries(BootMode::Uefi).unwrap().len(), 1);
        assert!(sources.attributes.entries(BootMode::Legacy).is_none());
    }
}
