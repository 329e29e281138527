//! Read-only view of the current boot configuration, for the `get`
//! command: the boot mode plus the boot-source entries in controller
//! order.

use serde_json::Value;

use crate::error::Error;
use crate::redfish::{BootMode, Management};

#[derive(Debug, Clone)]
pub struct BootInventory {
    pub mode: BootMode,
    pub entries: Vec<Value>,
}

/// Fetch the boot mode and the matching boot sequence.
pub async fn boot_inventory(api: &impl Management) -> Result<BootInventory, Error> {
    let mode = api.boot_mode().await?;
    let entries = api.boot_sources(mode).await?;
    Ok(BootInventory { mode, entries })
}

impl BootInventory {
    /// Render one line per entry field, entries separated by blank lines,
    /// in the order the controller reported them.
    pub fn render(&self) -> String {
        let mut out = format!("Current {} boot order:\n", self.mode);
        for entry in &self.entries {
            out.push('\n');
            match entry.as_object() {
                Some(fields) => {
                    for (key, value) in fields {
                        out.push_str(&format!("  {key}: {value}\n"));
                    }
                }
                None => out.push_str(&format!("  {entry}\n")),
            }
        }
        out
    }
}
