//! Network reachability gate for the controller.
//!
//! During BIOS config jobs the controller itself can drop off the network
//! for minutes at a time (host POST, firmware apply, iDRAC reset). The
//! monitor distinguishes "controller busy/rebooting" from "operation
//! failed": pollers block on [`wait_until_reachable`] instead of treating a
//! dead connection as an error.

use std::time::Duration;

use tokio::process::Command;
use tokio::time::{Instant, sleep};

use crate::cancel::CancelToken;
use crate::error::Error;

/// Delay between reachability re-checks while the controller is down.
const RECHECK_INTERVAL: Duration = Duration::from_secs(180);
/// Per-probe reply timeout handed to ping, in seconds.
const PROBE_TIMEOUT_SECS: u32 = 2;

#[allow(async_fn_in_trait)]
pub trait Reachability {
    /// One fresh reachability check; never cached across polls.
    async fn is_reachable(&self) -> bool;
}

/// Probes the controller with the system `ping` binary. Reachable means
/// every probe came back: a controller that answers only some probes is
/// mid-reset or behind a failing link and is treated as down.
#[derive(Debug, Clone)]
pub struct PingMonitor {
    host: String,
    probes: u32,
}

impl PingMonitor {
    pub fn new(host: impl Into<String>, probes: u32) -> Self {
        Self {
            host: host.into(),
            probes: probes.max(1),
        }
    }
}

impl Reachability for PingMonitor {
    async fn is_reachable(&self) -> bool {
        let output = Command::new("ping")
            .arg("-c")
            .arg(self.probes.to_string())
            .arg("-W")
            .arg(PROBE_TIMEOUT_SECS.to_string())
            .arg(&self.host)
            .output()
            .await;
        match output {
            Ok(out) => out.status.success() && zero_loss(&String::from_utf8_lossy(&out.stdout)),
            Err(_) => false,
        }
    }
}

/// Parse the ping summary line ("5 packets transmitted, 5 received, ...")
/// and require that every transmitted probe was answered.
fn zero_loss(summary: &str) -> bool {
    let mut transmitted: Option<u32> = None;
    let mut received: Option<u32> = None;
    for segment in summary.split(',') {
        let number = segment
            .split_whitespace()
            .find_map(|word| word.parse::<u32>().ok());
        if segment.contains("packets transmitted") {
            transmitted = number;
        } else if segment.contains("received") {
            received = number;
        }
    }
    matches!((transmitted, received), (Some(t), Some(r)) if t > 0 && t == r)
}

/// Block until the controller answers probes again, re-checking every three
/// minutes with no upper bound — the controller may legitimately stay dark
/// for a long firmware apply. Returns the time spent blocked so callers
/// with their own deadline can account for it. Checks `cancel` at every
/// iteration.
pub async fn wait_until_reachable(
    monitor: &impl Reachability,
    cancel: &CancelToken,
) -> Result<Duration, Error> {
    let started = Instant::now();
    loop {
        cancel.check()?;
        if monitor.is_reachable().await {
            return Ok(started.elapsed());
        }
        eprintln!(
            "  · controller unreachable (rebooting or link lost); re-checking in {}s",
            RECHECK_INTERVAL.as_secs()
        );
        sleep(RECHECK_INTERVAL).await;
    }
}
