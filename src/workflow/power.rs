//! Host power transitions that trigger job execution.
//!
//! The controller only models On and Off. From On, the host gets a chance
//! to shut down gracefully before being forced off; from Off, it is simply
//! powered on. Reset actions answer 204 on acceptance — the resulting state
//! is only ever learned by reading it back.

use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::cancel::CancelToken;
use crate::error::Error;
use crate::redfish::{Management, PowerState, ResetType};

/// Settle time after a shutdown request before the first state read, and
/// after a forced shutdown before the single re-check.
pub const SHUTDOWN_SETTLE: Duration = Duration::from_secs(15);
/// Delay between power-state reads while waiting for the host to turn off.
pub const POWER_POLL_INTERVAL: Duration = Duration::from_secs(15);
/// Wall-clock budget for a graceful shutdown, measured from the request.
pub const SHUTDOWN_BUDGET: Duration = Duration::from_secs(300);

/// Drive the host through the transition that makes the scheduled job run:
/// graceful shutdown → (forced shutdown fallback) → power on when the host
/// is on, or a direct power-on when it is already off.
pub async fn ensure_restart(api: &impl Management, cancel: &CancelToken) -> Result<(), Error> {
    let state = api.power_state().await?;
    eprintln!("  · current server power state: {state}");
    match state {
        PowerState::On => {
            api.reset(ResetType::GracefulShutdown).await?;
            eprintln!(
                "  ✓ graceful shutdown requested; forcing power off if the host is still up after {} minutes",
                SHUTDOWN_BUDGET.as_secs() / 60
            );
            let requested_at = Instant::now();
            sleep(SHUTDOWN_SETTLE).await;
            if !shut_down_within_budget(api, cancel, requested_at).await? {
                eprintln!("  · graceful shutdown did not complete in time; forcing power off");
                api.reset(ResetType::ForceOff).await?;
                sleep(SHUTDOWN_SETTLE).await;
                match api.power_state().await? {
                    PowerState::Off => {}
                    PowerState::On => {
                        return Err(Error::PowerTransition(
                            "server still reports On after a forced shutdown".into(),
                        ));
                    }
                    PowerState::Unrecognized(s) => return Err(Error::UnknownPowerState(s)),
                }
            }
            eprintln!("  ✓ server is powered off");
            api.reset(ResetType::On).await?;
            eprintln!("  ✓ power on requested");
        }
        PowerState::Off => {
            api.reset(ResetType::On).await?;
            eprintln!("  ✓ power on requested");
        }
        PowerState::Unrecognized(s) => return Err(Error::UnknownPowerState(s)),
    }
    Ok(())
}

/// Poll until the host reports Off or the shutdown budget (measured from
/// `requested_at`) runs out. Ok(true) = off, Ok(false) = budget exhausted.
async fn shut_down_within_budget(
    api: &impl Management,
    cancel: &CancelToken,
    requested_at: Instant,
) -> Result<bool, Error> {
    loop {
        cancel.check()?;
        match api.power_state().await? {
            PowerState::Off => return Ok(true),
            PowerState::On => {}
            PowerState::Unrecognized(s) => return Err(Error::UnknownPowerState(s)),
        }
        if requested_at.elapsed() >= SHUTDOWN_BUDGET {
            return Ok(false);
        }
        sleep(POWER_POLL_INTERVAL).await;
    }
}
