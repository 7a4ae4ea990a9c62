//! Optional external power-telemetry bracket.
//!
//! Some measurement rigs sample power draw while the benchmark runs. The
//! collaborator is a pure side channel: its calls bracket the timed regions
//! and never interleave with them, and its failures are best-effort by
//! contract, so the default implementation does nothing at all.

use log::info;
use std::time::Duration;

/// Delay after connecting, giving the external session time to stabilize.
/// Not a correctness-relevant wait.
pub const SESSION_SETTLE: Duration = Duration::from_secs(3);

/// Lifecycle of an external power-measurement session. All operations
/// default to no-ops so the timing path is independent of its presence.
pub trait PowerLogger {
    fn connect(&mut self) {}
    fn start_session(&mut self) {}
    fn stop_session(&mut self) {}
    fn disconnect(&mut self) {}
}

/// Stand-in collaborator when no telemetry rig is attached.
pub struct NoopPower;

impl PowerLogger for NoopPower {}

/// Collaborator that records session boundaries in the log, useful for
/// verifying bracket placement against an external capture.
#[derive(Default)]
pub struct SessionLog;

impl PowerLogger for SessionLog {
    fn connect(&mut self) {
        info!("power session connected");
    }

    fn start_session(&mut self) {
        info!("power session started");
    }

    fn stop_session(&mut self) {
        info!("power session stopped");
    }

    fn disconnect(&mut self) {
        info!("power session disconnected");
    }
}
