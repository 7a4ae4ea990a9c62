//! Latency arithmetic and the two-column result line.

use log::warn;
use std::time::{Duration, Instant};

use crate::chain::Node;
use crate::chase::ITER;

const NANOS_PER_SEC: f64 = 1e9;

/// Average per-hop latency in nanoseconds for a chain of `len` nodes
/// traversed [`ITER`] times in `elapsed` wall-clock time.
///
/// Rounding in the seconds-to-double conversion can cost precision for very
/// long runs; irrelevant at the durations this tool produces.
pub fn per_hop_ns(elapsed: Duration, len: usize) -> f64 {
    let secs = elapsed.as_secs() as f64 + f64::from(elapsed.subsec_nanos()) / NANOS_PER_SEC;
    (secs / (len as f64 * ITER as f64)) * NANOS_PER_SEC
}

/// Print one `<bytes> <nanoseconds>` line for a timed variant and return the
/// latency. An end sample that precedes its start indicates a clock anomaly,
/// not corrupt state: the line is skipped with a warning and the run goes on.
pub fn report(start: Instant, end: Instant, len: usize) -> Option<f64> {
    let Some(elapsed) = end.checked_duration_since(start) else {
        warn!("Error in timing routines. End pre-empts Start");
        return None;
    };

    let latency = per_hop_ns(elapsed, len);
    // Two space-separated columns, matching the downstream graphing scripts.
    println!("{} {:.6}", len * size_of::<Node>(), latency);
    Some(latency)
}
