//! # memchase
//!
//! Memory-subsystem latency measurement via pointer chasing.
//!
//! A contiguous arena of cache-line-sized nodes is wired into one long
//! singly-linked chain by a Sattolo shuffle, so every hop depends on the
//! previous load and hardware prefetchers get no usable stride. Timing a
//! fixed number of full traversals then yields the average per-hop latency
//! for a chosen working-set size, which external graphing tools plot against
//! the cache hierarchy.

use once_cell::sync::Lazy;
use thiserror::Error;

pub mod chain;
pub mod chase;
pub mod config;
pub mod permute;
pub mod power;
pub mod report;

/// Data cache line size reported by the host CPU, 64 bytes when detection
/// fails. Diagnostic only: the node layout is fixed at 64 bytes regardless.
pub static DETECTED_LINE_SIZE: Lazy<usize> = Lazy::new(|| {
    cache_size::cache_line_size(1, cache_size::CacheType::Data)
        .or_else(|| cache_size::cache_line_size(1, cache_size::CacheType::Unified))
        .or_else(|| cache_size::cache_line_size(2, cache_size::CacheType::Data))
        .or_else(|| cache_size::cache_line_size(2, cache_size::CacheType::Unified))
        .unwrap_or(64)
});

/// Benchmark failure modes. Memory pressure is not recoverable within this
/// tool's scope, so allocation errors terminate the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Error allocating memory for {0}")]
    Allocation(&'static str),
}

/// Convert number of bytes to formatted string
pub fn format_size(bytes: f32) -> String {
    const GB: f32 = 1024.0 * 1024.0 * 1024.0;
    const MB: f32 = 1024.0 * 1024.0;
    const KB: f32 = 1024.0;

    if bytes >= GB {
        format!("{:.2} GiB", bytes / GB)
    } else if bytes >= MB {
        format!("{:.2} MiB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.2} KiB", bytes / KB)
    } else {
        format!("{:.2} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_picks_unit() {
        assert_eq!(format_size(512.0), "512.00 B");
        assert_eq!(format_size(64.0 * 1024.0), "64.00 KiB");
        assert_eq!(format_size(2.0 * 1024.0 * 1024.0), "2.00 MiB");
    }

    #[test]
    fn detected_line_size_is_plausible() {
        let line = *DETECTED_LINE_SIZE;
        assert!(line.is_power_of_two());
        assert!((16..=512).contains(&line));
    }
}
