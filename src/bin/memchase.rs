//! Memory Latency Measurement via Pointer Chasing
//!
//! Builds a Sattolo-shuffled chain sized to the requested working set, walks
//! it once to warm the translation machinery, then times two chasing
//! variants (with and without a per-hop filler instruction) and prints one
//! `<bytes> <nanoseconds>` line per variant for external graphing.

use log::{debug, warn};
use std::process::ExitCode;
use std::thread;

use memchase::chain::{AllocPolicy, HUGEPAGE_SIZE, Node, NodeArena, identity_table};
use memchase::chase::{chase, warm_up};
use memchase::config::Config;
use memchase::permute::sattolo;
use memchase::power::{NoopPower, PowerLogger, SESSION_SETTLE, SessionLog};
use memchase::report::report;
use memchase::{DETECTED_LINE_SIZE, Error, format_size};

// use faster/smaller `mimalloc` allocator
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_args(&args);

    pin_measurement_thread();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("{err}. Exiting");
            ExitCode::FAILURE
        }
    }
}

/// Pin to one core at maximum priority so the scheduler doesn't migrate the
/// chase mid-measurement. Both are best-effort; the numbers are merely
/// noisier without them.
fn pin_measurement_thread() {
    if let Some(core) = core_affinity::get_core_ids().and_then(|ids| ids.into_iter().next()) {
        if !core_affinity::set_for_current(core) {
            warn!(
                "Couldn't pin measurement thread to CPU core {} (NOTE: this is expected on macOS)",
                core.id
            );
        }
    }
    if thread_priority::set_current_thread_priority(thread_priority::ThreadPriority::Max).is_err() {
        warn!("Couldn't set measurement thread to maximum thread priority");
    }
}

/// The whole benchmark is one straight line: allocate, shuffle, link,
/// warm up, time variant A, report, time variant B, report.
fn run(config: &Config) -> Result<(), Error> {
    let len = config.node_count();

    if config.debug > 0 {
        println!("Size of struct is {}", size_of::<Node>());
        println!(
            "This BM will use {}kB of memory.",
            len * size_of::<Node>() / 1024
        );
        println!("Request was for {}kB of memory.", config.size_kb);
        if config.alloc == AllocPolicy::HugePages {
            println!("Huge pages requested, HPS={HUGEPAGE_SIZE}");
        }
        if *DETECTED_LINE_SIZE != size_of::<Node>() {
            warn!(
                "detected cache line size is {} bytes, node stride stays at {}",
                *DETECTED_LINE_SIZE,
                size_of::<Node>()
            );
        }
    }
    debug!(
        "working set: {} nodes, {}",
        len,
        format_size((len * size_of::<Node>()) as f32)
    );

    let mut table = identity_table(len)?;
    sattolo(&mut table);

    let mut arena = NodeArena::new(len, config.alloc)?;
    arena.link(&table);
    // The table only seeds the links; release it before any measurement.
    drop(table);

    warm_up(&arena);

    let mut power: Box<dyn PowerLogger> = if config.power_logging {
        Box::new(SessionLog)
    } else {
        Box::new(NoopPower)
    };

    power.connect();
    if config.power_logging {
        thread::sleep(SESSION_SETTLE);
    }
    power.start_session();

    let (start, end) = chase(&arena, true);
    report(start, end, len);

    let (start, end) = chase(&arena, false);
    power.stop_session();
    report(start, end, len);

    power.disconnect();
    Ok(())
}
