//! Run configuration and the two-argument CLI surface.

use crate::chain::{AllocPolicy, Node};

/// Working-set size used when no arguments are given.
pub const DEFAULT_SIZE_KB: usize = 64;

/// Everything a run needs to know up front. The CLI only covers size and
/// debug; the remaining flags default from the build features but stay
/// ordinary fields so tests can set them directly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Requested working-set size in kB.
    pub size_kb: usize,
    /// Nonzero enables diagnostic printing; never alters measurement.
    pub debug: usize,
    /// Backing-memory strategy for the node arena.
    pub alloc: AllocPolicy,
    /// Bracket the timed regions with an external power-logging session.
    pub power_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            size_kb: DEFAULT_SIZE_KB,
            debug: 0,
            alloc: if cfg!(feature = "hugepages") {
                AllocPolicy::HugePages
            } else {
                AllocPolicy::Normal
            },
            power_logging: cfg!(feature = "power-logging"),
        }
    }
}

impl Config {
    /// Parse `<program> <memory-size-kB> <debug-flag>`. Anything other than
    /// exactly two positional arguments prints a usage line and falls back
    /// to the defaults; non-numeric arguments parse to 0, matching the
    /// `atoi` semantics existing invocation scripts rely on.
    pub fn from_args(args: &[String]) -> Self {
        let mut config = Config::default();
        if args.len() == 3 {
            config.size_kb = parse_or_zero(&args[1]);
            config.debug = parse_or_zero(&args[2]);
        } else {
            let program = args.first().map(String::as_str).unwrap_or("memchase");
            println!("Usage {program} <memory size in kB> <debug 1=TRUE>");
        }
        config
    }

    /// Number of nodes that fit in the requested working set.
    pub fn node_count(&self) -> usize {
        self.size_kb * 1024 / size_of::<Node>()
    }
}

fn parse_or_zero(arg: &str) -> usize {
    arg.parse().unwrap_or(0)
}
