//! Warm-up and timed traversal of the node chain.
//!
//! Each hop's result goes through `black_box` so the optimizer can neither
//! elide a load nor hoist the walk out of the iteration loop. Nothing inside
//! the timed region suspends, allocates, or touches I/O; a page fault or a
//! context switch in there would invalidate the measurement.

use std::hint::black_box;
use std::num::NonZeroUsize;
use std::ptr;
use std::time::Instant;

use crate::chain::Node;

/// Full-chain traversals per timed variant, amortizing clock overhead.
pub const ITER: usize = 100;

/// One untimed full traversal from node 0 to the terminal. Moves every page
/// into a resident, mapped state so the timed runs see steady-state latency
/// instead of first-touch faults.
pub fn warm_up(nodes: &[Node]) {
    let mut cur = (!nodes.is_empty()).then_some(0usize);
    while let Some(i) = cur {
        // CPU stalls here waiting on the fetch
        cur = nodes[i].next().map(NonZeroUsize::get);
        black_box(cur);
    }
}

/// Run [`ITER`] timed traversals, sampling the monotonic clock immediately
/// before the first and immediately after the last. `filler` selects Variant
/// A (one extra cheap instruction per hop, exposing instruction-issue
/// overhead) over Variant B (pure memory latency).
pub fn chase(nodes: &[Node], filler: bool) -> (Instant, Instant) {
    if filler {
        timed_loop::<true>(nodes)
    } else {
        timed_loop::<false>(nodes)
    }
}

/// Fixed per-hop instruction cost for Variant A. Volatile so the add issues
/// on every hop even though the accumulator is never read back.
#[inline(always)]
fn filler_add(slot: &mut u64) {
    unsafe { ptr::write_volatile(slot, ptr::read_volatile(slot).wrapping_add(1)) }
}

#[inline(never)]
fn timed_loop<const FILLER: bool>(nodes: &[Node]) -> (Instant, Instant) {
    let mut dummy = 0u64;

    let start = Instant::now();
    for _ in 0..ITER {
        let mut cur = (!nodes.is_empty()).then_some(0usize);
        while let Some(i) = cur {
            cur = nodes[i].next().map(NonZeroUsize::get);
            if FILLER {
                filler_add(&mut dummy);
            }
            black_box(cur);
        }
    }
    let end = Instant::now();

    black_box(dummy);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{AllocPolicy, NodeArena, identity_table};
    use crate::permute;
    use rand::{SeedableRng, rngs::SmallRng};

    fn chain_of(len: usize) -> NodeArena {
        let mut table = identity_table(len).unwrap();
        permute::sattolo_with(&mut table, &mut SmallRng::seed_from_u64(0xBEEF));
        let mut arena = NodeArena::new(len, AllocPolicy::Normal).unwrap();
        arena.link(&table);
        arena
    }

    #[test]
    fn clock_samples_are_ordered() {
        let arena = chain_of(64);
        for filler in [true, false] {
            let (start, end) = chase(&arena, filler);
            assert!(end.checked_duration_since(start).is_some());
        }
    }

    #[test]
    fn single_node_chain_is_a_zero_hop_walk() {
        let arena = chain_of(1);
        warm_up(&arena);
        let (start, end) = chase(&arena, true);
        assert!(end >= start);
    }

    #[test]
    fn empty_chain_does_not_panic() {
        let arena = chain_of(0);
        warm_up(&arena);
        let (start, end) = chase(&arena, false);
        assert!(end >= start);
    }
}
