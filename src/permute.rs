//! Single-cycle index permutation.
//!
//! The chain layout comes from shuffling an identity index table. A plain
//! Fisher-Yates shuffle would do for randomness, but it can split the table
//! into several disjoint cycles, and a chain built from a short cycle revisits
//! the same few lines instead of covering the whole working set. Sattolo's
//! variant draws the swap partner from `[0, i-1)` instead of `[0, i]`, which
//! excludes the self-swap and forces the result to be exactly one N-cycle.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Shuffle `table` into a uniformly random cyclic permutation, seeded from
/// the microsecond component of the wall clock. Reproducibility is not a
/// goal here; cryptographic strength even less so.
pub fn sattolo(table: &mut [usize]) {
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|t| u64::from(t.subsec_micros()))
        .unwrap_or_default();
    sattolo_with(table, &mut SmallRng::seed_from_u64(micros));
}

/// Sattolo shuffle driven by a caller-supplied generator.
///
/// Tables of length 0 or 1 are left untouched (trivially a single cycle).
pub fn sattolo_with<R: Rng>(table: &mut [usize], rng: &mut R) {
    let mut i = table.len();
    while i > 1 {
        i -= 1;
        let j = rng.random_range(0..i);
        table.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(len: usize) -> Vec<usize> {
        (0..len).collect()
    }

    /// Follow `table[i]` as "next index" from `start` until an index repeats,
    /// returning how many distinct positions were visited.
    fn cycle_len(table: &[usize], start: usize) -> usize {
        let mut seen = vec![false; table.len()];
        let mut cur = start;
        let mut visited = 0;
        while !seen[cur] {
            seen[cur] = true;
            visited += 1;
            cur = table[cur];
        }
        visited
    }

    #[test]
    fn produces_single_cycle_for_all_lengths() {
        let mut rng = SmallRng::seed_from_u64(0x5EED);
        for len in [2, 3, 4, 17, 64, 256, 1000] {
            let mut table = identity(len);
            sattolo_with(&mut table, &mut rng);
            // Every start position must reach all N indices before repeating.
            assert_eq!(cycle_len(&table, 0), len, "len={len}");
            assert_eq!(cycle_len(&table, len / 2), len, "len={len}");
        }
    }

    #[test]
    fn result_is_a_permutation() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut table = identity(512);
        sattolo_with(&mut table, &mut rng);
        let mut sorted = table.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, identity(512));
    }

    #[test]
    fn no_fixed_points() {
        // A single N-cycle with N >= 2 cannot map any index to itself.
        let mut rng = SmallRng::seed_from_u64(7);
        for len in [2, 5, 100] {
            let mut table = identity(len);
            sattolo_with(&mut table, &mut rng);
            assert!(table.iter().enumerate().all(|(i, &v)| i != v));
        }
    }

    #[test]
    fn degenerate_lengths_are_untouched() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut empty: Vec<usize> = vec![];
        sattolo_with(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec![0];
        sattolo_with(&mut single, &mut rng);
        assert_eq!(single, [0]);
    }

    #[test]
    fn clock_seeded_entry_point_holds_the_invariant() {
        let mut table = identity(128);
        sattolo(&mut table);
        assert_eq!(cycle_len(&table, 0), 128);
    }
}
