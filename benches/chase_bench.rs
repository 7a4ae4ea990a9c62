// benches/chase_bench.rs

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use memchase::chain::{AllocPolicy, NodeArena, identity_table};
use memchase::chase::{chase, warm_up};
use memchase::permute::sattolo;

fn build_chain(size_kb: usize) -> NodeArena {
    let len = size_kb * 1024 / 64;
    let mut table = identity_table(len).expect("bench table allocation");
    sattolo(&mut table);
    let mut arena = NodeArena::new(len, AllocPolicy::Normal).expect("bench arena allocation");
    arena.link(&table);
    warm_up(&arena);
    arena
}

fn bench_chase(c: &mut Criterion) {
    let mut group = c.benchmark_group("PointerChase");
    // Sizes straddling typical L1/L2/L3 boundaries.
    for size_kb in [16, 256, 4096] {
        let arena = build_chain(size_kb);

        group.bench_with_input(
            BenchmarkId::new("filler", size_kb),
            &arena,
            |b, arena| b.iter(|| chase(black_box(arena), true)),
        );
        group.bench_with_input(
            BenchmarkId::new("plain", size_kb),
            &arena,
            |b, arena| b.iter(|| chase(black_box(arena), false)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_chase);
criterion_main!(benches);
