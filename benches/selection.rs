use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kitbag::{create_rng, random_index_by_weight, HistorySelector, MemoryStore};
use std::hint::black_box;

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("pick");
    for &n_items in &[4usize, 32usize, 256usize] {
        // Deterministic, slightly non-uniform weights.
        let weights: Vec<f32> = (0..n_items).map(|i| ((i * 17 + 3) % 11) as f32 + 1.0).collect();

        group.bench_with_input(BenchmarkId::new("weighted", n_items), &n_items, |b, &_n| {
            let mut rng = create_rng(Some(123));
            b.iter(|| black_box(random_index_by_weight(black_box(&weights), &mut rng)))
        });

        group.bench_with_input(BenchmarkId::new("with_history", n_items), &n_items, |b, &_n| {
            let mut selector = HistorySelector::new(MemoryStore::new(), create_rng(Some(123)));
            b.iter(|| black_box(selector.pick_index_with_history(black_box(&weights), "bench")))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_selection);
criterion_main!(benches);
