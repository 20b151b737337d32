//! Benchmarks for designator decomposition
//!
//! Measures the cost of the name heuristics on the designator shapes that
//! dominate real record streams.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use starmap_names::{custom_name, decompose};

const SYSTEM: &str = "Col 285 Sector AB-C d12-34";

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");

    let names = [
        ("primary", "Col 285 Sector AB-C d12-34"),
        ("planet", "Col 285 Sector AB-C d12-34 3"),
        ("moon", "Col 285 Sector AB-C d12-34 A 1 a"),
        ("belt_cluster", "Col 285 Sector AB-C d12-34 B A Belt Cluster 6"),
        ("barycentre", "Col 285 Sector AB-C d12-34 AB 2 c"),
        ("unique", "Mitterand Hollow"),
    ];

    for (label, name) in names {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(label), &name, |b, &n| {
            b.iter(|| decompose(black_box(n), black_box(SYSTEM), None))
        });
    }
    group.finish();
}

fn bench_custom_name(c: &mut Criterion) {
    c.bench_function("custom_name", |b| {
        b.iter(|| {
            custom_name(
                black_box("Col 285 Sector AB-C d12-34 A 1 a"),
                black_box(SYSTEM),
                Some("A 1 a"),
                false,
            )
        })
    });
}

criterion_group!(benches, bench_decompose, bench_custom_name);
criterion_main!(benches);
