use criterion::{black_box, criterion_group, criterion_main, Criterion};
use knot_core::rng::RngHandle;
use knot_graph::{build_link_diagram, resolve_crossing, Smoothing};

fn resolve_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(42);
    let diagram = build_link_diagram(8, &mut rng).unwrap();
    let target = diagram.crossings()[0];
    c.bench_function("resolve_vertical_8", |b| {
        b.iter(|| black_box(resolve_crossing(&diagram, target, Smoothing::Vertical).unwrap()));
    });
    c.bench_function("resolve_all_8", |b| {
        b.iter(|| {
            let mut current = diagram.clone();
            while let Some(&next) = current.crossings().first() {
                current = resolve_crossing(&current, next, Smoothing::Horizontal).unwrap();
            }
            black_box(current.free_loops())
        });
    });
}

criterion_group!(benches, resolve_bench);
criterion_main!(benches);
