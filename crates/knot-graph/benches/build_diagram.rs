use criterion::{black_box, criterion_group, criterion_main, Criterion};
use knot_core::rng::RngHandle;
use knot_graph::{annotate_ports, build_link_diagram, is_valid_diagram, random_regular_multigraph};

fn build_diagram_bench(c: &mut Criterion) {
    c.bench_function("build_diagram_6", |b| {
        b.iter(|| {
            let mut rng = RngHandle::from_seed(42);
            let diagram = build_link_diagram(6, &mut rng).unwrap();
            black_box(diagram);
        });
    });
}

fn validate_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(7);
    let graph = random_regular_multigraph(200, 4, &mut rng).unwrap();
    let annotated = annotate_ports(&graph, &mut rng).unwrap();
    c.bench_function("validate_200", |b| {
        b.iter(|| black_box(is_valid_diagram(&annotated).unwrap()));
    });
}

criterion_group!(benches, build_diagram_bench, validate_bench);
criterion_main!(benches);
