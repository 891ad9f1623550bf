//! Criterion benchmarks for tess_rs kernels under different traversals.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tess_core::{Extent3, LoopOrder, TileShape};
use tess_grid::{init, Filter3D, Grid3D};
use tess_rs::{ConvolutionUpdater, RelaxationUpdater, TiledTraversal, VerifyMode};

const EDGE: usize = 96;

fn traversals() -> Vec<TiledTraversal> {
    let mut out = vec![TiledTraversal::naive()];
    for b in [8, 16, 32] {
        out.push(TiledTraversal::cubic(b).unwrap());
    }
    // k_t j_t i_t i j k: tiles walked with k outermost
    let reversed_tiles: LoopOrder = "k_t j_t i_t i j k".parse().unwrap();
    out.push(TiledTraversal::blocked(TileShape::cubic(16).unwrap(), reversed_tiles));
    out.into_iter()
        .map(|t| t.with_verify(VerifyMode::Never))
        .collect()
}

fn bench_min_plus(c: &mut Criterion) {
    let extent = Extent3::cube(EDGE).unwrap();
    let seed: Grid3D<i32> = init::linear_sum(extent).unwrap();
    let updater = RelaxationUpdater::min_plus();

    let mut group = c.benchmark_group("min_plus");
    group.throughput(Throughput::Elements(extent.len() as u64));
    group.sample_size(20);

    for traversal in traversals() {
        group.bench_with_input(
            BenchmarkId::from_parameter(traversal),
            &traversal,
            |b, traversal| {
                b.iter_batched_ref(
                    || seed.clone(),
                    |grid| black_box(updater.run(grid, traversal).unwrap()),
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }
    group.finish();
}

fn bench_neighbor_average(c: &mut Criterion) {
    let extent = Extent3::cube(EDGE).unwrap();
    let seed: Grid3D<i32> = init::linear_sum(extent).unwrap();
    let updater = RelaxationUpdater::neighbor_average();

    let mut group = c.benchmark_group("neighbor_average");
    group.throughput(Throughput::Elements(extent.len() as u64));
    group.sample_size(20);

    for traversal in traversals() {
        group.bench_with_input(
            BenchmarkId::from_parameter(traversal),
            &traversal,
            |b, traversal| {
                b.iter_batched_ref(
                    || seed.clone(),
                    |grid| black_box(updater.run(grid, traversal).unwrap()),
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }
    group.finish();
}

fn bench_convolution(c: &mut Criterion) {
    let extent = Extent3::cube(EDGE).unwrap();
    let input: Grid3D<f32> = init::modular_ramp(extent).unwrap();
    let filter: Filter3D<f32> = init::filter_ramp(Extent3::cube(3).unwrap()).unwrap();
    let updater = ConvolutionUpdater::default();
    let mut output = Grid3D::zeros(extent).unwrap();

    let mut group = c.benchmark_group("convolution");
    group.throughput(Throughput::Elements(extent.len() as u64));
    group.sample_size(20);

    for traversal in traversals() {
        group.bench_with_input(
            BenchmarkId::from_parameter(traversal),
            &traversal,
            |b, traversal| {
                b.iter(|| black_box(updater.run(&input, &filter, &mut output, traversal).unwrap()))
            },
        );
    }

    #[cfg(feature = "parallel")]
    group.bench_function("parallel", |b| {
        b.iter(|| black_box(updater.run_parallel(&input, &filter, &mut output).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_min_plus, bench_neighbor_average, bench_convolution);
criterion_main!(benches);
