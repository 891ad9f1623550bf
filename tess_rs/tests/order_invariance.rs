//! Blocked traversals against the naive order.
//!
//! A traversal that respects a rule's predecessors gives exactly the naive
//! result for rules that read nothing else. The min-plus cross term also reads
//! `(i,k,j)` and `(k,j,i)`, so for that rule exact agreement is checked on the
//! traversals that reproduce the naive read state, and on seeds that are fixed
//! points of the recurrence.

use tess_core::{
    verify_visit_order, Axis, Coord3, CoreError, Extent3, LoopOrder, LoopVar, MinPlusRelaxation,
    NeighborAverage, TileShape, Traversal,
};
use tess_grid::{init, Filter3D, Grid3D, InitRule};
use tess_rs::{ConvolutionUpdater, RelaxationUpdater, TiledTraversal, VerifyMode};

// =============================================================================
// Helpers
// =============================================================================

fn scatter(extent: Extent3, modulus: usize) -> Grid3D<i64> {
    InitRule::Scatter { modulus }.grid(extent).unwrap()
}

fn min_plus(seed: &Grid3D<i64>, traversal: TiledTraversal) -> Grid3D<i64> {
    let mut grid = seed.clone();
    RelaxationUpdater::min_plus().run(&mut grid, &traversal).unwrap();
    grid
}

fn neighbor_average(seed: &Grid3D<i64>, traversal: TiledTraversal) -> Grid3D<i64> {
    let mut grid = seed.clone();
    RelaxationUpdater::neighbor_average()
        .run(&mut grid, &traversal)
        .unwrap();
    grid
}

fn assert_same(expected: &Grid3D<i64>, got: &Grid3D<i64>, label: &str) {
    if let Some((c, want, have)) = expected.first_difference(got).unwrap() {
        panic!("{}: cell {} expected {} got {}", label, c, want, have);
    }
}

// =============================================================================
// Min-plus relaxation
// =============================================================================

#[test]
fn tile_size_independence_16() {
    let extent = Extent3::cube(16).unwrap();
    let seed = scatter(extent, 31);
    let naive = min_plus(&seed, TiledTraversal::naive());
    assert_ne!(naive, seed, "seed should exercise the recurrence");

    for b in [1, 3, 16] {
        let blocked = min_plus(&seed, TiledTraversal::cubic(b).unwrap());
        assert_same(&naive, &blocked, &format!("B={}", b));
    }
}

#[test]
fn tile_size_independence_other_edges() {
    let extent = Extent3::new(12, 12, 12).unwrap();
    let seed = scatter(extent, 17);
    let naive = min_plus(&seed, TiledTraversal::naive());
    for b in [2, 4, 5, 7, 11, 12, 40] {
        let blocked = min_plus(&seed, TiledTraversal::cubic(b).unwrap());
        assert_same(&naive, &blocked, &format!("B={}", b));
    }
}

#[test]
fn interleaved_order_reproduces_naive_for_any_tile() {
    let extent = Extent3::new(9, 10, 11).unwrap();
    let seed = scatter(extent, 13);
    let naive = min_plus(&seed, TiledTraversal::naive());
    let tile = TileShape::new(2, 3, 5).unwrap();
    let traversal = Traversal::blocked(tile, LoopOrder::INTERLEAVED);
    assert!(traversal.reproduces_naive_reads());
    assert_same(&naive, &min_plus(&seed, traversal.into()), "interleaved");
}

#[test]
fn linear_seed_is_fixed_under_every_order() {
    // 3i + 2j + k + 4: every candidate sum is at least the seed value.
    let extent = Extent3::cube(8).unwrap();
    let seed = Grid3D::from_fn(extent, |c| (3 * c.i + 2 * c.j + c.k + 4) as i64).unwrap();
    for order in LoopOrder::all_legal() {
        for tile in [TileShape::cubic(3).unwrap(), TileShape::new(2, 5, 3).unwrap()] {
            let mut grid = seed.clone();
            let stats = RelaxationUpdater::min_plus()
                .run(&mut grid, &TiledTraversal::blocked(tile, order))
                .unwrap();
            assert_eq!(stats.cells_updated, 0, "order {} tile {}", order, tile);
            assert_eq!(grid, seed);
        }
    }
}

#[test]
fn every_legal_order_respects_min_plus_predecessors() {
    let extent = Extent3::new(7, 8, 9).unwrap();
    for order in LoopOrder::all_legal() {
        let driver = TiledTraversal::blocked(TileShape::new(3, 2, 4).unwrap(), order)
            .with_verify(VerifyMode::Always);
        assert_eq!(driver.check(extent, &MinPlusRelaxation), Ok(()), "order {}", order);
    }
}

#[test]
fn divergent_orders_are_flagged() {
    // Any order whose result differs from naive must clear naive_equivalent.
    let extent = Extent3::cube(10).unwrap();
    let seed = scatter(extent, 31);
    let naive = min_plus(&seed, TiledTraversal::naive());
    let tile = TileShape::cubic(3).unwrap();

    let mut divergent = 0;
    for order in LoopOrder::all_legal() {
        let traversal = Traversal::blocked(tile, order);
        let mut grid = seed.clone();
        let stats = RelaxationUpdater::min_plus()
            .run(&mut grid, &TiledTraversal::from(traversal))
            .unwrap();
        assert_eq!(stats.naive_equivalent, traversal.reproduces_naive_reads(), "order {}", order);
        if grid != naive {
            divergent += 1;
            assert!(!stats.naive_equivalent, "order {} diverged without the flag", order);
        }
    }
    assert!(divergent > 0, "seed should expose cross-term order dependence");
}

// =============================================================================
// Neighbour average
// =============================================================================

#[test]
fn neighbor_average_every_order_matches_naive() {
    let extent = Extent3::new(9, 10, 11).unwrap();
    let seed = scatter(extent, 97);
    let naive = neighbor_average(&seed, TiledTraversal::naive());
    for order in LoopOrder::all_legal() {
        for tile in [TileShape::cubic(4).unwrap(), TileShape::new(2, 3, 5).unwrap()] {
            let blocked = neighbor_average(&seed, TiledTraversal::blocked(tile, order));
            assert_same(&naive, &blocked, &format!("{}_T{}", order, tile));
        }
    }
}

// =============================================================================
// Convolution
// =============================================================================

#[test]
fn convolution_order_is_irrelevant() {
    let extent = Extent3::new(7, 9, 8).unwrap();
    let input: Grid3D<f32> = init::modular_ramp(extent).unwrap();
    let filter: Filter3D<f32> = init::filter_ramp(Extent3::cube(3).unwrap()).unwrap();
    let updater = ConvolutionUpdater::default();

    let mut naive = Grid3D::zeros(extent).unwrap();
    updater
        .run(&input, &filter, &mut naive, &TiledTraversal::naive())
        .unwrap();

    for order in LoopOrder::all_legal() {
        let mut blocked = Grid3D::zeros(extent).unwrap();
        let traversal = TiledTraversal::blocked(TileShape::new(2, 3, 5).unwrap(), order);
        updater.run(&input, &filter, &mut blocked, &traversal).unwrap();
        assert_eq!(naive.first_difference(&blocked).unwrap(), None, "order {}", order);
    }
}

// =============================================================================
// Illegal schedules are rejected
// =============================================================================

#[test]
fn point_loop_outside_its_tile_loop_is_illegal() {
    let vars = [
        LoopVar::Point(Axis::I),
        LoopVar::Tile(Axis::I),
        LoopVar::Tile(Axis::J),
        LoopVar::Point(Axis::J),
        LoopVar::Tile(Axis::K),
        LoopVar::Point(Axis::K),
    ];
    assert!(matches!(
        LoopOrder::new(vars),
        Err(CoreError::IllegalLoopOrder { .. })
    ));
}

#[test]
fn descending_sequence_is_rejected() {
    let extent = Extent3::cube(6).unwrap();
    let mut visits: Vec<Coord3> = (0..extent.len()).map(|idx| extent.coord(idx)).collect();
    visits.reverse();
    let err = verify_visit_order(extent, &MinPlusRelaxation, visits).unwrap_err();
    assert!(matches!(err, CoreError::DependencyViolation { .. }));

    // Tiles walked back to front along k break the (0,0,1) dependency.
    let mut visits = Vec::new();
    for kt in [3, 0] {
        for i in 0..6 {
            for j in 0..6 {
                for k in kt..kt + 3 {
                    visits.push(Coord3::new(i, j, k));
                }
            }
        }
    }
    assert_eq!(
        verify_visit_order(extent, &NeighborAverage, visits),
        Err(CoreError::DependencyViolation {
            cell: Coord3::new(1, 1, 3),
            predecessor: Coord3::new(1, 1, 2),
        })
    );
}
