//! Boundary condition tests for tess_rs.
//!
//! These tests exercise grid faces, corners and degenerate extents: zero
//! padding against an explicitly padded reference, the interior margin of the
//! relaxation, out-of-range access and shapes the cross term cannot address.

use tess_core::{BoundaryPolicy, Coord3, CoreError, Extent3, TileShape};
use tess_grid::{init, Filter3D, Grid3D, GridError, InitRule};
use tess_rs::{ConvolutionUpdater, EngineError, RelaxationUpdater, TiledTraversal};

// =============================================================================
// Test Grid Factories
// =============================================================================

/// Copy `grid` into the centre of a grid two cells larger on every axis, with
/// a zero border of width 1.
fn zero_padded(grid: &Grid3D<f64>) -> Grid3D<f64> {
    let [d, h, w] = grid.extent().as_array();
    let padded = Extent3::new(d + 2, h + 2, w + 2).unwrap();
    let mut out = Grid3D::zeros(padded).unwrap();
    for (c, v) in grid.cells() {
        out[(c.i + 1, c.j + 1, c.k + 1)] = v;
    }
    out
}

/// Convolution without any boundary logic, reading the padded copy.
fn padded_reference(padded: &Grid3D<f64>, filter: &Filter3D<f64>, c: Coord3) -> f64 {
    let mut acc = 0.0;
    for fd in 0..3 {
        for fh in 0..3 {
            for fw in 0..3 {
                acc += padded[(c.i + fd, c.j + fh, c.k + fw)] * filter[(fd, fh, fw)];
            }
        }
    }
    acc.max(0.0) + 0.1 * padded[(c.i + 1, c.j + 1, c.k + 1)]
}

/// Filter with weights of both signs.
fn signed_filter() -> Filter3D<f64> {
    Filter3D::from_fn(Extent3::cube(3).unwrap(), |c| {
        ((c.i * 9 + c.j * 3 + c.k) as f64 - 13.0) * 0.05
    })
    .unwrap()
}

// =============================================================================
// Zero Padding
// =============================================================================

#[test]
fn test_zero_padding_matches_padded_reference() {
    let extent = Extent3::new(4, 5, 6).unwrap();
    let input: Grid3D<f64> = init::modular_ramp(extent).unwrap();
    let filter: Filter3D<f64> = init::filter_ramp(Extent3::cube(3).unwrap()).unwrap();
    let mut output = Grid3D::zeros(extent).unwrap();
    ConvolutionUpdater::default()
        .run(&input, &filter, &mut output, &TiledTraversal::naive())
        .unwrap();

    let padded = zero_padded(&input);
    for (c, v) in output.cells() {
        let expected = padded_reference(&padded, &filter, c);
        assert!((v - expected).abs() < 1e-12, "cell {}: {} vs {}", c, v, expected);
    }
}

#[test]
fn test_corner_uses_eight_taps() {
    let extent = Extent3::cube(4).unwrap();
    let input: Grid3D<f64> = Grid3D::filled(extent, 1.0).unwrap();
    let filter: Filter3D<f64> = Filter3D::from_fn(Extent3::cube(3).unwrap(), |_| 1.0).unwrap();
    let mut output = Grid3D::zeros(extent).unwrap();
    ConvolutionUpdater::default()
        .with_residual_scale(0.0)
        .run(&input, &filter, &mut output, &TiledTraversal::naive())
        .unwrap();

    for corner in [Coord3::new(0, 0, 0), Coord3::new(3, 0, 3), extent.far_corner()] {
        assert_eq!(output[corner], 8.0, "corner {}", corner);
    }
    assert_eq!(output[(1, 1, 1)], 27.0);
    assert_eq!(output[(0, 1, 1)], 18.0);
    assert_eq!(output[(0, 0, 1)], 12.0);
}

#[test]
fn test_single_cell_grid() {
    let extent = Extent3::cube(1).unwrap();
    let input: Grid3D<f64> = Grid3D::filled(extent, 2.0).unwrap();
    let filter: Filter3D<f64> = init::filter_ramp(Extent3::cube(3).unwrap()).unwrap();
    let mut output = Grid3D::zeros(extent).unwrap();
    ConvolutionUpdater::default()
        .run(&input, &filter, &mut output, &TiledTraversal::cubic(4).unwrap())
        .unwrap();
    // Only the centre tap (weight 3 mod 5 * 0.05) lands inside.
    assert!((output[(0, 0, 0)] - (2.0 * 0.15 + 0.2)).abs() < 1e-12);
}

#[test]
fn test_strict_boundary_rejects_overhang() {
    let extent = Extent3::cube(4).unwrap();
    let input: Grid3D<f64> = Grid3D::filled(extent, 1.0).unwrap();
    let filter: Filter3D<f64> = Filter3D::identity(3, 3, 3).unwrap();
    let mut output = Grid3D::zeros(extent).unwrap();
    let result = ConvolutionUpdater::default()
        .with_boundary(BoundaryPolicy::Strict)
        .run(&input, &filter, &mut output, &TiledTraversal::naive());
    assert!(matches!(
        result,
        Err(EngineError::Core(CoreError::OutOfRange { i: -1, .. }))
    ));
}

// =============================================================================
// ReLU Floor
// =============================================================================

#[test]
fn test_relu_floor_on_faces_and_interior() {
    let extent = Extent3::cube(6).unwrap();
    let input: Grid3D<f64> = init::modular_ramp(extent).unwrap();
    let filter = signed_filter();
    let mut output = Grid3D::zeros(extent).unwrap();
    ConvolutionUpdater::default()
        .run(&input, &filter, &mut output, &TiledTraversal::cubic(4).unwrap())
        .unwrap();

    let mut clamped = 0;
    for (c, v) in output.cells() {
        let pre_residual = v - 0.1 * input[c];
        assert!(pre_residual >= -1e-12, "cell {}: {}", c, pre_residual);
        if pre_residual.abs() < 1e-12 {
            clamped += 1;
        }
    }
    assert!(clamped > 0, "signed filter should clamp some cells");
}

// =============================================================================
// Relaxation Margin
// =============================================================================

#[test]
fn test_grids_without_interior_are_untouched() {
    for (d, h, w) in [(4, 4, 4), (1, 9, 9), (9, 4, 9), (3, 3, 30)] {
        let extent = Extent3::new(d, h, w).unwrap();
        let mut grid: Grid3D<i32> = Grid3D::filled(extent, 1000).unwrap();
        grid[(0, 0, 0)] = 0;
        let seed = grid.clone();
        let stats = RelaxationUpdater::min_plus()
            .run(&mut grid, &TiledTraversal::cubic(2).unwrap())
            .unwrap();
        assert_eq!(stats.cells_updated, 0, "extent {}", extent);
        assert_eq!(stats.cells_visited, extent.len());
        assert_eq!(grid, seed);
    }
}

#[test]
fn test_margin_cells_are_never_written() {
    let extent = Extent3::cube(7).unwrap();
    let mut grid: Grid3D<i32> = Grid3D::filled(extent, 50).unwrap();
    // Low values on the boundary shell feed the interior but must not change.
    for (c, v) in grid.clone().cells() {
        if !extent.is_interior(c, 2) {
            grid[c] = v / 10 + (c.i + c.j + c.k) as i32;
        }
    }
    let seed = grid.clone();
    RelaxationUpdater::min_plus()
        .run(&mut grid, &TiledTraversal::naive())
        .unwrap();
    for (c, v) in grid.cells() {
        if extent.is_interior(c, 2) {
            assert!(v <= seed[c]);
        } else {
            assert_eq!(v, seed[c], "boundary cell {} changed", c);
        }
    }
}

#[test]
fn test_cross_term_out_of_range_shape() {
    let extent = Extent3::new(5, 5, 12).unwrap();
    let mut grid: Grid3D<i32> = init::linear_sum(extent).unwrap();
    let result = RelaxationUpdater::min_plus().run(&mut grid, &TiledTraversal::naive());
    assert_eq!(
        result,
        Err(EngineError::Core(CoreError::CrossTermOutOfRange {
            cell: Coord3::new(2, 2, 9),
            extent
        }))
    );
}

#[test]
fn test_non_cubic_grid_within_cross_term_range() {
    // The last interior cell (5,5,3) reads (5,3,5) and (3,5,5).
    let extent = Extent3::new(8, 8, 6).unwrap();
    let mut grid: Grid3D<i32> = init::linear_sum(extent).unwrap();
    let stats = RelaxationUpdater::min_plus()
        .run(&mut grid, &TiledTraversal::naive())
        .unwrap();
    assert_eq!(stats.cells_updated, 0);
}

// =============================================================================
// Value Range
// =============================================================================

#[test]
fn test_min_plus_large_i32_seed_keeps_value() {
    // Every candidate sum exceeds i32::MAX and must not wrap below the seed.
    let extent = Extent3::cube(5).unwrap();
    let mut grid: Grid3D<i32> = InitRule::Constant(2_000_000_000.0).grid(extent).unwrap();
    let stats = RelaxationUpdater::min_plus()
        .run(&mut grid, &TiledTraversal::naive())
        .unwrap();
    assert_eq!(grid[(2, 2, 2)], 2_000_000_000);
    assert_eq!(stats.cells_updated, 0);
    assert!(grid.as_slice().iter().all(|&v| v == 2_000_000_000));
}

#[test]
fn test_min_plus_large_i32_seed_under_blocked_order() {
    let extent = Extent3::cube(7).unwrap();
    let mut grid: Grid3D<i32> = InitRule::Constant(i32::MAX as f64).grid(extent).unwrap();
    grid[(1, 2, 2)] = 5;
    grid[(2, 1, 2)] = 6;
    RelaxationUpdater::min_plus()
        .run(&mut grid, &TiledTraversal::cubic(2).unwrap())
        .unwrap();
    assert_eq!(grid[(2, 2, 2)], 11);
    assert!(grid.as_slice().iter().all(|&v| v > 0));
}

#[test]
fn test_neighbor_average_large_i32_seed() {
    let extent = Extent3::cube(3).unwrap();
    let mut grid: Grid3D<i32> = InitRule::Constant(2_000_000_000.0).grid(extent).unwrap();
    RelaxationUpdater::neighbor_average()
        .run(&mut grid, &TiledTraversal::naive())
        .unwrap();
    // The sum saturates at i32::MAX before the division.
    assert_eq!(grid[(1, 1, 1)], i32::MAX / 3);
    assert!(grid.as_slice().iter().all(|&v| v > 0));
}

// =============================================================================
// Invalid Construction and Access
// =============================================================================

#[test]
fn test_invalid_dimensions() {
    assert!(matches!(
        Grid3D::<i32>::new(0, 4, 4),
        Err(GridError::Core(CoreError::InvalidDimension { .. }))
    ));
    assert!(matches!(
        Filter3D::<f32>::new(3, 3, 0),
        Err(GridError::Core(CoreError::InvalidDimension { .. }))
    ));
    assert!(TileShape::cubic(0).is_err());
    assert!(TiledTraversal::cubic(0).is_err());
}

#[test]
#[should_panic(expected = "outside grid")]
fn test_get_out_of_range_panics() {
    let grid: Grid3D<i32> = Grid3D::new(3, 3, 3).unwrap();
    grid.get(Coord3::new(3, 0, 0));
}

#[test]
#[should_panic(expected = "outside grid")]
fn test_index_out_of_range_panics() {
    let mut grid: Grid3D<i32> = Grid3D::new(3, 3, 3).unwrap();
    grid[(0, 3, 0)] = 1;
}

#[test]
fn test_try_access_reports_out_of_range() {
    let mut grid: Grid3D<i32> = Grid3D::new(3, 3, 3).unwrap();
    assert!(matches!(
        grid.try_get(0, 0, -1),
        Err(GridError::Core(CoreError::OutOfRange { k: -1, .. }))
    ));
    assert!(grid.try_set(3, 0, 0, 1).is_err());
    assert_eq!(grid.try_get(2, 2, 2), Ok(0));
}
