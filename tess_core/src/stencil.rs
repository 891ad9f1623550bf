//! In-place, dependency-ordered stencil rules.
//!
//! A stencil rewrites one cell from values that earlier visits of the same
//! pass may already have rewritten. Each rule therefore publishes its
//! *dependency pattern*: the backward offsets it reads and the predicate that
//! selects the cells it updates. A traversal is valid for a rule when every
//! predecessor of an active cell is visited before that cell
//! (see [`verify`](crate::verify)).

use crate::error::CoreError;
use crate::scalar::Scalar;
use crate::traits::CellSink;
use crate::types::{Coord3, Extent3};

/// The dependency pattern of an in-place rule.
pub trait Dependency {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Backward offsets `(di, dj, dk)` this rule reads; each reads `(i-di, j-dj, k-dk)`.
    fn predecessors(&self) -> &'static [(usize, usize, usize)];

    /// Whether the rule updates cell `c`. Cells outside this predicate are
    /// never written.
    fn is_active(&self, extent: Extent3, c: Coord3) -> bool;

    /// Whether the rule also reads cells that are not predecessors. Such reads
    /// see whatever the traversal has written so far, so only traversals that
    /// reproduce the naive read state give naive results.
    fn reads_beyond_predecessors(&self) -> bool {
        false
    }
}

/// A rule that rewrites active cells in place.
pub trait InPlaceStencil<T: Scalar>: Dependency {
    /// Reject extents on which the rule would read outside the grid.
    ///
    /// # Errors
    /// Rule specific; see implementors.
    fn validate(&self, extent: Extent3) -> Result<(), CoreError> {
        let _ = extent;
        Ok(())
    }

    /// Rewrite active cell `c`. Returns true if the stored value changed.
    fn update<G: CellSink<T>>(&self, grid: &mut G, c: Coord3) -> bool;
}

/// Minimum-plus relaxation over cells at least two cells from every face.
///
/// For interior cell `(i, j, k)`:
///
/// ```text
/// c1 = v(i, j, k)
/// c2 = v(i, k, j) + v(k, j, i)            axis-permutation cross term
/// c3 = v(i-1, j, k) + v(i, j-1, k)
/// c4 = v(i, j, k-1) + v(i-1, j-1, k-1)
/// v' = min(c1, c2, c3, c4)
/// v' = min(v', v(i-1, j, k) + v(i, j-1, k))
/// v' = min(v', v(i, j-1, k) + v(i, j, k-1))
/// v' = min(v', v(i-1, j, k) + v(i, j, k-1))
/// ```
///
/// The cross term reads cells that are not predecessors; whatever value they
/// hold at the time of the visit is used. It is kept exactly as stated.
///
/// Every sum saturates at the cell type's bounds, so large integer seeds can
/// never undercut the current value by wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinPlusRelaxation;

impl MinPlusRelaxation {
    /// Distance from every face an updated cell must keep.
    pub const MARGIN: usize = 2;

    const PREDECESSORS: [(usize, usize, usize); 4] = [(1, 0, 0), (0, 1, 0), (0, 0, 1), (1, 1, 1)];
}

impl Dependency for MinPlusRelaxation {
    fn name(&self) -> &'static str {
        "min_plus"
    }

    fn predecessors(&self) -> &'static [(usize, usize, usize)] {
        &Self::PREDECESSORS
    }

    #[inline]
    fn is_active(&self, extent: Extent3, c: Coord3) -> bool {
        extent.is_interior(c, Self::MARGIN)
    }

    fn reads_beyond_predecessors(&self) -> bool {
        true
    }
}

impl<T: Scalar> InPlaceStencil<T> for MinPlusRelaxation {
    /// The cross term reads `(i, k, j)` and `(k, j, i)`; both must stay in
    /// range for every interior cell. Coordinates are monotone in `(i, j, k)`,
    /// so checking the last interior cell is enough.
    fn validate(&self, extent: Extent3) -> Result<(), CoreError> {
        let m = Self::MARGIN;
        let [d, h, w] = extent.as_array();
        if d <= 2 * m || h <= 2 * m || w <= 2 * m {
            // No interior cells, nothing is read.
            return Ok(());
        }
        let last = Coord3::new(d - 1 - m, h - 1 - m, w - 1 - m);
        let swapped_jk = extent.contains_coord(Coord3::new(last.i, last.k, last.j));
        let swapped_ik = extent.contains_coord(Coord3::new(last.k, last.j, last.i));
        if swapped_jk && swapped_ik {
            Ok(())
        } else {
            Err(CoreError::CrossTermOutOfRange { cell: last, extent })
        }
    }

    #[inline]
    fn update<G: CellSink<T>>(&self, grid: &mut G, c: Coord3) -> bool {
        let Coord3 { i, j, k } = c;

        let current = grid.cell(c);
        let cross = T::sum_of(grid.cell(Coord3::new(i, k, j)), grid.cell(Coord3::new(k, j, i)));
        let up_i = grid.cell(Coord3::new(i - 1, j, k));
        let up_j = grid.cell(Coord3::new(i, j - 1, k));
        let up_k = grid.cell(Coord3::new(i, j, k - 1));
        let diagonal = grid.cell(Coord3::new(i - 1, j - 1, k - 1));

        let mut value = T::min_of(
            T::min_of(current, cross),
            T::min_of(T::sum_of(up_i, up_j), T::sum_of(up_k, diagonal)),
        );

        // The margin keeps every guard (i > 0, j > 0, k > 0) of the chain true.
        value = T::min_of(value, T::sum_of(up_i, up_j));
        value = T::min_of(value, T::sum_of(up_j, up_k));
        value = T::min_of(value, T::sum_of(up_i, up_k));

        grid.set_cell(c, value);
        value < current
    }
}

/// Backward neighbour average: `v = (v(i-1,j,k) + v(i,j-1,k) + v(i,j,k-1)) / 3`
/// for every cell with `i, j, k > 0`.
///
/// Integer cells use truncating division. The sum saturates at the cell
/// type's bounds before dividing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborAverage;

impl NeighborAverage {
    const PREDECESSORS: [(usize, usize, usize); 3] = [(1, 0, 0), (0, 1, 0), (0, 0, 1)];
}

impl Dependency for NeighborAverage {
    fn name(&self) -> &'static str {
        "neighbor_average"
    }

    fn predecessors(&self) -> &'static [(usize, usize, usize)] {
        &Self::PREDECESSORS
    }

    #[inline]
    fn is_active(&self, _extent: Extent3, c: Coord3) -> bool {
        c.i > 0 && c.j > 0 && c.k > 0
    }
}

impl<T: Scalar> InPlaceStencil<T> for NeighborAverage {
    #[inline]
    fn update<G: CellSink<T>>(&self, grid: &mut G, c: Coord3) -> bool {
        let Coord3 { i, j, k } = c;
        let three = T::one() + T::one() + T::one();
        let sum = T::sum_of(
            T::sum_of(grid.cell(Coord3::new(i - 1, j, k)), grid.cell(Coord3::new(i, j - 1, k))),
            grid.cell(Coord3::new(i, j, k - 1)),
        );
        let value = sum / three;
        let changed = value != grid.cell(c);
        grid.set_cell(c, value);
        changed
    }
}
