//! In-place relaxation passes.

use instant::Instant;
use tess_core::{InPlaceStencil, MinPlusRelaxation, NeighborAverage, Scalar};
use tess_grid::Grid3D;
use tracing::{debug, debug_span, warn};

use crate::error::Result;
use crate::stats::RunStats;
use crate::traversal::TiledTraversal;

/// Runs one in-place pass of a stencil over a grid.
///
/// # Example
///
/// ```ignore
/// let mut grid: Grid3D<i32> = init::linear_sum(Extent3::cube(64)?)?;
/// let stats = RelaxationUpdater::min_plus().run(&mut grid, &TiledTraversal::cubic(16)?)?;
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelaxationUpdater<S> {
    stencil: S,
}

impl RelaxationUpdater<MinPlusRelaxation> {
    /// Updater for the min-plus recurrence.
    pub const fn min_plus() -> Self {
        Self::new(MinPlusRelaxation)
    }
}

impl RelaxationUpdater<NeighborAverage> {
    /// Updater for the backward neighbour average.
    pub const fn neighbor_average() -> Self {
        Self::new(NeighborAverage)
    }
}

impl<S> RelaxationUpdater<S> {
    /// Wrap a stencil.
    pub const fn new(stencil: S) -> Self {
        Self { stencil }
    }

    /// Rewrite every active cell of `grid` once, in the order of `traversal`.
    ///
    /// Shape validation and schedule verification happen before the first
    /// write, so an error leaves `grid` untouched.
    ///
    /// Rules that read beyond their predecessors (the min-plus cross term)
    /// only match the naive result under traversals that reproduce the naive
    /// read state. Any other traversal logs a warning and returns stats with
    /// `naive_equivalent` cleared.
    ///
    /// # Errors
    /// - `CrossTermOutOfRange` (min-plus) if some interior cell would read
    ///   outside the grid
    /// - `DependencyViolation` if verification is enabled and the traversal
    ///   visits a cell before one of its predecessors
    pub fn run<T: Scalar>(&self, grid: &mut Grid3D<T>, traversal: &TiledTraversal) -> Result<RunStats>
    where
        S: InPlaceStencil<T>,
    {
        let extent = grid.extent();
        let _span = debug_span!("relax", rule = self.stencil.name(), %extent, %traversal).entered();

        self.stencil.validate(extent)?;
        traversal.check(extent, &self.stencil)?;
        let naive_equivalent =
            !self.stencil.reads_beyond_predecessors() || traversal.traversal().reproduces_naive_reads();
        if !naive_equivalent {
            warn!(
                rule = self.stencil.name(),
                %traversal,
                "traversal does not reproduce naive reads; result may differ from the naive order"
            );
        }

        let stencil = &self.stencil;
        let mut cells_updated = 0;
        let start = Instant::now();
        let cells_visited = traversal.drive(extent, |c| {
            if stencil.is_active(extent, c) && stencil.update(&mut *grid, c) {
                cells_updated += 1;
            }
        });
        let stats = RunStats {
            cells_visited,
            cells_updated,
            elapsed: start.elapsed(),
            naive_equivalent,
        };

        debug!(
            cells_updated,
            elapsed_us = stats.elapsed.as_micros() as u64,
            "relaxation pass complete"
        );
        Ok(stats)
    }
}
