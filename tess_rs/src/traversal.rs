//! Traversal driver shared by both updaters.

use std::fmt;

use tess_core::{Coord3, CoreError, Dependency, Extent3, LoopOrder, TileShape, Traversal};
use tracing::debug;

/// When a driver checks its schedule against a rule's dependency pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyMode {
    /// Check in builds with `debug_assertions` (tests, debug binaries).
    #[default]
    DebugOnly,
    /// Check before every run.
    Always,
    /// Never check.
    Never,
}

impl VerifyMode {
    /// Whether a check runs in this build.
    #[inline]
    pub fn enabled(self) -> bool {
        match self {
            VerifyMode::Always => true,
            VerifyMode::Never => false,
            VerifyMode::DebugOnly => cfg!(debug_assertions),
        }
    }
}

/// Drives an updater over every cell of a grid in the order of a [`Traversal`].
///
/// A blocked schedule whose loop nesting does not respect a rule's
/// predecessors produces wrong values without failing, so in-place updaters
/// call [`TiledTraversal::check`] before mutating anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TiledTraversal {
    traversal: Traversal,
    verify: VerifyMode,
}

impl TiledTraversal {
    /// Drive `traversal` with the default verification mode.
    pub const fn new(traversal: Traversal) -> Self {
        Self {
            traversal,
            verify: VerifyMode::DebugOnly,
        }
    }

    /// Row-major `i`, `j`, `k` loops.
    pub const fn naive() -> Self {
        Self::new(Traversal::Naive)
    }

    /// Blocked loops with the given tile and nesting.
    pub const fn blocked(tile: TileShape, order: LoopOrder) -> Self {
        Self::new(Traversal::blocked(tile, order))
    }

    /// Cubic tiles of edge `b` with the canonical nesting.
    ///
    /// # Errors
    /// Returns `InvalidTileSize` if `b` is zero.
    pub fn cubic(b: usize) -> Result<Self, CoreError> {
        Ok(Self::new(Traversal::cubic(b)?))
    }

    /// Override the verification mode.
    pub const fn with_verify(mut self, verify: VerifyMode) -> Self {
        self.verify = verify;
        self
    }

    /// The underlying schedule.
    #[inline]
    pub const fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// The verification mode.
    #[inline]
    pub const fn verify_mode(&self) -> VerifyMode {
        self.verify
    }

    /// Check the schedule against `rule` on `extent` if verification is enabled.
    ///
    /// # Errors
    /// Returns `DependencyViolation`, `DuplicateVisit` or `IncompleteCoverage`.
    pub fn check<D: Dependency + ?Sized>(&self, extent: Extent3, rule: &D) -> Result<(), CoreError> {
        if !self.verify.enabled() {
            return Ok(());
        }
        self.traversal.verify(extent, rule)?;
        debug!(
            traversal = %self.traversal,
            rule = rule.name(),
            extent = %extent,
            "schedule verified"
        );
        Ok(())
    }

    /// Call `f` once per cell of `extent`; returns the number of cells visited.
    #[inline]
    pub fn drive<F: FnMut(Coord3)>(&self, extent: Extent3, mut f: F) -> usize {
        let mut visited = 0;
        self.traversal.for_each(extent, |c| {
            visited += 1;
            f(c);
        });
        visited
    }
}

impl From<Traversal> for TiledTraversal {
    fn from(traversal: Traversal) -> Self {
        Self::new(traversal)
    }
}

impl fmt::Display for TiledTraversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.traversal, f)
    }
}
