//! Error types for tess_core operations.
//!
//! Provides a simple error enum with no external dependencies for no_std compatibility.

use core::fmt;

use crate::types::{Axis, Coord3, Extent3};

/// Error types that can occur during tess_core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// A grid or filter extent was zero.
    InvalidDimension {
        /// The offending axis.
        axis: Axis,
        /// The value supplied.
        value: usize,
    },
    /// The total cell count `D * H * W` does not fit in `usize`.
    ExtentOverflow {
        /// Requested depth.
        depth: usize,
        /// Requested height.
        height: usize,
        /// Requested width.
        width: usize,
    },
    /// A tile edge length was zero.
    InvalidTileSize {
        /// The offending axis.
        axis: Axis,
        /// The value supplied.
        value: usize,
    },
    /// A coordinate fell outside the grid under the strict boundary policy.
    OutOfRange {
        /// Depth index.
        i: isize,
        /// Height index.
        j: isize,
        /// Width index.
        k: isize,
        /// The grid extent the coordinate was checked against.
        extent: Extent3,
    },
    /// The axis-permutation term `(i,k,j)` / `(k,j,i)` leaves the grid for an interior cell.
    CrossTermOutOfRange {
        /// The interior cell whose permuted coordinates are out of range.
        cell: Coord3,
        /// The grid extent.
        extent: Extent3,
    },
    /// Two grids that must agree in shape do not.
    ShapeMismatch {
        /// The expected extent.
        expected: Extent3,
        /// The extent found.
        got: Extent3,
    },
    /// A loop order is not a legal interleaving of tile and point loops.
    IllegalLoopOrder {
        /// Why the order was rejected.
        reason: &'static str,
    },
    /// A cell was visited before one of the cells it depends on.
    DependencyViolation {
        /// The cell being updated.
        cell: Coord3,
        /// The predecessor that had not been visited yet.
        predecessor: Coord3,
    },
    /// A cell was visited more than once in a single pass.
    DuplicateVisit {
        /// The cell visited twice.
        cell: Coord3,
    },
    /// A pass finished without visiting every cell.
    IncompleteCoverage {
        /// Number of distinct cells visited.
        visited: usize,
        /// Number of cells in the grid.
        expected: usize,
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidDimension { axis, value } => {
                write!(f, "invalid extent {} along axis {}", value, axis.name())
            }
            CoreError::ExtentOverflow {
                depth,
                height,
                width,
            } => {
                write!(
                    f,
                    "cell count of {}x{}x{} overflows usize",
                    depth, height, width
                )
            }
            CoreError::InvalidTileSize { axis, value } => {
                write!(f, "invalid tile size {} along axis {}", value, axis.name())
            }
            CoreError::OutOfRange { i, j, k, extent } => {
                write!(
                    f,
                    "coordinate ({}, {}, {}) is outside grid {}",
                    i, j, k, extent
                )
            }
            CoreError::CrossTermOutOfRange { cell, extent } => {
                write!(
                    f,
                    "permuted coordinates of interior cell {} fall outside grid {}",
                    cell, extent
                )
            }
            CoreError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {}, got {}", expected, got)
            }
            CoreError::IllegalLoopOrder { reason } => {
                write!(f, "illegal loop order: {}", reason)
            }
            CoreError::DependencyViolation { cell, predecessor } => {
                write!(
                    f,
                    "cell {} visited before its predecessor {}",
                    cell, predecessor
                )
            }
            CoreError::DuplicateVisit { cell } => {
                write!(f, "cell {} visited more than once", cell)
            }
            CoreError::IncompleteCoverage { visited, expected } => {
                write!(
                    f,
                    "incomplete coverage: visited {} of {} cells",
                    visited, expected
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "std")]
    #[test]
    fn test_error_display() {
        use std::format;

        let err = CoreError::InvalidDimension {
            axis: Axis::K,
            value: 0,
        };
        assert_eq!(format!("{}", err), "invalid extent 0 along axis k");

        let err = CoreError::DependencyViolation {
            cell: Coord3::new(1, 1, 1),
            predecessor: Coord3::new(0, 1, 1),
        };
        assert_eq!(
            format!("{}", err),
            "cell (1, 1, 1) visited before its predecessor (0, 1, 1)"
        );

        let err = CoreError::IncompleteCoverage {
            visited: 3,
            expected: 8,
        };
        assert_eq!(format!("{}", err), "incomplete coverage: visited 3 of 8 cells");
    }

    #[test]
    fn test_error_equality() {
        let a = CoreError::DuplicateVisit {
            cell: Coord3::new(0, 0, 0),
        };
        let b = CoreError::DuplicateVisit {
            cell: Coord3::new(0, 0, 0),
        };
        let c = CoreError::DuplicateVisit {
            cell: Coord3::new(0, 0, 1),
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
