//! Error types for tess_grid operations.

use tess_core::{CoreError, Extent3};
use thiserror::Error;

/// Errors that can occur while building or addressing grids.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Invalid extent, out-of-range access or other core contract violation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The backing buffer could not be allocated.
    #[error("failed to allocate {cells} cells for grid {extent}")]
    AllocationFailed {
        /// Requested number of cells.
        cells: usize,
        /// Requested extent.
        extent: Extent3,
    },

    /// A buffer handed to `from_vec` has the wrong number of cells.
    #[error("buffer holds {got} cells but the extent needs {expected}")]
    LengthMismatch {
        /// Cells required by the extent.
        expected: usize,
        /// Cells supplied.
        got: usize,
    },

    /// Filter extents must be odd so the filter has a centre tap.
    #[error("filter extent {extent} must be odd along every axis")]
    EvenFilter {
        /// The rejected extent.
        extent: Extent3,
    },

    /// A seed value could not be represented in the cell type.
    #[error("seed value {value} at {cell} does not fit the cell type")]
    SeedOverflow {
        /// The offending coordinate.
        cell: tess_core::Coord3,
        /// The value that failed to convert.
        value: f64,
    },
}

/// Result type alias for tess_grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
