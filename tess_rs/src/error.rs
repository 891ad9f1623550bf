//! Error types for tess_rs operations.

use tess_core::CoreError;
use tess_grid::GridError;
use thiserror::Error;

/// Errors that can occur while running a kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Invalid shape, out-of-range tap or schedule that breaks the dependency order.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Grid allocation or seeding failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The worker pool for a parallel run could not be built.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    /// A sweep was configured with no traversal to compare against the baseline.
    #[error("sweep has no loop orders or no tile sizes")]
    EmptySweep,
}

/// Result type alias for tess_rs operations.
pub type Result<T> = std::result::Result<T, EngineError>;
