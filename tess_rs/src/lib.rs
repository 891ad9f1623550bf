//! # tess_rs
//!
//! Runtime engine for single-pass kernels over dense 3D grids.
//!
//! This crate drives the rules of `tess_core` over the storage of
//! `tess_grid`. It is designed for:
//!
//! - **Correct reordering**: any blocked loop nesting can be checked against a
//!   rule's dependency pattern before the grid is mutated
//! - **Locality**: cubic or per-axis tiles with any of the 90 legal nestings
//! - **Measurement**: sweeps over nestings and tile sizes against the naive baseline
//!
//! ## Quick Start
//!
//! ```ignore
//! use tess_grid::{init, Extent3, Grid3D};
//! use tess_rs::{RelaxationUpdater, TiledTraversal};
//!
//! let extent = Extent3::cube(128)?;
//! let mut grid: Grid3D<i32> = init::linear_sum(extent)?;
//!
//! let stats = RelaxationUpdater::min_plus().run(&mut grid, &TiledTraversal::cubic(16)?)?;
//! println!("{}", stats);
//! println!("center = {}", grid[(64, 64, 64)]);
//! ```
//!
//! ## Architecture
//!
//! - [`TiledTraversal`] owns a schedule and decides when to verify it
//! - [`RelaxationUpdater`] rewrites a grid in place, one dependency-ordered pass
//! - [`ConvolutionUpdater`] writes a filtered copy; order never matters, so it
//!   can also run slab-parallel
//! - [`sweep`] times every `(nesting, tile size)` combination against the naive order
//!
//! ## Feature Flags
//!
//! - `parallel`: slab-parallel convolution via rayon
//! - `serde`: serialization of sweep reports

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod convolution;
pub mod error;
pub mod relaxation;
pub mod stats;
pub mod sweep;
pub mod traversal;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::convolution::ConvolutionUpdater;
    pub use crate::error::{EngineError, Result};
    pub use crate::relaxation::RelaxationUpdater;
    pub use crate::stats::RunStats;
    pub use crate::sweep::{run_sweep, Kernel, SweepConfig, SweepRecord, SweepReport};
    pub use crate::traversal::{TiledTraversal, VerifyMode};
    pub use tess_core::prelude::*;
    pub use tess_grid::{init, Filter3D, Grid3D, InitRule};
}

pub use convolution::ConvolutionUpdater;
pub use error::{EngineError, Result};
pub use relaxation::RelaxationUpdater;
pub use stats::RunStats;
pub use sweep::{run_sweep, Kernel, SweepConfig, SweepRecord, SweepReport};
pub use traversal::{TiledTraversal, VerifyMode};
