//! tess_grid - dense storage for tess kernels.
//!
//! This crate owns the memory that `tess_core` rules read and write:
//!
//! - [`Grid3D<T>`]: a contiguous, row-major `D x H x W` buffer (`k` fastest)
//! - [`Filter3D<T>`]: a small odd-sized read-only weight grid
//! - [`GridConfig`] / [`FilterConfig`]: immutable construction parameters
//! - [`init`]: the seed rules used by the reference runs
//!
//! # Example
//!
//! ```ignore
//! use tess_grid::{init, Grid3D, GridConfig};
//!
//! let extent = GridConfig::new(64, 64, 64).extent()?;
//! let grid: Grid3D<i32> = init::linear_sum(extent)?;
//! assert_eq!(grid[(1, 2, 3)], 6);
//! ```
//!
//! # Crate Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for the configuration types

pub mod config;
pub mod error;
pub mod filter;
pub mod grid;
pub mod init;

pub use tess_core::{Coord3, Extent3, Scalar};

pub use config::{FilterConfig, GridConfig};
pub use error::{GridError, Result};
pub use filter::Filter3D;
pub use grid::Grid3D;
pub use init::InitRule;
