//! # tess_core
//!
//! Pure kernels and loop schedules for dense 3D grids updated in place.
//!
//! This crate holds the parts of the tessellated-sweep engine that do not own
//! memory: coordinate types, the cell access traits, boundary policies, the
//! per-cell stencil rules, and the tiled loop schedules that decide in which
//! order cells are visited.
//!
//! ## Features
//!
//! - **no_std compatible**: needs only `alloc` (for schedule enumeration and
//!   the dependency verifier)
//! - **Storage agnostic**: rules are written against [`CellSource`] / [`CellSink`]
//! - **Checked schedules**: any visit order can be verified against the
//!   monotone dependency property before a grid is mutated
//!
//! ## Feature Flags
//!
//! - `std` (default): implements `std::error::Error` for [`CoreError`]
//!
//! ## Modules
//!
//! - [`types`]: `Coord3`, `Extent3`, `Axis`, `TileShape`
//! - [`traits`]: cell access traits (`CellSource<T>`, `CellSink<T>`)
//! - [`scalar`]: numeric bound shared by every rule
//! - [`boundary`]: `Strict` and `ZeroPad` boundary policies
//! - [`stencil`]: in-place dependency-ordered rules (min-plus relaxation, neighbour average)
//! - [`conv`]: weighted-sum filter rule with activation and residual term
//! - [`schedule`]: `LoopVar`, `LoopOrder`, `Traversal`
//! - [`verify`]: coverage and dependency-order verification
//! - [`error`]: error types
//!
//! ## Usage
//!
//! ```ignore
//! use tess_core::prelude::*;
//!
//! let extent = Extent3::new(16, 16, 16)?;
//! let traversal = Traversal::blocked(TileShape::cubic(4)?, LoopOrder::canonical());
//!
//! // Check the schedule against the min-plus dependency pattern
//! traversal.verify(extent, &MinPlusRelaxation)?;
//!
//! traversal.for_each(extent, |c| {
//!     // visit c
//! });
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod boundary;
pub mod conv;
pub mod error;
pub mod scalar;
pub mod schedule;
pub mod stencil;
pub mod traits;
pub mod types;
pub mod verify;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::boundary::BoundaryPolicy;
    pub use crate::conv::{convolve_cell, Activation, ConvParams};
    pub use crate::error::CoreError;
    pub use crate::scalar::Scalar;
    pub use crate::schedule::{LoopOrder, LoopVar, Traversal};
    pub use crate::stencil::{Dependency, InPlaceStencil, MinPlusRelaxation, NeighborAverage};
    pub use crate::traits::{CellSink, CellSource};
    pub use crate::types::{Axis, Coord3, Extent3, TileShape};
    pub use crate::verify::{verify_visit_order, VisitVerifier};
}

pub use boundary::BoundaryPolicy;
pub use conv::{convolve_cell, Activation, ConvParams};
pub use error::CoreError;
pub use scalar::Scalar;
pub use schedule::{LoopOrder, LoopVar, Traversal};
pub use stencil::{Dependency, InPlaceStencil, MinPlusRelaxation, NeighborAverage};
pub use traits::{CellSink, CellSource};
pub use types::{Axis, Coord3, Extent3, TileShape};
pub use verify::{verify_visit_order, VisitVerifier};
