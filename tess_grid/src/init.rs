//! Seed rules for grids and filters.
//!
//! Values are computed in `f64` and converted to the cell type once, so an
//! `f32` grid holds the nearest `f32` to the exact seed.

use num_traits::NumCast;
use tess_core::{Coord3, Extent3, Scalar};

use crate::error::{GridError, Result};
use crate::filter::Filter3D;
use crate::grid::Grid3D;

/// Modulus of the convolution input ramp.
pub const INPUT_RAMP_MODULUS: usize = 11;
/// Step of the convolution input ramp.
pub const INPUT_RAMP_STEP: f64 = 0.1;
/// Modulus of the filter weight ramp.
pub const FILTER_RAMP_MODULUS: usize = 5;
/// Step of the filter weight ramp.
pub const FILTER_RAMP_STEP: f64 = 0.05;

/// How each cell is seeded before a run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum InitRule {
    /// `i + j + k`
    #[default]
    LinearSum,
    /// `((i + j + k) mod modulus) * step`
    ModularRamp {
        /// Period of the ramp; must be positive.
        modulus: usize,
        /// Value added per unit of `i + j + k`.
        step: f64,
    },
    /// `(7i + 13j + 29k) mod modulus`, a non-monotone pattern for
    /// exercising the relaxation.
    Scatter {
        /// Period of the pattern; must be positive.
        modulus: usize,
    },
    /// Every cell holds the same value.
    Constant(f64),
}

impl InitRule {
    /// Convolution input seed: `((i + j + k) mod 11) * 0.1`.
    pub const INPUT_RAMP: InitRule = InitRule::ModularRamp {
        modulus: INPUT_RAMP_MODULUS,
        step: INPUT_RAMP_STEP,
    };

    /// Filter weight seed: `((fd + fh + fw) mod 5) * 0.05`.
    pub const FILTER_RAMP: InitRule = InitRule::ModularRamp {
        modulus: FILTER_RAMP_MODULUS,
        step: FILTER_RAMP_STEP,
    };

    /// The seed value at `c`, before conversion to the cell type.
    pub fn value_at(&self, c: Coord3) -> f64 {
        let sum = c.i + c.j + c.k;
        match *self {
            InitRule::LinearSum => sum as f64,
            // A zero modulus is treated as 1 rather than dividing by zero.
            InitRule::ModularRamp { modulus, step } => (sum % modulus.max(1)) as f64 * step,
            InitRule::Scatter { modulus } => {
                ((c.i * 7 + c.j * 13 + c.k * 29) % modulus.max(1)) as f64
            }
            InitRule::Constant(v) => v,
        }
    }

    /// Allocate and seed a grid.
    ///
    /// # Errors
    /// Returns `SeedOverflow` if a seed does not fit `T`, or `AllocationFailed`.
    pub fn grid<T: Scalar + NumCast>(&self, extent: Extent3) -> Result<Grid3D<T>> {
        let mut grid = Grid3D::zeros(extent)?;
        self.apply(&mut grid)?;
        Ok(grid)
    }

    /// Allocate and seed a filter.
    ///
    /// # Errors
    /// Returns `EvenFilter`, `SeedOverflow` or `AllocationFailed`.
    pub fn filter<T: Scalar + NumCast>(&self, extent: Extent3) -> Result<Filter3D<T>> {
        Filter3D::from_grid(self.grid(extent)?)
    }

    /// Reseed an existing grid in place.
    ///
    /// # Errors
    /// Returns `SeedOverflow` at the first seed that does not fit `T`; cells
    /// before it have already been written.
    pub fn apply<T: Scalar + NumCast>(&self, grid: &mut Grid3D<T>) -> Result<()> {
        let extent = grid.extent();
        for (idx, slot) in grid.as_mut_slice().iter_mut().enumerate() {
            let cell = extent.coord(idx);
            let value = self.value_at(cell);
            *slot = T::from(value).ok_or(GridError::SeedOverflow { cell, value })?;
        }
        Ok(())
    }
}

/// Relaxation seed `i + j + k`.
///
/// # Errors
/// See [`InitRule::grid`].
pub fn linear_sum<T: Scalar + NumCast>(extent: Extent3) -> Result<Grid3D<T>> {
    InitRule::LinearSum.grid(extent)
}

/// Convolution input seed `((i + j + k) mod 11) * 0.1`.
///
/// # Errors
/// See [`InitRule::grid`].
pub fn modular_ramp<T: Scalar + NumCast>(extent: Extent3) -> Result<Grid3D<T>> {
    InitRule::INPUT_RAMP.grid(extent)
}

/// Filter seed `((fd + fh + fw) mod 5) * 0.05`.
///
/// # Errors
/// See [`InitRule::filter`].
pub fn filter_ramp<T: Scalar + NumCast>(extent: Extent3) -> Result<Filter3D<T>> {
    InitRule::FILTER_RAMP.filter(extent)
}
