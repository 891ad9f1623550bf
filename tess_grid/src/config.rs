//! Grid and filter configuration types.

use tess_core::Extent3;

use crate::error::Result;

/// Grid dimensions (immutable after construction).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// Cells along `i`.
    pub depth: usize,
    /// Cells along `j`.
    pub height: usize,
    /// Cells along `k`.
    pub width: usize,
}

impl GridConfig {
    /// Create a new grid configuration.
    #[inline]
    pub const fn new(depth: usize, height: usize, width: usize) -> Self {
        Self {
            depth,
            height,
            width,
        }
    }

    /// Cube-shaped configuration.
    #[inline]
    pub const fn cube(n: usize) -> Self {
        Self::new(n, n, n)
    }

    /// Validated extent.
    ///
    /// # Errors
    /// Returns `InvalidDimension` if any dimension is zero.
    pub fn extent(&self) -> Result<Extent3> {
        Ok(Extent3::new(self.depth, self.height, self.width)?)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::cube(512)
    }
}

/// Filter dimensions; each must be odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterConfig {
    /// Taps along `i`.
    pub depth: usize,
    /// Taps along `j`.
    pub height: usize,
    /// Taps along `k`.
    pub width: usize,
}

impl FilterConfig {
    /// Create a new filter configuration.
    #[inline]
    pub const fn new(depth: usize, height: usize, width: usize) -> Self {
        Self {
            depth,
            height,
            width,
        }
    }

    /// Validated extent (oddness is checked by [`Filter3D`](crate::Filter3D)).
    ///
    /// # Errors
    /// Returns `InvalidDimension` if any dimension is zero.
    pub fn extent(&self) -> Result<Extent3> {
        Ok(Extent3::new(self.depth, self.height, self.width)?)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new(3, 3, 3)
    }
}
