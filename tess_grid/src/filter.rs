//! Convolution weights.

use std::ops::Deref;

use tess_core::{CellSource, Coord3, Extent3, Scalar};

use crate::error::{GridError, Result};
use crate::grid::Grid3D;

/// A small read-only weight grid with a centre tap.
///
/// Every extent is odd, so weight `(fd, fh, fw)` maps to the spatial offset
/// `(fd - FD/2, fh - FH/2, fw - FW/2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter3D<T> {
    weights: Grid3D<T>,
}

impl<T: Copy> Filter3D<T> {
    /// Wrap a weight grid.
    ///
    /// # Errors
    /// Returns `EvenFilter` if any extent is even.
    pub fn from_grid(weights: Grid3D<T>) -> Result<Self> {
        let extent = weights.extent();
        if extent.as_array().iter().any(|&n| n % 2 == 0) {
            return Err(GridError::EvenFilter { extent });
        }
        Ok(Self { weights })
    }

    /// Build a filter whose weight at `c` is `f(c)`.
    ///
    /// # Errors
    /// Returns `EvenFilter` for an even extent, or `AllocationFailed`.
    pub fn from_fn<F: FnMut(Coord3) -> T>(extent: Extent3, f: F) -> Result<Self> {
        Self::from_grid(Grid3D::from_fn(extent, f)?)
    }

    /// The centre tap, which sits over the output cell.
    pub fn center(&self) -> Coord3 {
        let [d, h, w] = self.weights.extent().as_array();
        Coord3::new(d / 2, h / 2, w / 2)
    }
}

impl<T: Scalar> Filter3D<T> {
    /// Validate `FD x FH x FW` and allocate an all-zero filter.
    ///
    /// # Errors
    /// Returns `InvalidDimension`, `EvenFilter` or `AllocationFailed`.
    pub fn new(fd: usize, fh: usize, fw: usize) -> Result<Self> {
        Self::from_grid(Grid3D::new(fd, fh, fw)?)
    }

    /// The filter that reproduces its input: one at the centre, zero elsewhere.
    ///
    /// # Errors
    /// Same as [`Filter3D::new`].
    pub fn identity(fd: usize, fh: usize, fw: usize) -> Result<Self> {
        let mut filter = Self::new(fd, fh, fw)?;
        let center = filter.center();
        filter.weights[center] = T::one();
        Ok(filter)
    }
}

impl<T> Deref for Filter3D<T> {
    type Target = Grid3D<T>;

    fn deref(&self) -> &Grid3D<T> {
        &self.weights
    }
}

impl<T: Copy> CellSource<T> for Filter3D<T> {
    #[inline]
    fn extent(&self) -> Extent3 {
        self.weights.extent()
    }

    #[inline]
    fn cell(&self, c: Coord3) -> T {
        CellSource::cell(&self.weights, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odd_extents_accepted() {
        let filter: Filter3D<f32> = Filter3D::new(3, 5, 1).unwrap();
        assert_eq!(filter.center(), Coord3::new(1, 2, 0));
        assert_eq!(filter.len(), 15);
    }

    #[test]
    fn test_even_extent_rejected() {
        assert!(matches!(
            Filter3D::<f32>::new(3, 2, 3),
            Err(GridError::EvenFilter { .. })
        ));
        assert!(matches!(
            Filter3D::<f32>::new(0, 3, 3),
            Err(GridError::Core(_))
        ));
    }

    #[test]
    fn test_identity_filter() {
        let filter: Filter3D<f64> = Filter3D::identity(3, 3, 3).unwrap();
        assert_eq!(filter[(1, 1, 1)], 1.0);
        assert_eq!(filter.checksum(), 1.0);
    }
}
