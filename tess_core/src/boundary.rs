//! Boundary policies.
//!
//! A policy decides what a rule sees when one of its taps falls outside
//! `[0, D) x [0, H) x [0, W)`.

use crate::error::CoreError;
use crate::scalar::Scalar;
use crate::traits::CellSource;
use crate::types::{Coord3, Extent3};

/// How out-of-range taps are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Out-of-range taps are a contract violation. Used by the in-place
    /// stencils, whose interior predicate keeps every tap in range.
    #[default]
    Strict,
    /// Out-of-range taps read as zero, as if the grid were padded with zeros
    /// on every side. Used by the convolution rule.
    ZeroPad,
}

impl BoundaryPolicy {
    /// Resolve a signed coordinate against `extent`.
    ///
    /// Returns `Ok(Some(c))` for in-range coordinates and `Ok(None)` for
    /// padding taps under [`BoundaryPolicy::ZeroPad`].
    ///
    /// # Errors
    /// Returns `OutOfRange` for an out-of-range coordinate under [`BoundaryPolicy::Strict`].
    #[inline]
    pub fn resolve(
        self,
        extent: Extent3,
        i: isize,
        j: isize,
        k: isize,
    ) -> Result<Option<Coord3>, CoreError> {
        if extent.contains(i, j, k) {
            return Ok(Some(Coord3::new(i as usize, j as usize, k as usize)));
        }
        match self {
            BoundaryPolicy::Strict => Err(CoreError::OutOfRange { i, j, k, extent }),
            BoundaryPolicy::ZeroPad => Ok(None),
        }
    }

    /// Read the value seen at a signed coordinate.
    ///
    /// # Errors
    /// Same as [`BoundaryPolicy::resolve`].
    #[inline]
    pub fn sample<T: Scalar, S: CellSource<T>>(
        self,
        source: &S,
        i: isize,
        j: isize,
        k: isize,
    ) -> Result<T, CoreError> {
        Ok(match self.resolve(source.extent(), i, j, k)? {
            Some(c) => source.cell(c),
            None => T::zero(),
        })
    }
}
