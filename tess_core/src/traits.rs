//! Cell access traits.
//!
//! Rules in this crate never touch storage directly. Downstream crates
//! (`tess_grid` for dense buffers, test doubles in unit tests) implement these
//! traits so the same rule code drives every backend.

use crate::types::{Coord3, Extent3};

/// Read access to the cells of a dense 3D grid.
///
/// Implementors must return the value stored at any coordinate inside
/// [`CellSource::extent`]. Behaviour for out-of-range coordinates is left to
/// the implementor, but must not silently clamp: callers guarantee range
/// through an interior predicate or a [`BoundaryPolicy`](crate::BoundaryPolicy).
pub trait CellSource<T: Copy> {
    /// The grid dimensions.
    fn extent(&self) -> Extent3;

    /// The value at an in-range coordinate.
    fn cell(&self, c: Coord3) -> T;
}

/// Write access on top of [`CellSource`].
pub trait CellSink<T: Copy>: CellSource<T> {
    /// Overwrite the value at an in-range coordinate.
    fn set_cell(&mut self, c: Coord3, value: T);
}

impl<T: Copy, S: CellSource<T> + ?Sized> CellSource<T> for &S {
    #[inline]
    fn extent(&self) -> Extent3 {
        (**self).extent()
    }

    #[inline]
    fn cell(&self, c: Coord3) -> T {
        (**self).cell(c)
    }
}

impl<T: Copy, S: CellSource<T> + ?Sized> CellSource<T> for &mut S {
    #[inline]
    fn extent(&self) -> Extent3 {
        (**self).extent()
    }

    #[inline]
    fn cell(&self, c: Coord3) -> T {
        (**self).cell(c)
    }
}

impl<T: Copy, S: CellSink<T> + ?Sized> CellSink<T> for &mut S {
    #[inline]
    fn set_cell(&mut self, c: Coord3, value: T) {
        (**self).set_cell(c, value)
    }
}
