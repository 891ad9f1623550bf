//! Dense 3D grid storage.
//!
//! Memory layout: `cells[(i * H + j) * W + k]`. A run along `k` is contiguous,
//! so the innermost loop of every traversal should walk `k`.

use std::fmt;
use std::ops::{Index, IndexMut};

use num_traits::ToPrimitive;
use tess_core::{CellSink, CellSource, Coord3, CoreError, Extent3, Scalar};

use crate::error::{GridError, Result};

/// A dense `D x H x W` grid of cells, fixed in size at construction.
///
/// The grid exclusively owns its buffer; there is no resizing operation.
/// Indexing with an out-of-range coordinate panics (a traversal bug, never a
/// recoverable condition). Use [`Grid3D::try_get`] to probe signed coordinates.
#[derive(Clone, PartialEq)]
pub struct Grid3D<T> {
    extent: Extent3,
    cells: Box<[T]>,
}

impl<T: Copy> Grid3D<T> {
    /// Allocate a grid with every cell set to `value`.
    ///
    /// # Errors
    /// Returns `AllocationFailed` if the buffer cannot be reserved.
    pub fn filled(extent: Extent3, value: T) -> Result<Self> {
        let len = extent.len();
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| GridError::AllocationFailed { cells: len, extent })?;
        cells.resize(len, value);
        Ok(Self {
            extent,
            cells: cells.into_boxed_slice(),
        })
    }

    /// Allocate a grid whose cell `c` holds `f(c)`, filled in storage order.
    ///
    /// # Errors
    /// Returns `AllocationFailed` if the buffer cannot be reserved.
    pub fn from_fn<F: FnMut(Coord3) -> T>(extent: Extent3, mut f: F) -> Result<Self> {
        let len = extent.len();
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| GridError::AllocationFailed { cells: len, extent })?;
        cells.extend((0..len).map(|idx| f(extent.coord(idx))));
        Ok(Self {
            extent,
            cells: cells.into_boxed_slice(),
        })
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    /// Returns `LengthMismatch` if `cells.len() != extent.len()`.
    pub fn from_vec(extent: Extent3, cells: Vec<T>) -> Result<Self> {
        if cells.len() != extent.len() {
            return Err(GridError::LengthMismatch {
                expected: extent.len(),
                got: cells.len(),
            });
        }
        Ok(Self {
            extent,
            cells: cells.into_boxed_slice(),
        })
    }

    /// Grid dimensions.
    #[inline]
    pub fn extent(&self) -> Extent3 {
        self.extent
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; extents are positive.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value at `c`.
    ///
    /// # Panics
    /// Panics if `c` is outside the grid.
    #[inline]
    #[track_caller]
    pub fn get(&self, c: Coord3) -> T {
        self.check(c);
        self.cells[self.extent.index(c)]
    }

    /// Overwrite the value at `c`.
    ///
    /// # Panics
    /// Panics if `c` is outside the grid.
    #[inline]
    #[track_caller]
    pub fn set(&mut self, c: Coord3, value: T) {
        self.check(c);
        let idx = self.extent.index(c);
        self.cells[idx] = value;
    }

    /// Value at a signed coordinate.
    ///
    /// # Errors
    /// Returns `OutOfRange` if the coordinate is outside the grid.
    pub fn try_get(&self, i: isize, j: isize, k: isize) -> Result<T> {
        if !self.extent.contains(i, j, k) {
            return Err(self.out_of_range(i, j, k));
        }
        Ok(self.cells[self.extent.index(Coord3::new(i as usize, j as usize, k as usize))])
    }

    /// Overwrite the value at a signed coordinate.
    ///
    /// # Errors
    /// Returns `OutOfRange` if the coordinate is outside the grid.
    pub fn try_set(&mut self, i: isize, j: isize, k: isize, value: T) -> Result<()> {
        if !self.extent.contains(i, j, k) {
            return Err(self.out_of_range(i, j, k));
        }
        let idx = self.extent.index(Coord3::new(i as usize, j as usize, k as usize));
        self.cells[idx] = value;
        Ok(())
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// The whole buffer in storage order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// The whole buffer in storage order, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Disjoint mutable `H x W` slabs, one per `i`.
    pub fn slabs_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        let slab = self.extent.slab_len();
        self.cells.chunks_exact_mut(slab)
    }

    /// Iterate `(coordinate, value)` pairs in storage order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord3, T)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, v)| (self.extent.coord(idx), *v))
    }

    /// Consume the grid and return its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.cells.into_vec()
    }

    #[inline]
    #[track_caller]
    fn check(&self, c: Coord3) {
        assert!(
            self.extent.contains_coord(c),
            "coordinate {} outside grid {}",
            c,
            self.extent
        );
    }

    fn out_of_range(&self, i: isize, j: isize, k: isize) -> GridError {
        GridError::Core(CoreError::OutOfRange {
            i,
            j,
            k,
            extent: self.extent,
        })
    }
}

impl<T: Scalar> Grid3D<T> {
    /// Allocate a zero-initialized grid.
    ///
    /// # Errors
    /// Returns `AllocationFailed` if the buffer cannot be reserved.
    pub fn zeros(extent: Extent3) -> Result<Self> {
        Self::filled(extent, T::zero())
    }

    /// Validate `D x H x W` and allocate a zero-initialized grid.
    ///
    /// # Errors
    /// Returns `InvalidDimension` for a zero extent, or `AllocationFailed`.
    pub fn new(depth: usize, height: usize, width: usize) -> Result<Self> {
        Self::zeros(Extent3::new(depth, height, width)?)
    }

    /// First cell (in storage order) where `self` and `other` differ.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the extents differ.
    pub fn first_difference(&self, other: &Self) -> Result<Option<(Coord3, T, T)>> {
        if self.extent != other.extent {
            return Err(CoreError::ShapeMismatch {
                expected: self.extent,
                got: other.extent,
            }
            .into());
        }
        Ok(self
            .cells
            .iter()
            .zip(other.cells.iter())
            .position(|(a, b)| a != b)
            .map(|idx| (self.extent.coord(idx), self.cells[idx], other.cells[idx])))
    }
}

impl<T: Copy + ToPrimitive> Grid3D<T> {
    /// Sum of all cells as `f64`; cells that do not convert count as NaN.
    pub fn checksum(&self) -> f64 {
        self.cells
            .iter()
            .map(|v| v.to_f64().unwrap_or(f64::NAN))
            .sum()
    }
}

impl<T: Copy> CellSource<T> for Grid3D<T> {
    #[inline]
    fn extent(&self) -> Extent3 {
        self.extent
    }

    /// Hot-path read. Rules keep coordinates in range by construction; debug
    /// builds still check every component.
    #[inline]
    fn cell(&self, c: Coord3) -> T {
        debug_assert!(self.extent.contains_coord(c), "coordinate {} outside grid {}", c, self.extent);
        self.cells[self.extent.index(c)]
    }
}

impl<T: Copy> CellSink<T> for Grid3D<T> {
    #[inline]
    fn set_cell(&mut self, c: Coord3, value: T) {
        debug_assert!(self.extent.contains_coord(c), "coordinate {} outside grid {}", c, self.extent);
        let idx = self.extent.index(c);
        self.cells[idx] = value;
    }
}

impl<T: Copy> Index<Coord3> for Grid3D<T> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, c: Coord3) -> &T {
        self.check(c);
        &self.cells[self.extent.index(c)]
    }
}

impl<T: Copy> IndexMut<Coord3> for Grid3D<T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, c: Coord3) -> &mut T {
        self.check(c);
        let idx = self.extent.index(c);
        &mut self.cells[idx]
    }
}

impl<T: Copy> Index<(usize, usize, usize)> for Grid3D<T> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, (i, j, k): (usize, usize, usize)) -> &T {
        &self[Coord3::new(i, j, k)]
    }
}

impl<T: Copy> IndexMut<(usize, usize, usize)> for Grid3D<T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, (i, j, k): (usize, usize, usize)) -> &mut T {
        &mut self[Coord3::new(i, j, k)]
    }
}

impl<T> fmt::Debug for Grid3D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid3D")
            .field("extent", &self.extent)
            .field("cells", &self.cells.len())
            .finish()
    }
}
