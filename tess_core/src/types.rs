//! Core coordinate and shape types.
//!
//! Grids are addressed by `(i, j, k)` with `i` the depth axis, `j` the height
//! axis and `k` the width axis. Storage is row-major with `k` varying fastest.

use core::fmt;

use crate::error::CoreError;

/// One of the three grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Depth axis (`i`), slowest varying.
    I,
    /// Height axis (`j`).
    J,
    /// Width axis (`k`), fastest varying.
    K,
}

impl Axis {
    /// All axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::I, Axis::J, Axis::K];

    /// Position of this axis in `[i, j, k]` arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::I => 0,
            Axis::J => 1,
            Axis::K => 2,
        }
    }

    /// Axis name as used in loop orders.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Axis::I => "i",
            Axis::J => "j",
            Axis::K => "k",
        }
    }
}

/// An in-range grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Coord3 {
    /// Depth index.
    pub i: usize,
    /// Height index.
    pub j: usize,
    /// Width index.
    pub k: usize,
}

impl Coord3 {
    /// Create a new coordinate.
    #[inline]
    pub const fn new(i: usize, j: usize, k: usize) -> Self {
        Self { i, j, k }
    }

    /// Coordinate as an `[i, j, k]` array.
    #[inline]
    pub const fn as_array(self) -> [usize; 3] {
        [self.i, self.j, self.k]
    }

    /// Build from an `[i, j, k]` array.
    #[inline]
    pub const fn from_array(a: [usize; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    /// Coordinate shifted by a signed offset, without range checks.
    #[inline]
    pub fn shifted(self, di: isize, dj: isize, dk: isize) -> (isize, isize, isize) {
        (
            self.i as isize + di,
            self.j as isize + dj,
            self.k as isize + dk,
        )
    }

    /// Coordinate moved back by `(di, dj, dk)`, or `None` if any component underflows.
    #[inline]
    pub fn back(self, di: usize, dj: usize, dk: usize) -> Option<Self> {
        Some(Self::new(
            self.i.checked_sub(di)?,
            self.j.checked_sub(dj)?,
            self.k.checked_sub(dk)?,
        ))
    }
}

impl fmt::Display for Coord3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.i, self.j, self.k)
    }
}

/// Dimensions `D x H x W` of a dense grid.
///
/// Every extent is positive; this is checked once in [`Extent3::new`] and the
/// dimensions never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent3 {
    depth: usize,
    height: usize,
    width: usize,
}

impl Extent3 {
    /// Create a new extent.
    ///
    /// # Errors
    /// Returns `InvalidDimension` if any extent is zero.
    pub fn new(depth: usize, height: usize, width: usize) -> Result<Self, CoreError> {
        for (axis, value) in [(Axis::I, depth), (Axis::J, height), (Axis::K, width)] {
            if value == 0 {
                return Err(CoreError::InvalidDimension { axis, value });
            }
        }
        if depth.checked_mul(height).and_then(|n| n.checked_mul(width)).is_none() {
            return Err(CoreError::ExtentOverflow {
                depth,
                height,
                width,
            });
        }
        Ok(Self {
            depth,
            height,
            width,
        })
    }

    /// Cube-shaped extent `n x n x n`.
    pub fn cube(n: usize) -> Result<Self, CoreError> {
        Self::new(n, n, n)
    }

    /// Depth (`D`, the `i` axis).
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Height (`H`, the `j` axis).
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Width (`W`, the `k` axis).
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Extent along one axis.
    #[inline]
    pub const fn along(&self, axis: Axis) -> usize {
        match axis {
            Axis::I => self.depth,
            Axis::J => self.height,
            Axis::K => self.width,
        }
    }

    /// Extents as `[D, H, W]`.
    #[inline]
    pub const fn as_array(&self) -> [usize; 3] {
        [self.depth, self.height, self.width]
    }

    /// Total number of cells.
    #[inline]
    pub const fn len(&self) -> usize {
        self.depth * self.height * self.width
    }

    /// Always false; extents are positive. Provided for API symmetry.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Number of cells in one `i` slab (`H * W`).
    #[inline]
    pub const fn slab_len(&self) -> usize {
        self.height * self.width
    }

    /// Whether a signed coordinate lies inside `[0, D) x [0, H) x [0, W)`.
    #[inline]
    pub fn contains(&self, i: isize, j: isize, k: isize) -> bool {
        i >= 0
            && j >= 0
            && k >= 0
            && (i as usize) < self.depth
            && (j as usize) < self.height
            && (k as usize) < self.width
    }

    /// Whether a coordinate is in range.
    #[inline]
    pub fn contains_coord(&self, c: Coord3) -> bool {
        c.i < self.depth && c.j < self.height && c.k < self.width
    }

    /// Whether `c` is at least `margin` cells away from every face.
    #[inline]
    pub fn is_interior(&self, c: Coord3, margin: usize) -> bool {
        c.i >= margin
            && c.j >= margin
            && c.k >= margin
            && c.i + margin < self.depth
            && c.j + margin < self.height
            && c.k + margin < self.width
    }

    /// Row-major linear index of `c` (`k` fastest). `c` must be in range.
    #[inline]
    pub const fn index(&self, c: Coord3) -> usize {
        (c.i * self.height + c.j) * self.width + c.k
    }

    /// Inverse of [`Extent3::index`].
    #[inline]
    pub const fn coord(&self, index: usize) -> Coord3 {
        let k = index % self.width;
        let rest = index / self.width;
        Coord3::new(rest / self.height, rest % self.height, k)
    }

    /// The far corner `(D-1, H-1, W-1)`.
    #[inline]
    pub const fn far_corner(&self) -> Coord3 {
        Coord3::new(self.depth - 1, self.height - 1, self.width - 1)
    }
}

impl fmt::Display for Extent3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.depth, self.height, self.width)
    }
}

/// Per-axis tile edge lengths for blocked traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileShape {
    i: usize,
    j: usize,
    k: usize,
}

impl TileShape {
    /// Create a tile shape with separate edge lengths per axis.
    ///
    /// # Errors
    /// Returns `InvalidTileSize` if any edge is zero.
    pub fn new(i: usize, j: usize, k: usize) -> Result<Self, CoreError> {
        for (axis, value) in [(Axis::I, i), (Axis::J, j), (Axis::K, k)] {
            if value == 0 {
                return Err(CoreError::InvalidTileSize { axis, value });
            }
        }
        Ok(Self { i, j, k })
    }

    /// Cubic tile `b x b x b`.
    pub fn cubic(b: usize) -> Result<Self, CoreError> {
        Self::new(b, b, b)
    }

    /// Edge length along one axis.
    #[inline]
    pub const fn along(&self, axis: Axis) -> usize {
        match axis {
            Axis::I => self.i,
            Axis::J => self.j,
            Axis::K => self.k,
        }
    }

    /// Edges as `[i, j, k]`.
    #[inline]
    pub const fn as_array(&self) -> [usize; 3] {
        [self.i, self.j, self.k]
    }

    /// Whether all three edges are equal.
    #[inline]
    pub const fn is_cubic(&self) -> bool {
        self.i == self.j && self.j == self.k
    }

    /// Number of tiles needed to cover `extent`: `ceil(D/i) * ceil(H/j) * ceil(W/k)`.
    pub fn tile_count(&self, extent: Extent3) -> usize {
        extent.depth().div_ceil(self.i)
            * extent.height().div_ceil(self.j)
            * extent.width().div_ceil(self.k)
    }
}

impl fmt::Display for TileShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_cubic() {
            write!(f, "{}", self.i)
        } else {
            write!(f, "{}x{}x{}", self.i, self.j, self.k)
        }
    }
}
