//! Loop schedules: naive and tiled (blocked) traversals.
//!
//! A blocked traversal is a six-level loop nest: one tile-origin loop
//! (`i_t`, `j_t`, `k_t`) and one point loop (`i`, `j`, `k`) per axis. Tile
//! loops step by the tile edge from `0`; point loops run from the tile origin
//! to `min(origin + edge, extent)`. A [`LoopOrder`] fixes the nesting, outermost
//! first. It is legal when every tile loop encloses its own point loop, which
//! leaves `6! / 2^3 = 90` orders.
//!
//! Every loop runs forward, so for rules whose predecessors lie at
//! non-negative offsets on every axis all 90 orders respect the dependency
//! order. [`Traversal::verify`] checks this explicitly for a given extent.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::error::CoreError;
use crate::stencil::Dependency;
use crate::types::{Axis, Coord3, Extent3, TileShape};
use crate::verify::VisitVerifier;

/// One loop of a blocked nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopVar {
    /// Tile-origin loop along an axis.
    Tile(Axis),
    /// Point loop along an axis, inside the tile selected by the tile loop.
    Point(Axis),
}

impl LoopVar {
    /// The axis this loop walks.
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            LoopVar::Tile(a) | LoopVar::Point(a) => a,
        }
    }

    /// Whether this is a tile-origin loop.
    #[inline]
    pub const fn is_tile(self) -> bool {
        matches!(self, LoopVar::Tile(_))
    }

    /// Loop variable name: `i_t`, `j_t`, `k_t`, `i`, `j` or `k`.
    pub const fn name(self) -> &'static str {
        match self {
            LoopVar::Tile(Axis::I) => "i_t",
            LoopVar::Tile(Axis::J) => "j_t",
            LoopVar::Tile(Axis::K) => "k_t",
            LoopVar::Point(Axis::I) => "i",
            LoopVar::Point(Axis::J) => "j",
            LoopVar::Point(Axis::K) => "k",
        }
    }
}

impl fmt::Display for LoopVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A legal nesting of the six loops of a blocked traversal, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopOrder([LoopVar; 6]);

impl LoopOrder {
    /// `i_t j_t k_t i j k`: tile loops outside, both in storage order.
    pub const CANONICAL: LoopOrder = LoopOrder([
        LoopVar::Tile(Axis::I),
        LoopVar::Tile(Axis::J),
        LoopVar::Tile(Axis::K),
        LoopVar::Point(Axis::I),
        LoopVar::Point(Axis::J),
        LoopVar::Point(Axis::K),
    ]);

    /// `i_t i j_t j k_t k`: each point loop right inside its tile loop.
    /// Visits cells in exactly the naive order, whatever the tile shape.
    pub const INTERLEAVED: LoopOrder = LoopOrder([
        LoopVar::Tile(Axis::I),
        LoopVar::Point(Axis::I),
        LoopVar::Tile(Axis::J),
        LoopVar::Point(Axis::J),
        LoopVar::Tile(Axis::K),
        LoopVar::Point(Axis::K),
    ]);

    /// Number of legal orders.
    pub const LEGAL_COUNT: usize = 90;

    /// Validate a nesting.
    ///
    /// # Errors
    /// Returns `IllegalLoopOrder` if a loop is missing or repeated, or if a
    /// point loop appears outside its tile loop.
    pub fn new(vars: [LoopVar; 6]) -> Result<Self, CoreError> {
        let mut tile_seen = [false; 3];
        let mut point_seen = [false; 3];
        for var in vars {
            let a = var.axis().index();
            match var {
                LoopVar::Tile(_) => {
                    if tile_seen[a] {
                        return Err(CoreError::IllegalLoopOrder {
                            reason: "tile loop repeated",
                        });
                    }
                    tile_seen[a] = true;
                }
                LoopVar::Point(_) => {
                    if point_seen[a] {
                        return Err(CoreError::IllegalLoopOrder {
                            reason: "point loop repeated",
                        });
                    }
                    if !tile_seen[a] {
                        return Err(CoreError::IllegalLoopOrder {
                            reason: "point loop outside its tile loop",
                        });
                    }
                    point_seen[a] = true;
                }
            }
        }
        Ok(Self(vars))
    }

    /// The canonical order `i_t j_t k_t i j k`.
    #[inline]
    pub const fn canonical() -> Self {
        Self::CANONICAL
    }

    /// The loops, outermost first.
    #[inline]
    pub const fn vars(&self) -> &[LoopVar; 6] {
        &self.0
    }

    /// Every legal order.
    ///
    /// Orders are produced by interleaving the pairs `(i_t, i)`, `(j_t, j)`,
    /// `(k_t, k)`, always trying the `i` pair first, then `j`, then `k`. The
    /// first order is therefore [`LoopOrder::INTERLEAVED`].
    pub fn all_legal() -> Vec<LoopOrder> {
        fn extend(
            next: &mut [usize; 3],
            current: &mut Vec<LoopVar>,
            out: &mut Vec<LoopOrder>,
        ) {
            if current.len() == 6 {
                let mut vars = [LoopVar::Tile(Axis::I); 6];
                vars.copy_from_slice(current);
                out.push(LoopOrder(vars));
                return;
            }
            for axis in Axis::ALL {
                let a = axis.index();
                let var = match next[a] {
                    0 => LoopVar::Tile(axis),
                    1 => LoopVar::Point(axis),
                    _ => continue,
                };
                next[a] += 1;
                current.push(var);
                extend(next, current, out);
                current.pop();
                next[a] -= 1;
            }
        }

        let mut out = Vec::with_capacity(Self::LEGAL_COUNT);
        extend(&mut [0; 3], &mut Vec::with_capacity(6), &mut out);
        out
    }
}

impl Default for LoopOrder {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl fmt::Display for LoopOrder {
    /// Concatenated loop names, e.g. `i_tj_tk_tijk`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for var in self.0 {
            f.write_str(var.name())?;
        }
        Ok(())
    }
}

impl FromStr for LoopOrder {
    type Err = CoreError;

    /// Parse concatenated (`i_tj_tk_tijk`) or separated (`i_t j_t k_t i j k`,
    /// `i_t,j_t,...`) loop names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut vars: Vec<LoopVar> = Vec::with_capacity(6);
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .collect();
        let mut rest = compact.as_str();
        while let Some(first) = rest.chars().next() {
            let axis = match first {
                'i' | 'I' => Axis::I,
                'j' | 'J' => Axis::J,
                'k' | 'K' => Axis::K,
                _ => {
                    return Err(CoreError::IllegalLoopOrder {
                        reason: "unknown loop name",
                    })
                }
            };
            rest = &rest[1..];
            if let Some(after) = rest.strip_prefix("_t") {
                vars.push(LoopVar::Tile(axis));
                rest = after;
            } else {
                vars.push(LoopVar::Point(axis));
            }
        }
        let vars: [LoopVar; 6] = vars.try_into().map_err(|_| CoreError::IllegalLoopOrder {
            reason: "expected exactly six loops",
        })?;
        Self::new(vars)
    }
}

/// The order in which a pass visits the cells of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Traversal {
    /// Three nested loops `i`, `j`, `k`.
    #[default]
    Naive,
    /// Six nested loops over tiles of `tile`, nested as `order`.
    Blocked {
        /// Tile edge lengths.
        tile: TileShape,
        /// Loop nesting, outermost first.
        order: LoopOrder,
    },
}

impl Traversal {
    /// Blocked traversal with the given tile and nesting.
    #[inline]
    pub const fn blocked(tile: TileShape, order: LoopOrder) -> Self {
        Traversal::Blocked { tile, order }
    }

    /// Blocked traversal with cubic tiles of edge `b` and the canonical nesting.
    ///
    /// # Errors
    /// Returns `InvalidTileSize` if `b` is zero.
    pub fn cubic(b: usize) -> Result<Self, CoreError> {
        Ok(Self::blocked(TileShape::cubic(b)?, LoopOrder::CANONICAL))
    }

    /// Whether the axis-permutation cross term of the min-plus rule observes
    /// exactly the state it observes under [`Traversal::Naive`].
    ///
    /// True for the naive order, for the interleaved nesting (which visits in
    /// naive order), and for cubic tiles with the canonical nesting. In the
    /// last case, `(i,k,j)` and `(k,j,i)` precede `(i,j,k)` in the blocked
    /// order exactly when they precede it in the naive order, because the tile
    /// index is the same monotone function of the coordinate on every axis.
    pub fn reproduces_naive_reads(&self) -> bool {
        match self {
            Traversal::Naive => true,
            Traversal::Blocked { tile, order } => {
                *order == LoopOrder::INTERLEAVED
                    || (*order == LoopOrder::CANONICAL && tile.is_cubic())
            }
        }
    }

    /// Visit every coordinate of `extent` exactly once, in traversal order.
    pub fn for_each<F: FnMut(Coord3)>(&self, extent: Extent3, mut f: F) {
        let [d, h, w] = extent.as_array();
        match *self {
            Traversal::Naive => {
                for i in 0..d {
                    for j in 0..h {
                        for k in 0..w {
                            f(Coord3::new(i, j, k));
                        }
                    }
                }
            }
            Traversal::Blocked { tile, order } if order == LoopOrder::CANONICAL => {
                let [bi, bj, bk] = tile.as_array();
                for it in (0..d).step_by(bi) {
                    for jt in (0..h).step_by(bj) {
                        for kt in (0..w).step_by(bk) {
                            for i in it..(it + bi).min(d) {
                                for j in jt..(jt + bj).min(h) {
                                    for k in kt..(kt + bk).min(w) {
                                        f(Coord3::new(i, j, k));
                                    }
                                }
                            }
                        }
                    }
                }
            }
            Traversal::Blocked { tile, order } => {
                let mut nest = Nest {
                    order: order.0,
                    extent: [d, h, w],
                    tile: tile.as_array(),
                    origin: [0; 3],
                    point: [0; 3],
                };
                nest.walk(0, &mut f);
            }
        }
    }

    /// Verify that this traversal covers `extent` exactly once and visits
    /// every active cell of `rule` after all of its predecessors.
    ///
    /// # Errors
    /// Returns the first `DuplicateVisit`, `DependencyViolation` or
    /// `IncompleteCoverage` found.
    pub fn verify<D: Dependency + ?Sized>(&self, extent: Extent3, rule: &D) -> Result<(), CoreError> {
        let mut verifier = VisitVerifier::new(extent, rule);
        let mut first_error = None;
        self.for_each(extent, |c| {
            if first_error.is_none() {
                if let Err(e) = verifier.visit(c) {
                    first_error = Some(e);
                }
            }
        });
        match first_error {
            Some(e) => Err(e),
            None => verifier.finish().map(|_| ()),
        }
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Traversal::Naive => f.write_str("naive"),
            Traversal::Blocked { tile, order } => write!(f, "{}_T{}", order, tile),
        }
    }
}

/// Loop state for an arbitrary legal nesting.
struct Nest {
    order: [LoopVar; 6],
    extent: [usize; 3],
    tile: [usize; 3],
    origin: [usize; 3],
    point: [usize; 3],
}

impl Nest {
    fn walk<F: FnMut(Coord3)>(&mut self, level: usize, f: &mut F) {
        if level == self.order.len() {
            f(Coord3::from_array(self.point));
            return;
        }
        let var = self.order[level];
        let a = var.axis().index();
        if var.is_tile() {
            for t in (0..self.extent[a]).step_by(self.tile[a]) {
                self.origin[a] = t;
                self.walk(level + 1, f);
            }
        } else {
            // The tile loop for this axis encloses us, so origin[a] is current.
            let start = self.origin[a];
            let end = (start + self.tile[a]).min(self.extent[a]);
            for p in start..end {
                self.point[a] = p;
                self.walk(level + 1, f);
            }
        }
    }
}
