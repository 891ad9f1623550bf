//! Coverage and dependency-order verification.
//!
//! An in-place pass is only well defined when every active cell is visited
//! after each of its predecessors (for the cells that are themselves active;
//! inactive predecessors are never written and keep their initial value).
//! A wrongly nested tile loop breaks this without crashing, so the engine
//! checks schedules with [`VisitVerifier`] before trusting them.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::CoreError;
use crate::stencil::Dependency;
use crate::types::{Coord3, Extent3};

/// Incremental checker fed one visit at a time.
pub struct VisitVerifier<'a, D: Dependency + ?Sized> {
    extent: Extent3,
    rule: &'a D,
    visited: Vec<bool>,
    count: usize,
}

impl<'a, D: Dependency + ?Sized> VisitVerifier<'a, D> {
    /// Start verifying a pass over `extent` for `rule`.
    pub fn new(extent: Extent3, rule: &'a D) -> Self {
        Self {
            extent,
            rule,
            visited: vec![false; extent.len()],
            count: 0,
        }
    }

    /// Record a visit.
    ///
    /// # Errors
    /// - `OutOfRange` if `c` lies outside the extent
    /// - `DuplicateVisit` if `c` was already visited
    /// - `DependencyViolation` if `c` is active and an active predecessor
    ///   has not been visited yet
    pub fn visit(&mut self, c: Coord3) -> Result<(), CoreError> {
        if !self.extent.contains_coord(c) {
            return Err(CoreError::OutOfRange {
                i: c.i as isize,
                j: c.j as isize,
                k: c.k as isize,
                extent: self.extent,
            });
        }
        let idx = self.extent.index(c);
        if self.visited[idx] {
            return Err(CoreError::DuplicateVisit { cell: c });
        }
        if self.rule.is_active(self.extent, c) {
            for &(di, dj, dk) in self.rule.predecessors() {
                let Some(p) = c.back(di, dj, dk) else {
                    continue;
                };
                if self.rule.is_active(self.extent, p) && !self.visited[self.extent.index(p)] {
                    return Err(CoreError::DependencyViolation {
                        cell: c,
                        predecessor: p,
                    });
                }
            }
        }
        self.visited[idx] = true;
        self.count += 1;
        Ok(())
    }

    /// Finish the pass and return the number of cells visited.
    ///
    /// # Errors
    /// Returns `IncompleteCoverage` if some cell was never visited.
    pub fn finish(self) -> Result<usize, CoreError> {
        if self.count == self.extent.len() {
            Ok(self.count)
        } else {
            Err(CoreError::IncompleteCoverage {
                visited: self.count,
                expected: self.extent.len(),
            })
        }
    }
}

/// Verify an explicit visit sequence.
///
/// # Errors
/// Returns the first violation found; see [`VisitVerifier::visit`] and
/// [`VisitVerifier::finish`].
pub fn verify_visit_order<D, I>(extent: Extent3, rule: &D, visits: I) -> Result<usize, CoreError>
where
    D: Dependency + ?Sized,
    I: IntoIterator<Item = Coord3>,
{
    let mut verifier = VisitVerifier::new(extent, rule);
    for c in visits {
        verifier.visit(c)?;
    }
    verifier.finish()
}
