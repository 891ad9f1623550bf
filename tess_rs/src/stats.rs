//! Per-run counters.

use std::fmt;
use std::time::Duration;

/// What a single pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    /// Coordinates emitted by the traversal.
    pub cells_visited: usize,
    /// Cells whose stored value changed.
    pub cells_updated: usize,
    /// Wall time of the pass, excluding validation and schedule verification.
    pub elapsed: Duration,
    /// Whether the traversal is guaranteed to produce the naive result. False
    /// when the rule reads cells outside its predecessors and the traversal
    /// does not reproduce the naive read state.
    pub naive_equivalent: bool,
}

impl RunStats {
    /// Visited cells per second, or 0 for an instantaneous run.
    pub fn cells_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.cells_visited as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cells visited, {} updated in {:.3?} ({:.1} Mcells/s)",
            self.cells_visited,
            self.cells_updated,
            self.elapsed,
            self.cells_per_second() / 1e6
        )?;
        if !self.naive_equivalent {
            write!(f, " [may differ from naive order]")?;
        }
        Ok(())
    }
}
