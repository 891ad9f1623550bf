//! Loop-order and tile-size sweeps.
//!
//! A sweep runs one kernel under the naive traversal (the baseline) and then
//! under every `(loop order, cubic tile size)` combination, recording wall
//! time, a checksum and whether the output matches the baseline cell for cell.

use num_traits::ToPrimitive;
use tess_core::{Extent3, LoopOrder, Scalar, TileShape};
use tess_grid::{init, FilterConfig, Grid3D, InitRule};
use tracing::{debug, info, info_span, warn};

use crate::convolution::ConvolutionUpdater;
use crate::error::{EngineError, Result};
use crate::relaxation::RelaxationUpdater;
use crate::stats::RunStats;
use crate::traversal::TiledTraversal;

/// Tile edges tried when none are configured.
pub const DEFAULT_TILE_SIZES: [usize; 7] = [8, 16, 32, 64, 128, 256, 512];

/// The kernel a sweep times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Kernel {
    /// In-place min-plus relaxation on `i32` cells.
    #[default]
    MinPlus,
    /// In-place backward neighbour average on `i32` cells.
    NeighborAverage,
    /// Filter with ReLU and residual on `f32` cells.
    Convolution,
}

impl Kernel {
    /// Short identifier used in logs and reports.
    pub const fn name(self) -> &'static str {
        match self {
            Kernel::MinPlus => "min_plus",
            Kernel::NeighborAverage => "neighbor_average",
            Kernel::Convolution => "convolution",
        }
    }
}

/// What to sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Kernel to time.
    pub kernel: Kernel,
    /// Grid extent.
    pub extent: Extent3,
    /// Filter extent (convolution only).
    pub filter: FilterConfig,
    /// Seed of the relaxation grid; convolution always uses the input ramp.
    pub seed: InitRule,
    /// Loop nestings to try.
    pub orders: Vec<LoopOrder>,
    /// Cubic tile edges to try.
    pub tile_sizes: Vec<usize>,
    /// Runs per combination; the fastest is recorded.
    pub repeats: usize,
}

impl SweepConfig {
    /// Every legal nesting with the default tile sizes, one run each.
    pub fn new(kernel: Kernel, extent: Extent3) -> Self {
        Self {
            kernel,
            extent,
            filter: FilterConfig::default(),
            seed: InitRule::LinearSum,
            orders: LoopOrder::all_legal(),
            tile_sizes: DEFAULT_TILE_SIZES.to_vec(),
            repeats: 1,
        }
    }

    /// Restrict the nestings tried.
    pub fn with_orders(mut self, orders: Vec<LoopOrder>) -> Self {
        self.orders = orders;
        self
    }

    /// Restrict the tile sizes tried.
    pub fn with_tile_sizes(mut self, tile_sizes: Vec<usize>) -> Self {
        self.tile_sizes = tile_sizes;
        self
    }

    /// Set the relaxation seed.
    pub fn with_seed(mut self, seed: InitRule) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of runs per combination.
    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }
}

/// One timed combination.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepRecord {
    /// `naive` or `<order>_T<tile>`.
    pub traversal: String,
    /// Loop nesting, absent for the baseline.
    pub order: Option<String>,
    /// Tile edge, absent for the baseline.
    pub tile_size: Option<usize>,
    /// Fastest wall time over the repeats, in seconds.
    pub elapsed_secs: f64,
    /// Cells changed by the fastest run.
    pub cells_updated: usize,
    /// Sum of all output cells.
    pub checksum: f64,
    /// Whether the output equals the baseline output cell for cell.
    pub matches_baseline: bool,
    /// Whether this combination was slower than the baseline.
    pub exceeded_baseline: bool,
}

/// Baseline plus every combination, in sweep order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepReport {
    /// Kernel that was timed.
    pub kernel: Kernel,
    /// Grid extent, `DxHxW`.
    pub extent: String,
    /// The naive run.
    pub baseline: SweepRecord,
    /// Blocked runs.
    pub records: Vec<SweepRecord>,
}

impl SweepReport {
    /// The fastest blocked combination.
    pub fn fastest(&self) -> Option<&SweepRecord> {
        self.records
            .iter()
            .min_by(|a, b| a.elapsed_secs.total_cmp(&b.elapsed_secs))
    }

    /// Combinations whose output differs from the baseline.
    pub fn mismatches(&self) -> impl Iterator<Item = &SweepRecord> {
        self.records.iter().filter(|r| !r.matches_baseline)
    }

    /// Combinations faster than the baseline.
    pub fn faster_than_baseline(&self) -> impl Iterator<Item = &SweepRecord> {
        self.records.iter().filter(|r| !r.exceeded_baseline)
    }
}

/// Time `config.kernel` under the naive order and every configured combination.
///
/// # Errors
/// - `EmptySweep` if no orders or no tile sizes are configured
/// - `InvalidTileSize` for a zero tile edge
/// - any error of the underlying updater or grid allocation
pub fn run_sweep(config: &SweepConfig) -> Result<SweepReport> {
    if config.orders.is_empty() || config.tile_sizes.is_empty() {
        return Err(EngineError::EmptySweep);
    }
    let extent = config.extent;
    let _span = info_span!("sweep", kernel = config.kernel.name(), %extent).entered();

    match config.kernel {
        Kernel::MinPlus => {
            let updater = RelaxationUpdater::min_plus();
            sweep(config, |traversal| {
                let mut grid: Grid3D<i32> = config.seed.grid(extent)?;
                let stats = updater.run(&mut grid, traversal)?;
                Ok((grid, stats))
            })
        }
        Kernel::NeighborAverage => {
            let updater = RelaxationUpdater::neighbor_average();
            sweep(config, |traversal| {
                let mut grid: Grid3D<i32> = config.seed.grid(extent)?;
                let stats = updater.run(&mut grid, traversal)?;
                Ok((grid, stats))
            })
        }
        Kernel::Convolution => {
            let input: Grid3D<f32> = init::modular_ramp(extent)?;
            let filter = init::filter_ramp(config.filter.extent()?)?;
            let updater = ConvolutionUpdater::default();
            sweep(config, |traversal| {
                let mut output = Grid3D::zeros(extent)?;
                let stats = updater.run(&input, &filter, &mut output, traversal)?;
                Ok((output, stats))
            })
        }
    }
}

fn sweep<T, R>(config: &SweepConfig, mut run: R) -> Result<SweepReport>
where
    T: Scalar + ToPrimitive,
    R: FnMut(&TiledTraversal) -> Result<(Grid3D<T>, RunStats)>,
{
    let repeats = config.repeats.max(1);

    let naive = TiledTraversal::naive();
    let (reference, best) = fastest_of(&mut run, &naive, repeats)?;
    let baseline_elapsed = best.elapsed;
    let baseline = SweepRecord {
        traversal: naive.to_string(),
        order: None,
        tile_size: None,
        elapsed_secs: best.elapsed.as_secs_f64(),
        cells_updated: best.cells_updated,
        checksum: reference.checksum(),
        matches_baseline: true,
        exceeded_baseline: false,
    };
    info!(elapsed_secs = baseline.elapsed_secs, checksum = baseline.checksum, "baseline");

    let mut records = Vec::with_capacity(config.orders.len() * config.tile_sizes.len());
    for &order in &config.orders {
        for &size in &config.tile_sizes {
            let traversal = TiledTraversal::blocked(TileShape::cubic(size)?, order);
            let (grid, best) = fastest_of(&mut run, &traversal, repeats)?;
            let matches_baseline = grid.first_difference(&reference)?.is_none();
            let exceeded_baseline = best.elapsed > baseline_elapsed;

            if !matches_baseline {
                warn!(traversal = %traversal, "output differs from the naive baseline");
            }
            debug!(
                traversal = %traversal,
                elapsed_secs = best.elapsed.as_secs_f64(),
                exceeded_baseline,
                "combination timed"
            );

            records.push(SweepRecord {
                traversal: traversal.to_string(),
                order: Some(order.to_string()),
                tile_size: Some(size),
                elapsed_secs: best.elapsed.as_secs_f64(),
                cells_updated: best.cells_updated,
                checksum: grid.checksum(),
                matches_baseline,
                exceeded_baseline,
            });
        }
    }

    let report = SweepReport {
        kernel: config.kernel,
        extent: config.extent.to_string(),
        baseline,
        records,
    };
    info!(
        combinations = report.records.len(),
        mismatches = report.mismatches().count(),
        faster = report.faster_than_baseline().count(),
        "sweep complete"
    );
    Ok(report)
}

fn fastest_of<T, R>(run: &mut R, traversal: &TiledTraversal, repeats: usize) -> Result<(Grid3D<T>, RunStats)>
where
    T: Scalar,
    R: FnMut(&TiledTraversal) -> Result<(Grid3D<T>, RunStats)>,
{
    let (mut grid, mut best) = run(traversal)?;
    for _ in 1..repeats {
        let (next, stats) = run(traversal)?;
        if stats.elapsed < best.elapsed {
            grid = next;
            best = stats;
        }
    }
    Ok((grid, best))
}
