//! Shared setup for the tess demo binaries.
//!
//! Both binaries read an optional TOML run file into [`RunConfig`]; command
//! line flags then override individual fields.
//!
//! ```toml
//! kernel = "min_plus"
//! tile = 16
//! order = "i_tj_tk_tijk"
//!
//! [grid]
//! depth = 256
//! height = 256
//! width = 256
//!
//! [seed]
//! kind = "scatter"
//! modulus = 31
//!
//! [sweep]
//! tile_sizes = [8, 16, 32]
//! repeats = 3
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tess_core::{Coord3, Extent3, LoopOrder, TileShape};
use tess_grid::{FilterConfig, GridConfig, InitRule};
use tess_rs::sweep::DEFAULT_TILE_SIZES;
use tess_rs::{Kernel, SweepConfig, TiledTraversal, VerifyMode};
use tracing_subscriber::EnvFilter;

/// Edge of the default cubic grid.
pub const DEFAULT_EDGE: usize = 128;

/// Kernel names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KernelArg {
    /// Min-plus relaxation
    MinPlus,
    /// Backward neighbour average
    NeighborAverage,
    /// Filter with ReLU and residual
    Convolution,
}

impl From<KernelArg> for Kernel {
    fn from(arg: KernelArg) -> Self {
        match arg {
            KernelArg::MinPlus => Kernel::MinPlus,
            KernelArg::NeighborAverage => Kernel::NeighborAverage,
            KernelArg::Convolution => Kernel::Convolution,
        }
    }
}

/// Everything a single run or a sweep needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Kernel to run.
    pub kernel: Kernel,
    /// Grid dimensions.
    pub grid: GridConfig,
    /// Filter dimensions (convolution only).
    pub filter: FilterConfig,
    /// Relaxation seed.
    pub seed: InitRule,
    /// Cubic tile edge; naive traversal when absent.
    pub tile: Option<usize>,
    /// Loop nesting for blocked runs; canonical when absent.
    pub order: Option<String>,
    /// Verify the schedule before every run, even in release builds.
    pub verify: bool,
    /// Run the convolution slab-parallel.
    pub parallel: bool,
    /// Worker threads for parallel runs; 0 uses all cores.
    pub threads: usize,
    /// Sweep settings.
    pub sweep: SweepSettings,
}

/// Sweep-only settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    /// Cubic tile edges to try.
    pub tile_sizes: Vec<usize>,
    /// Loop nestings to try; every legal nesting when empty.
    pub orders: Vec<String>,
    /// Runs per combination.
    pub repeats: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            kernel: Kernel::default(),
            grid: GridConfig::cube(DEFAULT_EDGE),
            filter: FilterConfig::default(),
            seed: InitRule::default(),
            tile: None,
            order: None,
            verify: false,
            parallel: false,
            threads: 0,
            sweep: SweepSettings::default(),
        }
    }
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            tile_sizes: DEFAULT_TILE_SIZES.to_vec(),
            orders: Vec::new(),
            repeats: 1,
        }
    }
}

impl RunConfig {
    /// Load a TOML run file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid run file {}", path.display()))
    }

    /// Parse TOML text; missing fields take their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validated grid extent.
    pub fn extent(&self) -> Result<Extent3> {
        Ok(self.grid.extent()?)
    }

    /// The traversal of a single run.
    pub fn traversal(&self) -> Result<TiledTraversal> {
        let verify = if self.verify {
            VerifyMode::Always
        } else {
            VerifyMode::DebugOnly
        };
        let traversal = match self.tile {
            None => TiledTraversal::naive(),
            Some(b) => {
                let order = match &self.order {
                    Some(s) => parse_order(s)?,
                    None => LoopOrder::CANONICAL,
                };
                TiledTraversal::blocked(TileShape::cubic(b)?, order)
            }
        };
        Ok(traversal.with_verify(verify))
    }

    /// The sweep described by this configuration.
    pub fn sweep_config(&self) -> Result<SweepConfig> {
        let orders = if self.sweep.orders.is_empty() {
            LoopOrder::all_legal()
        } else {
            self.sweep
                .orders
                .iter()
                .map(|s| parse_order(s))
                .collect::<Result<Vec<_>>>()?
        };
        let mut config = SweepConfig::new(self.kernel, self.extent()?)
            .with_orders(orders)
            .with_tile_sizes(self.sweep.tile_sizes.clone())
            .with_seed(self.seed)
            .with_repeats(self.sweep.repeats);
        config.filter = self.filter;
        Ok(config)
    }
}

fn parse_order(s: &str) -> Result<LoopOrder> {
    s.parse()
        .with_context(|| format!("invalid loop order {:?}", s))
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Origin, an interior sample and the far corner of `extent`.
pub fn sample_points(extent: Extent3) -> [Coord3; 3] {
    let far = extent.far_corner();
    let interior = Coord3::new(far.i.min(10), far.j.min(10), far.k.min(10));
    [Coord3::new(0, 0, 0), interior, far]
}
