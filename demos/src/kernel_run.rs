//! Single kernel run with sample read-back.
//!
//! Seeds a grid, runs one pass of the chosen kernel under the chosen traversal
//! and prints the origin, an interior sample and the far corner.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin kernel_run -- --kernel convolution --size 256
//! cargo run --release --bin kernel_run -- --kernel min-plus --tile 16 --order k_tj_ti_tijk
//! cargo run --release --bin kernel_run -- --config run.toml -v
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use instant::Instant;
use tracing::info;

use tess_core::Coord3;
use tess_demos::{init_logging, sample_points, KernelArg, RunConfig};
use tess_grid::{init, Filter3D, Grid3D};
use tess_rs::{ConvolutionUpdater, Kernel, RelaxationUpdater, RunStats};

#[derive(Parser)]
#[command(name = "kernel_run")]
#[command(about = "Run one tess kernel pass and print sample values")]
struct Cli {
    /// TOML run file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Kernel to run
    #[arg(long, short)]
    kernel: Option<KernelArg>,

    /// Cubic grid edge
    #[arg(long, short)]
    size: Option<usize>,

    /// Cubic tile edge (naive traversal when omitted)
    #[arg(long, short)]
    tile: Option<usize>,

    /// Loop nesting, e.g. i_tj_tk_tijk
    #[arg(long, short)]
    order: Option<String>,

    /// Verify the schedule even in release builds
    #[arg(long)]
    verify: bool,

    /// Slab-parallel convolution
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (0 = all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut RunConfig) {
        if let Some(kernel) = self.kernel {
            config.kernel = kernel.into();
        }
        if let Some(n) = self.size {
            config.grid = tess_grid::GridConfig::cube(n);
        }
        if self.tile.is_some() {
            config.tile = self.tile;
        }
        if self.order.is_some() {
            config.order = self.order.clone();
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        config.verify |= self.verify;
        config.parallel |= self.parallel;
    }
}

fn print_samples<T: std::fmt::Display + Copy>(grid: &Grid3D<T>, label: &str) {
    println!("Sample outputs:");
    for c in sample_points(grid.extent()) {
        let Coord3 { i, j, k } = c;
        println!("  {}[{}][{}][{}] = {:.3}", label, i, j, k, grid[c]);
    }
}

fn print_stats(stats: &RunStats, setup_secs: f64) {
    println!();
    println!("  Setup:    {:.3}s", setup_secs);
    println!("  Pass:     {}", stats);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = RunConfig::load_or_default(cli.config.as_deref())?;
    cli.apply(&mut config);

    let extent = config.extent()?;
    let traversal = config.traversal()?;
    info!(kernel = config.kernel.name(), %extent, %traversal, "starting run");

    let setup = Instant::now();
    match config.kernel {
        Kernel::MinPlus | Kernel::NeighborAverage => {
            let mut grid: Grid3D<i32> = config.seed.grid(extent)?;
            let setup_secs = setup.elapsed().as_secs_f64();
            let stats = if config.kernel == Kernel::MinPlus {
                RelaxationUpdater::min_plus().run(&mut grid, &traversal)?
            } else {
                RelaxationUpdater::neighbor_average().run(&mut grid, &traversal)?
            };
            print_samples(&grid, "v");
            print_stats(&stats, setup_secs);
        }
        Kernel::Convolution => {
            let input: Grid3D<f32> = init::modular_ramp(extent)?;
            let filter: Filter3D<f32> = init::filter_ramp(config.filter.extent()?)?;
            let mut output = Grid3D::zeros(extent)?;
            let setup_secs = setup.elapsed().as_secs_f64();

            let updater = ConvolutionUpdater::default().with_threads(config.threads);
            let stats = if config.parallel {
                updater.run_parallel(&input, &filter, &mut output)?
            } else {
                updater.run(&input, &filter, &mut output, &traversal)?
            };
            print_samples(&output, "out");
            print_stats(&stats, setup_secs);
        }
    }

    Ok(())
}
