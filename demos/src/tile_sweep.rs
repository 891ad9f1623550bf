//! Loop-order × tile-size sweep.
//!
//! Times one kernel under the naive order and under every legal loop nesting
//! for each tile size, flags combinations slower than the naive baseline and
//! checks every output against it.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin tile_sweep -- --size 256 --tiles 8,16,32
//! cargo run --release --bin tile_sweep -- --kernel convolution --output results/sweep.json
//! ```

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use instant::Instant;
use tracing::{info, warn};

use tess_demos::{init_logging, KernelArg, RunConfig};
use tess_grid::GridConfig;
use tess_rs::{run_sweep, SweepRecord};

#[derive(Parser)]
#[command(name = "tile_sweep")]
#[command(about = "Time every loop nesting and tile size against the naive order")]
struct Cli {
    /// TOML run file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Kernel to time
    #[arg(long, short)]
    kernel: Option<KernelArg>,

    /// Cubic grid edge
    #[arg(long, short)]
    size: Option<usize>,

    /// Tile edges to try
    #[arg(long, value_delimiter = ',')]
    tiles: Option<Vec<usize>>,

    /// Loop nestings to try (default: all 90)
    #[arg(long, value_delimiter = ',')]
    orders: Option<Vec<String>>,

    /// Runs per combination; the fastest is kept
    #[arg(long, short)]
    repeats: Option<usize>,

    /// Number of fastest combinations to print
    #[arg(long, default_value = "10")]
    top: usize,

    /// Write the full report as JSON
    #[arg(long, short)]
    output: Option<PathBuf>,

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
            config.grid = GridConfig::cube(n);
        }
        if let Some(tiles) = &self.tiles {
            config.sweep.tile_sizes = tiles.clone();
        }
        if let Some(orders) = &self.orders {
            config.sweep.orders = orders.clone();
        }
        if let Some(repeats) = self.repeats {
            config.sweep.repeats = repeats;
        }
    }
}

fn print_row(record: &SweepRecord) {
    let flag = if !record.matches_baseline {
        "MISMATCH"
    } else if record.exceeded_baseline {
        "exceeded baseline"
    } else {
        ""
    };
    println!(
        "  {:<24} {:>10.6}s  {:>16.3}  {}",
        record.traversal, record.elapsed_secs, record.checksum, flag
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = RunConfig::load_or_default(cli.config.as_deref())?;
    cli.apply(&mut config);
    let sweep = config.sweep_config()?;

    info!(
        kernel = sweep.kernel.name(),
        extent = %sweep.extent,
        orders = sweep.orders.len(),
        tiles = ?sweep.tile_sizes,
        "starting sweep"
    );
    let start = Instant::now();
    let report = run_sweep(&sweep)?;
    let total = start.elapsed();

    println!();
    println!("=== Sweep Complete ===");
    println!("Kernel:       {}", report.kernel.name());
    println!("Grid:         {}", report.extent);
    println!("Combinations: {}", report.records.len());
    println!("Total time:   {:.3}s", total.as_secs_f64());
    println!();
    println!("Baseline:");
    print_row(&report.baseline);

    let mut ranked: Vec<&SweepRecord> = report.records.iter().collect();
    ranked.sort_by(|a, b| a.elapsed_secs.total_cmp(&b.elapsed_secs));
    println!();
    println!("Fastest {}:", cli.top.min(ranked.len()));
    for record in ranked.iter().take(cli.top) {
        print_row(record);
    }

    let faster = report.faster_than_baseline().count();
    println!();
    println!(
        "{} of {} combinations beat the baseline",
        faster,
        report.records.len()
    );

    let mismatches: Vec<&SweepRecord> = report.mismatches().collect();
    if !mismatches.is_empty() {
        warn!(count = mismatches.len(), "combinations disagree with the naive baseline");
        println!();
        println!("Mismatches:");
        for record in mismatches {
            print_row(record);
        }
    }

    if let Some(path) = &cli.output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)?;
        info!(path = %path.display(), "report written");
    }

    Ok(())
}
