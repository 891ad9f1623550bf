//! Out-of-place filter passes.
//!
//! Every output cell depends only on the read-only input, so the traversal
//! affects speed but never the result, and slabs of the output can be
//! computed on separate threads without coordination.

use instant::Instant;
use num_traits::FromPrimitive;
use tess_core::{convolve_cell, Activation, BoundaryPolicy, ConvParams, CoreError, Scalar};
use tess_grid::{Filter3D, Grid3D};
use tracing::{debug, debug_span};

use crate::error::Result;
use crate::stats::RunStats;
use crate::traversal::TiledTraversal;

/// Residual scale used by [`ConvolutionUpdater::default`].
pub const DEFAULT_RESIDUAL_SCALE: f64 = 0.1;

/// Applies a filter with activation and residual term to a whole grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvolutionUpdater<T> {
    params: ConvParams<T>,
    threads: usize,
}

impl<T: Scalar + FromPrimitive> Default for ConvolutionUpdater<T> {
    /// ReLU, zero padding and residual scale 0.1.
    fn default() -> Self {
        let scale = T::from_f64(DEFAULT_RESIDUAL_SCALE).unwrap_or_else(T::zero);
        Self::new(ConvParams::relu_residual(scale))
    }
}

impl<T: Scalar> ConvolutionUpdater<T> {
    /// Updater with explicit parameters.
    pub const fn new(params: ConvParams<T>) -> Self {
        Self { params, threads: 0 }
    }

    /// Set the activation.
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.params.activation = activation;
        self
    }

    /// Set the boundary policy for taps outside the input.
    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.params.boundary = boundary;
        self
    }

    /// Set the residual scale.
    pub fn with_residual_scale(mut self, residual_scale: T) -> Self {
        self.params.residual_scale = residual_scale;
        self
    }

    /// Worker threads for parallel runs; 0 uses rayon's global pool.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Current parameters.
    pub fn params(&self) -> &ConvParams<T> {
        &self.params
    }

    /// Write the filtered `input` into `output`, visiting cells in the order
    /// of `traversal`.
    ///
    /// # Errors
    /// - `ShapeMismatch` if `output` and `input` differ in extent
    /// - `OutOfRange` under [`BoundaryPolicy::Strict`] at the first cell whose
    ///   filter overhangs the input; cells visited before it are already written
    pub fn run(
        &self,
        input: &Grid3D<T>,
        filter: &Filter3D<T>,
        output: &mut Grid3D<T>,
        traversal: &TiledTraversal,
    ) -> Result<RunStats> {
        let extent = input.extent();
        let _span = debug_span!("convolve", %extent, filter = %filter.extent(), %traversal).entered();
        check_shapes(input, output)?;

        let params = &self.params;
        let mut failure = None;
        let start = Instant::now();
        let cells_visited = traversal.drive(extent, |c| {
            if failure.is_some() {
                return;
            }
            match convolve_cell(input, filter, c, params) {
                Ok(value) => output[c] = value,
                Err(e) => failure = Some(e),
            }
        });
        if let Some(e) = failure {
            return Err(e.into());
        }

        let stats = RunStats {
            cells_visited,
            cells_updated: cells_visited,
            elapsed: start.elapsed(),
            naive_equivalent: true,
        };
        debug!(elapsed_us = stats.elapsed.as_micros() as u64, "convolution pass complete");
        Ok(stats)
    }

    /// Same result as [`ConvolutionUpdater::run`], computed one depth slab
    /// per task on a rayon pool.
    ///
    /// # Errors
    /// As [`ConvolutionUpdater::run`], plus `ThreadPool` if a dedicated pool
    /// was requested and could not be built.
    #[cfg(feature = "parallel")]
    pub fn run_parallel(
        &self,
        input: &Grid3D<T>,
        filter: &Filter3D<T>,
        output: &mut Grid3D<T>,
    ) -> Result<RunStats>
    where
        T: Send + Sync,
    {
        use rayon::prelude::*;
        use tess_core::Coord3;

        use crate::error::EngineError;

        let extent = input.extent();
        let _span =
            debug_span!("convolve_parallel", %extent, filter = %filter.extent(), threads = self.threads)
                .entered();
        check_shapes(input, output)?;

        let params = &self.params;
        let [_, height, width] = extent.as_array();
        let fill = |output: &mut Grid3D<T>| -> std::result::Result<(), CoreError> {
            let slabs: Vec<(usize, &mut [T])> = output.slabs_mut().enumerate().collect();
            slabs.into_par_iter().try_for_each(|(i, slab)| {
                for j in 0..height {
                    for k in 0..width {
                        slab[j * width + k] = convolve_cell(input, filter, Coord3::new(i, j, k), params)?;
                    }
                }
                Ok(())
            })
        };

        let pool = if self.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build()
                .map_err(|e| EngineError::ThreadPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        let start = Instant::now();
        match &pool {
            Some(pool) => pool.install(|| fill(output))?,
            None => fill(output)?,
        }

        let stats = RunStats {
            cells_visited: extent.len(),
            cells_updated: extent.len(),
            elapsed: start.elapsed(),
            naive_equivalent: true,
        };
        debug!(elapsed_us = stats.elapsed.as_micros() as u64, "parallel convolution complete");
        Ok(stats)
    }
}

fn check_shapes<T: Copy>(input: &Grid3D<T>, output: &Grid3D<T>) -> std::result::Result<(), CoreError> {
    if input.extent() == output.extent() {
        Ok(())
    } else {
        Err(CoreError::ShapeMismatch {
            expected: input.extent(),
            got: output.extent(),
        })
    }
}
