//! Weighted-sum filter rule with activation and residual term.
//!
//! For output cell `(i, j, k)` and a filter of extent `FD x FH x FW` centred at
//! `(FD/2, FH/2, FW/2)`:
//!
//! ```text
//! acc = Σ input[i + fd - FD/2][j + fh - FH/2][k + fw - FW/2] * filter[fd][fh][fw]
//! out = activation(acc) + residual_scale * input[i][j][k]
//! ```
//!
//! Input and output are separate buffers, so the visiting order has no effect
//! on the result.

use crate::boundary::BoundaryPolicy;
use crate::error::CoreError;
use crate::scalar::Scalar;
use crate::traits::CellSource;
use crate::types::Coord3;

/// Activation applied to the accumulated sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// `max(acc, 0)`.
    #[default]
    Relu,
    /// `acc` unchanged.
    Identity,
}

impl Activation {
    /// Apply the activation.
    #[inline]
    pub fn apply<T: Scalar>(self, acc: T) -> T {
        match self {
            Activation::Relu => T::max_of(acc, T::zero()),
            Activation::Identity => acc,
        }
    }
}

/// Parameters of the filter rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvParams<T> {
    /// Activation applied before the residual is added.
    pub activation: Activation,
    /// Scale of the residual connection `residual_scale * input[i][j][k]`.
    pub residual_scale: T,
    /// Policy for taps that fall outside the input.
    pub boundary: BoundaryPolicy,
}

impl<T: Scalar> ConvParams<T> {
    /// ReLU activation, zero padding and the given residual scale.
    pub fn relu_residual(residual_scale: T) -> Self {
        Self {
            activation: Activation::Relu,
            residual_scale,
            boundary: BoundaryPolicy::ZeroPad,
        }
    }
}

/// Compute one output cell.
///
/// Taps are accumulated in `fd`, `fh`, `fw` order, so the result for a given
/// cell is bit-identical however the caller orders the cells.
///
/// # Errors
/// Returns `OutOfRange` if a tap leaves the input under
/// [`BoundaryPolicy::Strict`].
#[inline]
pub fn convolve_cell<T, I, F>(
    input: &I,
    filter: &F,
    c: Coord3,
    params: &ConvParams<T>,
) -> Result<T, CoreError>
where
    T: Scalar,
    I: CellSource<T>,
    F: CellSource<T>,
{
    let [fd_len, fh_len, fw_len] = filter.extent().as_array();
    let (ci, cj, ck) = c.shifted(
        -((fd_len / 2) as isize),
        -((fh_len / 2) as isize),
        -((fw_len / 2) as isize),
    );

    let mut acc = T::zero();
    for fd in 0..fd_len {
        for fh in 0..fh_len {
            for fw in 0..fw_len {
                let tap = params.boundary.sample(
                    input,
                    ci + fd as isize,
                    cj + fh as isize,
                    ck + fw as isize,
                )?;
                acc = acc + tap * filter.cell(Coord3::new(fd, fh, fw));
            }
        }
    }

    Ok(params.activation.apply(acc) + params.residual_scale * input.cell(c))
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::types::Extent3;

    struct Dense {
        extent: Extent3,
        cells: Vec<f64>,
    }

    impl Dense {
        fn from_fn(extent: Extent3, f: impl Fn(Coord3) -> f64) -> Self {
            let cells = (0..extent.len()).map(|idx| f(extent.coord(idx))).collect();
            Self { extent, cells }
        }
    }

    impl CellSource<f64> for Dense {
        fn extent(&self) -> Extent3 {
            self.extent
        }

        fn cell(&self, c: Coord3) -> f64 {
            self.cells[self.extent.index(c)]
        }
    }

    #[test]
    fn test_identity_filter_returns_input_plus_residual() {
        let extent = Extent3::cube(4).unwrap();
        let input = Dense::from_fn(extent, |c| (c.i * 16 + c.j * 4 + c.k) as f64);
        let filter = Dense::from_fn(Extent3::cube(3).unwrap(), |c| {
            if c == Coord3::new(1, 1, 1) {
                1.0
            } else {
                0.0
            }
        });
        let params = ConvParams::relu_residual(0.5);
        for idx in 0..extent.len() {
            let c = extent.coord(idx);
            let out = convolve_cell(&input, &filter, c, &params).unwrap();
            assert_eq!(out, input.cell(c) * 1.5);
        }
    }

    #[test]
    fn test_relu_clamps_negative_sum() {
        let extent = Extent3::cube(3).unwrap();
        let input = Dense::from_fn(extent, |_| 1.0);
        let filter = Dense::from_fn(Extent3::cube(1).unwrap(), |_| -2.0);
        let params = ConvParams::relu_residual(0.1);
        let out = convolve_cell(&input, &filter, Coord3::new(1, 1, 1), &params).unwrap();
        assert!((out - 0.1).abs() < 1e-12);

        let identity = ConvParams {
            activation: Activation::Identity,
            ..params
        };
        let out = convolve_cell(&input, &filter, Coord3::new(1, 1, 1), &identity).unwrap();
        assert!((out + 1.9).abs() < 1e-12);
    }

    #[test]
    fn test_corner_uses_only_in_range_taps() {
        let extent = Extent3::cube(4).unwrap();
        let input = Dense::from_fn(extent, |_| 1.0);
        let filter = Dense::from_fn(Extent3::cube(3).unwrap(), |_| 1.0);
        let params = ConvParams {
            activation: Activation::Identity,
            residual_scale: 0.0,
            boundary: BoundaryPolicy::ZeroPad,
        };
        // 8 taps at a corner, 12 on an edge, 18 on a face, 27 inside.
        assert_eq!(convolve_cell(&input, &filter, Coord3::new(0, 0, 0), &params), Ok(8.0));
        assert_eq!(convolve_cell(&input, &filter, Coord3::new(0, 0, 1), &params), Ok(12.0));
        assert_eq!(convolve_cell(&input, &filter, Coord3::new(0, 1, 1), &params), Ok(18.0));
        assert_eq!(convolve_cell(&input, &filter, Coord3::new(1, 1, 1), &params), Ok(27.0));
        assert_eq!(convolve_cell(&input, &filter, Coord3::new(3, 3, 3), &params), Ok(8.0));
    }

    #[test]
    fn test_strict_boundary_reports_out_of_range() {
        let extent = Extent3::cube(4).unwrap();
        let input = Dense::from_fn(extent, |_| 1.0);
        let filter = Dense::from_fn(Extent3::cube(3).unwrap(), |_| 1.0);
        let params = ConvParams {
            boundary: BoundaryPolicy::Strict,
            ..ConvParams::relu_residual(0.1)
        };
        assert!(convolve_cell(&input, &filter, Coord3::new(1, 1, 1), &params).is_ok());
        assert!(matches!(
            convolve_cell(&input, &filter, Coord3::new(0, 1, 1), &params),
            Err(CoreError::OutOfRange { i: -1, .. })
        ));
    }
}
