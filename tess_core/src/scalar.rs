//! Numeric bound for cell values.

use num_traits::{Num, SaturatingAdd};

/// Values the rules can operate on: integers and floats alike.
///
/// Implemented for the primitive integer and float types. Candidate sums in
/// the in-place rules go through [`Scalar::sum_of`], which saturates for
/// integers, so a pass never overflows on seeds that fit the cell type.
pub trait Scalar: Num + Copy + PartialOrd {
    /// `a + b`, clamped to the type's bounds for integers.
    fn sum_of(a: Self, b: Self) -> Self;

    /// The smaller of two values; `a` wins ties and unordered comparisons.
    #[inline]
    fn min_of(a: Self, b: Self) -> Self {
        if b < a {
            b
        } else {
            a
        }
    }

    /// The larger of two values; `a` wins ties and unordered comparisons.
    #[inline]
    fn max_of(a: Self, b: Self) -> Self {
        if b > a {
            b
        } else {
            a
        }
    }
}

macro_rules! impl_scalar_int {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                #[inline]
                fn sum_of(a: Self, b: Self) -> Self {
                    SaturatingAdd::saturating_add(&a, &b)
                }
            }
        )*
    };
}

macro_rules! impl_scalar_float {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                #[inline]
                fn sum_of(a: Self, b: Self) -> Self {
                    a + b
                }
            }
        )*
    };
}

impl_scalar_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_scalar_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max() {
        assert_eq!(i32::min_of(3, -2), -2);
        assert_eq!(i64::max_of(3, -2), 3);
        assert_eq!(f32::min_of(0.5, 0.25), 0.25);
    }

    #[test]
    fn test_nan_keeps_first_operand() {
        assert_eq!(f64::max_of(1.0, f64::NAN), 1.0);
        assert!(f64::max_of(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn test_sum_saturates_integers() {
        assert_eq!(i32::sum_of(2_000_000_000, 2_000_000_000), i32::MAX);
        assert_eq!(i32::sum_of(-2_000_000_000, -2_000_000_000), i32::MIN);
        assert_eq!(u8::sum_of(200, 100), u8::MAX);
        assert_eq!(i64::sum_of(3, 4), 7);
        assert_eq!(f32::sum_of(0.5, 0.25), 0.75);
    }
}
