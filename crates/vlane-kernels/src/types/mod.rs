//! Element types for the vector machine.
//!
//! The kernels are generic over [`LaneScalar`]: a fixed-width signed integer
//! with **wrapping** arithmetic. Overflow wraps per two's complement; there
//! is no saturation anywhere in the pipeline.
//!
//! | Type | Width | Used by |
//! |------|-------|---------|
//! | `i8` | 8-bit | convolution (image samples and filter taps) |
//! | `i16` | 16-bit | available |
//! | `i32` | 32-bit | matrix multiplication |
//! | `i64` | 64-bit | available |
//!
//! # Example
//!
//! ```rust
//! use vlane_kernels::types::LaneScalar;
//!
//! // Wrapping, not saturating: i8::MAX + 1 wraps to i8::MIN.
//! assert_eq!(<i8 as LaneScalar>::add_wrap(i8::MAX, 1), i8::MIN);
//! assert_eq!(<i32 as LaneScalar>::mul_wrap(3, 7), 21);
//! ```

use std::fmt::Debug;

/// A fixed-width signed integer element of a vector lane.
///
/// All lane arithmetic is defined in terms of [`mul_wrap`](Self::mul_wrap)
/// and [`add_wrap`](Self::add_wrap); the kernels never invoke `+` or `*`
/// directly, so overflow behavior is uniform across debug and release
/// builds.
pub trait LaneScalar: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// The additive identity.
    const ZERO: Self;

    /// Wrapping multiplication.
    fn mul_wrap(self, rhs: Self) -> Self;

    /// Wrapping addition.
    fn add_wrap(self, rhs: Self) -> Self;

    /// `self + a * b`, both steps wrapping. The scalar form of the lane
    /// multiply-accumulate.
    #[inline]
    fn mul_add_wrap(self, a: Self, b: Self) -> Self {
        self.add_wrap(a.mul_wrap(b))
    }
}

macro_rules! impl_lane_scalar {
    ($($t:ty),*) => {
        $(
            impl LaneScalar for $t {
                const ZERO: Self = 0;

                #[inline]
                fn mul_wrap(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }

                #[inline]
                fn add_wrap(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }
            }
        )*
    };
}

impl_lane_scalar!(i8, i16, i32, i64);
