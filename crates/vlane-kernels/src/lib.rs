//! Tiled integer linear-algebra kernels over a software vector unit.
//!
//! Two kernels, both register-blocked over four output rows at a time and
//! striped across a fixed-width lane file:
//!
//! | Kernel | Shape | Blocking |
//! |--------|-------|----------|
//! | [`matmul`] | `C(M×P) = A(M×N) · B(N×P)` | 4 accumulator rows, double-buffered B prefetch |
//! | [`conv3x3`] | 3×3 stride-1 cross-correlation | 6 live rows, window slides by 4 |
//!
//! All arithmetic wraps at the element width, matching two's-complement
//! hardware. Elements are any [`LaneScalar`] (`i8`, `i16`, `i32`, `i64`).
//!
//! # Quick start
//!
//! ```
//! use vlane_kernels::{matmul, conv3x3};
//!
//! // C = A · B for a 4x3 by 3x2 product.
//! let a = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12i32];
//! let b = vec![1, 0, 0, 1, 1, 1i32];
//! assert_eq!(matmul(&a, 4, 3, &b, 2), vec![4, 5, 10, 11, 16, 17, 22, 23]);
//!
//! // 4x4 convolution output from a 6x6 haloed input.
//! let image = vec![1i8; 36];
//! let kernel = vec![1i8; 9];
//! assert_eq!(conv3x3(&image, &kernel, 4, 4), vec![9i8; 16]);
//! ```
//!
//! # Modules
//!
//! - [`api`]: allocating wrappers, checked `try_*` variants, batched entry
//!   points.
//! - [`core`]: the matmul and convolution engines and the stripe iterator.
//! - [`lane`]: the vector register file the engines run on.
//! - [`types`]: the [`LaneScalar`] element trait.
//! - [`error`]: [`KernelError`].
//!
//! # Features
//!
//! - `parallel`: run the batched APIs on the rayon thread pool.

pub mod api;
pub mod core;
pub mod error;
pub mod lane;
pub mod types;

pub use api::{
    conv3x3, conv3x3_into, matmul, matmul_batched, matmul_into, matmul_strided_batched,
    try_convolve, try_matmul,
};
pub use crate::core::{haloed, FILTER_SIZE, HALO, ROW_BLOCK};
pub use error::{KernelError, Result};
pub use lane::MAX_LANES;
pub use types::LaneScalar;
