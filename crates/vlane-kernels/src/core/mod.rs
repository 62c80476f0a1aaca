//! The two blocked kernels and their tile partitioning.
//!
//! Both engines follow one pattern: iterate output tiles, ready the vector
//! register window (slice init / slice preload), sweep the reduction
//! dimension with fused multiply-accumulates, emit the finished tile,
//! advance.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`tiling`] | Column-stripe iterator, [`ROW_BLOCK`](tiling::ROW_BLOCK) |
//! | [`matmul`] | Tiled C = A·B with a double-buffered reduction sweep |
//! | [`conv`] | Tiled 3×3 convolution with a sliding six-row window |

pub mod conv;
pub mod matmul;
pub mod tiling;

pub use conv::{convolve, haloed, FILTER_SIZE, HALO};
pub use matmul::multiply;
pub use tiling::{Stripes, ROW_BLOCK};
