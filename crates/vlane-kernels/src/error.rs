//! Error type for the checked API surface.
//!
//! The engines themselves are total functions over caller-validated inputs
//! and report nothing; only the `try_*` entry points in [`crate::api`]
//! validate shapes and return these errors.

use thiserror::Error;

/// Result type alias for the checked kernel API.
pub type Result<T> = std::result::Result<T, KernelError>;

/// Precondition violations detectable from shapes alone.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KernelError {
    /// A dimension that must be at least 1 was zero.
    #[error("dimension {name} must be nonzero")]
    ZeroDimension {
        /// Which dimension was zero.
        name: &'static str,
    },

    /// The output row count is not a multiple of the row-block size.
    #[error("row count {rows} is not a multiple of the row block ({block})")]
    RowsNotBlocked {
        /// Requested row count.
        rows: usize,
        /// Required block size.
        block: usize,
    },

    /// A buffer does not cover its declared extent.
    #[error("{name} buffer covers {got} elements, needs {expected}")]
    BufferTooSmall {
        /// Which operand.
        name: &'static str,
        /// Required element count.
        expected: usize,
        /// Provided element count.
        got: usize,
    },

    /// The filter size is even or not the supported 3.
    #[error("filter size {size} unsupported: must be odd and equal to 3")]
    UnsupportedFilterSize {
        /// Requested filter size.
        size: usize,
    },

    /// The haloed row width exceeds the hardware vector length.
    #[error("haloed width {width} exceeds the maximum lane count {max}")]
    WidthExceedsLanes {
        /// Haloed row width.
        width: usize,
        /// Hardware maximum.
        max: usize,
    },
}
