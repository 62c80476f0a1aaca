//! Safe, high-level entry points for the two kernels.
//!
//! The allocating wrappers assert the documented preconditions and panic on
//! violation; shape bugs are programming errors, not runtime conditions.
//! The `try_*` variants validate the same preconditions and return
//! [`KernelError`] instead, for callers assembling shapes at runtime.

use tracing::debug;

use crate::core::{self, conv, matmul, ROW_BLOCK};
use crate::error::{KernelError, Result};
use crate::lane::MAX_LANES;
use crate::types::LaneScalar;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Dense matrix product `C = A · B`.
///
/// `a` is M×N and `b` is N×P, both row-major. Returns the M×P result.
///
/// # Panics
///
/// If `m` is not a multiple of 4, any dimension is zero, or a slice does
/// not cover its declared extent.
///
/// # Example
///
/// ```
/// use vlane_kernels::matmul;
///
/// let a = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12i32]; // 4x3
/// let b = vec![1, 0, 0, 1, 1, 1i32]; // 3x2
///
/// let c = matmul(&a, 4, 3, &b, 2);
/// assert_eq!(c, vec![4, 5, 10, 11, 16, 17, 22, 23]);
/// ```
pub fn matmul<T: LaneScalar>(a: &[T], m: usize, n: usize, b: &[T], p: usize) -> Vec<T> {
    let mut c = vec![T::ZERO; m * p];
    matmul_into(&mut c, a, b, m, n, p);
    c
}

/// [`matmul`] writing into a caller-owned M×P buffer.
pub fn matmul_into<T: LaneScalar>(c: &mut [T], a: &[T], b: &[T], m: usize, n: usize, p: usize) {
    assert_eq!(m % ROW_BLOCK, 0, "M must be a multiple of {}", ROW_BLOCK);
    assert!(n >= 1 && p >= 1, "N and P must be nonzero");
    assert_eq!(a.len(), m * n, "A dimensions mismatch");
    assert_eq!(b.len(), n * p, "B dimensions mismatch");
    assert_eq!(c.len(), m * p, "C dimensions mismatch");

    debug!(m, n, p, stripe = MAX_LANES, "matmul");
    matmul::multiply(c, a, b, m, n, p);
}

/// Checked [`matmul`]: returns an error instead of panicking.
///
/// ```
/// use vlane_kernels::{try_matmul, KernelError};
///
/// let err = try_matmul(&[0i32; 6], 2, 3, &[0i32; 6], 2).unwrap_err();
/// assert_eq!(err, KernelError::RowsNotBlocked { rows: 2, block: 4 });
/// ```
pub fn try_matmul<T: LaneScalar>(
    a: &[T],
    m: usize,
    n: usize,
    b: &[T],
    p: usize,
) -> Result<Vec<T>> {
    if m == 0 {
        return Err(KernelError::ZeroDimension { name: "M" });
    }
    if n == 0 {
        return Err(KernelError::ZeroDimension { name: "N" });
    }
    if p == 0 {
        return Err(KernelError::ZeroDimension { name: "P" });
    }
    if m % ROW_BLOCK != 0 {
        return Err(KernelError::RowsNotBlocked {
            rows: m,
            block: ROW_BLOCK,
        });
    }
    check_len("A", a.len(), m * n)?;
    check_len("B", b.len(), n * p)?;

    Ok(matmul(a, m, n, b, p))
}

/// Batched matrix product: `C[i] = A[i] · B[i]` for each pair.
///
/// Every pair shares the same dimensions. Each multiplication owns its own
/// vector unit, so the batch elements are independent; with the `parallel`
/// feature they run on the rayon thread pool.
pub fn matmul_batched<T: LaneScalar>(
    a_batch: &[Vec<T>],
    b_batch: &[Vec<T>],
    m: usize,
    n: usize,
    p: usize,
) -> Vec<Vec<T>> {
    assert_eq!(
        a_batch.len(),
        b_batch.len(),
        "Batch sizes must match: A has {} matrices, B has {}",
        a_batch.len(),
        b_batch.len()
    );

    #[cfg(feature = "parallel")]
    {
        a_batch
            .par_iter()
            .zip(b_batch.par_iter())
            .map(|(a, b)| matmul(a, m, n, b, p))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        a_batch
            .iter()
            .zip(b_batch.iter())
            .map(|(a, b)| matmul(a, m, n, b, p))
            .collect()
    }
}

/// Strided batched product over contiguous storage: all A matrices packed
/// back-to-back in `a`, likewise `b`; returns the packed C matrices.
pub fn matmul_strided_batched<T: LaneScalar>(
    a: &[T],
    b: &[T],
    batch_size: usize,
    m: usize,
    n: usize,
    p: usize,
) -> Vec<T> {
    let a_stride = m * n;
    let b_stride = n * p;
    let c_stride = m * p;

    assert_eq!(a.len(), batch_size * a_stride, "A size mismatch");
    assert_eq!(b.len(), batch_size * b_stride, "B size mismatch");

    if batch_size == 0 {
        return Vec::new();
    }

    let mut c = vec![T::ZERO; batch_size * c_stride];

    #[cfg(feature = "parallel")]
    {
        c.par_chunks_mut(c_stride).enumerate().for_each(|(i, c_chunk)| {
            let a_slice = &a[i * a_stride..(i + 1) * a_stride];
            let b_slice = &b[i * b_stride..(i + 1) * b_stride];
            matmul_into(c_chunk, a_slice, b_slice, m, n, p);
        });
    }

    #[cfg(not(feature = "parallel"))]
    {
        for i in 0..batch_size {
            let a_slice = &a[i * a_stride..(i + 1) * a_stride];
            let b_slice = &b[i * b_stride..(i + 1) * b_stride];
            let c_slice = &mut c[i * c_stride..(i + 1) * c_stride];
            matmul_into(c_slice, a_slice, b_slice, m, n, p);
        }
    }

    c
}

/// 3×3 stride-1 cross-correlation of a haloed input plane.
///
/// `input` is `(rows + 2) × (cols + 2)` row-major (one pixel of halo on
/// every side); `filter` is 3×3 row-major. Returns the `rows × cols`
/// output.
///
/// # Panics
///
/// If `rows` is not a multiple of 4, `cols` is zero, the haloed width
/// exceeds the hardware lane count, or a slice does not cover its extent.
///
/// # Example
///
/// ```
/// use vlane_kernels::conv3x3;
///
/// // 6x6 all-ones input, all-ones filter: every output pixel sums 9 taps.
/// let input = vec![1i8; 36];
/// let filter = vec![1i8; 9];
///
/// let o = conv3x3(&input, &filter, 4, 4);
/// assert_eq!(o, vec![9i8; 16]);
/// ```
pub fn conv3x3<T: LaneScalar>(input: &[T], filter: &[T], rows: usize, cols: usize) -> Vec<T> {
    let mut o = vec![T::ZERO; rows * cols];
    conv3x3_into(&mut o, input, filter, rows, cols);
    o
}

/// [`conv3x3`] writing into a caller-owned `rows × cols` buffer.
pub fn conv3x3_into<T: LaneScalar>(
    o: &mut [T],
    input: &[T],
    filter: &[T],
    rows: usize,
    cols: usize,
) {
    let ivl = core::haloed(cols);
    assert_eq!(rows % ROW_BLOCK, 0, "rows must be a multiple of {}", ROW_BLOCK);
    assert!(cols >= 1, "cols must be nonzero");
    assert!(ivl <= MAX_LANES, "haloed width exceeds the lane count");
    assert_eq!(input.len(), core::haloed(rows) * ivl, "input dimensions mismatch");
    assert_eq!(filter.len(), conv::FILTER_SIZE * conv::FILTER_SIZE, "filter is not 3x3");
    assert_eq!(o.len(), rows * cols, "output dimensions mismatch");

    debug!(rows, cols, haloed_width = ivl, "conv3x3");
    conv::convolve(o, input, filter, rows, cols);
}

/// Checked convolution with an explicit filter size.
///
/// `filter_size` must be odd; this core supports exactly 3. The input is
/// `(rows + filter_size - 1) × (cols + filter_size - 1)`.
///
/// ```
/// use vlane_kernels::{try_convolve, KernelError};
///
/// let err = try_convolve(&[0i8; 36], &[0i8; 25], 4, 4, 5).unwrap_err();
/// assert_eq!(err, KernelError::UnsupportedFilterSize { size: 5 });
/// ```
pub fn try_convolve<T: LaneScalar>(
    input: &[T],
    filter: &[T],
    rows: usize,
    cols: usize,
    filter_size: usize,
) -> Result<Vec<T>> {
    if filter_size % 2 == 0 || filter_size != conv::FILTER_SIZE {
        return Err(KernelError::UnsupportedFilterSize { size: filter_size });
    }
    if rows == 0 {
        return Err(KernelError::ZeroDimension { name: "rows" });
    }
    if cols == 0 {
        return Err(KernelError::ZeroDimension { name: "cols" });
    }
    if rows % ROW_BLOCK != 0 {
        return Err(KernelError::RowsNotBlocked {
            rows,
            block: ROW_BLOCK,
        });
    }
    let ivl = core::haloed(cols);
    if ivl > MAX_LANES {
        return Err(KernelError::WidthExceedsLanes {
            width: ivl,
            max: MAX_LANES,
        });
    }
    check_len("input", input.len(), core::haloed(rows) * ivl)?;
    check_len("filter", filter.len(), filter_size * filter_size)?;

    Ok(conv3x3(input, filter, rows, cols))
}

fn check_len(name: &'static str, got: usize, expected: usize) -> Result<()> {
    if got < expected {
        return Err(KernelError::BufferTooSmall {
            name,
            expected,
            got,
        });
    }
    Ok(())
}
