//! Tiled matrix-multiply engine.
//!
//! Computes `C = A · B` (A: M×N, B: N×P, C: M×P, row-major) by partitioning
//! the P columns of B/C into lane-width stripes and the M rows of A/C into
//! blocks of [`ROW_BLOCK`] rows. Within a row block the engine keeps four
//! lane-wide accumulators (one per output row) and sweeps the shared
//! dimension N, streaming one row of B against four scalars pulled from A.
//!
//! The sweep is software-pipelined through two alternating B-row buffers:
//! the load of row k+1 is issued before the multiply-accumulate that
//! consumes row k, so a hardware implementation hides load latency behind
//! arithmetic. The toggle is an explicit buffer index; correctness does not
//! depend on the overlap.

use crate::lane::{VectorUnit, Vreg, MAX_LANES};
use crate::types::LaneScalar;

use super::tiling::{Stripes, ROW_BLOCK};

/// One accumulator register per output row of the current block.
const ACC: [Vreg; ROW_BLOCK] = [Vreg(0), Vreg(1), Vreg(2), Vreg(3)];

/// The two alternating B-row prefetch buffers.
const B_BUF: [Vreg; 2] = [Vreg(4), Vreg(5)];

/// `C = A · B` with the hardware-maximum stripe width.
///
/// Preconditions (caller contract, not validated here beyond debug builds):
/// `m % ROW_BLOCK == 0`, `n >= 1`, `p >= 1`, and all three slices cover
/// their full row-major extents.
pub fn multiply<T: LaneScalar>(c: &mut [T], a: &[T], b: &[T], m: usize, n: usize, p: usize) {
    multiply_striped(c, a, b, m, n, p, MAX_LANES);
}

/// [`multiply`] with an explicit stripe cap. The result is independent of
/// the cap; narrower stripes only change the tile iteration order.
pub(crate) fn multiply_striped<T: LaneScalar>(
    c: &mut [T],
    a: &[T],
    b: &[T],
    m: usize,
    n: usize,
    p: usize,
    stripe_cap: usize,
) {
    debug_assert_eq!(m % ROW_BLOCK, 0, "M must be a multiple of {}", ROW_BLOCK);
    debug_assert!(n >= 1 && p >= 1, "N and P must be nonzero");
    debug_assert!(a.len() >= m * n, "A does not cover M x N");
    debug_assert!(b.len() >= n * p, "B does not cover N x P");
    debug_assert!(c.len() >= m * p, "C does not cover M x P");

    let mut vu = VectorUnit::new();

    for (col, width) in Stripes::new(p, stripe_cap.min(MAX_LANES)) {
        for mb in (0..m).step_by(ROW_BLOCK) {
            slice_init(&mut vu, width);
            reduction_sweep(&mut vu, a, b, mb, col, n, p, width);

            // Emit the finished block in ascending row order, stride P.
            for (r, acc) in ACC.iter().enumerate() {
                vu.store(*acc, &mut c[(mb + r) * p + col..], width);
            }
        }
    }
}

/// Zero the four row accumulators for a fresh block.
fn slice_init<T: LaneScalar>(vu: &mut VectorUnit<T>, width: usize) {
    for acc in ACC {
        vu.splat_zero(acc, width);
    }
}

/// The four scalars of A's column `k` within the row block at `mb`.
#[inline]
fn a_scalars<T: LaneScalar>(a: &[T], mb: usize, k: usize, n: usize) -> [T; ROW_BLOCK] {
    std::array::from_fn(|r| a[(mb + r) * n + k])
}

/// Sweep the shared dimension: consume N rows of B and N columns of A,
/// accumulating into the four row accumulators.
fn reduction_sweep<T: LaneScalar>(
    vu: &mut VectorUnit<T>,
    a: &[T],
    b: &[T],
    mb: usize,
    col: usize,
    n: usize,
    p: usize,
    width: usize,
) {
    let mut cur = 0;

    // Lookahead of one: B row 0 and A column 0 are in flight before the
    // first multiply-accumulate issues.
    vu.load(B_BUF[cur], &b[col..], width);
    let mut t = a_scalars(a, mb, 0, n);

    let mut k = 0;
    loop {
        k += 1;
        if k == n {
            // Last scalar triple consumed; no further row exists, so no
            // prefetch may be issued. This is what keeps odd N in bounds.
            macc_rows(vu, B_BUF[cur], t, width);
            break;
        }

        // Issue the load of row k before consuming row k-1's data.
        vu.load(B_BUF[cur ^ 1], &b[k * p + col..], width);
        macc_rows(vu, B_BUF[cur], t, width);
        t = a_scalars(a, mb, k, n);
        cur ^= 1;
    }
}

/// Multiply-accumulate one B row into all four row accumulators.
#[inline]
fn macc_rows<T: LaneScalar>(vu: &mut VectorUnit<T>, b_row: Vreg, t: [T; ROW_BLOCK], width: usize) {
    for (acc, scalar) in ACC.iter().zip(t) {
        vu.mul_acc(*acc, scalar, b_row, width);
    }
}
