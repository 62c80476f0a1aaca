//! Tiled 3×3 stride-1 convolution engine.
//!
//! Computes a 2D cross-correlation of a haloed input plane against a 3×3
//! filter, producing [`ROW_BLOCK`] output rows per pass. The input carries a
//! halo of `FILTER_SIZE - 1` extra columns and rows (split evenly around the
//! output region by the caller's layout), so the engine never bounds-checks
//! inside a row: it computes at the haloed width and narrows the lane count
//! to the output width only for the final stores.
//!
//! A pass keeps six live input rows in the register window. The two rows a
//! pass shares with the next one (its rows 4–5) are moved to the front of
//! the window instead of being reloaded from memory, the row-sliding reuse
//! that distinguishes this design from a naive convolution. The slide is
//! pure bookkeeping; results are identical to reloading (see
//! `test_window_slide_equivalence`).
//!
//! Filter taps are consumed column-by-column: for each of the three tap
//! columns, one scalar per filter row is broadcast against the (slid) input
//! rows. Column c's contribution is aligned with column 0's output position
//! by sliding every live row down by c lanes first.

use crate::lane::{VectorUnit, Vreg};
use crate::types::LaneScalar;

use super::tiling::ROW_BLOCK;

/// Filter edge length. The engine is specialized to 3×3.
pub const FILTER_SIZE: usize = 3;

/// Extra input columns (and rows) beyond the output extent.
pub const HALO: usize = FILTER_SIZE - 1;

/// Live input rows per pass: the block's four rows plus two of lookback.
const WINDOW_ROWS: usize = ROW_BLOCK + HALO;

/// The loaded-row window. `WIN[0..HALO]` are the preloaded rows, the rest
/// are fetched each pass.
const WIN: [Vreg; WINDOW_ROWS] = [Vreg(0), Vreg(1), Vreg(2), Vreg(3), Vreg(4), Vreg(5)];

/// Slide targets, one per live row.
const SH: [Vreg; WINDOW_ROWS] = [Vreg(6), Vreg(7), Vreg(8), Vreg(9), Vreg(10), Vreg(11)];

/// One accumulator per output row of the pass.
const ACC: [Vreg; ROW_BLOCK] = [Vreg(12), Vreg(13), Vreg(14), Vreg(15)];

/// 3×3 cross-correlation of `i` into `o` (`rows` × `cols` output).
///
/// `i` is `(rows + HALO) × (cols + HALO)` row-major; `f` is 3×3 row-major.
/// Preconditions (caller contract): `rows % ROW_BLOCK == 0`, `cols >= 1`,
/// `cols + HALO <= MAX_LANES`.
pub fn convolve<T: LaneScalar>(o: &mut [T], i: &[T], f: &[T], rows: usize, cols: usize) {
    let ivl = haloed(cols);
    check_shapes(o, i, f, rows, cols);

    let mut vu = VectorUnit::new();

    // First block: nothing to reuse yet, fetch the two lookback rows.
    slice_preload(&mut vu, i, ivl);
    conv_pass(&mut vu, o, &i[HALO * ivl..], f, cols, ivl);

    for rb in (ROW_BLOCK..rows).step_by(ROW_BLOCK) {
        // Rows 4-5 of the finished pass become the next pass's preload.
        slice_move(&mut vu, ivl);
        conv_pass(
            &mut vu,
            &mut o[rb * cols..],
            &i[(rb + HALO) * ivl..],
            f,
            cols,
            ivl,
        );
    }
}

/// Haloed width of an output extent, which is also the input row stride.
#[inline]
pub fn haloed(extent: usize) -> usize {
    extent + HALO
}

fn check_shapes<T>(o: &[T], i: &[T], f: &[T], rows: usize, cols: usize) {
    let ivl = haloed(cols);
    debug_assert_eq!(rows % ROW_BLOCK, 0, "rows must be a multiple of {}", ROW_BLOCK);
    debug_assert!(cols >= 1, "cols must be nonzero");
    debug_assert!(
        ivl <= crate::lane::MAX_LANES,
        "haloed width {} exceeds MAX_LANES",
        ivl
    );
    debug_assert!(i.len() >= haloed(rows) * ivl, "input does not cover haloed extent");
    debug_assert!(o.len() >= rows * cols, "output does not cover rows x cols");
    debug_assert!(f.len() >= FILTER_SIZE * FILTER_SIZE, "filter is not 3x3");
}

/// Fetch the first `HALO` input rows into the front of the window.
fn slice_preload<T: LaneScalar>(vu: &mut VectorUnit<T>, i: &[T], ivl: usize) {
    for (r, win) in WIN.iter().take(HALO).enumerate() {
        vu.load(*win, &i[r * ivl..], ivl);
    }
}

/// Move the last `HALO` live rows to the front of the window, reusing two
/// already-loaded rows instead of re-reading them.
fn slice_move<T: LaneScalar>(vu: &mut VectorUnit<T>, ivl: usize) {
    for r in 0..HALO {
        vu.mov(WIN[r], WIN[ROW_BLOCK + r], ivl);
    }
}

/// The taps of filter column `col`, one scalar per filter row.
#[inline]
fn tap_column<T: LaneScalar>(f: &[T], col: usize) -> [T; FILTER_SIZE] {
    std::array::from_fn(|row| f[row * FILTER_SIZE + col])
}

/// Produce four output rows: load the block's four input rows, accumulate
/// the three tap columns, and store at the narrowed lane count.
///
/// `i` points at the first un-preloaded input row of the block; `o` points
/// at the block's first output row.
fn conv_pass<T: LaneScalar>(
    vu: &mut VectorUnit<T>,
    o: &mut [T],
    i: &[T],
    f: &[T],
    cols: usize,
    ivl: usize,
) {
    for r in 0..ROW_BLOCK {
        vu.load(WIN[HALO + r], &i[r * ivl..], ivl);
    }

    // Tap column 0 initializes the accumulators (unshifted rows): output
    // row j is a 3-row dot product over input rows j, j+1, j+2.
    let t = tap_column(f, 0);
    for (j, acc) in ACC.iter().enumerate() {
        vu.broadcast_mul(*acc, WIN[j], t[0], ivl);
    }
    for (row, &tap) in t.iter().enumerate().skip(1) {
        for (j, acc) in ACC.iter().enumerate() {
            vu.mul_acc(*acc, tap, WIN[j + row], ivl);
        }
    }

    // Tap columns 1 and 2: slide every live row so column c's contribution
    // lands on column 0's output position, then accumulate. The slides are
    // rewritten each column, so no stale shift is ever consumed.
    for col in 1..FILTER_SIZE {
        for w in 0..WINDOW_ROWS {
            vu.slide_down(SH[w], WIN[w], col, ivl);
        }
        let t = tap_column(f, col);
        for (row, &tap) in t.iter().enumerate() {
            for (j, acc) in ACC.iter().enumerate() {
                vu.mul_acc(*acc, tap, SH[j + row], ivl);
            }
        }
    }

    // Narrow to the output width: the halo lanes are dropped here.
    for (j, acc) in ACC.iter().enumerate() {
        vu.store(*acc, &mut o[j * cols..], cols);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct-definition 2D cross-correlation under wrapping arithmetic.
    fn convolve_ref<T: LaneScalar>(i: &[T], f: &[T], rows: usize, cols: usize) -> Vec<T> {
        let ivl = haloed(cols);
        let mut o = vec![T::ZERO; rows * cols];
        for r in 0..rows {
            for c in 0..cols {
                let mut acc = T::ZERO;
                for dr in 0..FILTER_SIZE {
                    for dc in 0..FILTER_SIZE {
                        acc = acc
                            .mul_add_wrap(i[(r + dr) * ivl + (c + dc)], f[dr * FILTER_SIZE + dc]);
                    }
                }
                o[r * cols + c] = acc;
            }
        }
        o
    }

    /// Naive strategy: reload the lookback rows from memory every pass
    /// instead of sliding the window.
    fn convolve_reload<T: LaneScalar>(o: &mut [T], i: &[T], f: &[T], rows: usize, cols: usize) {
        let ivl = haloed(cols);
        let mut vu = VectorUnit::new();
        for rb in (0..rows).step_by(ROW_BLOCK) {
            slice_preload(&mut vu, &i[rb * ivl..], ivl);
            conv_pass(&mut vu, &mut o[rb * cols..], &i[(rb + HALO) * ivl..], f, cols, ivl);
        }
    }

    fn run<T: LaneScalar>(i: &[T], f: &[T], rows: usize, cols: usize) -> Vec<T> {
        let mut o = vec![T::ZERO; rows * cols];
        convolve(&mut o, i, f, rows, cols);
        o
    }

    #[test]
    fn test_all_ones_averaging_filter() {
        // 4x4 output from a 6x6 all-ones input and an all-ones filter:
        // every output pixel sums nine unit taps.
        let input = vec![1i8; 6 * 6];
        let filter = vec![1i8; 9];

        let o = run(&input, &filter, 4, 4);
        assert_eq!(o, vec![9i8; 16]);
    }

    #[test]
    fn test_identity_filter() {
        // Center-only tap reproduces the input's interior.
        let rows = 4;
        let cols = 5;
        let ivl = haloed(cols);
        let input: Vec<i8> = (0..haloed(rows) * ivl).map(|i| (i % 100) as i8).collect();
        let filter = [0, 0, 0, 0, 1, 0, 0, 0, 0i8];

        let o = run(&input, &filter, rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                assert_eq!(o[r * cols + c], input[(r + 1) * ivl + (c + 1)]);
            }
        }
    }

    #[test]
    fn test_matches_reference() {
        let rows = 8;
        let cols = 6;
        let ivl = haloed(cols);
        let input: Vec<i8> = (0..haloed(rows) * ivl)
            .map(|i| ((i * 37) % 251) as i8)
            .collect();
        let filter: Vec<i8> = (0..9).map(|i| (i as i8) - 4).collect();

        assert_eq!(run(&input, &filter, rows, cols), convolve_ref(&input, &filter, rows, cols));
    }

    #[test]
    fn test_window_slide_equivalence() {
        // Sliding reuse is a pure performance optimization: reloading the
        // lookback rows every pass must produce bit-identical output.
        let rows = 12;
        let cols = 7;
        let ivl = haloed(cols);
        let input: Vec<i8> = (0..haloed(rows) * ivl)
            .map(|i| ((i * 101 + 13) % 255) as u8 as i8)
            .collect();
        let filter: Vec<i8> = (0..9).map(|i| ((i * 29) % 17) as i8 - 8).collect();

        let slid = run(&input, &filter, rows, cols);
        let mut reloaded = vec![0i8; rows * cols];
        convolve_reload(&mut reloaded, &input, &filter, rows, cols);

        assert_eq!(slid, reloaded);
        assert_eq!(slid, convolve_ref(&input, &filter, rows, cols));
    }

    #[test]
    fn test_wrapping_not_saturating() {
        // 9 taps of 100 * 1: 900 mod 256 = 132 -> -124 as i8.
        let input = vec![100i8; 6 * 6];
        let filter = vec![1i8; 9];

        let o = run(&input, &filter, 4, 4);
        assert_eq!(o, vec![-124i8; 16]);
    }

    #[test]
    fn test_single_column_output() {
        let rows = 4;
        let cols = 1;
        let ivl = haloed(cols);
        let input: Vec<i8> = (0..haloed(rows) * ivl).map(|i| i as i8).collect();
        let filter: Vec<i8> = vec![1, 2, 1, 2, 4, 2, 1, 2, 1];

        assert_eq!(run(&input, &filter, rows, cols), convolve_ref(&input, &filter, rows, cols));
    }

    #[test]
    fn test_many_row_blocks() {
        // Three passes, two window slides.
        let rows = 12;
        let cols = 4;
        let ivl = haloed(cols);
        let input: Vec<i8> = (0..haloed(rows) * ivl)
            .map(|i| ((i * 7) % 127) as i8 - 50)
            .collect();
        let filter: Vec<i8> = vec![-1, 0, 1, -2, 0, 2, -1, 0, 1];

        assert_eq!(run(&input, &filter, rows, cols), convolve_ref(&input, &filter, rows, cols));
    }
}
