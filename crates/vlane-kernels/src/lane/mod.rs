//! The vector-lane abstraction: a software model of a fixed-width vector
//! unit.
//!
//! [`VectorUnit`] owns a bank of [`NUM_REGS`] wide registers, each
//! [`MAX_LANES`] elements. Every operation takes an explicit lane count
//! `vl`; there is no hidden "current vector length" configuration state, so
//! a register window used at one width can be narrowed or widened freely
//! between operations (the convolution engine computes at the haloed width
//! and stores at the output width).
//!
//! Side effects are confined to named registers; the unit holds no other
//! state. A fresh unit per kernel invocation gives each call exclusive
//! ownership of its register window.
//!
//! # Lanes beyond `vl`
//!
//! Operations only define the first `vl` lanes of their destination.
//! [`slide_down`](VectorUnit::slide_down) additionally leaves lanes at and
//! beyond `vl - offset` unspecified (they keep whatever the register last
//! held). Both engines either overwrite such lanes before reading them or
//! never read them at all; the unit does not zero them.
//!
//! # Example
//!
//! ```rust
//! use vlane_kernels::lane::{VectorUnit, Vreg};
//!
//! let mut vu = VectorUnit::<i32>::new();
//! vu.load(Vreg(0), &[1, 2, 3, 4], 4);
//! vu.broadcast_mul(Vreg(1), Vreg(0), 10, 4);
//! vu.mul_acc(Vreg(1), 1, Vreg(0), 4);
//!
//! let mut out = [0i32; 4];
//! vu.store(Vreg(1), &mut out, 4);
//! assert_eq!(out, [11, 22, 33, 44]);
//! ```

use crate::types::LaneScalar;

/// Hardware maximum vector length: the widest `vl` any operation accepts.
pub const MAX_LANES: usize = 64;

/// Number of architectural vector registers.
pub const NUM_REGS: usize = 32;

/// Index of a vector register, valid in `0..NUM_REGS`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Vreg(pub usize);

/// A modeled vector unit: register file plus lane-wise operations.
///
/// Registers are plain `[T; MAX_LANES]` rows; a vector operation is an
/// ordinary loop over the first `vl` lanes, executing to completion before
/// the next operation issues. The software-pipelining in the engines is the
/// program-order overlap of loads and arithmetic, not concurrency.
pub struct VectorUnit<T> {
    regs: [[T; MAX_LANES]; NUM_REGS],
}

impl<T: LaneScalar> VectorUnit<T> {
    /// A unit with every register zeroed.
    pub fn new() -> Self {
        Self {
            regs: [[T::default(); MAX_LANES]; NUM_REGS],
        }
    }

    #[inline]
    fn check(vreg: Vreg, vl: usize) {
        debug_assert!(vreg.0 < NUM_REGS, "register index {} out of range", vreg.0);
        debug_assert!(vl <= MAX_LANES, "vl {} exceeds MAX_LANES {}", vl, MAX_LANES);
    }

    /// Load `vl` contiguous elements from `src` into `dst`.
    ///
    /// The caller guarantees `src.len() >= vl`; a shorter slice panics (the
    /// slice-index equivalent of reading past a buffer).
    #[inline]
    pub fn load(&mut self, dst: Vreg, src: &[T], vl: usize) {
        Self::check(dst, vl);
        self.regs[dst.0][..vl].copy_from_slice(&src[..vl]);
    }

    /// Store the first `vl` lanes of `src` into `dst`.
    #[inline]
    pub fn store(&self, src: Vreg, dst: &mut [T], vl: usize) {
        Self::check(src, vl);
        dst[..vl].copy_from_slice(&self.regs[src.0][..vl]);
    }

    /// Zero the first `vl` lanes of `dst`.
    #[inline]
    pub fn splat_zero(&mut self, dst: Vreg, vl: usize) {
        Self::check(dst, vl);
        self.regs[dst.0][..vl].fill(T::ZERO);
    }

    /// `dst[i] = src[i] * scalar` for the first `vl` lanes.
    #[inline]
    pub fn broadcast_mul(&mut self, dst: Vreg, src: Vreg, scalar: T, vl: usize) {
        Self::check(dst, vl);
        Self::check(src, vl);
        let src_row = self.regs[src.0];
        for i in 0..vl {
            self.regs[dst.0][i] = src_row[i].mul_wrap(scalar);
        }
    }

    /// `dst[i] += scalar * src[i]` for the first `vl` lanes: the fused
    /// multiply-accumulate both engines reduce through.
    #[inline]
    pub fn mul_acc(&mut self, dst: Vreg, scalar: T, src: Vreg, vl: usize) {
        Self::check(dst, vl);
        Self::check(src, vl);
        let src_row = self.regs[src.0];
        for i in 0..vl {
            let acc = self.regs[dst.0][i];
            self.regs[dst.0][i] = acc.mul_add_wrap(scalar, src_row[i]);
        }
    }

    /// `dst[i] = src[i + offset]` for `i + offset < vl`. Lanes in
    /// `vl - offset .. vl` of `dst` are unspecified (left untouched).
    #[inline]
    pub fn slide_down(&mut self, dst: Vreg, src: Vreg, offset: usize, vl: usize) {
        Self::check(dst, vl);
        Self::check(src, vl);
        let src_row = self.regs[src.0];
        for i in 0..vl.saturating_sub(offset) {
            self.regs[dst.0][i] = src_row[i + offset];
        }
    }

    /// `dst[i] = src[i]` for the first `vl` lanes.
    #[inline]
    pub fn mov(&mut self, dst: Vreg, src: Vreg, vl: usize) {
        Self::check(dst, vl);
        Self::check(src, vl);
        let src_row = self.regs[src.0];
        self.regs[dst.0][..vl].copy_from_slice(&src_row[..vl]);
    }
}

impl<T: LaneScalar> Default for VectorUnit<T> {
    fn default() -> Self {
        Self::new()
    }
}
