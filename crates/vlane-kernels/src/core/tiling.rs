//! Tile partitioning for the blocked kernels.

/// Output rows produced per row block. Both engines carry four row
/// accumulators, so row counts must be multiples of this.
pub const ROW_BLOCK: usize = 4;

/// Iterator over column stripes: yields `(offset, width)` pairs covering
/// `0..total`, each stripe no wider than `max_width`. Only the last stripe
/// may be narrower.
///
/// ```rust
/// use vlane_kernels::core::tiling::Stripes;
///
/// let stripes: Vec<_> = Stripes::new(10, 4).collect();
/// assert_eq!(stripes, vec![(0, 4), (4, 4), (8, 2)]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Stripes {
    offset: usize,
    total: usize,
    max_width: usize,
}

impl Stripes {
    /// Partition `total` columns into stripes of at most `max_width`.
    pub fn new(total: usize, max_width: usize) -> Self {
        debug_assert!(max_width > 0, "stripe width must be nonzero");
        Self {
            offset: 0,
            total,
            max_width,
        }
    }
}

impl Iterator for Stripes {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.offset >= self.total {
            return None;
        }
        let offset = self.offset;
        let width = self.max_width.min(self.total - offset);
        self.offset += width;
        Some((offset, width))
    }
}
