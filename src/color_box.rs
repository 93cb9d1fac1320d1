use crate::Sample;
use crate::histogram::{quantize_sample, Histogram};

/// One of the three quantized color axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Axis {
    /// Tie-break order: red wins over green, green over blue.
    pub const ALL: [Axis; 3] = [Axis::Red, Axis::Green, Axis::Blue];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// An axis-aligned, inclusive range of quantized color buckets.
///
/// A box carries only its bounds. Population and the representative color
/// are derived from the histogram it is queried against, so copying a box
/// never copies or aliases histogram data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorBox {
    lo: [u8; 3],
    hi: [u8; 3],
}

impl ColorBox {
    /// Box spanning `lo..=hi` on every axis. Bounds are reordered per axis if needed.
    pub fn new(lo: [u8; 3], hi: [u8; 3]) -> Self {
        Self {
            lo: [lo[0].min(hi[0]), lo[1].min(hi[1]), lo[2].min(hi[2])],
            hi: [lo[0].max(hi[0]), lo[1].max(hi[1]), lo[2].max(hi[2])],
        }
    }

    /// Inclusive lower bounds `[r1, g1, b1]`.
    pub fn min(&self) -> [u8; 3] {
        self.lo
    }

    /// Inclusive upper bounds `[r2, g2, b2]`.
    pub fn max(&self) -> [u8; 3] {
        self.hi
    }

    /// Number of buckets along one axis.
    #[inline]
    pub fn extent(&self, axis: Axis) -> u32 {
        let i = axis.index();
        u32::from(self.hi[i] - self.lo[i]) + 1
    }

    /// Number of buckets the box spans; always at least 1.
    pub fn volume(&self) -> u64 {
        Axis::ALL
            .iter()
            .map(|&axis| u64::from(self.extent(axis)))
            .product()
    }

    /// Sum of histogram counts inside the box. Walks every bucket in range.
    pub fn population(&self, histogram: &Histogram) -> u64 {
        let mut n = 0u64;
        for r in self.lo[0]..=self.hi[0] {
            for g in self.lo[1]..=self.hi[1] {
                for b in self.lo[2]..=self.hi[2] {
                    n += u64::from(histogram.get(r, g, b));
                }
            }
        }
        n
    }

    /// Population-weighted mean color, scaled back to 8 bits.
    ///
    /// Each bucket contributes its lower edge plus half a bucket. An empty
    /// box falls back to its geometric center.
    pub fn average_color(&self, histogram: &Histogram) -> rgb::RGB<u8> {
        let shift = 8 - histogram.significant_bits();
        let mult = 1u64 << shift;
        let mut n = 0u64;
        let mut sums = [0u64; 3];

        for r in self.lo[0]..=self.hi[0] {
            for g in self.lo[1]..=self.hi[1] {
                for b in self.lo[2]..=self.hi[2] {
                    let count = u64::from(histogram.get(r, g, b));
                    if count == 0 {
                        continue;
                    }
                    n += count;
                    for (sum, c) in sums.iter_mut().zip([r, g, b]) {
                        *sum += count * u64::from(c) * mult + count * mult / 2;
                    }
                }
            }
        }

        let channel = |axis: usize| -> u8 {
            let value = if n > 0 {
                sums[axis] / n
            } else {
                mult * (u64::from(self.lo[axis]) + u64::from(self.hi[axis]) + 1) / 2
            };
            value.min(255) as u8
        };

        rgb::RGB {
            r: channel(0),
            g: channel(1),
            b: channel(2),
        }
    }

    /// Whether the sample's bucket at `bits` precision falls inside the box.
    pub fn contains(&self, sample: Sample, bits: u32) -> bool {
        let q = quantize_sample(sample, bits);
        (0..3).all(|i| self.lo[i] <= q[i] && q[i] <= self.hi[i])
    }

    /// The 8-bit channel range `[lo, hi]` covered by the box on one axis.
    pub fn channel_range(&self, axis: Axis, bits: u32) -> (u8, u8) {
        let shift = 8 - bits;
        let i = axis.index();
        let lo = u32::from(self.lo[i]) << shift;
        let hi = ((u32::from(self.hi[i]) + 1) << shift) - 1;
        (lo as u8, hi.min(255) as u8)
    }

    /// The one-bucket-thick slab of this box at coordinate `at` on `axis`.
    pub(crate) fn slab(&self, axis: Axis, at: u8) -> ColorBox {
        let i = axis.index();
        let mut slab = *self;
        slab.lo[i] = at;
        slab.hi[i] = at;
        slab
    }

    /// Split along `axis` so that the first box keeps `..=cut` and the
    /// second `cut + 1..`. `cut` must satisfy `lo <= cut < hi` on that axis.
    pub(crate) fn cut(&self, axis: Axis, cut: u8) -> (ColorBox, ColorBox) {
        let i = axis.index();
        debug_assert!(self.lo[i] <= cut && cut < self.hi[i]);
        let mut first = *self;
        let mut second = *self;
        first.hi[i] = cut;
        second.lo[i] = cut + 1;
        (first, second)
    }
}
