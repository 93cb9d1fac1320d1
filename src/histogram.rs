extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::Sample;
use crate::color_box::ColorBox;

/// Pack reduced channels into a single bucket key at the given bit depth.
#[inline]
pub fn color_index(r: u8, g: u8, b: u8, bits: u32) -> usize {
    ((r as usize) << (bits * 2)) | ((g as usize) << bits) | b as usize
}

/// Drop the low `8 - bits` bits of each channel.
#[inline]
pub fn quantize_sample(sample: Sample, bits: u32) -> [u8; 3] {
    let shift = 8 - bits;
    [sample.r >> shift, sample.g >> shift, sample.b >> shift]
}

/// Sample counts per quantized color bucket.
///
/// Buckets are stored densely (`2^(3 * bits)` slots), so lookups of empty
/// buckets are just zero. The histogram is built once per quantization and
/// only ever read afterwards; boxes borrow it.
#[derive(Debug, Clone)]
pub struct Histogram {
    counts: Vec<u32>,
    bits: u32,
    distinct: usize,
    total: u64,
    bounds: ColorBox,
}

impl Histogram {
    /// Count every sample into its bucket. Returns `None` for an empty slice.
    ///
    /// `bits` must already be validated to lie in `1..=8`.
    pub fn from_samples(samples: &[Sample], bits: u32) -> Option<Self> {
        let first = quantize_sample(*samples.first()?, bits);
        let mut counts = vec![0u32; 1usize << (bits * 3)];
        let mut distinct = 0;
        let mut lo = first;
        let mut hi = first;

        for &sample in samples {
            let q = quantize_sample(sample, bits);
            for axis in 0..3 {
                lo[axis] = lo[axis].min(q[axis]);
                hi[axis] = hi[axis].max(q[axis]);
            }

            let slot = &mut counts[color_index(q[0], q[1], q[2], bits)];
            if *slot == 0 {
                distinct += 1;
            }
            *slot = slot.saturating_add(1);
        }

        Some(Self {
            counts,
            bits,
            distinct,
            total: samples.len() as u64,
            bounds: ColorBox::new(lo, hi),
        })
    }

    /// Count for one bucket, zero when nothing landed there or when a
    /// coordinate lies outside the `2^bits` cube.
    #[inline]
    pub fn get(&self, r: u8, g: u8, b: u8) -> u32 {
        let side = 1u32 << self.bits;
        if [r, g, b].iter().any(|&c| u32::from(c) >= side) {
            return 0;
        }
        self.counts
            .get(color_index(r, g, b, self.bits))
            .copied()
            .unwrap_or(0)
    }

    /// Number of non-empty buckets.
    pub fn distinct(&self) -> usize {
        self.distinct
    }

    /// Number of samples counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Smallest box enclosing every non-empty bucket.
    pub fn bounds(&self) -> ColorBox {
        self.bounds
    }

    pub fn significant_bits(&self) -> u32 {
        self.bits
    }
}
