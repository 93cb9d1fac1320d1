extern crate alloc;
use alloc::vec::Vec;

use crate::Sample;
use crate::error::QuantizeError;

/// Picks which pixels of a decoded image are worth quantizing.
///
/// Every `quality`-th pixel is visited. Pixels that are mostly transparent,
/// or so close to white that they are likely background, are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFilter {
    /// Stride through the pixel buffer. 1 visits every pixel; larger is
    /// faster but may miss small color regions.
    pub quality: usize,
    /// Pixels with alpha below this are skipped.
    pub min_alpha: u8,
    /// Pixels with all three channels above this are skipped.
    pub white_threshold: u8,
}

impl Default for SampleFilter {
    fn default() -> Self {
        Self {
            quality: 10,
            min_alpha: 125,
            white_threshold: 250,
        }
    }
}

impl SampleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quality(mut self, quality: usize) -> Self {
        self.quality = quality;
        self
    }

    pub fn min_alpha(mut self, alpha: u8) -> Self {
        self.min_alpha = alpha;
        self
    }

    pub fn white_threshold(mut self, threshold: u8) -> Self {
        self.white_threshold = threshold;
        self
    }

    /// Whether a single pixel survives the alpha and near-white filters.
    pub fn keeps(&self, pixel: Sample) -> bool {
        let near_white = pixel.r > self.white_threshold
            && pixel.g > self.white_threshold
            && pixel.b > self.white_threshold;
        pixel.a >= self.min_alpha && !near_white
    }

    /// Collect the samples to quantize from a row-major pixel buffer.
    pub fn sample(&self, pixels: &[Sample]) -> Result<Vec<Sample>, QuantizeError> {
        if self.quality == 0 {
            return Err(QuantizeError::InvalidQuality(0));
        }

        Ok(pixels
            .iter()
            .step_by(self.quality)
            .copied()
            .filter(|&p| self.keeps(p))
            .collect())
    }
}
