//! Modified median cut color quantization.
//!
//! Reduces a set of pixel samples to a small palette ordered by visual
//! weight, so the first color can serve as the image's dominant color.
//!
//! ```
//! let pixels: Vec<rgb::RGBA<u8>> = (0..=255u8)
//!     .map(|v| rgb::RGBA { r: v, g: 255 - v, b: v / 2, a: 255 })
//!     .collect();
//!
//! let config = mmcq::QuantizeConfig::new().max_colors(8);
//! let map = mmcq::quantize(&pixels, &config).unwrap();
//! assert!(map.len() <= 8);
//! let _dominant = map.dominant();
//! let _nearest = map.classify(pixels[0]);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod color_box;
pub mod error;
pub mod histogram;
pub mod median_cut;
pub mod palette;
pub mod queue;
pub mod sampling;

pub use color_box::ColorBox;
pub use error::QuantizeError;
pub use histogram::Histogram;
pub use median_cut::{split, SplitOutcome};
pub use palette::{ColorMap, PaletteEntry};
pub use queue::{BoxQueue, SortStrategy};
pub use sampling::SampleFilter;

use alloc::vec::Vec;

use log::debug;

/// A pixel sample as handed over by the image decoder.
pub type Sample = rgb::RGBA<u8>;

/// Configuration for palette quantization.
#[derive(Debug, Clone)]
pub struct QuantizeConfig {
    /// Maximum number of palette colors (2..=256).
    pub max_colors: u32,
    /// Bits kept per channel when bucketing colors (1..=8).
    ///
    /// The histogram holds `2^(3 * bits)` buckets and every split walks the
    /// buckets of the box it cuts, so 8 bits (16M buckets) costs far more
    /// than the default 5 (32K buckets).
    pub significant_bits: u32,
    /// Upper bound on boxes popped per splitting phase.
    pub iteration_cap: u32,
    /// Share of `max_colors` produced by the population-ranked first phase,
    /// in (0, 1]. The rest comes from the population-times-volume phase.
    pub population_fraction: f32,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            max_colors: 5,
            significant_bits: 5,
            iteration_cap: 1000,
            population_fraction: 0.75,
        }
    }
}

impl QuantizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_colors(mut self, n: u32) -> Self {
        self.max_colors = n;
        self
    }

    pub fn significant_bits(mut self, bits: u32) -> Self {
        self.significant_bits = bits;
        self
    }

    pub fn iteration_cap(mut self, cap: u32) -> Self {
        self.iteration_cap = cap;
        self
    }

    pub fn population_fraction(mut self, fraction: f32) -> Self {
        self.population_fraction = fraction;
        self
    }

    fn validate(&self) -> Result<(), QuantizeError> {
        if self.max_colors < 2 || self.max_colors > 256 {
            return Err(QuantizeError::InvalidMaxColors(self.max_colors));
        }
        if self.significant_bits < 1 || self.significant_bits > 8 {
            return Err(QuantizeError::InvalidSignificantBits(self.significant_bits));
        }
        if self.iteration_cap == 0 {
            return Err(QuantizeError::InvalidIterationCap(self.iteration_cap));
        }
        // Written so that NaN fails too.
        if !(self.population_fraction > 0.0 && self.population_fraction <= 1.0) {
            return Err(QuantizeError::InvalidPopulationFraction(
                self.population_fraction,
            ));
        }
        Ok(())
    }
}

/// Quantize samples into a color map of at most `config.max_colors` entries.
///
/// Fails when there are no samples, the configuration is out of range, or
/// the samples fall into no more than `max_colors` distinct buckets. The
/// palette can come out shorter than requested when the histogram is sparse
/// or a phase hits its iteration cap.
pub fn quantize(samples: &[Sample], config: &QuantizeConfig) -> Result<ColorMap, QuantizeError> {
    config.validate()?;

    let histogram = Histogram::from_samples(samples, config.significant_bits)
        .ok_or(QuantizeError::EmptyInput)?;
    if histogram.distinct() <= config.max_colors as usize {
        return Err(QuantizeError::InsufficientColors {
            distinct: histogram.distinct(),
            max_colors: config.max_colors,
        });
    }
    debug!(
        "quantizing {} samples in {} buckets to {} colors",
        histogram.total(),
        histogram.distinct(),
        config.max_colors
    );

    let boxes = median_cut::median_cut(
        &histogram,
        config.max_colors,
        config.population_fraction,
        config.iteration_cap,
    );

    Ok(ColorMap::from_boxes(boxes, &histogram))
}

/// Filter an image's pixels and extract up to `max_colors` palette colors,
/// dominant first.
pub fn extract_palette(
    pixels: &[Sample],
    filter: &SampleFilter,
    max_colors: u32,
) -> Result<Vec<rgb::RGB<u8>>, QuantizeError> {
    let samples = filter.sample(pixels)?;
    let config = QuantizeConfig::new().max_colors(max_colors);
    Ok(quantize(&samples, &config)?.palette().to_vec())
}

/// The first color of a five color palette.
pub fn dominant_color(
    pixels: &[Sample],
    filter: &SampleFilter,
) -> Result<rgb::RGB<u8>, QuantizeError> {
    let samples = filter.sample(pixels)?;
    Ok(quantize(&samples, &QuantizeConfig::new())?.dominant())
}
