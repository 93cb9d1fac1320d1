extern crate alloc;
use alloc::vec::Vec;

use log::debug;

use crate::Sample;
use crate::color_box::ColorBox;
use crate::histogram::Histogram;

/// One finalized palette slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Quantized region this entry stands for.
    pub bounds: ColorBox,
    /// Representative (population-weighted mean) color of the region.
    pub color: rgb::RGB<u8>,
    /// Samples that fell inside the region.
    pub population: u64,
}

/// The quantized palette plus the boxes that produced it.
///
/// Entries keep the order the splitter finished in, largest
/// `population * volume` first, so the first color is the dominant one.
/// A color map always holds at least one entry.
#[derive(Debug, Clone)]
pub struct ColorMap {
    boxes: Vec<ColorBox>,
    colors: Vec<rgb::RGB<u8>>,
    populations: Vec<u64>,
    bits: u32,
}

impl ColorMap {
    /// Freeze boxes into a palette, computing each representative color once.
    pub(crate) fn from_boxes(boxes: Vec<ColorBox>, histogram: &Histogram) -> Self {
        debug_assert!(!boxes.is_empty());
        let colors: Vec<_> = boxes.iter().map(|b| b.average_color(histogram)).collect();
        let populations = boxes.iter().map(|b| b.population(histogram)).collect();
        debug!("color map finalized with {} entries", colors.len());

        Self {
            boxes,
            colors,
            populations,
            bits: histogram.significant_bits(),
        }
    }

    /// Palette colors, dominant first.
    pub fn palette(&self) -> &[rgb::RGB<u8>] {
        &self.colors
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = PaletteEntry> + '_ {
        self.boxes
            .iter()
            .zip(&self.colors)
            .zip(&self.populations)
            .map(|((&bounds, &color), &population)| PaletteEntry {
                bounds,
                color,
                population,
            })
    }

    /// First palette color.
    pub fn dominant(&self) -> rgb::RGB<u8> {
        self.colors[0]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Bit depth the boxes were built at.
    pub fn significant_bits(&self) -> u32 {
        self.bits
    }

    /// Index of the first entry whose box contains the sample, or of the
    /// nearest entry when no box does.
    pub fn classify_index(&self, sample: Sample) -> usize {
        self.boxes
            .iter()
            .position(|b| b.contains(sample, self.bits))
            .unwrap_or_else(|| self.nearest_index(sample))
    }

    /// Palette color for a sample. See [`ColorMap::classify_index`].
    pub fn classify(&self, sample: Sample) -> rgb::RGB<u8> {
        self.colors[self.classify_index(sample)]
    }

    /// Index of the entry with the smallest RGB distance. The earliest entry
    /// wins ties.
    pub fn nearest_index(&self, sample: Sample) -> usize {
        let mut best_idx = 0;
        let mut best_dist = u32::MAX;

        for (i, color) in self.colors.iter().enumerate() {
            let d = distance_sq(sample, *color);
            if d < best_dist {
                best_dist = d;
                best_idx = i;
            }
        }

        best_idx
    }

    /// Nearest palette color by RGB distance.
    pub fn nearest(&self, sample: Sample) -> rgb::RGB<u8> {
        self.colors[self.nearest_index(sample)]
    }

    /// Map each sample to its palette index.
    pub fn map_to_indices(&self, samples: &[Sample]) -> Vec<usize> {
        samples.iter().map(|&s| self.classify_index(s)).collect()
    }
}

/// Squared Euclidean distance in 8-bit RGB. Alpha is ignored.
fn distance_sq(sample: Sample, color: rgb::RGB<u8>) -> u32 {
    let dr = i32::from(sample.r) - i32::from(color.r);
    let dg = i32::from(sample.g) - i32::from(color.g);
    let db = i32::from(sample.b) - i32::from(color.b);
    (dr * dr + dg * dg + db * db) as u32
}
