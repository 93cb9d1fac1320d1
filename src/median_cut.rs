extern crate alloc;
use alloc::vec::Vec;

use log::{debug, trace};

use crate::color_box::{Axis, ColorBox};
use crate::histogram::Histogram;
use crate::queue::{BoxQueue, SortStrategy};

/// Result of trying to split one box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOutcome {
    /// Nothing to split: the box is empty, or all of its samples sit in one
    /// bucket. Callers keep the box as it is.
    Unsplittable,
    /// The box holds exactly one sample. It is a leaf and comes back unchanged.
    SinglePixel(ColorBox),
    /// Two non-empty boxes partitioning the parent along one axis.
    Split(ColorBox, ColorBox),
}

/// Split a box at the population median of its widest axis.
///
/// The axis with the largest extent is tried first (red, then green, then
/// blue on ties). If all of the box's samples share one slab on that axis,
/// the next widest axis is used instead. Both halves of a split are
/// guaranteed to hold at least one sample.
pub fn split(color_box: &ColorBox, histogram: &Histogram) -> SplitOutcome {
    match color_box.population(histogram) {
        0 => return SplitOutcome::Unsplittable,
        1 => return SplitOutcome::SinglePixel(*color_box),
        _ => {}
    }

    let mut axes = Axis::ALL;
    axes.sort_by_key(|&axis| core::cmp::Reverse(color_box.extent(axis)));

    for axis in axes {
        if color_box.extent(axis) < 2 {
            break;
        }

        let sums = partial_sums(color_box, axis, histogram);
        let Some(offset) = cut_offset(&sums) else {
            trace!("{axis:?} holds {color_box:?} in a single slab, trying next axis");
            continue;
        };

        let at = color_box.min()[axis.index()] + offset as u8;
        let (first, second) = color_box.cut(axis, at);
        trace!("split {color_box:?} on {axis:?} at {at}");
        return SplitOutcome::Split(first, second);
    }

    SplitOutcome::Unsplittable
}

/// Cumulative population per slab along `axis`, indexed by offset from the
/// box's lower bound. The last entry is the box population.
fn partial_sums(color_box: &ColorBox, axis: Axis, histogram: &Histogram) -> Vec<u64> {
    let i = axis.index();
    let (lo, hi) = (color_box.min()[i], color_box.max()[i]);
    let mut total = 0u64;
    (lo..=hi)
        .map(|at| {
            total += color_box.slab(axis, at).population(histogram);
            total
        })
        .collect()
}

/// Pick the cut offset `c` so that slabs `..=c` and `c + 1..` are both
/// non-empty. `None` if every sample sits in a single slab.
fn cut_offset(sums: &[u64]) -> Option<usize> {
    let n = sums.len();
    if n < 2 {
        return None;
    }
    let total = sums[n - 1];

    // First slab where the running total passes half.
    let median = sums.iter().position(|&s| s > total / 2)?;

    // Move toward the side with more room left.
    let left = median;
    let right = n - 1 - median;
    let mut cut = if left <= right {
        (median + right / 2).min(n - 2)
    } else {
        (median - 1).saturating_sub(left / 2)
    };

    // Nothing at or below the cut: walk up to the first occupied slab.
    while cut < n - 1 && sums[cut] == 0 {
        cut += 1;
    }
    // Nothing above the cut: walk down until something is left over.
    while cut > 0 && total - sums[cut] == 0 {
        cut -= 1;
    }

    (sums[cut] > 0 && total > sums[cut]).then_some(cut)
}

/// Counters from one splitting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStats {
    /// Boxes popped from the queue.
    pub iterations: u32,
    /// Successful splits.
    pub splits: u32,
    /// Whether the phase stopped because of the iteration cap.
    pub capped: bool,
}

/// Pop and split boxes until `colors` reaches `target`, the queue has no
/// splittable box left, or `iteration_cap` pops have happened.
///
/// Boxes that cannot be split are held back for the rest of the phase and
/// queued again before returning.
pub fn run_phase(
    queue: &mut BoxQueue<'_>,
    mut colors: u32,
    target: f64,
    iteration_cap: u32,
) -> PhaseStats {
    let histogram = queue.histogram();
    let mut parked = Vec::new();
    let mut stats = PhaseStats {
        iterations: 0,
        splits: 0,
        capped: false,
    };

    while f64::from(colors) < target {
        if stats.iterations >= iteration_cap {
            stats.capped = true;
            break;
        }
        let Some((id, color_box)) = queue.pop_max() else {
            break;
        };
        stats.iterations += 1;

        match split(&color_box, histogram) {
            SplitOutcome::Unsplittable | SplitOutcome::SinglePixel(_) => parked.push(id),
            SplitOutcome::Split(first, second) => {
                queue.push(first);
                queue.push(second);
                colors += 1;
                stats.splits += 1;
            }
        }
    }

    for id in parked {
        queue.requeue(id);
    }
    stats
}

/// Modified median cut over a histogram.
///
/// Phase one splits the most populous boxes until `population_fraction` of
/// `max_colors` is reached. The boxes are then re-ranked by
/// `population * volume` and split further until `max_colors` boxes exist.
/// Returns the final boxes in `population * volume` order, largest first.
/// There may be fewer than `max_colors` of them.
pub fn median_cut(
    histogram: &Histogram,
    max_colors: u32,
    population_fraction: f32,
    iteration_cap: u32,
) -> Vec<ColorBox> {
    let mut queue = BoxQueue::new(histogram, SortStrategy::Population);
    queue.push(histogram.bounds());

    let target = f64::from(max_colors) * f64::from(population_fraction);
    let stats = run_phase(&mut queue, 1, target, iteration_cap);
    debug!(
        "phase 1: {} boxes after {} iterations ({} splits, capped: {})",
        queue.len(),
        stats.iterations,
        stats.splits,
        stats.capped
    );

    let mut queue = queue.into_strategy(SortStrategy::PopulationTimesVolume);
    let remaining = f64::from(max_colors) - queue.len() as f64;
    let stats = run_phase(&mut queue, 0, remaining, iteration_cap);
    debug!(
        "phase 2: {} boxes after {} iterations ({} splits, capped: {})",
        queue.len(),
        stats.iterations,
        stats.splits,
        stats.capped
    );

    queue.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::vec;

    fn px(r: u8, g: u8, b: u8) -> crate::Sample {
        rgb::RGBA { r, g, b, a: 255 }
    }

    fn hist(samples: &[crate::Sample]) -> Histogram {
        Histogram::from_samples(samples, 5).unwrap()
    }

    #[test]
    fn empty_box_is_unsplittable() {
        let h = hist(&[px(0, 0, 0)]);
        let b = ColorBox::new([10, 10, 10], [20, 20, 20]);
        assert_eq!(split(&b, &h), SplitOutcome::Unsplittable);
    }

    #[test]
    fn single_sample_is_a_leaf() {
        let h = hist(&[px(0, 0, 0), px(255, 255, 255)]);
        let b = ColorBox::new([0, 0, 0], [15, 15, 15]);
        assert_eq!(split(&b, &h), SplitOutcome::SinglePixel(b));
    }

    #[test]
    fn one_bucket_is_unsplittable() {
        let h = hist(&vec![px(100, 100, 100); 10]);
        assert_eq!(split(&h.bounds(), &h), SplitOutcome::Unsplittable);
        // A wide box around that bucket cannot be split either.
        let wide = ColorBox::new([0, 0, 0], [31, 31, 31]);
        assert_eq!(split(&wide, &h), SplitOutcome::Unsplittable);
    }

    #[test]
    fn splits_widest_axis_red_first_on_ties() {
        let h = hist(&[px(0, 0, 0), px(255, 255, 255)]);
        let SplitOutcome::Split(first, second) = split(&h.bounds(), &h) else {
            panic!("expected a split");
        };
        assert_eq!(first.min(), [0, 0, 0]);
        assert_eq!(first.max(), [15, 31, 31]);
        assert_eq!(second.min(), [16, 0, 0]);
        assert_eq!(second.max(), [31, 31, 31]);
        assert_eq!(first.population(&h), 1);
        assert_eq!(second.population(&h), 1);
    }

    #[test]
    fn falls_back_to_next_axis() {
        // Box is widest on red, but both samples share red bucket 0.
        let h = hist(&[px(0, 0, 0), px(0, 40, 0)]);
        let b = ColorBox::new([0, 0, 0], [31, 5, 0]);
        let SplitOutcome::Split(first, second) = split(&b, &h) else {
            panic!("expected a split");
        };
        assert_eq!(first.min()[0], 0);
        assert_eq!(first.max()[0], 31);
        assert_eq!(first.max()[1] + 1, second.min()[1]);
        assert_eq!(first.population(&h), 1);
        assert_eq!(second.population(&h), 1);
    }

    #[test]
    fn cut_offset_balances_mass() {
        // Mass at both ends: median lands on the last slab, cut moves left.
        let sums = [10, 10, 10, 10, 20];
        assert_eq!(cut_offset(&sums), Some(1));
        // Heavy first slab biases right but never past the last gap.
        let sums = [10, 11, 12];
        let cut = cut_offset(&sums).unwrap();
        assert!(cut < 2);
    }

    #[test]
    fn cut_offset_avoids_empty_sides() {
        // Everything in the middle slab except one sample at the end.
        let sums = [0, 0, 9, 9, 9, 10];
        let cut = cut_offset(&sums).unwrap();
        assert!(sums[cut] > 0 && sums[5] > sums[cut]);
        // Single occupied slab.
        assert_eq!(cut_offset(&[0, 0, 5, 5]), None);
        assert_eq!(cut_offset(&[5]), None);
    }

    #[test]
    fn phase_stops_at_target() {
        let samples: Vec<_> = (0..=255u8).map(|v| px(v, v, v)).collect();
        let h = hist(&samples);
        let mut queue = BoxQueue::new(&h, SortStrategy::Population);
        queue.push(h.bounds());
        let stats = run_phase(&mut queue, 1, 6.0, 1000);
        assert_eq!(queue.len(), 6);
        assert_eq!(stats.splits, 5);
        assert!(!stats.capped);
    }

    #[test]
    fn phase_respects_cap() {
        let samples: Vec<_> = (0..=255u8).map(|v| px(v, v, v)).collect();
        let h = hist(&samples);
        let mut queue = BoxQueue::new(&h, SortStrategy::Population);
        queue.push(h.bounds());
        let stats = run_phase(&mut queue, 1, 30.0, 3);
        assert!(stats.capped);
        assert_eq!(stats.iterations, 3);
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn phase_returns_parked_boxes() {
        // Two buckets: one split, then only leaves remain.
        let mut samples = vec![px(0, 0, 0); 4];
        samples.extend([px(255, 255, 255); 4]);
        let h = hist(&samples);
        let mut queue = BoxQueue::new(&h, SortStrategy::Population);
        queue.push(h.bounds());
        let stats = run_phase(&mut queue, 1, 10.0, 1000);
        assert_eq!(stats.splits, 1);
        assert!(!stats.capped);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn median_cut_conserves_population() {
        let samples: Vec<_> = (0..4096u32)
            .map(|i| {
                let h = i.wrapping_mul(2654435761);
                px((h >> 8) as u8, (h >> 16) as u8, (h >> 24) as u8)
            })
            .collect();
        let h = hist(&samples);
        let boxes = median_cut(&h, 16, 0.75, 1000);
        assert!(!boxes.is_empty() && boxes.len() <= 16);
        let total: u64 = boxes.iter().map(|b| b.population(&h)).sum();
        assert_eq!(total, 4096);
    }
}
