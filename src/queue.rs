extern crate alloc;
use alloc::vec::Vec;

use crate::color_box::ColorBox;
use crate::histogram::Histogram;

/// How boxes are ranked when choosing the next one to split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStrategy {
    /// Most samples first.
    Population,
    /// Largest `population * volume` first. Favors boxes that are both
    /// heavy and spread out.
    PopulationTimesVolume,
}

impl SortStrategy {
    pub fn priority(self, color_box: &ColorBox, histogram: &Histogram) -> u64 {
        self.rank(color_box, color_box.population(histogram))
    }

    #[inline]
    fn rank(self, color_box: &ColorBox, population: u64) -> u64 {
        match self {
            Self::Population => population,
            Self::PopulationTimesVolume => population.saturating_mul(color_box.volume()),
        }
    }
}

/// Stable handle to a box stored in a [`BoxQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoxId(u32);

/// Max-priority queue of color boxes over one shared histogram.
///
/// Boxes live in an arena and the queue holds their handles. A box never
/// changes once pushed, so its population is counted once on `push` and every
/// `pop_max` ranks from that count. Equal priorities resolve to the earliest
/// pushed box.
#[derive(Debug)]
pub struct BoxQueue<'h> {
    histogram: &'h Histogram,
    strategy: SortStrategy,
    arena: Vec<(ColorBox, u64)>,
    pending: Vec<BoxId>,
}

impl<'h> BoxQueue<'h> {
    pub fn new(histogram: &'h Histogram, strategy: SortStrategy) -> Self {
        Self {
            histogram,
            strategy,
            arena: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn strategy(&self) -> SortStrategy {
        self.strategy
    }

    pub fn histogram(&self) -> &'h Histogram {
        self.histogram
    }

    /// Store a new box and queue it.
    pub fn push(&mut self, color_box: ColorBox) -> BoxId {
        let id = BoxId(self.arena.len() as u32);
        let population = color_box.population(self.histogram);
        self.arena.push((color_box, population));
        self.pending.push(id);
        id
    }

    /// Put a previously popped box back without copying it.
    pub fn requeue(&mut self, id: BoxId) {
        debug_assert!(!self.pending.contains(&id));
        self.pending.push(id);
    }

    /// Remove and return the highest ranked box.
    pub fn pop_max(&mut self) -> Option<(BoxId, ColorBox)> {
        let mut best: Option<(usize, BoxId, u64)> = None;
        for (slot, &id) in self.pending.iter().enumerate() {
            let (color_box, population) = &self.arena[id.0 as usize];
            let priority = self.strategy.rank(color_box, *population);
            let better = match best {
                None => true,
                Some((_, best_id, best_priority)) => {
                    priority > best_priority || (priority == best_priority && id < best_id)
                }
            };
            if better {
                best = Some((slot, id, priority));
            }
        }

        let (slot, id, _) = best?;
        self.pending.swap_remove(slot);
        Some((id, self.arena[id.0 as usize].0))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queued boxes in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ColorBox> + '_ {
        self.pending.iter().map(|id| &self.arena[id.0 as usize].0)
    }

    /// Drain this queue in priority order into a fresh queue ranked by `strategy`.
    pub fn into_strategy(mut self, strategy: SortStrategy) -> BoxQueue<'h> {
        let mut next = BoxQueue::new(self.histogram, strategy);
        while let Some((_, color_box)) = self.pop_max() {
            next.push(color_box);
        }
        next
    }
}

impl Iterator for BoxQueue<'_> {
    type Item = ColorBox;

    /// Pops in priority order.
    fn next(&mut self) -> Option<Self::Item> {
        self.pop_max().map(|(_, color_box)| color_box)
    }
}
