//! Weekly slot grid.
//!
//! Produces the universe of schedulable time slots: one slot per
//! `(day, sub-interval)` pair, tiling `[day_start, day_end)` with
//! fixed-length slots. With the default parameters (Sun–Thu,
//! 9:00–15:00, 90 minutes) that is 4 slots per day, 20 in total.
//!
//! # Randomized enumeration
//! [`SlotGrid::generate`] shuffles the day order on every call. The set of
//! slots never changes, only the order in which they are enumerated; the
//! scheduler relies on this to explore a different search path per attempt.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{TimeSlot, Weekday};

/// Parameters of the weekly slot grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGrid {
    /// Teaching days.
    pub days: Vec<Weekday>,
    /// First slot start (minutes since midnight).
    pub day_start: u16,
    /// End of the teaching window (minutes since midnight, exclusive).
    pub day_end: u16,
    /// Slot length in minutes.
    pub slot_minutes: u16,
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self {
            days: vec![
                Weekday::Sun,
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
            ],
            day_start: 9 * 60,
            day_end: 15 * 60,
            slot_minutes: 90,
        }
    }
}

impl SlotGrid {
    /// Creates a grid over the given days and window.
    pub fn new(days: Vec<Weekday>, day_start: u16, day_end: u16, slot_minutes: u16) -> Self {
        Self {
            days,
            day_start,
            day_end,
            slot_minutes,
        }
    }

    /// Sets the teaching days.
    pub fn with_days(mut self, days: Vec<Weekday>) -> Self {
        self.days = days;
        self
    }

    /// Sets the slot length.
    pub fn with_slot_minutes(mut self, slot_minutes: u16) -> Self {
        self.slot_minutes = slot_minutes;
        self
    }

    /// Number of whole slots per day.
    pub fn slots_per_day(&self) -> usize {
        if self.slot_minutes == 0 || self.day_end <= self.day_start {
            return 0;
        }
        usize::from((self.day_end - self.day_start) / self.slot_minutes)
    }

    /// Total number of slots in the universe.
    pub fn slot_count(&self) -> usize {
        self.days.len() * self.slots_per_day()
    }

    /// Slots of a single day in chronological order.
    pub fn day_slots(&self, day: Weekday) -> Vec<TimeSlot> {
        (0..self.slots_per_day())
            .map(|i| {
                // slots_per_day() bounds i so the product stays within day_end
                let start = self.day_start + self.slot_minutes * i as u16;
                TimeSlot::new(day, start, start + self.slot_minutes)
            })
            .collect()
    }

    /// Generates the slot universe with a randomly shuffled day order.
    ///
    /// Slots within a day stay chronological; only the day blocks move.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<TimeSlot> {
        let mut days = self.days.clone();
        days.shuffle(rng);
        days.into_iter().flat_map(|d| self.day_slots(d)).collect()
    }

    /// Generates the universe and shuffles the flattened list as well.
    pub fn generate_shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<TimeSlot> {
        let mut slots = self.generate(rng);
        slots.shuffle(rng);
        slots
    }

    /// Position of `slot` within its day's chronological list.
    pub fn day_index(&self, slot: &TimeSlot) -> Option<usize> {
        self.day_slots(slot.day).iter().position(|s| s == slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_default_grid_shape() {
        let grid = SlotGrid::default();
        assert_eq!(grid.slots_per_day(), 4);
        assert_eq!(grid.slot_count(), 20);

        let mon = grid.day_slots(Weekday::Mon);
        let labels: Vec<String> = mon.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            labels,
            vec![
                "Mon_9:00-10:30",
                "Mon_10:30-12:00",
                "Mon_12:00-13:30",
                "Mon_13:30-15:00"
            ]
        );
    }

    #[test]
    fn test_generate_same_universe_every_call() {
        let grid = SlotGrid::default();
        let mut rng = SmallRng::seed_from_u64(7);

        let a: HashSet<TimeSlot> = grid.generate(&mut rng).into_iter().collect();
        let b: HashSet<TimeSlot> = grid.generate_shuffled(&mut rng).into_iter().collect();
        assert_eq!(a.len(), 20);
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_keeps_day_blocks_chronological() {
        let grid = SlotGrid::default();
        let mut rng = SmallRng::seed_from_u64(11);
        let slots = grid.generate(&mut rng);

        for block in slots.chunks(4) {
            assert!(block.iter().all(|s| s.day == block[0].day));
            assert!(block.windows(2).all(|w| w[0].end == w[1].start));
        }
    }

    #[test]
    fn test_day_index() {
        let grid = SlotGrid::default();
        let slot: TimeSlot = "Tue_12:00-13:30".parse().unwrap();
        assert_eq!(grid.day_index(&slot), Some(2));

        let off_grid: TimeSlot = "Tue_12:15-13:45".parse().unwrap();
        assert_eq!(grid.day_index(&off_grid), None);
    }

    #[test]
    fn test_consecutive_matches_day_index_distance() {
        let grid = SlotGrid::default();
        let mon = grid.day_slots(Weekday::Mon);
        for a in &mon {
            for b in &mon {
                let ia = grid.day_index(a).unwrap();
                let ib = grid.day_index(b).unwrap();
                assert_eq!(a.is_consecutive_with(b), ia.abs_diff(ib) == 1);
            }
        }
    }

    #[test]
    fn test_degenerate_grid() {
        let grid = SlotGrid::default().with_slot_minutes(0);
        assert_eq!(grid.slot_count(), 0);
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(grid.generate(&mut rng).is_empty());
    }

    proptest! {
        #[test]
        fn prop_adjacency_symmetric_and_day_scoped(i in 0usize..20, j in 0usize..20) {
            let grid = SlotGrid::default();
            let slots: Vec<TimeSlot> =
                grid.days.iter().flat_map(|d| grid.day_slots(*d)).collect();
            let (a, b) = (slots[i], slots[j]);

            prop_assert_eq!(a.is_consecutive_with(&b), b.is_consecutive_with(&a));
            if a.day != b.day {
                prop_assert!(!a.is_consecutive_with(&b));
            } else {
                let (ia, ib) = (grid.day_index(&a), grid.day_index(&b));
                prop_assert_eq!(
                    a.is_consecutive_with(&b),
                    matches!((ia, ib), (Some(x), Some(y)) if x.abs_diff(y) == 1)
                );
            }
        }
    }
}
