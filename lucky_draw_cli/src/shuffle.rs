use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Display-only number source for the spin animation. Never picks winners.
///
/// Walks a shuffled permutation of the range and reshuffles in place each
/// time the cursor wraps, so every value shows up once per pass.
pub struct ShuffleSequencer {
    range: RangeInclusive<u32>,
    order: Vec<u32>,
    cursor: usize,
    rng: StdRng,
}

impl ShuffleSequencer {
    pub fn new(range: RangeInclusive<u32>, rng: StdRng) -> Self {
        Self { range, order: Vec::new(), cursor: 0, rng }
    }

    /// Fresh permutation, cursor back to the start.
    pub fn start(&mut self) {
        self.order = self.range.clone().collect();
        self.order.shuffle(&mut self.rng);
        self.cursor = 0;
    }

    pub fn next(&mut self) -> u32 {
        if self.order.is_empty() {
            self.start();
        }
        let n = self.order[self.cursor];
        self.cursor = (self.cursor + 1) % self.order.len();
        if self.cursor == 0 {
            self.order.shuffle(&mut self.rng);
        }
        n
    }

    pub fn stop(&mut self) {
        self.order.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn one_pass_yields_every_value_once() {
        let mut seq = ShuffleSequencer::new(1..=100, StdRng::seed_from_u64(9));
        seq.start();
        let seen: HashSet<u32> = (0..100).map(|_| seq.next()).collect();
        assert_eq!(seen.len(), 100);
        assert!(seen.iter().all(|n| (1..=100).contains(n)));
    }

    #[test]
    fn second_pass_is_complete_too() {
        let mut seq = ShuffleSequencer::new(1..=10, StdRng::seed_from_u64(3));
        seq.start();
        for _ in 0..10 {
            seq.next();
        }
        let mut second: Vec<u32> = (0..10).map(|_| seq.next()).collect();
        second.sort_unstable();
        assert_eq!(second, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn next_without_start_starts_lazily() {
        let mut seq = ShuffleSequencer::new(5..=5, StdRng::seed_from_u64(1));
        assert_eq!(seq.next(), 5);
        assert_eq!(seq.next(), 5);
        seq.stop();
        assert_eq!(seq.next(), 5);
    }
}
