use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::error::{DrawError, DrawResult};

/// Tracks which numbers of a closed range have already won.
#[derive(Clone, Debug)]
pub struct Pool {
    range: RangeInclusive<u32>,
    drawn: BTreeSet<u32>,
}

impl Pool {
    pub fn new(range: RangeInclusive<u32>) -> Self {
        Self { range, drawn: BTreeSet::new() }
    }

    pub fn drawn(&self) -> &BTreeSet<u32> {
        &self.drawn
    }

    /// Numbers still drawable, ascending, minus `excluding`.
    pub fn remaining(&self, excluding: &BTreeSet<u32>) -> Vec<u32> {
        self.range
            .clone()
            .filter(|n| !self.drawn.contains(n) && !excluding.contains(n))
            .collect()
    }

    pub fn remaining_count(&self) -> usize {
        self.range.clone().count() - self.drawn.len()
    }

    pub fn commit(&mut self, value: u32) -> DrawResult<()> {
        if !self.range.contains(&value) || !self.drawn.insert(value) {
            return Err(DrawError::InvalidCommit(value));
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.drawn.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_skips_drawn_and_reserved() {
        let mut pool = Pool::new(1..=5);
        pool.commit(2).unwrap();
        let reserved: BTreeSet<u32> = [4].into_iter().collect();
        assert_eq!(pool.remaining(&reserved), vec![1, 3, 5]);
        assert_eq!(pool.remaining(&BTreeSet::new()), vec![1, 3, 4, 5]);
        assert_eq!(pool.remaining_count(), 4);
    }

    #[test]
    fn commit_rejects_duplicates_and_out_of_range() {
        let mut pool = Pool::new(1..=100);
        pool.commit(100).unwrap();
        assert_eq!(pool.commit(100), Err(DrawError::InvalidCommit(100)));
        assert_eq!(pool.commit(0), Err(DrawError::InvalidCommit(0)));
        assert_eq!(pool.commit(101), Err(DrawError::InvalidCommit(101)));
        assert_eq!(pool.drawn().len(), 1);
    }

    #[test]
    fn reset_makes_everything_drawable_again() {
        let mut pool = Pool::new(1..=3);
        for n in 1..=3 {
            pool.commit(n).unwrap();
        }
        assert!(pool.remaining(&BTreeSet::new()).is_empty());
        pool.reset();
        assert_eq!(pool.remaining_count(), 3);
        pool.commit(1).unwrap();
    }
}
