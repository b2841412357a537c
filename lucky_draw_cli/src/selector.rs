use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{DrawError, DrawResult};

/// Picks the real winner, uniformly, from whatever is still in the pool.
pub struct WinnerSelector {
    rng: StdRng,
}

impl WinnerSelector {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn select(&mut self, remaining: &[u32]) -> DrawResult<u32> {
        remaining.choose(&mut self.rng).copied().ok_or(DrawError::PoolExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn empty_pool_is_exhausted() {
        let mut sel = WinnerSelector::new(StdRng::seed_from_u64(1));
        assert_eq!(sel.select(&[]), Err(DrawError::PoolExhausted));
    }

    #[test]
    fn picks_only_from_remaining() {
        let mut sel = WinnerSelector::new(StdRng::seed_from_u64(2));
        for _ in 0..200 {
            let n = sel.select(&[3, 17, 42]).unwrap();
            assert!([3, 17, 42].contains(&n));
        }
    }

    #[test]
    fn roughly_uniform_over_remaining() {
        let mut sel = WinnerSelector::new(StdRng::seed_from_u64(42));
        let pool: Vec<u32> = (1..=4).collect();
        let mut counts = [0u32; 4];
        for _ in 0..8000 {
            let n = sel.select(&pool).unwrap();
            counts[(n - 1) as usize] += 1;
        }
        // expected 2000 each
        for c in counts {
            assert!((1700..=2300).contains(&c), "skewed counts: {counts:?}");
        }
    }
}
