//! Seed hierarchy for reproducible series.
//!
//! A master seed generates deterministic sub-seeds for each
//! `(symbol, timeframe, iteration)` tuple. Sub-seeds are derived via BLAKE3
//! hashing, so they do not depend on the order in which series are requested
//! or on which thread builds them.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::timeframe::Timeframe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive the sub-seed for one series request.
    pub fn sub_seed(&self, symbol: &str, timeframe: Timeframe, iteration: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        // Separator so ("AB", "1D") and ("A", "B1D") never collide
        hasher.update(&[0]);
        hasher.update(timeframe.tag().as_bytes());
        hasher.update(&iteration.to_le_bytes());
        let hash = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }

    pub fn rng_for(&self, symbol: &str, timeframe: Timeframe, iteration: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(symbol, timeframe, iteration))
    }
}
