use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};
use rand_core::RngCore;

/// Deterministic ChaCha8 stream. Two sources built from the same seed yield
/// the same sequence.
pub struct Source {
    source: ChaCha8Rng,
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha8Rng::from_seed(seed),
        }
    }

    /// Derives an independent child source, returning its seed alongside it
    /// so the child can be replayed on its own.
    pub fn branch(&mut self) -> ([u8; 32], Self) {
        let seed: [u8; 32] = self.new_seed();
        (seed, Source::new(seed))
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.fill_bytes(&mut seed);
        seed
    }

    /// Uniform in `[0, max)`, by rejection on `next_u64() & mask`.
    /// `mask` must cover `max - 1`.
    #[inline(always)]
    pub fn next_u64n(&mut self, max: u64, mask: u64) -> u64 {
        let mut x: u64 = self.next_u64() & mask;
        while x >= max {
            x = self.next_u64() & mask;
        }
        x
    }
}

/// Expands `master` into `count` per-trial seeds.
pub fn trial_seeds(master: [u8; 32], count: usize) -> Vec<[u8; 32]> {
    let mut source: Source = Source::new(master);
    (0..count).map(|_| source.new_seed()).collect()
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a: Source = Source::new([7u8; 32]);
        let mut b: Source = Source::new([7u8; 32]);
        (0..16).for_each(|_| assert_eq!(a.next_u64(), b.next_u64()));
    }

    #[test]
    fn branch_is_replayable() {
        let mut parent: Source = Source::new([1u8; 32]);
        let (seed, mut child) = parent.branch();
        let mut replay: Source = Source::new(seed);
        (0..16).for_each(|_| assert_eq!(child.next_u64(), replay.next_u64()));
    }

    #[test]
    fn trial_seeds_are_distinct_and_stable() {
        let seeds: Vec<[u8; 32]> = trial_seeds([3u8; 32], 8);
        assert_eq!(seeds.len(), 8);
        assert_eq!(seeds, trial_seeds([3u8; 32], 8));
        for i in 0..seeds.len() {
            for j in i + 1..seeds.len() {
                assert_ne!(seeds[i], seeds[j]);
            }
        }
    }

    #[test]
    fn next_u64n_stays_below_max() {
        let mut source: Source = Source::new([0u8; 32]);
        (0..1000).for_each(|_| assert!(source.next_u64n(5, 7) < 5));
    }
}
