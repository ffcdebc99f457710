use rand_distr::{Binomial, BinomialError, Distribution};

use crate::source::Source;

/// Mismatch counts of a correct key against its noisy copy: each of the
/// `block_length` symbols of a block differs independently with probability
/// `p_err`, so a block's count follows `Binomial(block_length, p_err)`.
pub struct ErrorCounts {
    dist: Binomial,
}

impl ErrorCounts {
    pub fn new(block_length: u64, p_err: f64) -> Result<Self, BinomialError> {
        Ok(Self {
            dist: Binomial::new(block_length, p_err)?,
        })
    }

    pub fn sample_block(&self, source: &mut Source) -> u64 {
        self.dist.sample(source)
    }

    pub fn sample_blocks(&self, source: &mut Source, num_blocks: usize) -> Vec<u64> {
        (0..num_blocks).map(|_| self.sample_block(source)).collect()
    }
}
