//! Empirical acceptance rate of the correct key.

use sampling::{
    errors::ErrorCounts,
    source::{Source, trial_seeds},
};

use crate::{acceptance::BlockDistance, config::Config, error::DomainError};

// Blocks reduced to their mismatch count against the reference.
struct Mismatches;

impl BlockDistance<u64> for Mismatches {
    fn block_distance(&self, a: &u64, b: &u64) -> usize {
        a.abs_diff(*b) as usize
    }
}

/// Fraction of `trials` in which a correct key, whose blocks carry
/// `Binomial(block_length, p_err)` mismatches, passes every block and prefix
/// check of `config`. Trial `i` draws from the `i`-th seed derived from
/// `seed`.
pub fn estimate_acceptance_rate(config: &Config, trials: usize, seed: [u8; 32]) -> Result<f64, DomainError> {
    if trials == 0 {
        return Err(DomainError::ZeroTrials);
    }
    let counts: ErrorCounts = ErrorCounts::new(config.block_length() as u64, config.p_err())
        .map_err(|e| DomainError::Sampler(e.to_string()))?;
    let reference: Vec<u64> = vec![0; config.num_blocks()];

    let mut accepted: usize = 0;
    for trial_seed in trial_seeds(seed, trials) {
        let mut source: Source = Source::new(trial_seed);
        let errors: Vec<u64> = counts.sample_blocks(&mut source, config.num_blocks());
        if config.is_within_radius_all_blocks(&Mismatches, &errors, &reference)? {
            accepted += 1;
        }
    }

    let rate: f64 = accepted as f64 / trials as f64;
    tracing::debug!(trials, accepted, rate, "estimated acceptance rate");
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreconditionViolation;

    #[test]
    fn error_free_channel_always_accepts() {
        let cfg: Config = Config::builder(2, 16, 4).build().unwrap();
        assert_eq!(estimate_acceptance_rate(&cfg, 200, [0u8; 32]).unwrap(), 1.0);
    }

    #[test]
    fn meets_success_rate() {
        let cfg: Config = Config::builder(2, 10, 5)
            .p_err(0.05)
            .success_rate(0.99)
            .build()
            .unwrap();
        let rate: f64 = estimate_acceptance_rate(&cfg, 20_000, [42u8; 32]).unwrap();
        assert!(rate >= 0.985, "rate={rate}");
    }

    #[test]
    fn tight_fixed_radius_rejects_often() {
        let cfg: Config = Config::builder(2, 20, 8).p_err(0.2).radius(0).build().unwrap();
        let rate: f64 = estimate_acceptance_rate(&cfg, 1_000, [1u8; 32]).unwrap();
        assert!(rate < 0.01, "rate={rate}");
    }

    #[test]
    fn reproducible_and_rejects_zero_trials() {
        let cfg: Config = Config::builder(3, 12, 6).p_err(0.1).success_rate(0.9).build().unwrap();
        let a: f64 = estimate_acceptance_rate(&cfg, 500, [9u8; 32]).unwrap();
        let b: f64 = estimate_acceptance_rate(&cfg, 500, [9u8; 32]).unwrap();
        assert_eq!(a, b);
        assert_eq!(estimate_acceptance_rate(&cfg, 0, [9u8; 32]), Err(DomainError::ZeroTrials));
    }

    #[test]
    fn acceptance_violations_surface_as_errors() {
        let cfg: Config = Config::builder(2, 10, 2).p_err(0.1).build().unwrap();
        let x: Vec<u64> = vec![0; 3];
        let checked = || -> Result<bool, DomainError> { Ok(cfg.is_within_radius_all_blocks(&Mismatches, &x, &x)?) };
        let violation = PreconditionViolation::TooManyBlocks { got: 3, max: 2 };
        assert_eq!(checked(), Err(DomainError::Precondition(violation.clone())));
        assert_eq!(DomainError::from(violation.clone()).to_string(), violation.to_string());
    }
}
