use statrs::distribution::{Binomial, DiscreteCDF};

use crate::error::DomainError;

pub(crate) fn check_probability(p: f64) -> Result<(), DomainError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(DomainError::ProbabilityOutOfRange(p))
    }
}

/// CDF and inverse-CDF queries on `Binomial(n, p)`.
///
/// Counts are unsigned, so negative trial or success counts are
/// unrepresentable; probabilities are validated on every call.
pub trait BinomialOracle {
    /// `P[X <= k]` for `X ~ Binomial(n, p)`.
    fn cdf(&self, k: u64, n: u64, p: f64) -> Result<f64, DomainError>;

    /// Smallest `k` in `[0, n]` with `P[X <= k] >= prob`.
    fn quantile(&self, prob: f64, n: u64, p: f64) -> Result<u64, DomainError> {
        check_probability(prob)?;
        check_probability(p)?;
        // The upper tail underflows long before k reaches n.
        if prob == 1.0 && p > 0.0 {
            return Ok(n);
        }
        let (mut lo, mut hi) = (0u64, n);
        while lo < hi {
            let mid: u64 = lo + (hi - lo) / 2;
            if self.cdf(mid, n, p)? >= prob {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        Ok(lo)
    }
}

/// [`BinomialOracle`] backed by `statrs`' regularized incomplete beta.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatrsBinomial;

impl BinomialOracle for StatrsBinomial {
    fn cdf(&self, k: u64, n: u64, p: f64) -> Result<f64, DomainError> {
        check_probability(p)?;
        if k >= n || p == 0.0 {
            return Ok(1.0);
        }
        if p == 1.0 {
            return Ok(0.0);
        }
        let dist: Binomial = Binomial::new(p, n).map_err(|e| DomainError::Oracle(e.to_string()))?;
        Ok(dist.cdf(k))
    }
}
