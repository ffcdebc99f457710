//! Splitting a target across bins using two adjacent integer values.

use std::fmt;

use crate::{error::DomainError, oracle::check_probability};

/// How per-block success probabilities combine into a joint one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Combination {
    /// Blocks fail independently: the joint probability is the product.
    #[default]
    Product,
    /// Union bound: block failure probabilities add up.
    Additive,
}

impl Combination {
    /// Per-block success probability that, on every one of `bins` blocks,
    /// meets `total` jointly.
    pub fn per_block_target(&self, total: f64, bins: usize) -> f64 {
        match self {
            Combination::Product => total.powf(1.0 / bins as f64),
            Combination::Additive => 1.0 - (1.0 - total) / bins as f64,
        }
    }

    /// Joint success probability of `floor_bins` blocks succeeding with
    /// `floor_prob` and `ceil_bins` blocks with `ceil_prob`.
    pub fn joint(&self, floor_prob: f64, ceil_prob: f64, floor_bins: usize, ceil_bins: usize) -> f64 {
        match self {
            Combination::Product => floor_prob.powf(floor_bins as f64) * ceil_prob.powf(ceil_bins as f64),
            Combination::Additive => {
                1.0 - (floor_bins as f64) * (1.0 - floor_prob) - (ceil_bins as f64) * (1.0 - ceil_prob)
            }
        }
    }

    // Real-valued solution of joint(bins - x, x) = target.
    fn ceil_bins_estimate(&self, floor_prob: f64, ceil_prob: f64, bins: usize, target: f64) -> f64 {
        let m: f64 = bins as f64;
        match self {
            Combination::Product => (target.ln() - m * floor_prob.ln()) / (ceil_prob / floor_prob).ln(),
            Combination::Additive => (m * (1.0 - floor_prob) - (1.0 - target)) / (ceil_prob - floor_prob),
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combination::Product => write!(f, "product"),
            Combination::Additive => write!(f, "additive"),
        }
    }
}

/// `bins` integers of which `ceil_bins` equal `ceil` and the others equal
/// `ceil - 1`. When `ceil` is zero every bin holds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Apportionment {
    ceil: u64,
    ceil_bins: usize,
    bins: usize,
}

impl Apportionment {
    /// Splits `total` into `bins` values that sum exactly to `total`.
    pub fn from_total(total: u64, bins: usize) -> Result<Self, DomainError> {
        if bins == 0 {
            return Err(DomainError::ZeroBins);
        }
        let ceil: u64 = total.div_ceil(bins as u64);
        let ceil_bins: usize = if ceil == 0 {
            bins
        } else {
            (total - (bins as u64) * (ceil - 1)) as usize
        };
        Ok(Self { ceil, ceil_bins, bins })
    }

    /// Smallest number of bins raised to `ceil` such that the joint
    /// probability under `combination` reaches `target`, given that a bin at
    /// `ceil - 1` succeeds with `floor_prob` and one at `ceil` with
    /// `ceil_prob`.
    ///
    /// A zero `floor_prob` (or `ceil == 0`) puts every bin at `ceil`. When
    /// `ceil_prob <= floor_prob` the lower value is as good as the upper one
    /// and every bin stays at `ceil - 1`.
    pub fn from_probability(
        combination: Combination,
        ceil: u64,
        floor_prob: f64,
        ceil_prob: f64,
        bins: usize,
        target: f64,
    ) -> Result<Self, DomainError> {
        if bins == 0 {
            return Err(DomainError::ZeroBins);
        }
        check_probability(floor_prob)?;
        check_probability(ceil_prob)?;
        check_probability(target)?;

        let ceil_bins: usize = if ceil == 0 || floor_prob == 0.0 {
            bins
        } else if ceil_prob <= floor_prob {
            0
        } else {
            let estimate: f64 = combination.ceil_bins_estimate(floor_prob, ceil_prob, bins, target);
            let mut x: usize = if estimate.is_nan() {
                bins
            } else {
                estimate.ceil().clamp(0.0, bins as f64) as usize
            };
            // The closed form is exact over the reals; settle the last step in f64.
            while x < bins && combination.joint(floor_prob, ceil_prob, bins - x, x) < target {
                x += 1;
            }
            while x > 0 && combination.joint(floor_prob, ceil_prob, bins - x + 1, x - 1) >= target {
                x -= 1;
            }
            x
        };

        tracing::trace!(
            %combination,
            ceil,
            floor_prob,
            ceil_prob,
            bins,
            target,
            ceil_bins,
            "apportioned"
        );

        Ok(Self { ceil, ceil_bins, bins })
    }

    pub fn ceil(&self) -> u64 {
        self.ceil
    }

    pub fn ceil_bins(&self) -> usize {
        self.ceil_bins
    }

    pub fn floor_bins(&self) -> usize {
        self.bins - self.ceil_bins
    }

    /// Joint probability realized by this split.
    pub fn joint(&self, combination: Combination, floor_prob: f64, ceil_prob: f64) -> f64 {
        combination.joint(floor_prob, ceil_prob, self.floor_bins(), self.ceil_bins)
    }

    /// Lower values first, then upper values.
    pub fn floor_first(&self) -> Vec<u64> {
        let floor: u64 = self.ceil.saturating_sub(1);
        std::iter::repeat_n(floor, self.floor_bins())
            .chain(std::iter::repeat_n(self.ceil, self.ceil_bins))
            .collect()
    }

    /// Upper values first, then lower values.
    pub fn ceil_first(&self) -> Vec<u64> {
        let floor: u64 = self.ceil.saturating_sub(1);
        std::iter::repeat_n(self.ceil, self.ceil_bins)
            .chain(std::iter::repeat_n(floor, self.floor_bins()))
            .collect()
    }
}
