//! Per-block and per-prefix error budgets.
//!
//! Half of the failure budget `1 - success_rate` funds the per-block radii,
//! the other half is split evenly over the `M` prefix checks.

use crate::{
    apportion::{Apportionment, Combination},
    error::DomainError,
    oracle::{BinomialOracle, check_probability},
};

/// Per-block radii: `num_blocks` values taking two adjacent integers, lower
/// values first.
pub fn max_block_errors<O: BinomialOracle>(
    oracle: &O,
    block_length: usize,
    num_blocks: usize,
    p_err: f64,
    success_rate: f64,
    combination: Combination,
) -> Result<Vec<u64>, DomainError> {
    check_probability(success_rate)?;
    let total: f64 = (1.0 + success_rate) / 2.0;
    let per_block: f64 = combination.per_block_target(total, num_blocks);
    let n: u64 = block_length as u64;

    let ceil_k: u64 = oracle.quantile(per_block, n, p_err)?;
    let ceil_prob: f64 = oracle.cdf(ceil_k, n, p_err)?;
    let floor_prob: f64 = match ceil_k.checked_sub(1) {
        Some(floor_k) => oracle.cdf(floor_k, n, p_err)?,
        None => 0.0,
    };

    let split: Apportionment =
        Apportionment::from_probability(combination, ceil_k, floor_prob, ceil_prob, num_blocks, total)?;
    tracing::debug!(
        %combination,
        ceil_k,
        ceil_bins = split.ceil_bins(),
        joint = split.joint(combination, floor_prob, ceil_prob),
        target = total,
        "per-block radii"
    );
    Ok(split.floor_first())
}

/// Cumulative radii: entry `j - 1` bounds the mismatches of the first `j`
/// blocks together.
pub fn prefix_radii<O: BinomialOracle>(
    oracle: &O,
    block_length: usize,
    num_blocks: usize,
    p_err: f64,
    success_rate: f64,
) -> Result<Vec<u64>, DomainError> {
    check_probability(success_rate)?;
    let per_prefix: f64 = 1.0 - (1.0 - success_rate) / (2 * num_blocks) as f64;
    (1..=num_blocks)
        .map(|j| oracle.quantile(per_prefix, (j * block_length) as u64, p_err))
        .collect()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::oracle::StatrsBinomial;

    #[test]
    fn block_radii_example() {
        let radii: Vec<u64> = max_block_errors(&StatrsBinomial, 10, 5, 0.05, 0.99, Combination::Product).unwrap();
        assert_eq!(radii, vec![3, 3, 3, 3, 4]);
        let radii: Vec<u64> = max_block_errors(&StatrsBinomial, 10, 5, 0.05, 0.99, Combination::Additive).unwrap();
        assert_eq!(radii, vec![3, 3, 3, 3, 4]);
    }

    #[test]
    fn prefix_radii_example() {
        let radii: Vec<u64> = prefix_radii(&StatrsBinomial, 10, 5, 0.05, 0.99).unwrap();
        assert_eq!(radii.len(), 5);
        assert_eq!(radii[0], 4);
        assert_eq!(radii[4], 8);
    }

    #[test]
    fn block_radii_meet_joint_target() {
        let o: StatrsBinomial = StatrsBinomial;
        for &(l, m, p, s) in &[(8, 16, 0.1, 0.95), (32, 4, 0.02, 0.999), (16, 64, 0.25, 0.9), (5, 3, 0.5, 0.5)] {
            let radii: Vec<u64> = max_block_errors(&o, l, m, p, s, Combination::Product).unwrap();
            let joint: f64 = radii
                .iter()
                .map(|&k| o.cdf(k, l as u64, p).unwrap())
                .product();
            assert!(joint >= (1.0 + s) / 2.0 - 1e-12, "l={l} m={m} p={p} s={s} joint={joint}");
            let (lo, hi) = radii.iter().minmax().into_option().unwrap();
            assert!(hi - lo <= 1);
        }
    }

    #[test]
    fn prefix_radii_non_decreasing() {
        for &(l, m, p, s) in &[(10, 20, 0.05, 0.99), (4, 50, 0.3, 0.9), (64, 8, 0.01, 0.9999)] {
            let radii: Vec<u64> = prefix_radii(&StatrsBinomial, l, m, p, s).unwrap();
            assert!(radii.iter().tuple_windows().all(|(a, b)| a <= b), "{radii:?}");
        }
    }

    #[test]
    fn certain_error_fills_every_block() {
        let radii: Vec<u64> = max_block_errors(&StatrsBinomial, 6, 4, 1.0, 0.9, Combination::Product).unwrap();
        assert_eq!(radii, vec![6; 4]);
    }

    #[test]
    fn full_success_rate() {
        let radii: Vec<u64> = max_block_errors(&StatrsBinomial, 6, 4, 0.1, 1.0, Combination::Product).unwrap();
        assert_eq!(radii, vec![6; 4]);
        let radii: Vec<u64> = prefix_radii(&StatrsBinomial, 6, 4, 0.1, 1.0).unwrap();
        assert_eq!(radii, vec![6, 12, 18, 24]);
    }
}
