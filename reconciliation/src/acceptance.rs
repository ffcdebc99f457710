//! Threshold checks on candidate keys.
//!
//! Distances are delegated to a [`BlockDistance`]; this module only compares
//! them against radii.

use itertools::izip;

use crate::error::PreconditionViolation;

/// Mismatch measure between two parties' blocks.
pub trait BlockDistance<B> {
    fn block_distance(&self, a: &B, b: &B) -> usize;

    /// Distance between two equally long runs of blocks. Defaults to the sum
    /// of block distances.
    fn multi_block_distance(&self, x: &[B], y: &[B]) -> usize {
        izip!(x, y).map(|(a, b)| self.block_distance(a, b)).sum()
    }
}

/// Number of positions where two blocks hold different symbols. Extra
/// trailing symbols of the longer block count as mismatches.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hamming;

impl Hamming {
    fn count<T: PartialEq>(a: &[T], b: &[T]) -> usize {
        izip!(a, b).filter(|(x, y)| x != y).count() + a.len().abs_diff(b.len())
    }
}

impl<T: PartialEq> BlockDistance<Vec<T>> for Hamming {
    fn block_distance(&self, a: &Vec<T>, b: &Vec<T>) -> usize {
        Hamming::count(a, b)
    }
}

impl<T: PartialEq, const N: usize> BlockDistance<[T; N]> for Hamming {
    fn block_distance(&self, a: &[T; N], b: &[T; N]) -> usize {
        Hamming::count(a, b)
    }
}

impl<T: PartialEq> BlockDistance<&[T]> for Hamming {
    fn block_distance(&self, a: &&[T], b: &&[T]) -> usize {
        Hamming::count(a, b)
    }
}

/// Acceptance rule of a configuration, fixed for its lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Acceptance {
    /// Every block is held to the same radius.
    Fixed { radius: usize },
    /// Per-block radii plus cumulative radii on every prefix.
    Adaptive {
        max_block_error: Vec<usize>,
        prefix_radii: Vec<usize>,
    },
}

impl Acceptance {
    pub fn is_fixed(&self) -> bool {
        matches!(self, Acceptance::Fixed { .. })
    }

    /// Radius that applies to block `block_index` on its own.
    pub fn block_radius(&self, block_index: usize) -> Option<usize> {
        match self {
            Acceptance::Fixed { radius } => Some(*radius),
            Acceptance::Adaptive { max_block_error, .. } => max_block_error.get(block_index).copied(),
        }
    }

    /// Accepts `x` against `y` on their first `min(len)` blocks, checking
    /// every block and, in adaptive mode, every prefix.
    ///
    /// Adaptive mode requires the compared span to fit in the radii.
    pub fn all_blocks<B, D: BlockDistance<B>>(
        &self,
        metric: &D,
        x: &[B],
        y: &[B],
    ) -> Result<bool, PreconditionViolation> {
        let k: usize = x.len().min(y.len());
        match self {
            Acceptance::Fixed { radius } => Ok(izip!(&x[..k], &y[..k]).all(|(a, b)| metric.block_distance(a, b) <= *radius)),
            Acceptance::Adaptive {
                max_block_error,
                prefix_radii,
            } => {
                check_span(k, max_block_error.len().min(prefix_radii.len()))?;
                let prefixes_ok: bool =
                    (1..=k).all(|j| metric.multi_block_distance(&x[..j], &y[..j]) <= prefix_radii[j - 1]);
                let blocks_ok = || {
                    izip!(&x[..k], &y[..k], max_block_error)
                        .all(|(a, b, &radius)| metric.block_distance(a, b) <= radius)
                };
                Ok(prefixes_ok && blocks_ok())
            }
        }
    }

    /// Checks only the newest block of `x` against `y`, and in adaptive mode
    /// the newest prefix. Shorter prefixes are assumed to have passed.
    pub fn new_block<B, D: BlockDistance<B>>(
        &self,
        metric: &D,
        x: &[B],
        y: &[B],
    ) -> Result<bool, PreconditionViolation> {
        let k: usize = x.len().min(y.len());
        if k == 0 {
            return Err(PreconditionViolation::EmptyCandidate);
        }
        let last: usize = k - 1;
        match self {
            Acceptance::Fixed { radius } => Ok(metric.block_distance(&x[last], &y[last]) <= *radius),
            Acceptance::Adaptive {
                max_block_error,
                prefix_radii,
            } => {
                check_span(k, max_block_error.len().min(prefix_radii.len()))?;
                Ok(metric.multi_block_distance(&x[..k], &y[..k]) <= prefix_radii[last]
                    && metric.block_distance(&x[last], &y[last]) <= max_block_error[last])
            }
        }
    }
}

fn check_span(k: usize, max: usize) -> Result<(), PreconditionViolation> {
    if k > max {
        Err(PreconditionViolation::TooManyBlocks { got: k, max })
    } else {
        Ok(())
    }
}

/// Per-candidate cursor over [`Acceptance::new_block`] that enforces the
/// one-block-at-a-time calling order.
#[derive(Clone, Debug, Default)]
pub struct IncrementalCheck {
    accepted: usize,
    rejected: bool,
}

impl IncrementalCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    /// Checks the candidate extended by exactly one block since the last
    /// call.
    pub fn push<B, D: BlockDistance<B>>(
        &mut self,
        acceptance: &Acceptance,
        metric: &D,
        x: &[B],
        y: &[B],
    ) -> Result<bool, PreconditionViolation> {
        if self.rejected {
            return Err(PreconditionViolation::AlreadyRejected(self.accepted + 1));
        }
        let k: usize = x.len().min(y.len());
        if k != self.accepted + 1 {
            return Err(PreconditionViolation::OutOfOrder {
                expected: self.accepted + 1,
                got: k,
            });
        }
        let ok: bool = acceptance.new_block(metric, x, y)?;
        if ok {
            self.accepted = k;
        } else {
            self.rejected = true;
        }
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adaptive() -> Acceptance {
        Acceptance::Adaptive {
            max_block_error: vec![1, 1, 2],
            prefix_radii: vec![1, 2, 2],
        }
    }

    #[test]
    fn hamming_counts_mismatches() {
        assert_eq!(Hamming.block_distance(&vec![0u8, 1, 2, 3], &vec![0u8, 2, 2, 0]), 2);
        assert_eq!(Hamming.block_distance(&[1u16; 5], &[1u16; 5]), 0);
        let a: &[u32] = &[1, 2, 3];
        let b: &[u32] = &[1, 2];
        assert_eq!(Hamming.block_distance(&a, &b), 1);
        let x: Vec<Vec<u8>> = vec![vec![0, 1], vec![1, 1]];
        let y: Vec<Vec<u8>> = vec![vec![1, 1], vec![0, 0]];
        assert_eq!(Hamming.multi_block_distance(&x, &y), 3);
    }

    #[test]
    fn fixed_checks_each_block() {
        let acc: Acceptance = Acceptance::Fixed { radius: 1 };
        let x: Vec<Vec<u8>> = vec![vec![0, 0, 0], vec![1, 1, 1]];
        let y: Vec<Vec<u8>> = vec![vec![0, 0, 1], vec![1, 0, 0]];
        assert!(!acc.all_blocks(&Hamming, &x, &y).unwrap());
        assert!(acc.all_blocks(&Hamming, &x[..1], &y).unwrap());
        assert!(!acc.new_block(&Hamming, &x, &y).unwrap());
    }

    #[test]
    fn adaptive_prefix_binds_before_blocks() {
        let acc: Acceptance = adaptive();
        let y: Vec<[u8; 4]> = vec![[0; 4]; 3];
        // One error in each block: blocks pass, prefix of 3 has 3 > 2.
        let x: Vec<[u8; 4]> = vec![[1, 0, 0, 0]; 3];
        assert!(acc.all_blocks(&Hamming, &x[..2], &y).unwrap());
        assert!(!acc.all_blocks(&Hamming, &x, &y).unwrap());
        assert!(!acc.new_block(&Hamming, &x, &y).unwrap());
    }

    #[test]
    fn adaptive_block_radius_binds() {
        let acc: Acceptance = adaptive();
        let y: Vec<[u8; 4]> = vec![[0; 4]; 3];
        let x: Vec<[u8; 4]> = vec![[0; 4], [1, 1, 0, 0], [0; 4]];
        assert!(!acc.new_block(&Hamming, &x[..2], &y).unwrap());
        assert!(!acc.all_blocks(&Hamming, &x, &y).unwrap());
    }

    #[test]
    fn span_preconditions() {
        let acc: Acceptance = adaptive();
        let y: Vec<[u8; 1]> = vec![[0]; 4];
        assert_eq!(
            acc.all_blocks(&Hamming, &y, &y),
            Err(PreconditionViolation::TooManyBlocks { got: 4, max: 3 })
        );
        assert_eq!(acc.new_block(&Hamming, &y[..0], &y), Err(PreconditionViolation::EmptyCandidate));
        assert!(acc.all_blocks(&Hamming, &y[..0], &y).unwrap());
    }

    #[test]
    fn span_bounded_by_shorter_radii() {
        let acc: Acceptance = Acceptance::Adaptive {
            max_block_error: vec![2, 2, 2],
            prefix_radii: vec![4],
        };
        let y: Vec<[u8; 2]> = vec![[0; 2]; 3];
        assert_eq!(
            acc.all_blocks(&Hamming, &y, &y),
            Err(PreconditionViolation::TooManyBlocks { got: 3, max: 1 })
        );
        assert_eq!(
            acc.new_block(&Hamming, &y[..2], &y),
            Err(PreconditionViolation::TooManyBlocks { got: 2, max: 1 })
        );
        assert!(acc.new_block(&Hamming, &y[..1], &y).unwrap());
    }

    #[test]
    fn incremental_enforces_order() {
        let acc: Acceptance = adaptive();
        let y: Vec<[u8; 2]> = vec![[0; 2]; 3];
        let x: Vec<[u8; 2]> = vec![[0, 1], [0, 0], [1, 1]];
        let mut check: IncrementalCheck = IncrementalCheck::new();
        assert_eq!(
            check.push(&acc, &Hamming, &x[..2], &y),
            Err(PreconditionViolation::OutOfOrder { expected: 1, got: 2 })
        );
        assert!(check.push(&acc, &Hamming, &x[..1], &y).unwrap());
        assert!(check.push(&acc, &Hamming, &x[..2], &y).unwrap());
        assert!(!check.push(&acc, &Hamming, &x[..3], &y).unwrap());
        assert!(check.is_rejected());
        assert_eq!(check.accepted(), 2);
        assert_eq!(
            check.push(&acc, &Hamming, &x[..3], &y),
            Err(PreconditionViolation::AlreadyRejected(3))
        );
    }
}
