use crate::{apportion::Apportionment, capacity::theoretic_key_rate, error::DomainError};

/// Total number of parity checks the reconciliation must disclose.
pub trait CheckCounter {
    fn required_checks(&self, key_length: usize, base: u64, p_err: f64) -> Result<u64, DomainError>;
}

/// Discloses exactly the symbols not covered by the channel capacity:
/// `ceil(key_length * (log2 q - rate) / log2 q)`, capped at `key_length`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CapacityBound;

impl CheckCounter for CapacityBound {
    fn required_checks(&self, key_length: usize, base: u64, p_err: f64) -> Result<u64, DomainError> {
        let rate: f64 = theoretic_key_rate(base, p_err)?;
        let symbol_bits: f64 = (base as f64).log2();
        let checks: f64 = (key_length as f64 * (symbol_bits - rate) / symbol_bits).ceil();
        Ok((checks.max(0.0) as u64).min(key_length as u64))
    }
}

/// Per-block parity-check counts summing exactly to the required total,
/// larger counts first.
pub fn number_of_encodings<C: CheckCounter>(
    counter: &C,
    key_length: usize,
    base: u64,
    p_err: f64,
    num_blocks: usize,
) -> Result<Vec<u64>, DomainError> {
    let total: u64 = counter.required_checks(key_length, base, p_err)?;
    Ok(Apportionment::from_total(total, num_blocks)?.ceil_first())
}
