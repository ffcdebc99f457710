use crate::error::DomainError;

/// Key rate, in bits per symbol, left after reconciling a `base`-ary key
/// whose symbols disagree with probability `p_err`.
///
/// The closed form is
/// `log2(q) + p·log2(p) + (1-p)·log2((1-p)/(q-1))`; at `p_err` equal to 0 or
/// 1 it degenerates to `log2(q/(q-1))`.
pub fn theoretic_key_rate(base: u64, p_err: f64) -> Result<f64, DomainError> {
    if base < 2 {
        return Err(DomainError::BaseTooSmall(base));
    }
    if !(0.0..=1.0).contains(&p_err) {
        return Err(DomainError::ProbabilityOutOfRange(p_err));
    }
    let q: f64 = base as f64;
    if p_err == 0.0 || p_err == 1.0 {
        return Ok((q / (q - 1.0)).log2());
    }
    let p: f64 = p_err;
    Ok(q.log2() + p * p.log2() + (1.0 - p) * ((1.0 - p) / (q - 1.0)).log2())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_channels() {
        assert_eq!(theoretic_key_rate(2, 0.0).unwrap(), 1.0);
        assert_eq!(theoretic_key_rate(2, 1.0).unwrap(), 1.0);
        assert!((theoretic_key_rate(4, 0.0).unwrap() - (4.0f64 / 3.0).log2()).abs() < 1e-15);
        for q in 2..10u64 {
            let want: f64 = (q as f64 / (q as f64 - 1.0)).log2();
            assert!((theoretic_key_rate(q, 1.0).unwrap() - want).abs() < 1e-15);
        }
    }

    #[test]
    fn binary_symmetric() {
        // 1 - h(0.11)
        assert!((theoretic_key_rate(2, 0.11).unwrap() - 0.500_084).abs() < 1e-4);
        assert!(theoretic_key_rate(2, 0.5).unwrap().abs() < 1e-15);
    }

    #[test]
    fn stays_in_range() {
        for q in [2u64, 3, 4, 16, 256] {
            let cap: f64 = (q as f64).log2();
            for i in 0..=100 {
                let r: f64 = theoretic_key_rate(q, i as f64 / 100.0).unwrap();
                assert!((-1e-12..=cap + 1e-12).contains(&r), "q={q} p={i}% r={r}");
            }
        }
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(theoretic_key_rate(1, 0.1), Err(DomainError::BaseTooSmall(1)));
        assert_eq!(theoretic_key_rate(2, 1.1), Err(DomainError::ProbabilityOutOfRange(1.1)));
        assert!(theoretic_key_rate(2, f64::NAN).is_err());
    }
}
