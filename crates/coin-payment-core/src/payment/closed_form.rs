//! Closed-form statistics of the payment over a uniformly random ordering.
//!
//! For a bag of n coins, the payment is the total variation of the walk
//! `0, c1, c2, ..., cn`. Summing the expected absolute gap over every
//! consecutive pair gives the mean `(n + 1)(2n + 1) / 6`; the variance
//! follows from the covariance of overlapping gaps and reduces to
//! `(40n³ - 35n² - 10n + 65) / 900` for n > 1.

use crate::error::CoinPaymentError;
use crate::payment::bag::BagSize;
use crate::types::Payment;
use crate::CoinPaymentResult;

/// Largest payment any ordering of `n` coins can produce: `n(n + 1) / 2`.
///
/// Attained by the zig-zag ordering `n, 1, n - 1, 2, ...`. No validation.
pub fn payment_max(n: u64) -> Payment {
    n * (n + 1) / 2
}

/// Expected payment for a bag of `n` coins.
///
/// Fails with [`CoinPaymentError::InvalidParameter`] unless `n` is a
/// positive integer.
pub fn payment_mean<N>(n: N) -> CoinPaymentResult<f64>
where
    N: TryInto<BagSize, Error = CoinPaymentError>,
{
    let n = n.try_into()?.as_f64();
    Ok((2.0 * n * n + 3.0 * n + 1.0) / 6.0)
}

/// Variance of the payment for a bag of `n` coins. Zero for a single coin.
pub fn payment_variance<N>(n: N) -> CoinPaymentResult<f64>
where
    N: TryInto<BagSize, Error = CoinPaymentError>,
{
    let size = n.try_into()?;
    if size.get() == 1 {
        return Ok(0.0);
    }
    let n = size.as_f64();
    Ok((40.0 * n.powi(3) - 35.0 * n.powi(2) - 10.0 * n + 65.0) / 900.0)
}

/// Standard deviation of the payment for a bag of `n` coins.
///
/// A single coin always pays 1, so `payment_std(1)` is exactly zero.
pub fn payment_std<N>(n: N) -> CoinPaymentResult<f64>
where
    N: TryInto<BagSize, Error = CoinPaymentError>,
{
    Ok(payment_variance(n)?.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-6 * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_payment_max_known_values() {
        let cases = [(1, 1), (2, 3), (3, 6), (4, 10), (7, 28), (8, 36), (10, 55)];
        for (n, expected) in cases {
            assert_eq!(payment_max(n), expected, "n={n}");
        }
    }

    #[test]
    fn test_payment_mean_known_values() {
        let cases = [
            (1, 1.0),
            (2, 2.5),
            (3, 4.666666),
            (4, 7.5),
            (7, 20.0),
            (8, 25.5),
            (10, 38.5),
        ];
        for (n, expected) in cases {
            assert_close(payment_mean(n).unwrap(), expected);
        }
    }

    #[test]
    fn test_payment_std_known_values() {
        let cases = [
            (1, 0.0),
            (2, 0.5),
            (3, 0.942809),
            (4, 1.5),
            (7, 3.651484),
            (8, 4.5),
            (10, 6.365270),
        ];
        for (n, expected) in cases {
            assert_close(payment_std(n).unwrap(), expected);
        }
    }

    #[test]
    fn test_payment_std_single_coin_is_exactly_zero() {
        assert_eq!(payment_std(1).unwrap(), 0.0);
        assert_eq!(payment_variance(1).unwrap(), 0.0);
    }

    #[test]
    fn test_variance_is_std_squared() {
        for n in 2..=20_u64 {
            let std = payment_std(n).unwrap();
            assert_close(payment_variance(n).unwrap(), std * std);
        }
    }

    #[test]
    fn test_integral_float_accepted() {
        assert_eq!(payment_mean(4.0).unwrap(), payment_mean(4).unwrap());
        assert_eq!(payment_std(4.0).unwrap(), payment_std(4).unwrap());
    }

    #[test]
    fn test_payment_mean_rejects_invalid() {
        assert!(matches!(
            payment_mean(0),
            Err(CoinPaymentError::InvalidParameter { .. })
        ));
        assert!(matches!(
            payment_mean(-1),
            Err(CoinPaymentError::InvalidParameter { .. })
        ));
        assert!(matches!(
            payment_mean(1.1),
            Err(CoinPaymentError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_payment_std_rejects_invalid() {
        assert!(payment_std(0).is_err());
        assert!(payment_std(-1).is_err());
        assert!(payment_std(1.1).is_err());
        assert!(payment_variance(1.1).is_err());
    }
}
