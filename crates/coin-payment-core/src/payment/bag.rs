use std::fmt;

use crate::error::CoinPaymentError;
use crate::types::{Coin, Payment};
use crate::CoinPaymentResult;

// ---------------------------------------------------------------------------
// Bag size
// ---------------------------------------------------------------------------

/// Number of coins in a bag.
///
/// Only positive integers are representable. Construction goes through
/// `TryFrom`, which accepts integer types and `f64` values with no
/// fractional part; anything else is rejected with
/// [`CoinPaymentError::InvalidParameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BagSize(u64);

impl BagSize {
    /// The number of coins.
    pub fn get(self) -> u64 {
        self.0
    }

    /// The number of coins as a float, for the closed-form formulas.
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl fmt::Display for BagSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! bag_size_from_integer {
    ($($t:ty),*) => {
        $(
            impl TryFrom<$t> for BagSize {
                type Error = CoinPaymentError;

                fn try_from(n: $t) -> CoinPaymentResult<Self> {
                    u64::try_from(n)
                        .ok()
                        .filter(|&v| v >= 1)
                        .map(BagSize)
                        .ok_or_else(|| CoinPaymentError::invalid_parameter(n))
                }
            }
        )*
    };
}

bag_size_from_integer!(i32, i64, u32, u64, usize);

impl TryFrom<f64> for BagSize {
    type Error = CoinPaymentError;

    fn try_from(n: f64) -> CoinPaymentResult<Self> {
        // A value is integral when it survives truncation unchanged.
        if !n.is_finite() || n < 1.0 || n.trunc() != n || n >= u64::MAX as f64 {
            return Err(CoinPaymentError::invalid_parameter(n));
        }
        Ok(BagSize(n as u64))
    }
}

// ---------------------------------------------------------------------------
// Coins and payments
// ---------------------------------------------------------------------------

/// The sorted bag `[1, 2, ..., n]`. Empty for `n == 0`.
pub fn coin_bag(n: u64) -> Vec<Coin> {
    (1..=n).collect()
}

/// Payment for one ordering of coins: the first coin's value plus the
/// absolute difference between every pair of consecutive coins.
///
/// ```
/// use coin_payment_core::payment::bag::payment;
/// assert_eq!(payment(&[3, 1, 2]).unwrap(), 6);
/// ```
pub fn payment(coins: &[Coin]) -> CoinPaymentResult<Payment> {
    if coins.is_empty() {
        return Err(CoinPaymentError::InsufficientData(
            "A payment needs at least one coin".into(),
        ));
    }
    Ok(total_payment(coins))
}

/// Payment without the emptiness check. An empty slice pays nothing.
pub(crate) fn total_payment(coins: &[Coin]) -> Payment {
    let first = coins.first().copied().unwrap_or_default();
    first
        + coins
            .windows(2)
            .map(|pair| pair[0].abs_diff(pair[1]))
            .sum::<Payment>()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_single_coin() {
        assert_eq!(payment(&[1]).unwrap(), 1);
    }

    #[test]
    fn test_payment_known_orderings() {
        assert_eq!(payment(&[3, 1, 2]).unwrap(), 6);
        assert_eq!(payment(&[5, 3, 2, 4, 1]).unwrap(), 13);
        assert_eq!(payment(&[5, 8, 2, 4, 1, 7, 3, 6]).unwrap(), 32);
        assert_eq!(payment(&[1, 8, 4, 7, 6, 3, 2, 5]).unwrap(), 23);
    }

    #[test]
    fn test_payment_empty_rejected() {
        let err = payment(&[]).unwrap_err();
        assert!(matches!(err, CoinPaymentError::InsufficientData(_)));
    }

    #[test]
    fn test_payment_sorted_bag_pays_n() {
        // 1 + (n - 1) unit steps
        assert_eq!(payment(&coin_bag(10)).unwrap(), 10);
    }

    #[test]
    fn test_coin_bag() {
        assert_eq!(coin_bag(4), vec![1, 2, 3, 4]);
        assert!(coin_bag(0).is_empty());
    }

    #[test]
    fn test_bag_size_accepts_positive_integers() {
        assert_eq!(BagSize::try_from(4).unwrap().get(), 4);
        assert_eq!(BagSize::try_from(4_u64).unwrap().get(), 4);
        assert_eq!(BagSize::try_from(4_usize).unwrap().get(), 4);
        assert_eq!(BagSize::try_from(4.0).unwrap().get(), 4);
    }

    #[test]
    fn test_bag_size_rejects_non_positive() {
        assert!(BagSize::try_from(0).is_err());
        assert!(BagSize::try_from(-1).is_err());
        assert!(BagSize::try_from(0_u64).is_err());
        assert!(BagSize::try_from(0.0).is_err());
        assert!(BagSize::try_from(-1.0).is_err());
    }

    #[test]
    fn test_bag_size_rejects_fractional_and_non_finite() {
        assert!(BagSize::try_from(1.1).is_err());
        assert!(BagSize::try_from(f64::NAN).is_err());
        assert!(BagSize::try_from(f64::INFINITY).is_err());
        // 2^64 is integral but does not fit in a u64
        assert!(BagSize::try_from(18_446_744_073_709_551_616.0).is_err());
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = BagSize::try_from(1.1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parameter must be a positive integer, not \"1.1\"!"
        );
        let err = BagSize::try_from(-1i32).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parameter must be a positive integer, not \"-1\"!"
        );
    }
}
