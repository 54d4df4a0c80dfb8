use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::CoinPaymentError;
use crate::payment::bag::BagSize;
use crate::payment::closed_form::{payment_max, payment_mean, payment_std};
use crate::payment::permutations::{payment_permutations, permutation_count};
use crate::types::{with_metadata, ComputationOutput, Payment, Probability};
use crate::CoinPaymentResult;

/// Above this bag size full enumeration stops being practical.
pub const BRUTEFORCE_SOFT_LIMIT: u64 = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How often one payment value occurs among all orderings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentFrequency {
    pub payment: Payment,
    pub count: u64,
    pub probability: Probability,
}

/// Exact distribution of the payment over every ordering of the bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDistribution {
    pub n: u64,
    /// Number of orderings enumerated (n!).
    pub permutations: u64,
    /// One entry per distinct payment, ascending.
    pub frequencies: Vec<PaymentFrequency>,
}

impl PaymentDistribution {
    pub fn mean(&self) -> f64 {
        self.frequencies
            .iter()
            .map(|f| f.payment as f64 * f.probability)
            .sum()
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> f64 {
        let mean = self.mean();
        self.frequencies
            .iter()
            .map(|f| (f.payment as f64 - mean).powi(2) * f.probability)
            .sum::<f64>()
            .sqrt()
    }

    /// Probability that the payment is `>= threshold`.
    pub fn probability_at_least(&self, threshold: f64) -> Probability {
        let favourable: u64 = self
            .frequencies
            .iter()
            .filter(|f| f.payment as f64 >= threshold)
            .map(|f| f.count)
            .sum();
        favourable as f64 / self.permutations as f64
    }
}

/// Exact summary of a bag, computed by enumeration plus closed forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BagAnalysis {
    pub n: u64,
    /// n!, absent when it does not fit in 64 bits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permutations: Option<u64>,
    pub max_payment: Payment,
    pub mean: f64,
    pub std_dev: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<Probability>,
}

// ---------------------------------------------------------------------------
// Brute force
// ---------------------------------------------------------------------------

/// Exact probability that the payment for `n` coins is `>= threshold`.
///
/// Every one of the n! orderings is visited, so this is slow beyond
/// n ≈ 10. The comparison is a plain `>=` with no tolerance:
/// a threshold of `6.01` excludes a payment of `6`.
pub fn payment_probability_bruteforce<N>(n: N, threshold: f64) -> CoinPaymentResult<Probability>
where
    N: TryInto<BagSize, Error = CoinPaymentError>,
{
    let size = n.try_into()?;
    if size.get() > BRUTEFORCE_SOFT_LIMIT {
        tracing::warn!(n = size.get(), "brute-force enumeration over a large bag");
    }

    let mut total = 0_u64;
    let mut favourable = 0_u64;
    for value in payment_permutations(size.get()) {
        total += 1;
        if value as f64 >= threshold {
            favourable += 1;
        }
    }
    tracing::debug!(n = size.get(), total, favourable, "enumerated payments");

    Ok(favourable as f64 / total as f64)
}

/// Exact distribution of payment values for `n` coins.
pub fn payment_distribution<N>(n: N) -> CoinPaymentResult<PaymentDistribution>
where
    N: TryInto<BagSize, Error = CoinPaymentError>,
{
    let size = n.try_into()?;
    if size.get() > BRUTEFORCE_SOFT_LIMIT {
        tracing::warn!(n = size.get(), "brute-force enumeration over a large bag");
    }

    let mut counts: BTreeMap<Payment, u64> = BTreeMap::new();
    let mut total = 0_u64;
    for value in payment_permutations(size.get()) {
        *counts.entry(value).or_default() += 1;
        total += 1;
    }

    let frequencies = counts
        .into_iter()
        .map(|(payment, count)| PaymentFrequency {
            payment,
            count,
            probability: count as f64 / total as f64,
        })
        .collect();

    Ok(PaymentDistribution {
        n: size.get(),
        permutations: total,
        frequencies,
    })
}

/// Exact analysis of a bag: max, closed-form mean and std, and optionally
/// the brute-force probability of reaching `threshold`.
pub fn analyze_bag<N>(
    n: N,
    threshold: Option<f64>,
) -> CoinPaymentResult<ComputationOutput<BagAnalysis>>
where
    N: TryInto<BagSize, Error = CoinPaymentError>,
{
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let size = n.try_into()?;
    let n = size.get();

    if let Some(t) = threshold {
        if t.is_nan() {
            return Err(CoinPaymentError::InvalidInput {
                field: "threshold".into(),
                reason: "Must be a number".into(),
            });
        }
        if n > BRUTEFORCE_SOFT_LIMIT {
            warnings.push(format!(
                "Enumerating {n}! orderings; brute force is impractical beyond n={BRUTEFORCE_SOFT_LIMIT}"
            ));
        }
    }

    let permutations = permutation_count(n);
    if permutations.is_none() {
        if threshold.is_some() {
            return Err(CoinPaymentError::InvalidInput {
                field: "n".into(),
                reason: format!("{n}! orderings overflow a 64-bit count; cannot enumerate"),
            });
        }
        warnings.push(format!("{n}! orderings overflow a 64-bit count; count omitted"));
    }

    let probability = threshold
        .map(|t| payment_probability_bruteforce(n, t))
        .transpose()?;

    let analysis = BagAnalysis {
        n,
        permutations,
        max_payment: payment_max(n),
        mean: payment_mean(n)?,
        std_dev: payment_std(n)?,
        threshold,
        probability,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Closed-form moments with exhaustive enumeration",
        &serde_json::json!({
            "n": n,
            "threshold": threshold,
            "comparison": "payment >= threshold",
        }),
        warnings,
        elapsed,
        analysis,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_bruteforce_known_values() {
        assert_close(payment_probability_bruteforce(1, 1.0).unwrap(), 1.0, 1e-12);
        assert_close(payment_probability_bruteforce(3, 6.0).unwrap(), 1.0 / 6.0, 1e-12);
        assert_close(payment_probability_bruteforce(7, 22.0).unwrap(), 0.3515873, 1e-6);
    }

    #[test]
    fn test_bruteforce_threshold_is_exact() {
        assert_eq!(payment_probability_bruteforce(3, 6.01).unwrap(), 0.0);
    }

    #[test]
    fn test_bruteforce_threshold_below_minimum_is_certain() {
        // Minimum payment for n coins is n (the sorted bag).
        assert_eq!(payment_probability_bruteforce(5, 5.0).unwrap(), 1.0);
        assert_eq!(payment_probability_bruteforce(5, 0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_bruteforce_rejects_invalid_n() {
        for bad in [0.0, -1.0, 1.1] {
            assert!(matches!(
                payment_probability_bruteforce(bad, 0.0),
                Err(CoinPaymentError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_distribution_bag_of_three() {
        let dist = payment_distribution(3).unwrap();
        assert_eq!(dist.permutations, 6);
        let pairs: Vec<(Payment, u64)> =
            dist.frequencies.iter().map(|f| (f.payment, f.count)).collect();
        assert_eq!(pairs, vec![(3, 1), (4, 1), (5, 3), (6, 1)]);
    }

    #[test]
    fn test_distribution_probabilities_sum_to_one() {
        for n in 1..=7_u64 {
            let dist = payment_distribution(n).unwrap();
            let total_count: u64 = dist.frequencies.iter().map(|f| f.count).sum();
            let total_prob: f64 = dist.frequencies.iter().map(|f| f.probability).sum();
            assert_eq!(total_count, dist.permutations);
            assert_close(total_prob, 1.0, 1e-12);
        }
    }

    #[test]
    fn test_distribution_moments_match_closed_form() {
        for n in 1..=8_u64 {
            let dist = payment_distribution(n).unwrap();
            assert_close(dist.mean(), payment_mean(n).unwrap(), 1e-9);
            assert_close(dist.std_dev(), payment_std(n).unwrap(), 1e-9);
        }
    }

    #[test]
    fn test_distribution_probability_matches_bruteforce() {
        let dist = payment_distribution(7).unwrap();
        assert_close(
            dist.probability_at_least(22.0),
            payment_probability_bruteforce(7, 22.0).unwrap(),
            1e-12,
        );
    }

    #[test]
    fn test_distribution_rejects_invalid_n() {
        assert!(payment_distribution(0).is_err());
    }

    #[test]
    fn test_analyze_bag() {
        let out = analyze_bag(4, Some(10.0)).unwrap();
        let a = &out.result;
        assert_eq!(a.n, 4);
        assert_eq!(a.permutations, Some(24));
        assert_eq!(a.max_payment, 10);
        assert_close(a.mean, 7.5, 1e-12);
        assert_close(a.std_dev, 1.5, 1e-12);
        assert!(a.probability.unwrap() > 0.0);
        assert!(out.warnings.is_empty());
        assert_eq!(out.metadata.precision, "ieee754_f64");
    }

    #[test]
    fn test_analyze_bag_without_threshold_skips_enumeration() {
        let out = analyze_bag(15, None).unwrap();
        assert!(out.result.probability.is_none());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_analyze_bag_large_bag_without_threshold() {
        let out = analyze_bag(25, None).unwrap();
        let a = &out.result;
        assert_eq!(a.permutations, None);
        assert_eq!(a.max_payment, 325);
        assert_close(a.mean, payment_mean(25).unwrap(), 1e-12);
        assert_close(a.std_dev, payment_std(25).unwrap(), 1e-12);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("25!"), "{}", out.warnings[0]);
    }

    #[test]
    fn test_analyze_bag_large_bag_with_threshold_rejected() {
        assert!(matches!(
            analyze_bag(25, Some(100.0)),
            Err(CoinPaymentError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_analyze_bag_rejects_nan_threshold() {
        assert!(analyze_bag(4, Some(f64::NAN)).is_err());
    }
}
