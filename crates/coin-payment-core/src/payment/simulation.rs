use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CoinPaymentError;
use crate::payment::bag::{coin_bag, total_payment, BagSize};
use crate::payment::closed_form::{payment_mean, payment_std};
use crate::types::{with_metadata, ComputationOutput, Payment, Probability};
use crate::CoinPaymentResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Top-level input for a Monte Carlo payment simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloInput {
    /// Number of coins in the bag. Must be a positive integer.
    pub n: f64,
    /// Optional payment threshold for `P(payment >= threshold)`.
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Number of shuffles; fractional counts are truncated.
    #[serde(default = "default_repeat")]
    pub repeat: f64,
    /// Optional seed for reproducibility.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_repeat() -> f64 {
    100_000.0
}

/// Upper bound on the number of shuffles in one run.
pub const MAX_ITERATIONS: u64 = u32::MAX as u64;

/// Sample buffers grow past this instead of reserving it all up front.
const PREALLOCATE_LIMIT: u64 = 1 << 20;

/// Percentile summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPercentiles {
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

/// A single histogram bin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
    pub frequency: f64,
}

/// Descriptive statistics of a sample of payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleStatistics {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: Payment,
    pub max: Payment,
    pub percentiles: PaymentPercentiles,
    pub histogram: Vec<HistogramBin>,
}

/// Estimated probability of reaching a threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdProbability {
    pub threshold: f64,
    pub probability: Probability,
}

/// Output of a Monte Carlo payment simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSimulationOutput {
    pub n: u64,
    pub iterations: u64,
    pub sample: SampleStatistics,
    pub closed_form_mean: f64,
    pub closed_form_std: f64,
    pub mean_relative_error: f64,
    pub std_relative_error: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_probability: Option<ThresholdProbability>,
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Turn a (possibly fractional) repeat count into a number of iterations.
///
/// Fractional counts are truncated, so `1e6` becomes `1_000_000`. Counts
/// below one or above [`MAX_ITERATIONS`] are rejected.
pub fn iteration_count(repeat: f64) -> CoinPaymentResult<u64> {
    if !repeat.is_finite() || repeat < 1.0 {
        return Err(CoinPaymentError::InvalidInput {
            field: "repeat".into(),
            reason: format!("Must be at least 1, got {repeat}"),
        });
    }
    if repeat.trunc() > MAX_ITERATIONS as f64 {
        return Err(CoinPaymentError::InvalidInput {
            field: "repeat".into(),
            reason: format!("Must be at most {MAX_ITERATIONS}, got {repeat}"),
        });
    }
    Ok(repeat.trunc() as u64)
}

fn check_repeat(repeat: u64) -> CoinPaymentResult<()> {
    if repeat == 0 || repeat > MAX_ITERATIONS {
        return Err(CoinPaymentError::InvalidInput {
            field: "repeat".into(),
            reason: format!("Must be between 1 and {MAX_ITERATIONS}, got {repeat}"),
        });
    }
    Ok(())
}

/// Payments of `repeat` independent uniform shuffles of `[1, ..., n]`.
///
/// The bag is reshuffled in place between draws; each shuffle is a
/// Fisher-Yates pass, so every ordering is equally likely.
pub fn sample_payments<N, R>(n: N, repeat: u64, rng: &mut R) -> CoinPaymentResult<Vec<Payment>>
where
    N: TryInto<BagSize, Error = CoinPaymentError>,
    R: Rng + ?Sized,
{
    let size = n.try_into()?;
    check_repeat(repeat)?;

    let mut coins = coin_bag(size.get());
    let mut payments = Vec::with_capacity(repeat.min(PREALLOCATE_LIMIT) as usize);
    for _ in 0..repeat {
        coins.shuffle(rng);
        payments.push(total_payment(&coins));
    }
    Ok(payments)
}

/// Estimate `P(payment >= threshold)` for `n` coins from `repeat` random
/// shuffles drawn from `rng`.
///
/// Pass a seeded generator for reproducible estimates, or
/// `StdRng::from_entropy()` for a fresh one.
pub fn payment_probability_montecarlo<N, R>(
    n: N,
    threshold: f64,
    repeat: u64,
    rng: &mut R,
) -> CoinPaymentResult<Probability>
where
    N: TryInto<BagSize, Error = CoinPaymentError>,
    R: Rng + ?Sized,
{
    let size = n.try_into()?;
    check_repeat(repeat)?;
    tracing::debug!(n = size.get(), threshold, repeat, "estimating payment probability");

    let mut coins = coin_bag(size.get());
    let mut hits = 0_u64;
    for _ in 0..repeat {
        coins.shuffle(rng);
        if total_payment(&coins) as f64 >= threshold {
            hits += 1;
        }
    }
    Ok(hits as f64 / repeat as f64)
}

// ---------------------------------------------------------------------------
// Statistics helpers
// ---------------------------------------------------------------------------

/// Compute the percentile value from a **sorted** slice using linear interpolation.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = rank - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Build a histogram with `num_bins` equal-width bins.
fn build_histogram(sorted: &[f64], num_bins: usize) -> Vec<HistogramBin> {
    let min_val = sorted[0];
    let max_val = sorted[sorted.len() - 1];
    let n = sorted.len() as f64;

    // Every draw paid the same
    if max_val - min_val < f64::EPSILON {
        return vec![HistogramBin {
            lower: min_val,
            upper: max_val,
            count: sorted.len() as u64,
            frequency: 1.0,
        }];
    }

    let bin_width = (max_val - min_val) / num_bins as f64;
    let mut bins: Vec<HistogramBin> = (0..num_bins)
        .map(|i| HistogramBin {
            lower: min_val + i as f64 * bin_width,
            upper: if i == num_bins - 1 {
                max_val
            } else {
                min_val + (i + 1) as f64 * bin_width
            },
            count: 0,
            frequency: 0.0,
        })
        .collect();

    for &val in sorted {
        let idx = (((val - min_val) / bin_width).floor() as usize).min(num_bins - 1);
        bins[idx].count += 1;
    }
    for bin in &mut bins {
        bin.frequency = bin.count as f64 / n;
    }
    bins
}

/// Descriptive statistics of a non-empty sample of payments.
pub fn sample_statistics(payments: &[Payment]) -> CoinPaymentResult<SampleStatistics> {
    if payments.is_empty() {
        return Err(CoinPaymentError::InsufficientData(
            "At least one sampled payment is required".into(),
        ));
    }

    let mut values: Vec<f64> = payments.iter().map(|&p| p as f64).collect();
    values.sort_by(|a, b| a.total_cmp(b));

    let (mean, std_dev) = moments(&values);

    let median = if values.len() % 2 == 0 {
        let mid = values.len() / 2;
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[values.len() / 2]
    };

    let percentiles = PaymentPercentiles {
        p5: percentile_sorted(&values, 5.0),
        p10: percentile_sorted(&values, 10.0),
        p25: percentile_sorted(&values, 25.0),
        p50: percentile_sorted(&values, 50.0),
        p75: percentile_sorted(&values, 75.0),
        p90: percentile_sorted(&values, 90.0),
        p95: percentile_sorted(&values, 95.0),
    };

    Ok(SampleStatistics {
        mean,
        median,
        std_dev,
        min: payments.iter().copied().min().unwrap_or_default(),
        max: payments.iter().copied().max().unwrap_or_default(),
        percentiles,
        histogram: build_histogram(&values, 20),
    })
}

/// Mean and population standard deviation.
fn moments(values: &[f64]) -> (f64, f64) {
    use statrs::statistics::Statistics;

    let mean = values.iter().mean();
    let std_dev = if values.len() > 1 {
        values.iter().population_std_dev()
    } else {
        0.0
    };
    (mean, std_dev)
}

fn relative_error(estimate: f64, exact: f64) -> f64 {
    if exact.abs() < f64::EPSILON {
        (estimate - exact).abs()
    } else {
        ((estimate - exact) / exact).abs()
    }
}

// ---------------------------------------------------------------------------
// Public API: payment simulation
// ---------------------------------------------------------------------------

/// Run a Monte Carlo simulation of the payment for a bag of `input.n` coins.
///
/// Draws `input.repeat` shuffles, summarises the sampled payments, and
/// compares the sample mean and standard deviation against the closed
/// forms. When a threshold is given the same draws are used to estimate
/// `P(payment >= threshold)`.
pub fn run_payment_simulation(
    input: &MonteCarloInput,
) -> CoinPaymentResult<ComputationOutput<PaymentSimulationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // Validation
    let size = BagSize::try_from(input.n)?;
    let iterations = iteration_count(input.repeat)?;
    if let Some(t) = input.threshold {
        if t.is_nan() {
            return Err(CoinPaymentError::InvalidInput {
                field: "threshold".into(),
                reason: "Must be a number".into(),
            });
        }
    }

    let mut rng = match input.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    tracing::debug!(n = size.get(), iterations, seed = ?input.seed, "running payment simulation");

    let payments = sample_payments(size.get(), iterations, &mut rng)?;
    let sample = sample_statistics(&payments)?;

    let closed_form_mean = payment_mean(size.get())?;
    let closed_form_std = payment_std(size.get())?;
    let mean_relative_error = relative_error(sample.mean, closed_form_mean);
    let std_relative_error = relative_error(sample.std_dev, closed_form_std);

    if mean_relative_error > 0.01 {
        tracing::warn!(mean_relative_error, "sample mean strays from the closed form");
        warnings.push(format!(
            "Sample mean {:.4} differs from closed form {:.4} by {:.2}%",
            sample.mean,
            closed_form_mean,
            mean_relative_error * 100.0
        ));
    }

    let threshold_probability = input.threshold.map(|threshold| {
        let hits = payments.iter().filter(|&&p| p as f64 >= threshold).count();
        ThresholdProbability {
            threshold,
            probability: hits as f64 / iterations as f64,
        }
    });

    let output = PaymentSimulationOutput {
        n: size.get(),
        iterations,
        sample,
        closed_form_mean,
        closed_form_std,
        mean_relative_error,
        std_relative_error,
        threshold_probability,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monte Carlo Payment Simulation",
        &serde_json::json!({
            "n": size.get(),
            "repeat": iterations,
            "seed": input.seed,
            "threshold": input.threshold,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
