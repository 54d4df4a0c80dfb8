use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use coin_payment_core::payment::{
    iteration_count, payment_probability_bruteforce, payment_probability_montecarlo,
};

use super::make_rng;

#[derive(Debug, Clone, Copy, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbabilityMethod {
    /// Enumerate every ordering (exact, factorial cost)
    Bruteforce,
    /// Random shuffles (approximate)
    Montecarlo,
}

/// Arguments for P(payment >= threshold)
#[derive(Args)]
pub struct ProbabilityArgs {
    /// Number of coins in the bag (must be a positive integer)
    #[arg(long, allow_hyphen_values = true)]
    pub n: f64,

    /// Payment threshold; payments equal to it count
    #[arg(long, allow_hyphen_values = true)]
    pub threshold: f64,

    /// Estimation method
    #[arg(long, value_enum, default_value = "bruteforce")]
    pub method: ProbabilityMethod,

    /// Number of shuffles for Monte Carlo (fractions are truncated, e.g. 1e6)
    #[arg(long, default_value = "1e5")]
    pub repeat: f64,

    /// Seed for a reproducible Monte Carlo estimate
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProbabilityOutput {
    n: f64,
    threshold: f64,
    method: ProbabilityMethod,
    probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    iterations: Option<u64>,
}

pub fn run_probability(args: ProbabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (probability, iterations) = match args.method {
        ProbabilityMethod::Bruteforce => {
            (payment_probability_bruteforce(args.n, args.threshold)?, None)
        }
        ProbabilityMethod::Montecarlo => {
            let iterations = iteration_count(args.repeat)?;
            let mut rng = make_rng(args.seed);
            let p = payment_probability_montecarlo(args.n, args.threshold, iterations, &mut rng)?;
            (p, Some(iterations))
        }
    };

    Ok(serde_json::to_value(ProbabilityOutput {
        n: args.n,
        threshold: args.threshold,
        method: args.method,
        probability,
        iterations,
    })?)
}
