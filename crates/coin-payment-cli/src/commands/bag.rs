use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use coin_payment_core::payment::{
    analyze_bag, payment, payment_distribution, payment_max, payment_mean, payment_std,
    payment_variance,
};

/// Arguments for a single payment
#[derive(Args)]
pub struct PaymentArgs {
    /// Comma-separated coins in payment order (e.g. "3,1,2")
    #[arg(long, value_delimiter = ',', required = true)]
    pub coins: Vec<u64>,
}

/// Arguments for the maximum payment
#[derive(Args)]
pub struct MaxArgs {
    /// Number of coins in the bag
    #[arg(long)]
    pub n: u64,
}

/// Arguments for commands taking only a bag size
#[derive(Args)]
pub struct BagArgs {
    /// Number of coins in the bag (must be a positive integer)
    #[arg(long, allow_hyphen_values = true)]
    pub n: f64,
}

/// Arguments for an exact bag analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Number of coins in the bag (must be a positive integer)
    #[arg(long, allow_hyphen_values = true)]
    pub n: f64,

    /// Payment threshold for P(payment >= threshold), by enumeration
    #[arg(long, allow_hyphen_values = true)]
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PaymentOutput {
    coins: Vec<u64>,
    payment: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct MaxOutput {
    n: u64,
    max_payment: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct MeanOutput {
    n: f64,
    mean: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct StdOutput {
    n: f64,
    std_dev: f64,
    variance: f64,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let paid = payment(&args.coins)?;
    Ok(serde_json::to_value(PaymentOutput {
        coins: args.coins,
        payment: paid,
    })?)
}

pub fn run_max(args: MaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(MaxOutput {
        n: args.n,
        max_payment: payment_max(args.n),
    })?)
}

pub fn run_mean(args: BagArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mean = payment_mean(args.n)?;
    Ok(serde_json::to_value(MeanOutput { n: args.n, mean })?)
}

pub fn run_std(args: BagArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let std_dev = payment_std(args.n)?;
    let variance = payment_variance(args.n)?;
    Ok(serde_json::to_value(StdOutput {
        n: args.n,
        std_dev,
        variance,
    })?)
}

pub fn run_distribution(args: BagArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dist = payment_distribution(args.n)?;
    Ok(serde_json::to_value(dist)?)
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = analyze_bag(args.n, args.threshold)?;
    Ok(serde_json::to_value(result)?)
}
