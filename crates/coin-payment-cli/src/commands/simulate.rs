use clap::Args;
use serde_json::Value;

use coin_payment_core::payment::simulation::{self, MonteCarloInput};

use crate::input;

/// Arguments for a Monte Carlo payment simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to JSON input file ({"n": 10, "threshold": 45, "repeat": 1e5, "seed": 7})
    #[arg(long)]
    pub input: Option<String>,

    /// Number of coins in the bag (used when no input file is given)
    #[arg(long, allow_hyphen_values = true)]
    pub n: Option<f64>,

    /// Payment threshold for P(payment >= threshold)
    #[arg(long, allow_hyphen_values = true)]
    pub threshold: Option<f64>,

    /// Number of shuffles (fractions are truncated)
    #[arg(long, default_value = "1e5")]
    pub repeat: f64,

    /// Seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mc_input: MonteCarloInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(n) = args.n {
        MonteCarloInput {
            n,
            threshold: args.threshold,
            repeat: args.repeat,
            seed: args.seed,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json>, --n, or stdin required for a simulation".into());
    };
    let result = simulation::run_payment_simulation(&mc_input)?;
    Ok(serde_json::to_value(result)?)
}
