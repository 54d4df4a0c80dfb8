mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::bag::{AnalyzeArgs, BagArgs, MaxArgs, PaymentArgs};
use commands::probability::ProbabilityArgs;
use commands::report::ReportArgs;
use commands::simulate::SimulateArgs;

/// Statistics of the random coin payment process
#[derive(Parser)]
#[command(
    name = "coinpay",
    version,
    about = "Statistics of the random coin payment process",
    long_about = "Shuffle a bag of coins valued 1..n and pay with them in order: the first \
                  coin's value plus the absolute difference between consecutive coins. \
                  Computes closed-form mean and standard deviation, exact probabilities by \
                  enumerating every ordering, and Monte Carlo estimates."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the standard six-line report (N=10 and N=20)
    Report(ReportArgs),
    /// Payment for one ordering of coins
    Payment(PaymentArgs),
    /// Maximum payment for a bag of n coins
    Max(MaxArgs),
    /// Closed-form mean payment
    Mean(BagArgs),
    /// Closed-form standard deviation of the payment
    Std(BagArgs),
    /// Probability that the payment reaches a threshold
    Probability(ProbabilityArgs),
    /// Exact distribution of payment values (enumerates n! orderings)
    Distribution(BagArgs),
    /// Exact summary of a bag, optionally with a threshold probability
    Analyze(AnalyzeArgs),
    /// Monte Carlo simulation from flags, a JSON file, or stdin
    Simulate(SimulateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(e: Box<dyn std::error::Error>) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Report(args) => {
            if let Err(e) = commands::report::run_report(args) {
                fail(e);
            }
            return;
        }
        Commands::Payment(args) => commands::bag::run_payment(args),
        Commands::Max(args) => commands::bag::run_max(args),
        Commands::Mean(args) => commands::bag::run_mean(args),
        Commands::Std(args) => commands::bag::run_std(args),
        Commands::Probability(args) => commands::probability::run_probability(args),
        Commands::Distribution(args) => commands::bag::run_distribution(args),
        Commands::Analyze(args) => commands::bag::run_analyze(args),
        Commands::Simulate(args) => commands::simulate::run_simulate(args),
        Commands::Version => {
            println!("coinpay {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}
