use clap::Args;

use coin_payment_core::payment::{
    iteration_count, payment_mean, payment_probability_bruteforce,
    payment_probability_montecarlo, payment_std,
};

use super::make_rng;

/// Arguments for the standard report
#[derive(Args)]
pub struct ReportArgs {
    /// Number of shuffles behind the Monte Carlo line
    #[arg(long, default_value = "1e6")]
    pub repeat: f64,

    /// Seed for a reproducible Monte Carlo line
    #[arg(long)]
    pub seed: Option<u64>,
}

/// The six report lines for bags of 10 and 20 coins.
pub fn report_lines(args: &ReportArgs) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let iterations = iteration_count(args.repeat)?;
    let mut rng = make_rng(args.seed);

    Ok(vec![
        format!("Mean for N=10:  {}", payment_mean(10)?),
        format!("Mean for N=20:  {}", payment_mean(20)?),
        format!("Standard deviation for N=10:  {}", payment_std(10)?),
        format!("Standard deviation for N=20:  {}", payment_std(20)?),
        format!(
            "P(x>=45|N=10):  {}",
            payment_probability_bruteforce(10, 45.0)?
        ),
        format!(
            "P(x>=160|N=20) (approx):  {}",
            payment_probability_montecarlo(20, 160.0, iterations, &mut rng)?
        ),
    ])
}

pub fn run_report(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    for line in report_lines(&args)? {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lines_layout() {
        let args = ReportArgs {
            repeat: 1000.0,
            seed: Some(42),
        };
        let lines = report_lines(&args).unwrap();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Mean for N=10:  38.5");
        assert_eq!(lines[1], "Mean for N=20:  143.5");
        assert!(lines[2].starts_with("Standard deviation for N=10:  "));
        assert!(lines[3].starts_with("Standard deviation for N=20:  "));
        assert!(lines[4].starts_with("P(x>=45|N=10):  "));
        assert!(lines[5].starts_with("P(x>=160|N=20) (approx):  "));
    }

    #[test]
    fn test_report_rejects_bad_repeat() {
        let args = ReportArgs {
            repeat: 0.0,
            seed: None,
        };
        assert!(report_lines(&args).is_err());
    }
}
