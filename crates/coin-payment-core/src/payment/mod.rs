//! The random coin payment model.
//!
//! A bag of n coins valued 1..=n is put in some order; paying with it costs
//! the first coin's value plus the absolute difference between each pair of
//! consecutive coins.

pub mod bag;
pub mod closed_form;
pub mod exact;
pub mod permutations;

#[cfg(feature = "monte_carlo")]
pub mod simulation;

pub use bag::{coin_bag, payment, BagSize};
pub use closed_form::{payment_max, payment_mean, payment_std, payment_variance};
pub use exact::{analyze_bag, payment_distribution, payment_probability_bruteforce};
pub use permutations::{payment_permutations, permutations};

#[cfg(feature = "monte_carlo")]
pub use simulation::{
    iteration_count, payment_probability_montecarlo, run_payment_simulation, sample_payments,
};
