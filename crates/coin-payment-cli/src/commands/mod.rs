pub mod bag;
pub mod probability;
pub mod report;
pub mod simulate;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seeded generator when a seed is given, fresh entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}
