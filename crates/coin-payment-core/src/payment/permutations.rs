//! Lazy enumeration of every ordering of a coin bag.
//!
//! Orderings are produced in lexicographic order starting from the sorted
//! bag, one at a time, so memory stays O(n) regardless of n!. Both
//! iterators can be restarted to replay the same sequence.

use std::iter::FusedIterator;

use crate::payment::bag::{coin_bag, total_payment};
use crate::types::{Coin, Payment};

/// Rearrange `coins` into the next lexicographically greater ordering.
///
/// Returns `false` (leaving `coins` untouched) when `coins` is already the
/// last ordering, i.e. sorted in descending order.
pub fn next_permutation(coins: &mut [Coin]) -> bool {
    let Some(pivot) = coins.windows(2).rposition(|pair| pair[0] < pair[1]) else {
        return false;
    };
    // coins[pivot + 1] > coins[pivot], so the search always succeeds.
    let successor = coins[pivot + 1..]
        .iter()
        .rposition(|&c| c > coins[pivot])
        .map_or(pivot + 1, |offset| pivot + 1 + offset);
    coins.swap(pivot, successor);
    coins[pivot + 1..].reverse();
    true
}

/// Number of orderings of a bag of `n` coins, or `None` on `u64` overflow
/// (n > 20).
pub fn permutation_count(n: u64) -> Option<u64> {
    (1..=n).try_fold(1_u64, |acc, k| acc.checked_mul(k))
}

// ---------------------------------------------------------------------------
// Permutations
// ---------------------------------------------------------------------------

/// Iterator over all orderings of `[1, ..., n]`.
#[derive(Debug, Clone)]
pub struct Permutations {
    n: u64,
    current: Option<Vec<Coin>>,
}

impl Permutations {
    pub fn new(n: u64) -> Self {
        let mut perms = Permutations { n, current: None };
        perms.restart();
        perms
    }

    /// Rewind to the first (sorted) ordering.
    pub fn restart(&mut self) {
        self.current = (self.n > 0).then(|| coin_bag(self.n));
    }
}

impl Iterator for Permutations {
    type Item = Vec<Coin>;

    fn next(&mut self) -> Option<Vec<Coin>> {
        let current = self.current.take()?;
        let mut successor = current.clone();
        if next_permutation(&mut successor) {
            self.current = Some(successor);
        }
        Some(current)
    }
}

impl FusedIterator for Permutations {}

/// All orderings of the bag `[1, ..., n]`, lazily. Empty for `n == 0`.
pub fn permutations(n: u64) -> Permutations {
    Permutations::new(n)
}

// ---------------------------------------------------------------------------
// Payments over permutations
// ---------------------------------------------------------------------------

/// Iterator over the payment of every ordering of `[1, ..., n]`.
///
/// Works on a single buffer that is permuted in place, so no ordering is
/// ever allocated.
#[derive(Debug, Clone)]
pub struct PaymentPermutations {
    n: u64,
    coins: Vec<Coin>,
    exhausted: bool,
}

impl PaymentPermutations {
    pub fn new(n: u64) -> Self {
        PaymentPermutations {
            n,
            coins: coin_bag(n),
            exhausted: n == 0,
        }
    }

    /// Rewind to the first (sorted) ordering.
    pub fn restart(&mut self) {
        *self = PaymentPermutations::new(self.n);
    }
}

impl Iterator for PaymentPermutations {
    type Item = Payment;

    fn next(&mut self) -> Option<Payment> {
        if self.exhausted {
            return None;
        }
        let value = total_payment(&self.coins);
        self.exhausted = !next_permutation(&mut self.coins);
        Some(value)
    }
}

impl FusedIterator for PaymentPermutations {}

/// Payments for all n! orderings of `[1, ..., n]`.
///
/// The cost is factorial in `n`; anything beyond n ≈ 10 is impractical.
/// No validation is done: `n == 0` simply yields nothing.
pub fn payment_permutations(n: u64) -> PaymentPermutations {
    PaymentPermutations::new(n)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
