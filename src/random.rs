//! Seedable random sources.
//!
//! Every run owns exactly one generator, created here from the configured
//! seed. Multi-start runs derive one seed per start so that serial and
//! parallel execution produce identical results.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Creates the run generator. `None` draws a fresh seed.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    }
}

/// Derives the seed of the `index`-th independent sub-run.
///
/// SplitMix64 finaliser over `base + index`, so neighbouring indices give
/// unrelated streams.
pub fn derive_seed(base: u64, index: u64) -> u64 {
    let mut z = base.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Shuffles everything except the first and last element.
///
/// Used to randomise a closed tour while keeping its anchor node in place.
pub fn shuffle_interior<T, R: Rng>(items: &mut [T], rng: &mut R) {
    if items.len() > 3 {
        let last = items.len() - 1;
        items[1..last].shuffle(rng);
    }
}
