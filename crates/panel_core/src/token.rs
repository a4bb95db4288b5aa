//! Random API keys and secrets.
//!
//! Every `x` in a template becomes a random hex digit; every `y` becomes a
//! digit from `8..=b`, the variant nibble of a v4 UUID. Other characters are
//! copied. The generator is a fast non-cryptographic PRNG.

use rand::{rngs::SmallRng, Rng, SeedableRng};

pub const API_KEY_TEMPLATE: &str = "xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx";
pub const API_SECRET_TEMPLATE: &str = "xxxx.xxxx-xx";

pub fn fill_template<R: Rng + ?Sized>(template: &str, rng: &mut R) -> String {
    template
        .chars()
        .map(|c| match c {
            'x' => hex_digit(rng.gen_range(0..16)),
            'y' => hex_digit((rng.gen_range(0..16) & 0x3) | 0x8),
            other => other,
        })
        .collect()
}

fn hex_digit(value: u32) -> char {
    char::from_digit(value, 16).unwrap_or('0')
}

pub struct TokenGenerator {
    rng: SmallRng,
}

impl TokenGenerator {
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn api_key(&mut self) -> String {
        fill_template(API_KEY_TEMPLATE, &mut self.rng)
    }

    pub fn api_secret(&mut self) -> String {
        fill_template(API_SECRET_TEMPLATE, &mut self.rng)
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
#[path = "tests/token_tests.rs"]
mod tests;
