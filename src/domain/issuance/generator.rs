//! Access key generation
//!
//! Keys are short human-typeable strings over `A-Z0-9`. They are not meant to
//! be secrets with cryptographic strength and uniqueness is not guaranteed.

use rand::Rng;

use crate::domain::access_key::KEY_ALPHABET;

/// Generator for random access keys of bounded length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyGenerator {
    min_length: usize,
    max_length: usize,
}

impl KeyGenerator {
    /// Create a generator producing keys of `min_length..=max_length` characters
    ///
    /// Callers are expected to pass `1 <= min_length <= max_length`; see
    /// [`IssuanceConfig::validate`](super::IssuanceConfig::validate).
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Generate a new key using the thread-local RNG
    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate a new key from the given RNG
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> String {
        generate_key_with(rng, self.min_length, self.max_length)
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new(6, 8)
    }
}

/// Generate a key whose length is uniform in `min_length..=max_length`
pub fn generate_key(min_length: usize, max_length: usize) -> String {
    generate_key_with(&mut rand::thread_rng(), min_length, max_length)
}

fn generate_key_with<R: Rng>(rng: &mut R, min_length: usize, max_length: usize) -> String {
    let length = rng.gen_range(min_length..=max_length);

    (0..length)
        .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::domain::access_key::validate_key;

    #[test]
    fn test_generated_keys_respect_bounds_and_alphabet() {
        for (min, max) in [(1, 1), (6, 8), (4, 12), (10, 10)] {
            for _ in 0..200 {
                let key = generate_key(min, max);
                assert!(
                    validate_key(&key, min, max).is_ok(),
                    "key {key:?} outside {min}..={max}"
                );
            }
        }
    }

    #[test]
    fn test_all_lengths_in_range_occur() {
        let generator = KeyGenerator::default();
        let mut rng = StdRng::seed_from_u64(7);

        let lengths: HashSet<usize> = (0..500)
            .map(|_| generator.generate_with(&mut rng).len())
            .collect();

        assert_eq!(lengths, HashSet::from([6, 7, 8]));
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let generator = KeyGenerator::new(6, 8);

        let a = generator.generate_with(&mut StdRng::seed_from_u64(42));
        let b = generator.generate_with(&mut StdRng::seed_from_u64(42));

        assert_eq!(a, b);
    }

    #[test]
    fn test_default_bounds() {
        let generator = KeyGenerator::default();
        assert_eq!(generator.min_length(), 6);
        assert_eq!(generator.max_length(), 8);
    }
}
