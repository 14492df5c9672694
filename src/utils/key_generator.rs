//! Short key generation.
//!
//! Keys are drawn from an alphabet that is easy to dictate: lower-case
//! letters without `i`, `j` and `l`, plus digits. Generation is seedable so
//! tests and replays get a reproducible key sequence.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::Mutex;

/// Symbols a key may contain.
pub const ALPHABET: &[u8] = b"abcdefghkmnopqrstuvwxyz0123456789";

/// Number of symbols in every generated key.
///
/// 33^6 gives 1 291 467 969 distinct keys.
pub const KEY_LENGTH: usize = 6;

/// Source of candidate keys for new redirections.
///
/// Generation never fails, but uniqueness is not guaranteed: callers must
/// rely on the repository's conditional insert to detect collisions.
#[cfg_attr(test, mockall::automock)]
pub trait KeyGenerator: Send + Sync {
    /// Produces the next candidate key.
    fn next_key(&self) -> String;
}

/// Fixed-length random key generator backed by a seeded PRNG.
///
/// The same seed always yields the same key sequence for a given build.
pub struct RandomKeyGenerator {
    rng: Mutex<StdRng>,
}

impl RandomKeyGenerator {
    /// Creates a generator with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Creates a generator seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl KeyGenerator for RandomKeyGenerator {
    fn next_key(&self) -> String {
        // A poisoned lock still holds a usable RNG state.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        (0..KEY_LENGTH)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_has_fixed_length() {
        let generator = RandomKeyGenerator::new(0);
        for _ in 0..100 {
            assert_eq!(generator.next_key().len(), KEY_LENGTH);
        }
    }

    #[test]
    fn test_key_uses_only_alphabet() {
        let generator = RandomKeyGenerator::from_entropy();
        for _ in 0..500 {
            let key = generator.next_key();
            assert!(key.bytes().all(|b| ALPHABET.contains(&b)), "bad key {key}");
        }
    }

    #[test]
    fn test_alphabet_excludes_ambiguous_letters() {
        for c in [b'i', b'j', b'l'] {
            assert!(!ALPHABET.contains(&c));
        }
        assert_eq!(ALPHABET.len(), 33);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = RandomKeyGenerator::new(0);
        let b = RandomKeyGenerator::new(0);

        let first: Vec<String> = (0..20).map(|_| a.next_key()).collect();
        let second: Vec<String> = (0..20).map(|_| b.next_key()).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a = RandomKeyGenerator::new(1);
        let b = RandomKeyGenerator::new(2);

        let first: Vec<String> = (0..5).map(|_| a.next_key()).collect();
        let second: Vec<String> = (0..5).map(|_| b.next_key()).collect();

        assert_ne!(first, second);
    }

    #[test]
    fn test_sequence_advances() {
        let generator = RandomKeyGenerator::new(42);
        let keys: HashSet<String> = (0..1000).map(|_| generator.next_key()).collect();

        // Birthday bound for 1000 draws over ~1.3e9 keys makes a repeat unlikely.
        assert!(keys.len() >= 999);
    }
}
