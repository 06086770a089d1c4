//! Nonce generation for check API authentication.
//!
//! Two kinds of uniqueness values are used on the wire:
//!
//! - the instance nonce, 10 alphanumeric characters drawn once when a client
//!   is built and reused for every user, command, shift and state request;
//! - the hashcat, an MD5 over two fresh UUIDs, drawn anew for every token
//!   request.

use std::sync::Mutex;

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Length of the instance nonce.
pub const NONCE_LEN: usize = 10;

/// Source of randomness for nonces and hashcats.
///
/// Inject a custom implementation through the client builder to make
/// request parameters reproducible.
pub trait RandomSource: Send + Sync {
    /// Draw `len` characters from `[0-9A-Za-z]`.
    fn alphanumeric(&self, len: usize) -> String;

    /// Draw a random (version 4) UUID.
    fn uuid(&self) -> Uuid;
}

/// Randomness backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn alphanumeric(&self, len: usize) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    fn uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic randomness from a fixed seed.
///
/// Two instances built from the same seed yield the same sequence.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned lock still holds a usable generator.
        let mut guard = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut *guard)
    }
}

impl RandomSource for SeededRandom {
    fn alphanumeric(&self, len: usize) -> String {
        self.with_rng(|rng| {
            (0..len)
                .map(|_| char::from(rng.sample(Alphanumeric)))
                .collect()
        })
    }

    fn uuid(&self) -> Uuid {
        let bytes: [u8; 16] = self.with_rng(|rng| rng.random());
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

/// Generate an instance nonce of [`NONCE_LEN`] alphanumeric characters.
pub fn generate_nonce(random: &dyn RandomSource) -> String {
    random.alphanumeric(NONCE_LEN)
}

/// Generate a hashcat: MD5 of two concatenated random UUIDs, as 32 lowercase hex chars.
pub fn unique_hashcat(random: &dyn RandomSource) -> String {
    let first = random.uuid();
    let second = random.uuid();
    let joined = format!("{first}{second}");
    format!("{:x}", md5::compute(joined.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn test_nonce_shape() {
        for _ in 0..100 {
            let nonce = generate_nonce(&ThreadRandom);
            assert_eq!(nonce.len(), NONCE_LEN);
            assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_hashcat_shape() {
        let hashcat = unique_hashcat(&ThreadRandom);
        assert_eq!(hashcat.len(), 32);
        assert!(is_lower_hex(&hashcat));
    }

    #[test]
    fn test_hashcat_unique() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(
                seen.insert(unique_hashcat(&ThreadRandom)),
                "Hashcat must not repeat"
            );
        }
    }

    #[test]
    fn test_hashcat_matches_uuid_concatenation() {
        let random = SeededRandom::new(7);
        let replay = SeededRandom::new(7);

        let hashcat = unique_hashcat(&random);
        let expected = format!(
            "{:x}",
            md5::compute(format!("{}{}", replay.uuid(), replay.uuid()))
        );
        assert_eq!(hashcat, expected);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        assert_eq!(generate_nonce(&a), generate_nonce(&b));
        assert_eq!(unique_hashcat(&a), unique_hashcat(&b));

        let c = SeededRandom::new(43);
        assert_ne!(generate_nonce(&SeededRandom::new(42)), generate_nonce(&c));
    }

    #[test]
    fn test_seeded_uuid_is_v4() {
        let random = SeededRandom::new(1);
        assert_eq!(random.uuid().get_version_num(), 4);
    }
}
