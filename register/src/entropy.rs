//! Random identifiers, handles and score impacts.
//!
//! Everything random in the register goes through [`EntropySource`], so tests
//! can substitute a seeded generator and get reproducible ids and handles.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Alphabet public handles are drawn from (74 symbols).
pub const HANDLE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*-_+=";

/// Default public handle length.
pub const DEFAULT_HANDLE_LENGTH: usize = 10;

/// Inclusive range of the cosmetic score impact given to a new incident.
pub const SCORE_IMPACT_RANGE: std::ops::RangeInclusive<i32> = -14..=-5;

/// Source of randomness for the register.
pub trait EntropySource: Send {
    /// A fresh opaque incident identifier.
    fn incident_id(&mut self) -> String;

    /// A public handle of `len` characters drawn uniformly from [`HANDLE_ALPHABET`].
    fn public_handle(&mut self, len: usize) -> String;

    /// An external reference such as `#8492-AX`.
    fn external_ref(&mut self) -> String;

    /// A score impact drawn uniformly from [`SCORE_IMPACT_RANGE`].
    fn score_impact(&mut self) -> i32;
}

/// [`EntropySource`] backed by a `rand` generator.
pub struct RngEntropy<R: Rng + Send = StdRng> {
    rng: R,
}

impl RngEntropy<StdRng> {
    /// Generator seeded from the operating system.
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send> RngEntropy<R> {
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RngEntropy<StdRng> {
    fn default() -> Self {
        Self::from_os()
    }
}

impl<R: Rng + Send> EntropySource for RngEntropy<R> {
    fn incident_id(&mut self) -> String {
        let bytes: [u8; 16] = self.rng.gen();
        uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string()
    }

    fn public_handle(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| HANDLE_ALPHABET[self.rng.gen_range(0..HANDLE_ALPHABET.len())] as char)
            .collect()
    }

    fn external_ref(&mut self) -> String {
        let number: u16 = self.rng.gen_range(1000..10_000);
        let a = self.rng.gen_range(b'A'..=b'Z') as char;
        let b = self.rng.gen_range(b'A'..=b'Z') as char;
        format!("#{number}-{a}{b}")
    }

    fn score_impact(&mut self) -> i32 {
        self.rng.gen_range(SCORE_IMPACT_RANGE)
    }
}
