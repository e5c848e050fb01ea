use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use std::sync::{Arc, Mutex};

/// symbols vehicle identifiers are drawn from, uppercase letters and
/// digits minus the ambiguous `O`, `0`, `I`, `L` and `1`
pub const IDENTIFIER_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// length of every vehicle identifier
pub const IDENTIFIER_LENGTH: usize = 8;

/// how many candidates identifier dependent inserts try before giving up
pub const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Generates the short public identifiers assigned to vehicles
///
/// identifiers are random rather than sequential, so two candidates can
/// collide with each other or with existing rows, callers inserting them
/// must retry on unique violations, see [`MAX_GENERATION_ATTEMPTS`]
#[derive(Clone)]
pub struct IdentifierGenerator {
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl IdentifierGenerator {
    pub fn new(rng: ChaCha8Rng) -> Self {
        IdentifierGenerator {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// creates a generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }

    /// creates a random 8 character vehicle identifier
    pub fn next_identifier(&self) -> String {
        let mut rng = self.rng.lock().unwrap();

        (0..IDENTIFIER_LENGTH)
            .map(|_| IDENTIFIER_ALPHABET[rng.gen_range(0..IDENTIFIER_ALPHABET.len())] as char)
            .collect()
    }
}
