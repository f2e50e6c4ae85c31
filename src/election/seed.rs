// Election seed - shared randomness for reproducible winner selection
// Principle: every honest node must derive the identical draw for a round

use crate::types::{Hash, RoundNumber};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Domain separator for seed derivation
const SEED_CONTEXT: &[u8] = b"meridian-candidate-election-v1";

/// Deterministic seed for one election round
///
/// Derived from the parent block hash and the round counter, both of
/// which all honest nodes already agree on. Two nodes with the same
/// snapshot, ledger and seed reach the same winners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElectionSeed([u8; 32]);

impl ElectionSeed {
    /// Derive the seed for a round on top of a given chain head
    pub fn derive(parent_hash: &Hash, round: RoundNumber) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(SEED_CONTEXT);
        hasher.update(parent_hash.as_bytes());
        hasher.update(&round.to_le_bytes());
        ElectionSeed(*hasher.finalize().as_bytes())
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        ElectionSeed(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Deterministic RNG for this round's draws
    pub(crate) fn rng(&self) -> ChaCha20Rng {
        ChaCha20Rng::from_seed(self.0)
    }
}
