// Primitives - fundamental chain types
use serde::{Deserialize, Serialize};
use std::fmt;

/// Universal hash (Blake3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash([u8; 32]);

impl Hash {
    pub const ZERO: Hash = Hash([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hash arbitrary data with Blake3
    pub fn hash(data: &[u8]) -> Self {
        let hash = blake3::hash(data);
        Hash(*hash.as_bytes())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }
}

/// Block number
pub type BlockNumber = u64;

/// Election round counter, reset whenever a new chain head is observed
pub type RoundNumber = u64;

/// Balance in the smallest on-chain unit (u128 is enough for centuries)
/// 1 MER = 10^18 units
pub type Balance = u128;

/// Monetary constants
pub const MER: Balance = 1_000_000_000_000_000_000; // 10^18
pub const MILLIMER: Balance = 1_000_000_000_000_000; // 10^15
pub const MICROMER: Balance = 1_000_000_000_000; // 10^12
