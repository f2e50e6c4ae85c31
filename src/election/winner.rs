// Winner - election outcome records
use crate::types::{Address, NodeId};
use serde::{Deserialize, Serialize};

/// A nominated candidate
///
/// `vote_index` is the truncated weighted score the candidate was ranked
/// with; it is never negative. The record is immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CadWinner {
    pub node_id: NodeId,
    pub address: Address,
    pub vote_index: u64,
}

/// Ordered outcome of one election round
///
/// The backup is drawn independently of the primary and may coincide
/// with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionResult {
    pub primary: CadWinner,
    pub backup: CadWinner,
}

impl ElectionResult {
    /// Winners in nomination order
    pub fn winners(&self) -> [&CadWinner; 2] {
        [&self.primary, &self.backup]
    }
}
