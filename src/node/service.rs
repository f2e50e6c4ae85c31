// Election service - drives candidate elections on behalf of consensus
// Principle: the elector stays pure; scheduling and shared state live here

use crate::election::{CandidateElector, ElectionError, ElectionResult, ElectionSeed};
use crate::ledger::StateLedger;
use crate::network::PeerRegistry;
use crate::types::{BlockNumber, Hash, NodeId, RoundNumber};
use crate::util::Contains;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Chain head the node currently builds on
///
/// The round counter separates repeated elections on top of the same
/// head; it resets whenever a new head is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainHead {
    pub hash: Hash,
    pub number: BlockNumber,
    pub round: RoundNumber,
}

impl ChainHead {
    pub fn genesis(hash: Hash) -> Self {
        Self {
            hash,
            number: 0,
            round: 0,
        }
    }

    /// Seed for the next election on top of this head
    pub fn seed(&self) -> ElectionSeed {
        ElectionSeed::derive(&self.hash, self.round)
    }

    pub fn advance_round(&mut self) {
        self.round += 1;
    }

    /// Switch to a newly accepted block
    pub fn observe(&mut self, hash: Hash, number: BlockNumber) {
        self.hash = hash;
        self.number = number;
        self.round = 0;
    }
}

/// Periodic candidate-election driver
///
/// Owns the round counter and the last outcome; every round takes a
/// fresh snapshot of the registry and ledger shared with the rest of
/// the node.
pub struct ElectionService {
    registry: Arc<RwLock<PeerRegistry>>,
    ledger: Arc<RwLock<StateLedger>>,
    elector: CandidateElector,
    local_id: NodeId,
    head: RwLock<ChainHead>,
    last_result: RwLock<Option<ElectionResult>>,
}

impl ElectionService {
    pub fn new(
        registry: Arc<RwLock<PeerRegistry>>,
        ledger: Arc<RwLock<StateLedger>>,
        elector: CandidateElector,
        local_id: NodeId,
        genesis_hash: Hash,
    ) -> Self {
        Self {
            registry,
            ledger,
            elector,
            local_id,
            head: RwLock::new(ChainHead::genesis(genesis_hash)),
            last_result: RwLock::new(None),
        }
    }

    /// Run one election round against the current head
    pub async fn run_round(&self) -> Result<Option<ElectionResult>, ElectionError> {
        let (seed, round) = {
            let mut head = self.head.write().await;
            let seed = head.seed();
            let round = head.round;
            head.advance_round();
            (seed, round)
        };

        let outcome = {
            let registry = self.registry.read().await;
            let ledger = self.ledger.read().await;
            self.elector.elect(&*registry, &*ledger, &seed)?
        };

        match &outcome {
            Some(result) => {
                info!(
                    round,
                    primary = %result.primary.node_id,
                    primary_votes = result.primary.vote_index,
                    backup = %result.backup.node_id,
                    "candidate election complete"
                );
                let nominated = [result.primary.node_id, result.backup.node_id];
                if nominated.contains_item(&self.local_id) {
                    info!("local node is nominated for the next block");
                }
            }
            None => debug!(round, "election round produced no winner"),
        }

        *self.last_result.write().await = outcome.clone();
        Ok(outcome)
    }

    /// Record a newly accepted chain head; future rounds seed from it
    pub async fn observe_head(&self, hash: Hash, number: BlockNumber) {
        let mut head = self.head.write().await;
        head.observe(hash, number);
        debug!(block = number, head = %hash, "chain head updated");
    }

    pub async fn chain_head(&self) -> ChainHead {
        *self.head.read().await
    }

    /// Outcome of the most recent round, if any
    pub async fn last_result(&self) -> Option<ElectionResult> {
        self.last_result.read().await.clone()
    }
}
