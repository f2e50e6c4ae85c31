// Candidate elector - telemetry-weighted leader nomination
// Principle: same snapshot, same ledger, same seed, same winners on every node

use super::config::ElectionConfig;
use super::seed::ElectionSeed;
use super::winner::{CadWinner, ElectionResult};
use crate::ledger::AccountLedger;
use crate::network::{DirectoryError, PeerDirectory, PeerView};
use crate::types::Balance;
use rand::Rng;
use tracing::debug;

/// Stateless elector for one round of candidate nomination
///
/// Each invocation is a pure function of the peer snapshot, the ledger
/// state and the round seed. The elector holds no locks and keeps no
/// state between rounds.
pub struct CandidateElector {
    config: ElectionConfig,
}

impl CandidateElector {
    pub fn new(config: ElectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ElectionConfig {
        &self.config
    }

    /// Run one election round
    ///
    /// Returns `Ok(None)` when no peer survives eligibility and scoring;
    /// an empty network is a routine transient state, not a fault. Only a
    /// failed directory snapshot is an error.
    pub fn elect<D, L>(
        &self,
        directory: &D,
        ledger: &L,
        seed: &ElectionSeed,
    ) -> Result<Option<ElectionResult>, ElectionError>
    where
        D: PeerDirectory,
        L: AccountLedger,
    {
        let peers = directory.connected_peers()?;
        if peers.is_empty() {
            debug!("no connected peers this round");
            return Ok(None);
        }

        let pool = self.candidate_pool(&peers, ledger);
        if pool.is_empty() {
            debug!(peers = peers.len(), "no eligible candidates this round");
            return Ok(None);
        }

        let mut rng = seed.rng();
        let primary = self.select_primary(&pool, &mut rng);
        let backup = self.select_backup(&pool, &mut rng);

        Ok(Some(ElectionResult { primary, backup }))
    }

    /// Score every eligible peer into the candidate pool
    ///
    /// Pool order is snapshot order. A failed balance lookup drops only
    /// the affected peer.
    pub fn candidate_pool<L: AccountLedger>(
        &self,
        peers: &[PeerView],
        ledger: &L,
    ) -> Vec<CadWinner> {
        let mut pool = Vec::with_capacity(peers.len());
        for peer in peers {
            if !peer.role.is_electable() {
                continue;
            }
            let Some(address) = peer.address else {
                continue;
            };
            if address.is_zero() {
                continue;
            }
            let balance = match ledger.balance_of(&address) {
                Ok(balance) => balance,
                Err(err) => {
                    debug!(peer = %peer.node_id, %err, "balance lookup failed, skipping peer");
                    continue;
                }
            };
            pool.push(CadWinner {
                node_id: peer.node_id,
                address,
                vote_index: self.vote_index(peer.tx_rate, peer.bandwidth, balance),
            });
        }
        pool
    }

    /// Weighted score of one candidate, truncated to an integer
    ///
    /// All three components are non-negative, so the score never is
    /// either. Balances are converted to whole coins before weighting.
    pub fn vote_index(&self, tx_rate: f64, bandwidth: f64, balance: Balance) -> u64 {
        let tx_component = tx_rate * self.config.tx_rate_weight;
        let bw_component = bandwidth * self.config.bandwidth_weight;
        let balance_component =
            (balance as f64 / self.config.balance_unit as f64) * self.config.balance_weight;
        (tx_component + bw_component + balance_component) as u64
    }

    /// Pick the primary winner according to pool size
    ///
    /// Pools within the validator-set size rotate uniformly. Larger pools
    /// are fully sorted by descending vote index (ties keep pool order)
    /// and the draw covers the top ranking window, clamped to the pool.
    fn select_primary<R: Rng>(&self, pool: &[CadWinner], rng: &mut R) -> CadWinner {
        if pool.len() == 1 {
            return pool[0].clone();
        }
        if pool.len() <= self.config.validator_set_size {
            return pool[rng.gen_range(0..pool.len())].clone();
        }

        let mut ranked: Vec<&CadWinner> = pool.iter().collect();
        ranked.sort_by(|a, b| b.vote_index.cmp(&a.vote_index));

        let window = self.config.ranking_window.min(ranked.len());
        ranked[rng.gen_range(0..window)].clone()
    }

    /// Pick the backup winner from the full pool
    ///
    /// The draw ignores the ranking and may land on the primary.
    fn select_backup<R: Rng>(&self, pool: &[CadWinner], rng: &mut R) -> CadWinner {
        if pool.len() == 1 {
            return pool[0].clone();
        }
        pool[rng.gen_range(0..pool.len())].clone()
    }
}

/// Election errors
///
/// Per-peer problems are absorbed during scoring; only a structurally
/// failed snapshot surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum ElectionError {
    #[error("peer directory snapshot failed: {0}")]
    Directory(#[from] DirectoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerError, StateLedger};
    use crate::network::NodeRole;
    use crate::types::{Address, Hash, NodeId, MER};

    struct StaticDirectory(Vec<PeerView>);

    impl PeerDirectory for StaticDirectory {
        fn connected_peers(&self) -> Result<Vec<PeerView>, DirectoryError> {
            Ok(self.0.clone())
        }
    }

    struct FailingDirectory;

    impl PeerDirectory for FailingDirectory {
        fn connected_peers(&self) -> Result<Vec<PeerView>, DirectoryError> {
            Err(DirectoryError::Unavailable("snapshot timed out".into()))
        }
    }

    /// Ledger that fails lookups for one poisoned address
    struct FlakyLedger {
        poisoned: Address,
        inner: StateLedger,
    }

    impl AccountLedger for FlakyLedger {
        fn balance_of(&self, address: &Address) -> Result<u128, LedgerError> {
            if *address == self.poisoned {
                return Err(LedgerError::LookupFailed("lookup timed out".into()));
            }
            self.inner.balance_of(address)
        }
    }

    fn peer(seed: u8, role: NodeRole, address: Option<Address>, tx: f64, bw: f64) -> PeerView {
        PeerView {
            node_id: NodeId::from_bytes([seed; 32]),
            address,
            role,
            tx_rate: tx,
            bandwidth: bw,
        }
    }

    fn addr(seed: u8) -> Address {
        Address::from_bytes([seed; 20])
    }

    fn seed_for(round: u64) -> ElectionSeed {
        ElectionSeed::derive(&Hash::hash(b"test-head"), round)
    }

    #[test]
    fn test_empty_snapshot_elects_no_winner() {
        let elector = CandidateElector::new(ElectionConfig::default());
        let outcome = elector
            .elect(&StaticDirectory(vec![]), &StateLedger::new(), &seed_for(0))
            .unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn test_no_eligible_candidates_elects_no_winner() {
        let peers = vec![
            peer(1, NodeRole::Boot, Some(addr(1)), 500.0, 500.0),
            peer(2, NodeRole::Syn, Some(addr(2)), 500.0, 500.0),
            peer(3, NodeRole::Pre, None, 500.0, 500.0),
            peer(4, NodeRole::Hp, Some(Address::ZERO), 500.0, 500.0),
        ];
        let elector = CandidateElector::new(ElectionConfig::default());
        let outcome = elector
            .elect(&StaticDirectory(peers), &StateLedger::new(), &seed_for(0))
            .unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn test_ineligible_peers_never_enter_pool() {
        let peers = vec![
            peer(1, NodeRole::Boot, Some(addr(1)), 900.0, 900.0),
            peer(2, NodeRole::Pre, Some(addr(2)), 10.0, 10.0),
            peer(3, NodeRole::Syn, Some(addr(3)), 900.0, 900.0),
            peer(4, NodeRole::Auth, None, 900.0, 900.0),
            peer(5, NodeRole::Hp, Some(Address::ZERO), 900.0, 900.0),
        ];
        let elector = CandidateElector::new(ElectionConfig::default());
        let pool = elector.candidate_pool(&peers, &StateLedger::new());

        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].node_id, NodeId::from_bytes([2; 32]));
    }

    #[test]
    fn test_single_candidate_is_primary_and_backup() {
        let peers = vec![peer(1, NodeRole::Pre, Some(addr(1)), 100.0, 50.0)];
        let elector = CandidateElector::new(ElectionConfig::default());
        let result = elector
            .elect(&StaticDirectory(peers), &StateLedger::new(), &seed_for(0))
            .unwrap()
            .unwrap();

        assert_eq!(result.primary, result.backup);
        assert_eq!(result.primary.node_id, NodeId::from_bytes([1; 32]));
    }

    #[test]
    fn test_vote_index_weighs_all_three_signals() {
        let mut ledger = StateLedger::new();
        ledger.credit(addr(1), 2 * MER);

        let peers = vec![peer(1, NodeRole::Pre, Some(addr(1)), 100.0, 50.0)];
        let elector = CandidateElector::new(ElectionConfig::default());
        let pool = elector.candidate_pool(&peers, &ledger);

        // 100 * 0.6 + 50 * 0.3 + 2 * 0.1 = 75.2, truncated
        assert_eq!(pool[0].vote_index, 75);
    }

    #[test]
    fn test_failed_balance_lookup_skips_only_that_peer() {
        let ledger = FlakyLedger {
            poisoned: addr(1),
            inner: StateLedger::new(),
        };
        let peers = vec![
            peer(1, NodeRole::Pre, Some(addr(1)), 100.0, 100.0),
            peer(2, NodeRole::Pre, Some(addr(2)), 100.0, 100.0),
        ];
        let elector = CandidateElector::new(ElectionConfig::default());
        let pool = elector.candidate_pool(&peers, &ledger);

        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].node_id, NodeId::from_bytes([2; 32]));
    }

    #[test]
    fn test_directory_failure_is_a_hard_error() {
        let elector = CandidateElector::new(ElectionConfig::default());
        let outcome = elector.elect(&FailingDirectory, &StateLedger::new(), &seed_for(0));
        assert!(matches!(outcome, Err(ElectionError::Directory(_))));
    }

    #[test]
    fn test_same_seed_reproduces_the_result() {
        let peers: Vec<PeerView> = (1..=10)
            .map(|i| peer(i, NodeRole::Pre, Some(addr(i)), i as f64 * 10.0, 0.0))
            .collect();
        let directory = StaticDirectory(peers);
        let ledger = StateLedger::new();
        let elector = CandidateElector::new(ElectionConfig::default());

        let first = elector.elect(&directory, &ledger, &seed_for(42)).unwrap();
        let second = elector.elect(&directory, &ledger, &seed_for(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_seeds_can_move_the_winner() {
        let peers: Vec<PeerView> = (1..=10)
            .map(|i| peer(i, NodeRole::Pre, Some(addr(i)), i as f64 * 10.0, 0.0))
            .collect();
        let directory = StaticDirectory(peers);
        let ledger = StateLedger::new();
        let elector = CandidateElector::new(ElectionConfig::default());

        let baseline = elector
            .elect(&directory, &ledger, &seed_for(0))
            .unwrap()
            .unwrap();
        let moved = (1..50).any(|round| {
            let result = elector
                .elect(&directory, &ledger, &seed_for(round))
                .unwrap()
                .unwrap();
            result.primary != baseline.primary
        });
        assert!(moved);
    }

    #[test]
    fn test_small_pool_draws_uniformly() {
        // Pool of 2 is within the validator-set size, so selection is a
        // fair rotation regardless of scores.
        let peers = vec![
            peer(1, NodeRole::Pre, Some(addr(1)), 100.0, 50.0),
            peer(2, NodeRole::Pre, Some(addr(2)), 10.0, 500.0),
        ];
        let directory = StaticDirectory(peers);
        let ledger = StateLedger::new();
        let elector = CandidateElector::new(ElectionConfig::default());

        let mut first_wins = 0usize;
        for round in 0..1000 {
            let result = elector
                .elect(&directory, &ledger, &seed_for(round))
                .unwrap()
                .unwrap();
            if result.primary.node_id == NodeId::from_bytes([1; 32]) {
                first_wins += 1;
            }
        }
        assert!((350..=650).contains(&first_wins), "wins: {}", first_wins);
    }

    #[test]
    fn test_large_pool_draws_primary_from_top_window() {
        // 40 candidates with distinct scores against the default window
        // of 31. Scores are shuffled into the snapshot out of order so a
        // partially ordered pool would leak low scores into the window.
        let peers: Vec<PeerView> = (0..40u8)
            .map(|i| {
                let rank = (i as usize * 17) % 40;
                peer(
                    i + 1,
                    NodeRole::Pre,
                    Some(addr(i + 1)),
                    (rank as f64 + 1.0) * 10.0,
                    0.0,
                )
            })
            .collect();
        let directory = StaticDirectory(peers.clone());
        let ledger = StateLedger::new();
        let elector = CandidateElector::new(ElectionConfig::default());

        let mut indices: Vec<u64> = peers
            .iter()
            .map(|p| elector.vote_index(p.tx_rate, p.bandwidth, 0))
            .collect();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        let cutoff = indices[30];

        let mut distinct_primaries = std::collections::HashSet::new();
        for round in 0..300 {
            let result = elector
                .elect(&directory, &ledger, &seed_for(round))
                .unwrap()
                .unwrap();
            assert!(
                result.primary.vote_index >= cutoff,
                "primary with vote index {} fell below the window cutoff {}",
                result.primary.vote_index,
                cutoff
            );
            distinct_primaries.insert(result.primary.node_id);
        }
        assert!(distinct_primaries.len() > 1);
    }

    #[test]
    fn test_backup_is_drawn_from_the_full_pool() {
        let peers: Vec<PeerView> = (0..40u8)
            .map(|i| {
                peer(
                    i + 1,
                    NodeRole::Pre,
                    Some(addr(i + 1)),
                    (i as f64 + 1.0) * 10.0,
                    0.0,
                )
            })
            .collect();
        let directory = StaticDirectory(peers);
        let ledger = StateLedger::new();
        let elector = CandidateElector::new(ElectionConfig::default());

        // Vote index of the 31st-ranked candidate; anything below it is
        // outside the primary window.
        let cutoff = elector.vote_index(10.0 * 10.0, 0.0, 0);

        let backup_outside_window = (0..300).any(|round| {
            let result = elector
                .elect(&directory, &ledger, &seed_for(round))
                .unwrap()
                .unwrap();
            result.backup.vote_index < cutoff
        });
        assert!(backup_outside_window);
    }

    #[test]
    fn test_window_is_clamped_to_the_pool() {
        // 25 candidates sit between the validator-set size (21) and the
        // ranking window (31); the draw must cover exactly the pool.
        let peers: Vec<PeerView> = (1..=25)
            .map(|i| peer(i, NodeRole::Pre, Some(addr(i)), i as f64, 0.0))
            .collect();
        let directory = StaticDirectory(peers);
        let ledger = StateLedger::new();
        let elector = CandidateElector::new(ElectionConfig::default());

        for round in 0..50 {
            let result = elector.elect(&directory, &ledger, &seed_for(round)).unwrap();
            assert!(result.is_some());
        }
    }
}
