// Runner - main node execution logic
// Principle: orchestrate startup, the election loop, and graceful shutdown

use crate::cli::config::{ConfigError, NodeConfig};
use crate::election::CandidateElector;
use crate::ledger::StateLedger;
use crate::network::{NodeRole, PeerRegistry};
use crate::node::ElectionService;
use crate::types::{Address, Hash, NodeId, MER};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Role rotation for synthetic dev peers
const DEV_ROLES: [NodeRole; 6] = [
    NodeRole::Pre,
    NodeRole::Hp,
    NodeRole::Auth,
    NodeRole::Light,
    NodeRole::Boot,
    NodeRole::Syn,
];

/// Run the node with the given configuration
pub async fn run_node(config: NodeConfig) -> Result<(), RunnerError> {
    info!("🚀 Starting Meridian node: {}", config.name);

    let local_id = resolve_local_id(&config)?;
    info!("🆔 Node identity: {}", local_id);

    let registry = Arc::new(RwLock::new(PeerRegistry::new()));
    let ledger = Arc::new(RwLock::new(StateLedger::new()));

    if config.dev {
        let mut registry = registry.write().await;
        let mut ledger = ledger.write().await;
        seed_dev_network(&mut registry, &mut ledger, config.dev_peers);
        info!(
            "🧪 Dev mode: {} synthetic peers, {} funded accounts",
            registry.connected_count(),
            ledger.account_count()
        );
    }

    let genesis_hash = Hash::hash(b"meridian-genesis");
    info!("🔗 Genesis: {}", genesis_hash);

    let service = ElectionService::new(
        registry.clone(),
        ledger.clone(),
        CandidateElector::new(config.election.clone()),
        local_id,
        genesis_hash,
    );

    info!(
        "🗳️  Election rounds every {}s (validator set {}, window {})",
        config.round_interval.as_secs(),
        config.election.validator_set_size,
        config.election.ranking_window
    );

    run_event_loop(&service, &registry, &config).await;

    info!("👋 Node stopped cleanly");
    Ok(())
}

/// Main event loop driving election rounds until shutdown
async fn run_event_loop(
    service: &ElectionService,
    registry: &Arc<RwLock<PeerRegistry>>,
    config: &NodeConfig,
) {
    let mut round_interval = tokio::time::interval(config.round_interval);
    let mut stats_interval = tokio::time::interval(std::time::Duration::from_secs(60));

    loop {
        tokio::select! {
            _ = round_interval.tick() => {
                if let Err(e) = service.run_round().await {
                    error!("Election round failed: {}", e);
                }
            }

            _ = stats_interval.tick() => {
                let connected = registry.read().await.connected_count();
                info!(connected, "peer registry status");
            }

            _ = signal::ctrl_c() => {
                info!("🛑 Shutdown signal received");
                break;
            }
        }
    }
}

/// Load the configured identity or generate an ephemeral one
fn resolve_local_id(config: &NodeConfig) -> Result<NodeId, RunnerError> {
    if let Some(node_id) = config.load_node_id()? {
        return Ok(node_id);
    }
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;

    let signing_key = SigningKey::generate(&mut OsRng);
    let node_id = NodeId::from_public_key(&signing_key.verifying_key());
    info!("No node key configured, using an ephemeral identity");
    Ok(node_id)
}

/// Populate the registry and ledger with a deterministic synthetic network
///
/// Peers cycle through every role, so a dev node also exercises the
/// eligibility filter; telemetry and balances are spread so scores differ.
fn seed_dev_network(registry: &mut PeerRegistry, ledger: &mut StateLedger, count: usize) {
    for i in 0..count {
        let id_hash = Hash::hash(format!("dev-peer-{}", i).as_bytes());
        let node_id = NodeId::from_bytes(*id_hash.as_bytes());

        let addr_hash = Hash::hash(format!("dev-account-{}", i).as_bytes());
        let mut addr_bytes = [0u8; 20];
        addr_bytes.copy_from_slice(&addr_hash.as_bytes()[..20]);
        let address = Address::from_bytes(addr_bytes);

        let role = DEV_ROLES[i % DEV_ROLES.len()];
        registry.peer_connected(node_id, role);
        registry.set_address(&node_id, address);
        registry.update_telemetry(
            &node_id,
            ((i * 37) % 250) as f64,
            ((i * 101) % 2000) as f64,
        );

        ledger.credit(address, ((i * 13) % 40) as u128 * MER);
    }
}

/// Runner errors
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
