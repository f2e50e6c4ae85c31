// Registry - tracks connected peers and serves snapshots to the elector
// Principle: the elector sees only peers that completed the handshake

use super::peer::{NodeRole, PeerInfo, PeerState, PeerView};
use crate::types::{Address, NodeId};
use tracing::debug;

/// Source of connected-peer snapshots
///
/// Implementations must return only peers in an established,
/// post-handshake state. A failure here is a structural fault and aborts
/// the election round; per-peer problems never surface through this trait.
pub trait PeerDirectory {
    fn connected_peers(&self) -> Result<Vec<PeerView>, DirectoryError>;
}

/// In-memory registry of known peers
///
/// Insertion order is preserved so snapshots have a stable default order.
pub struct PeerRegistry {
    peers: Vec<PeerInfo>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self { peers: Vec::new() }
    }

    fn find_mut(&mut self, node_id: &NodeId) -> Option<&mut PeerInfo> {
        self.peers.iter_mut().find(|p| p.node_id == *node_id)
    }

    /// Register a completed handshake for a peer
    pub fn peer_connected(&mut self, node_id: NodeId, role: NodeRole) {
        match self.find_mut(&node_id) {
            Some(peer) => {
                peer.state = PeerState::Connected;
                peer.role = role;
            }
            None => {
                let mut peer = PeerInfo::new(node_id, role);
                peer.state = PeerState::Connected;
                self.peers.push(peer);
            }
        }
        debug!(peer = %node_id, ?role, "peer connected");
    }

    /// Mark a peer as gone
    pub fn peer_disconnected(&mut self, node_id: &NodeId) {
        if let Some(peer) = self.find_mut(node_id) {
            peer.state = PeerState::Disconnected;
            debug!(peer = %node_id, "peer disconnected");
        }
    }

    /// Record the account address a peer reported
    pub fn set_address(&mut self, node_id: &NodeId, address: Address) {
        if let Some(peer) = self.find_mut(node_id) {
            peer.address = Some(address);
        }
    }

    /// Fold a reported telemetry sample into a peer's meters
    pub fn update_telemetry(&mut self, node_id: &NodeId, tx_rate: f64, bandwidth: f64) {
        if let Some(peer) = self.find_mut(node_id) {
            peer.update_telemetry(tx_rate, bandwidth);
        }
    }

    pub fn get(&self, node_id: &NodeId) -> Option<&PeerInfo> {
        self.peers.iter().find(|p| p.node_id == *node_id)
    }

    pub fn connected_count(&self) -> usize {
        self.peers.iter().filter(|p| p.is_active()).count()
    }

    /// Snapshot of all live peers, in insertion order
    pub fn snapshot(&self) -> Vec<PeerView> {
        self.peers
            .iter()
            .filter(|p| p.is_active())
            .map(PeerInfo::view)
            .collect()
    }
}

impl Default for PeerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PeerDirectory for PeerRegistry {
    fn connected_peers(&self) -> Result<Vec<PeerView>, DirectoryError> {
        Ok(self.snapshot())
    }
}

/// Peer directory errors
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("peer directory unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_id(seed: u8) -> NodeId {
        NodeId::from_bytes([seed; 32])
    }

    #[test]
    fn test_snapshot_contains_only_connected_peers() {
        let mut registry = PeerRegistry::new();
        registry.peer_connected(node_id(1), NodeRole::Pre);
        registry.peer_connected(node_id(2), NodeRole::Hp);
        registry.peer_disconnected(&node_id(1));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].node_id, node_id(2));
        assert_eq!(registry.connected_count(), 1);
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let mut registry = PeerRegistry::new();
        for seed in 1..=5 {
            registry.peer_connected(node_id(seed), NodeRole::Pre);
        }

        let snapshot = registry.snapshot();
        let ids: Vec<NodeId> = snapshot.iter().map(|v| v.node_id).collect();
        assert_eq!(ids, (1..=5).map(node_id).collect::<Vec<_>>());
    }

    #[test]
    fn test_reconnect_updates_role_in_place() {
        let mut registry = PeerRegistry::new();
        registry.peer_connected(node_id(1), NodeRole::Light);
        registry.peer_disconnected(&node_id(1));
        registry.peer_connected(node_id(1), NodeRole::Hp);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].role, NodeRole::Hp);
    }

    #[test]
    fn test_telemetry_and_address_flow_into_views() {
        let mut registry = PeerRegistry::new();
        registry.peer_connected(node_id(3), NodeRole::Auth);
        registry.set_address(&node_id(3), Address::from_bytes([9; 20]));
        registry.update_telemetry(&node_id(3), 42.0, 1024.0);

        let view = &registry.snapshot()[0];
        assert_eq!(view.address, Some(Address::from_bytes([9; 20])));
        assert_eq!(view.tx_rate, 42.0);
        assert_eq!(view.bandwidth, 1024.0);
    }
}
