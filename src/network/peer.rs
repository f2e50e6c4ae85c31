// Peer - connected-peer state and reported telemetry
// Principle: track what each peer reports, expose an immutable snapshot row

use crate::types::{Address, NodeId};
use serde::{Deserialize, Serialize};

/// Smoothing factor for telemetry meters
const TELEMETRY_ALPHA: f64 = 0.3;

/// Role a peer advertises during the authenticated handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeRole {
    /// Default role for nodes without hardware attestation
    Light = 0x10,
    /// Attested node
    Auth = 0x30,
    /// Pre-candidate node
    Pre = 0x31,
    /// High-performance node
    Hp = 0x60,
    /// Bootstrap node
    Boot = 0xA0,
    /// Sync-only node
    Syn = 0xA1,
}

impl NodeRole {
    /// Whether this role may enter the candidate pool at all.
    /// Bootstrap and sync-only nodes serve the network but never lead it.
    pub fn is_electable(&self) -> bool {
        !matches!(self, NodeRole::Boot | NodeRole::Syn)
    }
}

/// Peer connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    /// Handshake in progress
    Connecting,
    /// Handshake complete, peer is live
    Connected,
    /// Gone, may reconnect
    Disconnected,
}

/// Exponentially smoothed telemetry meter
///
/// Peers report instantaneous readings in their periodic status messages;
/// the meter smooths them so one burst does not dominate the signal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RateMeter {
    value: f64,
    primed: bool,
}

impl RateMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a reported sample into the smoothed value
    pub fn update(&mut self, sample: f64) {
        if !sample.is_finite() || sample < 0.0 {
            return;
        }
        if self.primed {
            self.value = TELEMETRY_ALPHA * sample + (1.0 - TELEMETRY_ALPHA) * self.value;
        } else {
            self.value = sample;
            self.primed = true;
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Live state for one tracked peer
#[derive(Debug, Clone)]
pub struct PeerInfo {
    /// Network identity
    pub node_id: NodeId,

    /// Advertised role
    pub role: NodeRole,

    /// Account address the peer reported, if any
    pub address: Option<Address>,

    /// Connection state
    pub state: PeerState,

    /// Smoothed transaction throughput (txs/sec)
    tx_meter: RateMeter,

    /// Smoothed bandwidth (bytes/sec)
    bw_meter: RateMeter,
}

impl PeerInfo {
    pub fn new(node_id: NodeId, role: NodeRole) -> Self {
        Self {
            node_id,
            role,
            address: None,
            state: PeerState::Connecting,
            tx_meter: RateMeter::new(),
            bw_meter: RateMeter::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PeerState::Connected)
    }

    /// Fold a reported telemetry sample into the meters
    pub fn update_telemetry(&mut self, tx_rate: f64, bandwidth: f64) {
        self.tx_meter.update(tx_rate);
        self.bw_meter.update(bandwidth);
    }

    /// Recent transaction throughput (txs/sec)
    pub fn tx_rate(&self) -> f64 {
        self.tx_meter.value()
    }

    /// Recent bandwidth (bytes/sec)
    pub fn bandwidth(&self) -> f64 {
        self.bw_meter.value()
    }

    /// Immutable snapshot row for the elector
    pub fn view(&self) -> PeerView {
        PeerView {
            node_id: self.node_id,
            address: self.address,
            role: self.role,
            tx_rate: self.tx_rate(),
            bandwidth: self.bandwidth(),
        }
    }
}

/// One row of a peer snapshot, frozen at observation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerView {
    pub node_id: NodeId,
    pub address: Option<Address>,
    pub role: NodeRole,
    pub tx_rate: f64,
    pub bandwidth: f64,
}
