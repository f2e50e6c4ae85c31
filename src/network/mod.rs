// Network - peer tracking and snapshot intake for the elector
pub mod peer;
pub mod registry;

pub use peer::{NodeRole, PeerInfo, PeerState, PeerView, RateMeter};
pub use registry::{DirectoryError, PeerDirectory, PeerRegistry};
