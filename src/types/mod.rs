// Types - fundamental types shared across the node
pub mod identity;
pub mod primitives;

pub use identity::{Address, AddressParseError, NodeId};
pub use primitives::{Balance, BlockNumber, Hash, RoundNumber, MER, MICROMER, MILLIMER};
