// Election - candidate-leader nomination over the connected peer set
// Principle: winners must be reproducible from data every honest node shares

pub mod config;
pub mod elector;
pub mod seed;
pub mod winner;

pub use config::ElectionConfig;
pub use elector::{CandidateElector, ElectionError};
pub use seed::ElectionSeed;
pub use winner::{CadWinner, ElectionResult};
