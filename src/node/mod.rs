// Node - orchestration around the election core
pub mod service;

pub use service::{ChainHead, ElectionService};
