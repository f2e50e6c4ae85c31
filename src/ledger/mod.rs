// Ledger - account balance store consulted during scoring
pub mod state;

pub use state::StateLedger;

use crate::types::{Address, Balance};

/// Source of account balances
///
/// An absent account is a valid zero-balance response, not an error.
/// Errors signal that the lookup itself failed; the elector treats them
/// as a per-peer skip rather than a round-wide fault.
pub trait AccountLedger {
    fn balance_of(&self, address: &Address) -> Result<Balance, LedgerError>;
}

/// Ledger lookup errors
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("balance lookup failed: {0}")]
    LookupFailed(String),
}
