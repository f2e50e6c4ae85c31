// Election configuration - explicit, immutable per-invocation settings
use crate::types::{Balance, MER};

/// Consensus defaults
pub const DEFAULT_TX_RATE_WEIGHT: f64 = 0.6;
pub const DEFAULT_BANDWIDTH_WEIGHT: f64 = 0.3;
pub const DEFAULT_BALANCE_WEIGHT: f64 = 0.1;

/// Active validator-set size. Pools no larger than this rotate uniformly
/// instead of competing on score.
pub const DEFAULT_VALIDATOR_SET_SIZE: usize = 21;

/// Size of the ranked slice the primary winner is drawn from when the
/// pool exceeds the validator-set size.
pub const DEFAULT_RANKING_WINDOW: usize = 31;

/// Scoring and selection parameters for one election
///
/// Carried by value so callers and tests can vary every knob without
/// touching shared state.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionConfig {
    /// Weight applied to the transaction-throughput signal
    pub tx_rate_weight: f64,

    /// Weight applied to the bandwidth signal
    pub bandwidth_weight: f64,

    /// Weight applied to the account-balance signal
    pub balance_weight: f64,

    /// Pool sizes up to this value select uniformly; larger pools rank
    pub validator_set_size: usize,

    /// Top slice of the ranking the primary is drawn from
    pub ranking_window: usize,

    /// Divisor converting smallest-unit balances to whole coins before
    /// weighting
    pub balance_unit: Balance,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            tx_rate_weight: DEFAULT_TX_RATE_WEIGHT,
            bandwidth_weight: DEFAULT_BANDWIDTH_WEIGHT,
            balance_weight: DEFAULT_BALANCE_WEIGHT,
            validator_set_size: DEFAULT_VALIDATOR_SET_SIZE,
            ranking_window: DEFAULT_RANKING_WINDOW,
            balance_unit: MER,
        }
    }
}
