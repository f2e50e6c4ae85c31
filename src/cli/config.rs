// CLI configuration - convert CLI args to node config
use crate::cli::RunCmd;
use crate::election::ElectionConfig;
use crate::types::NodeId;
use std::path::PathBuf;
use std::time::Duration;

/// Complete node configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Node name
    pub name: String,
    /// Time between election rounds
    pub round_interval: Duration,
    /// Election parameters
    pub election: ElectionConfig,
    /// Seed a synthetic network on startup
    pub dev: bool,
    /// Synthetic peer count for dev mode
    pub dev_peers: usize,
    /// Node identity key file
    pub node_key: Option<PathBuf>,
}

impl NodeConfig {
    /// Create configuration from CLI run command
    pub fn from_run_cmd(cmd: &RunCmd) -> Result<Self, ConfigError> {
        for (label, weight) in [
            ("tx-rate-weight", cmd.tx_rate_weight),
            ("bandwidth-weight", cmd.bandwidth_weight),
            ("balance-weight", cmd.balance_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight(label.to_string()));
            }
        }
        if cmd.validator_set_size == 0 {
            return Err(ConfigError::InvalidValidatorSetSize);
        }
        if cmd.ranking_window == 0 {
            return Err(ConfigError::InvalidRankingWindow);
        }
        if cmd.round_interval == 0 {
            return Err(ConfigError::InvalidRoundInterval);
        }

        let election = ElectionConfig {
            tx_rate_weight: cmd.tx_rate_weight,
            bandwidth_weight: cmd.bandwidth_weight,
            balance_weight: cmd.balance_weight,
            validator_set_size: cmd.validator_set_size,
            ranking_window: cmd.ranking_window,
            ..ElectionConfig::default()
        };

        // Node names are cosmetic identifiers; thread-local randomness
        // is fine here.
        let name = cmd.name.clone().unwrap_or_else(|| {
            use rand::Rng;
            let mut rng = rand::thread_rng();
            let adjectives = ["Swift", "Brave", "Noble", "Wise", "Bold"];
            let nouns = ["Meridian", "Zenith", "Apex", "Summit", "Crest"];
            let adj = adjectives[rng.gen_range(0..adjectives.len())];
            let noun = nouns[rng.gen_range(0..nouns.len())];
            let id: u16 = rng.gen();
            format!("{}-{}-{}", adj, noun, id)
        });

        Ok(Self {
            name,
            round_interval: Duration::from_secs(cmd.round_interval),
            election,
            dev: cmd.dev,
            dev_peers: cmd.dev_peers,
            node_key: cmd.node_key.clone(),
        })
    }

    /// Load the node identity from the configured key file, if any
    ///
    /// Accepts the JSON format written by `key generate` (either the
    /// secret or the public key field) or a raw 32-byte hex secret key.
    pub fn load_node_id(&self) -> Result<Option<NodeId>, ConfigError> {
        use ed25519_dalek::SigningKey;

        let Some(ref key_path) = self.node_key else {
            return Ok(None);
        };

        let content = std::fs::read_to_string(key_path)
            .map_err(|e| ConfigError::KeyLoadError(format!("failed to read key file: {}", e)))?;

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&content) {
            if let Some(secret_hex) = json.get("secretKey").and_then(|v| v.as_str()) {
                let bytes = Self::decode_key_hex(secret_hex)?;
                let signing_key = SigningKey::from_bytes(&bytes);
                return Ok(Some(NodeId::from_public_key(&signing_key.verifying_key())));
            }
            if let Some(public_hex) = json.get("publicKey").and_then(|v| v.as_str()) {
                let bytes = Self::decode_key_hex(public_hex)?;
                return Ok(Some(NodeId::from_bytes(bytes)));
            }
            return Err(ConfigError::KeyLoadError(
                "key file missing 'secretKey' or 'publicKey' field".to_string(),
            ));
        }

        // Raw hex files hold the secret key
        let bytes = Self::decode_key_hex(content.trim())?;
        let signing_key = SigningKey::from_bytes(&bytes);
        Ok(Some(NodeId::from_public_key(&signing_key.verifying_key())))
    }

    fn decode_key_hex(s: &str) -> Result<[u8; 32], ConfigError> {
        let hex_str = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(hex_str)
            .map_err(|e| ConfigError::KeyLoadError(format!("invalid hex: {}", e)))?;
        bytes.try_into().map_err(|_| {
            ConfigError::KeyLoadError("key must be exactly 32 bytes".to_string())
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("election weight '{0}' must be a non-negative finite number")]
    InvalidWeight(String),

    #[error("validator set size must be at least 1")]
    InvalidValidatorSetSize,

    #[error("ranking window must be at least 1")]
    InvalidRankingWindow,

    #[error("round interval must be at least 1 second")]
    InvalidRoundInterval,

    #[error("key load error: {0}")]
    KeyLoadError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_cmd() -> RunCmd {
        RunCmd {
            name: Some("test-node".to_string()),
            round_interval: 6,
            validator_set_size: 21,
            ranking_window: 31,
            tx_rate_weight: 0.6,
            bandwidth_weight: 0.3,
            balance_weight: 0.1,
            dev: false,
            dev_peers: 32,
            node_key: None,
        }
    }

    #[test]
    fn test_node_config_from_run_cmd() {
        let config = NodeConfig::from_run_cmd(&run_cmd()).unwrap();
        assert_eq!(config.name, "test-node");
        assert_eq!(config.round_interval, Duration::from_secs(6));
        assert_eq!(config.election, ElectionConfig::default());
        assert!(!config.dev);
    }

    #[test]
    fn test_generated_name_when_unset() {
        let mut cmd = run_cmd();
        cmd.name = None;
        let config = NodeConfig::from_run_cmd(&cmd).unwrap();
        assert!(!config.name.is_empty());
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let mut cmd = run_cmd();
        cmd.bandwidth_weight = -0.3;
        assert!(matches!(
            NodeConfig::from_run_cmd(&cmd),
            Err(ConfigError::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_zero_validator_set_size_is_rejected() {
        let mut cmd = run_cmd();
        cmd.validator_set_size = 0;
        assert!(matches!(
            NodeConfig::from_run_cmd(&cmd),
            Err(ConfigError::InvalidValidatorSetSize)
        ));
    }

    #[test]
    fn test_zero_round_interval_is_rejected() {
        let mut cmd = run_cmd();
        cmd.round_interval = 0;
        assert!(matches!(
            NodeConfig::from_run_cmd(&cmd),
            Err(ConfigError::InvalidRoundInterval)
        ));
    }

    #[test]
    fn test_custom_election_parameters_flow_through() {
        let mut cmd = run_cmd();
        cmd.validator_set_size = 5;
        cmd.ranking_window = 7;
        cmd.tx_rate_weight = 0.5;
        let config = NodeConfig::from_run_cmd(&cmd).unwrap();
        assert_eq!(config.election.validator_set_size, 5);
        assert_eq!(config.election.ranking_window, 7);
        assert_eq!(config.election.tx_rate_weight, 0.5);
    }
}
