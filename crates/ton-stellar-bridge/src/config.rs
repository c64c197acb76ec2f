// ============================================================================
// TON-STELLAR-BRIDGE - Configuration
// ============================================================================
// Endpoint configuration for Stellar testnet and mainnet, plus the testnet
// faucet. Loadable from a JSON file; every field has a default.
// ============================================================================

use crate::error::BridgeError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Mainnet network passphrase
pub const PUBLIC_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Testnet network passphrase
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Longest accepted transaction validity window, in seconds
pub const MAX_TX_TIMEOUT_SECONDS: u64 = 24 * 60 * 60;

/// Environment variable overriding the testnet Horizon URL
pub const ENV_TESTNET_HORIZON_URL: &str = "STELLAR_TESTNET_HORIZON_URL";

/// Environment variable overriding the mainnet Horizon URL
pub const ENV_MAINNET_HORIZON_URL: &str = "STELLAR_MAINNET_HORIZON_URL";

/// Environment variable overriding the friendbot URL
pub const ENV_FRIENDBOT_URL: &str = "STELLAR_FRIENDBOT_URL";

/// Network selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }

    /// Passphrase that scopes transaction hashes to this network
    pub fn passphrase(&self) -> &'static str {
        match self {
            Network::Testnet => TESTNET_PASSPHRASE,
            Network::Mainnet => PUBLIC_PASSPHRASE,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" | "test" => Ok(Network::Testnet),
            "mainnet" | "public" | "pubnet" => Ok(Network::Mainnet),
            other => Err(BridgeError::Config(format!("Unknown network: {}", other))),
        }
    }
}

/// Stellar network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StellarConfig {
    /// Network (mainnet or testnet)
    pub network: Network,

    /// Horizon API URL
    pub horizon_url: String,

    /// Network passphrase for transaction signing
    pub network_passphrase: String,

    /// Fee per operation in stroops (1 XLM = 10,000,000 stroops)
    #[serde(default = "default_base_fee")]
    pub base_fee: u32,

    /// Validity window of built transactions, in seconds
    #[serde(default = "default_tx_timeout")]
    pub tx_timeout_seconds: u64,

    /// HTTP request timeout, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
}

fn default_base_fee() -> u32 {
    100_000 // 0.01 XLM
}

fn default_tx_timeout() -> u64 {
    30
}

fn default_http_timeout() -> u64 {
    30
}

impl StellarConfig {
    /// Create mainnet configuration
    pub fn mainnet() -> Self {
        Self {
            network: Network::Mainnet,
            horizon_url: "https://horizon.stellar.org".to_string(),
            network_passphrase: Network::Mainnet.passphrase().to_string(),
            base_fee: default_base_fee(),
            tx_timeout_seconds: default_tx_timeout(),
            http_timeout_seconds: default_http_timeout(),
        }
    }

    /// Create testnet configuration
    pub fn testnet() -> Self {
        Self {
            network: Network::Testnet,
            horizon_url: "https://horizon-testnet.stellar.org".to_string(),
            network_passphrase: Network::Testnet.passphrase().to_string(),
            base_fee: default_base_fee(),
            tx_timeout_seconds: default_tx_timeout(),
            http_timeout_seconds: default_http_timeout(),
        }
    }

    /// Same configuration pointed at a different Horizon instance
    pub fn with_horizon_url(mut self, url: impl Into<String>) -> Self {
        self.horizon_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get Stellar Expert explorer URL for an address
    pub fn explorer_account_url(&self, address: &str) -> String {
        format!("{}/account/{}", self.explorer_base(), address)
    }

    /// Get Stellar Expert explorer URL for a transaction
    pub fn explorer_tx_url(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_base(), hash)
    }

    fn explorer_base(&self) -> &'static str {
        match self.network {
            Network::Mainnet => "https://stellar.expert/explorer/public",
            Network::Testnet => "https://stellar.expert/explorer/testnet",
        }
    }

    fn validate(&self) -> Result<()> {
        if self.network_passphrase != self.network.passphrase() {
            return Err(BridgeError::Config(format!(
                "{} passphrase must be \"{}\"",
                self.network,
                self.network.passphrase()
            )));
        }
        if self.tx_timeout_seconds == 0 || self.tx_timeout_seconds > MAX_TX_TIMEOUT_SECONDS {
            return Err(BridgeError::Config(format!(
                "{} txTimeoutSeconds must be between 1 and {}, got {}",
                self.network, MAX_TX_TIMEOUT_SECONDS, self.tx_timeout_seconds
            )));
        }
        Ok(())
    }
}

/// Bridge configuration: both ledgers and the testnet faucet
///
/// # Configuration file
///
/// ```json
/// {
///   "testnet": { "network": "testnet", "horizonUrl": "https://horizon-testnet.stellar.org",
///                "networkPassphrase": "Test SDF Network ; September 2015" },
///   "friendbotUrl": "https://friendbot.stellar.org"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Testnet ledger
    #[serde(default = "StellarConfig::testnet")]
    pub testnet: StellarConfig,

    /// Mainnet ledger
    #[serde(default = "StellarConfig::mainnet")]
    pub mainnet: StellarConfig,

    /// Friendbot faucet URL (testnet only)
    #[serde(default = "default_friendbot_url")]
    pub friendbot_url: String,
}

fn default_friendbot_url() -> String {
    "https://friendbot.stellar.org".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            testnet: StellarConfig::testnet(),
            mainnet: StellarConfig::mainnet(),
            friendbot_url: default_friendbot_url(),
        }
    }
}

impl BridgeConfig {
    /// Parse configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BridgeConfig = serde_json::from_str(json)
            .map_err(|e| BridgeError::Config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Apply `STELLAR_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_TESTNET_HORIZON_URL) {
            self.testnet = self.testnet.with_horizon_url(url);
        }
        if let Some(url) = lookup(ENV_MAINNET_HORIZON_URL) {
            self.mainnet = self.mainnet.with_horizon_url(url);
        }
        if let Some(url) = lookup(ENV_FRIENDBOT_URL) {
            self.friendbot_url = url;
        }
        self
    }

    /// Configuration for one network
    pub fn network(&self, network: Network) -> &StellarConfig {
        match network {
            Network::Testnet => &self.testnet,
            Network::Mainnet => &self.mainnet,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.testnet.network != Network::Testnet {
            return Err(BridgeError::Config("`testnet` entry must use network \"testnet\"".into()));
        }
        if self.mainnet.network != Network::Mainnet {
            return Err(BridgeError::Config("`mainnet` entry must use network \"mainnet\"".into()));
        }
        self.testnet.validate()?;
        self.mainnet.validate()
    }
}
