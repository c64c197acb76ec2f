// ============================================================================
// TON-STELLAR-BRIDGE - Horizon API Client
// ============================================================================
// HTTP client for Stellar's Horizon API: account loads and transaction
// submission. One instance per network; the bridge depends only on the
// `LedgerClient` trait so tests can inject stubs.
// ============================================================================

use crate::config::{Network, StellarConfig};
use crate::error::BridgeError;
use crate::strkey::is_valid_account_id;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

// ============================================================================
// DATA TYPES
// ============================================================================

/// Account balance line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// "native" for XLM, "credit_alphanum4"/"credit_alphanum12" for tokens
    pub asset_type: String,

    #[serde(default)]
    pub asset_code: Option<String>,

    #[serde(default)]
    pub asset_issuer: Option<String>,

    /// Decimal string, kept verbatim
    pub balance: String,
}

impl Balance {
    pub fn native(balance: &str) -> Self {
        Self {
            asset_type: "native".to_string(),
            asset_code: None,
            asset_issuer: None,
            balance: balance.to_string(),
        }
    }

    /// Check if this is native XLM
    pub fn is_native(&self) -> bool {
        self.asset_type == "native"
    }
}

/// Stellar account as returned by `GET /accounts/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account public key (G... address)
    pub id: String,

    /// Current sequence number (int64 as string)
    pub sequence: String,

    pub balances: Vec<Balance>,

    #[serde(default)]
    pub subentry_count: u32,
}

impl AccountInfo {
    /// Native XLM balance string, if the account holds a native line
    pub fn native_balance(&self) -> Option<&str> {
        self.balances
            .iter()
            .find(|b| b.is_native())
            .map(|b| b.balance.as_str())
    }

    /// Parsed sequence number
    pub fn sequence_number(&self) -> Result<i64> {
        self.sequence.parse::<i64>().map_err(|_| {
            BridgeError::MalformedResponse(format!(
                "Account {} has invalid sequence '{}'",
                self.id, self.sequence
            ))
        })
    }
}

/// Transaction submission result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub hash: String,

    #[serde(default)]
    pub ledger: Option<u64>,

    #[serde(default)]
    pub successful: Option<bool>,

    #[serde(default)]
    pub fee_charged: Option<String>,
}

/// Horizon problem+json error body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HorizonErrorResponse {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub extras: Option<HorizonErrorExtras>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HorizonErrorExtras {
    #[serde(default)]
    pub result_codes: Option<ResultCodes>,
    #[serde(default)]
    pub result_xdr: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultCodes {
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub operations: Option<Vec<String>>,
}

impl HorizonErrorResponse {
    /// Most specific human-readable reason available
    pub fn reason(&self) -> String {
        if let Some(codes) = self.extras.as_ref().and_then(|e| e.result_codes.as_ref()) {
            let tx = codes.transaction.as_deref().unwrap_or("unknown");
            return match &codes.operations {
                Some(ops) if !ops.is_empty() => format!("tx: {}, ops: [{}]", tx, ops.join(", ")),
                _ => format!("tx: {}", tx),
            };
        }
        self.detail
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

// ============================================================================
// LEDGER CLIENT TRAIT
// ============================================================================

/// Read/submit access to one Stellar ledger
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Which network this client talks to
    fn network(&self) -> Network;

    /// Load an account; unfunded accounts fail with `AccountNotFound`
    async fn load_account(&self, account_id: &str) -> Result<AccountInfo>;

    /// Submit a base64 transaction envelope
    async fn submit_transaction(&self, envelope_xdr: &str) -> Result<TransactionResponse>;
}

// ============================================================================
// HORIZON CLIENT
// ============================================================================

/// Client for Stellar Horizon API
pub struct HorizonClient {
    config: StellarConfig,
    http: Client,
}

impl HorizonClient {
    /// Create new Horizon client
    pub fn new(config: StellarConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(|e| BridgeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.horizon_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl LedgerClient for HorizonClient {
    fn network(&self) -> Network {
        self.config.network
    }

    async fn load_account(&self, account_id: &str) -> Result<AccountInfo> {
        // Only well-formed ids go into the request path
        if !is_valid_account_id(account_id) {
            return Err(BridgeError::InvalidStellarAddress(account_id.to_string()));
        }
        let url = self.url(&format!("accounts/{}", account_id));

        debug!("Loading {} account: {}", self.config.network, account_id);

        let response = self.http.get(&url).send().await?;

        match response.status().as_u16() {
            200 => {
                let account: AccountInfo = response.json().await?;
                Ok(account)
            }
            404 => Err(BridgeError::AccountNotFound(account_id.to_string())),
            429 => Err(BridgeError::RateLimited),
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(BridgeError::Horizon { status, detail: error_text })
            }
        }
    }

    async fn submit_transaction(&self, envelope_xdr: &str) -> Result<TransactionResponse> {
        let url = self.url("transactions");

        debug!("Submitting transaction to {}...", self.config.network);

        let response = self
            .http
            .post(&url)
            .form(&[("tx", envelope_xdr)])
            .send()
            .await?;

        match response.status().as_u16() {
            200 => {
                let tx_response: TransactionResponse = response.json().await?;
                debug!("Transaction successful: {}", tx_response.hash);
                Ok(tx_response)
            }
            429 => Err(BridgeError::RateLimited),
            status @ (400 | 504) => {
                let text = response.text().await.unwrap_or_default();
                let reason = serde_json::from_str::<HorizonErrorResponse>(&text)
                    .map(|e| e.reason())
                    .unwrap_or(text);

                warn!("Transaction rejected (HTTP {}): {}", status, reason);
                Err(BridgeError::TransactionRejected { status, reason })
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(BridgeError::Horizon { status, detail: error_text })
            }
        }
    }
}
