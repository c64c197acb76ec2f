// ============================================================================
// TON-STELLAR-BRIDGE - Testnet Faucet
// ============================================================================
// Friendbot funds new testnet accounts with test XLM:
//   GET {friendbot_url}?addr={account_id}
// ============================================================================

use crate::error::BridgeError;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Testnet funding service
#[async_trait]
pub trait Faucet: Send + Sync {
    /// Request test funds for an account
    async fn fund(&self, account_id: &str) -> Result<()>;
}

/// HTTP client for the SDF friendbot
pub struct FriendbotClient {
    url: String,
    http: Client,
}

impl FriendbotClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BridgeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { url: url.into(), http })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Faucet for FriendbotClient {
    async fn fund(&self, account_id: &str) -> Result<()> {
        debug!("Requesting friendbot funding for: {}", account_id);

        let response = self
            .http
            .get(&self.url)
            .query(&[("addr", account_id)])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("Friendbot funded account: {}", account_id);
            Ok(())
        } else {
            let detail = response.text().await.unwrap_or_default();
            Err(BridgeError::Funding {
                status: status.as_u16(),
                detail,
            })
        }
    }
}
