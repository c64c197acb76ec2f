// ============================================================================
// TON-STELLAR-BRIDGE - Bridge Facade
// ============================================================================
// `Bridge` holds the injected collaborators and exposes the pure operations.
// `BridgeSession` wraps a bridge with the per-session loading/error state the
// view layer reads.
// ============================================================================

use crate::balance::{check_balances, AccountSnapshot};
use crate::config::{BridgeConfig, Network};
use crate::derive::{derive_stellar_address, generate_random_keypair, StellarKeypair};
use crate::envelope::SignedEnvelope;
use crate::error::BridgeError;
use crate::faucet::{Faucet, FriendbotClient};
use crate::horizon::{HorizonClient, LedgerClient};
use crate::payment::{PaymentIntent, PaymentSigner};
use crate::signer::{SignatureStrategy, UntrustedLocalSigner};
use crate::submit::{SubmitResult, TransactionSubmitter};
use crate::wallet::WalletConnector;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Native balances of one account on both networks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    pub testnet: AccountSnapshot,
    pub mainnet: AccountSnapshot,
}

/// Result of `send_payment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub submission: SubmitResult,
    pub envelope: SignedEnvelope,
    /// Sender balances read after submission
    pub balances: Balances,
}

// ============================================================================
// BRIDGE
// ============================================================================

/// TON wallet to Stellar bridge
pub struct Bridge {
    config: BridgeConfig,
    testnet: Arc<dyn LedgerClient>,
    mainnet: Arc<dyn LedgerClient>,
    faucet: Arc<dyn Faucet>,
    wallet: Arc<dyn WalletConnector>,
    strategy: Arc<dyn SignatureStrategy>,
}

impl Bridge {
    pub fn new(
        config: BridgeConfig,
        testnet: Arc<dyn LedgerClient>,
        mainnet: Arc<dyn LedgerClient>,
        faucet: Arc<dyn Faucet>,
        wallet: Arc<dyn WalletConnector>,
    ) -> Self {
        Self {
            config,
            testnet,
            mainnet,
            faucet,
            wallet,
            strategy: Arc::new(UntrustedLocalSigner),
        }
    }

    /// Bridge talking to the Horizon and friendbot endpoints in `config`
    pub fn from_config(config: BridgeConfig, wallet: Arc<dyn WalletConnector>) -> Result<Self> {
        let testnet = HorizonClient::new(config.testnet.clone())?;
        let mainnet = HorizonClient::new(config.mainnet.clone())?;
        let faucet = FriendbotClient::new(
            config.friendbot_url.clone(),
            Duration::from_secs(config.testnet.http_timeout_seconds),
        )?;

        Ok(Self::new(
            config,
            Arc::new(testnet),
            Arc::new(mainnet),
            Arc::new(faucet),
            wallet,
        ))
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn SignatureStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn ledger(&self, network: Network) -> &dyn LedgerClient {
        match network {
            Network::Testnet => self.testnet.as_ref(),
            Network::Mainnet => self.mainnet.as_ref(),
        }
    }

    /// Placeholder Stellar address for a TON public key
    pub fn derive_address(&self, ton_public_key_hex: &str) -> Result<String> {
        derive_stellar_address(ton_public_key_hex)
    }

    /// Placeholder Stellar address of the connected wallet
    pub fn wallet_address(&self) -> Result<String> {
        let account = self.wallet.account().ok_or(BridgeError::NotConnected)?;
        derive_stellar_address(&account.public_key)
    }

    pub fn generate_keypair(&self) -> StellarKeypair {
        generate_random_keypair()
    }

    /// Read both networks; never fails
    pub async fn check_balances(&self, account_id: &str) -> Balances {
        let (testnet, mainnet) =
            check_balances(self.testnet.as_ref(), self.mainnet.as_ref(), account_id).await;
        Balances { testnet, mainnet }
    }

    /// Fund a testnet account, then refresh its balances
    pub async fn fund_testnet(&self, account_id: &str) -> Result<Balances> {
        self.faucet.fund(account_id).await.map_err(|e| match e {
            BridgeError::Funding { .. } => e,
            other => BridgeError::Funding {
                status: other.status().unwrap_or(0),
                detail: other.to_string(),
            },
        })?;

        Ok(self.check_balances(account_id).await)
    }

    /// Build and sign without submitting
    pub async fn sign_payment(&self, intent: &PaymentIntent) -> Result<SignedEnvelope> {
        PaymentSigner::new(
            self.config.network(intent.network),
            self.ledger(intent.network),
            self.wallet.as_ref(),
        )
        .with_strategy(self.strategy.as_ref())
        .build_and_sign(intent)
        .await
    }

    pub async fn submit_signed(
        &self,
        envelope: &SignedEnvelope,
        network: Network,
    ) -> Result<SubmitResult> {
        TransactionSubmitter::new(self.ledger(network)).submit(envelope).await
    }

    /// Sign, submit, then refresh the sender's balances
    pub async fn send_payment(&self, intent: &PaymentIntent) -> Result<PaymentReceipt> {
        let envelope = self.sign_payment(intent).await?;
        let submission = self.submit_signed(&envelope, intent.network).await?;
        let balances = self.check_balances(&intent.from_address).await;

        Ok(PaymentReceipt {
            submission,
            envelope,
            balances,
        })
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// State read by the view layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub stellar_address: Option<String>,
    pub testnet_balance: Option<String>,
    pub mainnet_balance: Option<String>,
}

/// Bridge plus loading/error tracking for one connected wallet.
///
/// Concurrent calls race on the state fields; the last writer wins.
pub struct BridgeSession {
    bridge: Bridge,
    state: Mutex<SessionState>,
}

impl BridgeSession {
    pub fn new(bridge: Bridge) -> Self {
        Self {
            bridge,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// Copy of the current state
    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn clear_error(&self) {
        self.state.lock().await.last_error = None;
    }

    /// Derive the wallet's default address and fetch its balances
    pub async fn connect(&self) -> Result<Balances> {
        self.track("connect", async {
            let address = self.bridge.wallet_address()?;
            info!("Wallet connected, Stellar address: {}", address);
            self.state.lock().await.stellar_address = Some(address.clone());

            let balances = self.bridge.check_balances(&address).await;
            self.apply_balances(&balances).await;
            Ok(balances)
        })
        .await
    }

    pub async fn derive_address(&self, ton_public_key_hex: &str) -> Result<String> {
        self.track("derive_address", async {
            let address = self.bridge.derive_address(ton_public_key_hex)?;
            self.state.lock().await.stellar_address = Some(address.clone());
            Ok(address)
        })
        .await
    }

    pub async fn check_balances(&self, account_id: &str) -> Result<Balances> {
        self.track("check_balances", async {
            let balances = self.bridge.check_balances(account_id).await;
            self.apply_balances(&balances).await;
            Ok(balances)
        })
        .await
    }

    pub async fn fund_testnet(&self, account_id: &str) -> Result<Balances> {
        self.track("fund_testnet", async {
            let balances = self.bridge.fund_testnet(account_id).await?;
            self.apply_balances(&balances).await;
            Ok(balances)
        })
        .await
    }

    pub async fn sign_payment(&self, intent: &PaymentIntent) -> Result<SignedEnvelope> {
        self.track("sign_payment", self.bridge.sign_payment(intent)).await
    }

    pub async fn submit_signed(
        &self,
        envelope: &SignedEnvelope,
        network: Network,
    ) -> Result<SubmitResult> {
        self.track("submit_signed", self.bridge.submit_signed(envelope, network))
            .await
    }

    pub async fn send_payment(&self, intent: &PaymentIntent) -> Result<PaymentReceipt> {
        self.track("send_payment", async {
            let receipt = self.bridge.send_payment(intent).await?;
            self.apply_balances(&receipt.balances).await;
            Ok(receipt)
        })
        .await
    }

    async fn apply_balances(&self, balances: &Balances) {
        let mut state = self.state.lock().await;
        state.testnet_balance = Some(balances.testnet.native_balance.clone());
        state.mainnet_balance = Some(balances.mainnet.native_balance.clone());
    }

    async fn track<T, F>(&self, operation: &str, body: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        {
            let mut state = self.state.lock().await;
            state.is_loading = true;
            state.last_error = None;
        }
        debug!("{} started", operation);

        let result = body.await;

        let mut state = self.state.lock().await;
        state.is_loading = false;
        if let Err(e) = &result {
            debug!("{} failed: {}", operation, e);
            state.last_error = Some(e.to_string());
        }
        result
    }
}
