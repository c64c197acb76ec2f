// ============================================================================
// TON-STELLAR-BRIDGE - Payment Build & Sign
// ============================================================================
// Payment flow:
//   1. Require a connected wallet (no network call before this)
//   2. Validate the intent
//   3. Load the source account (sequence number)
//   4. Build a single native payment
//   5. Hash it under the network passphrase
//   6. Ask the wallet to sign the hash
//   7. Let the signature strategy produce the ledger signature
//   8. Serialize the envelope
// ============================================================================

use crate::amount::parse_xlm;
use crate::config::{Network, StellarConfig};
use crate::envelope::{SignedEnvelope, TransactionEnvelope};
use crate::error::BridgeError;
use crate::horizon::LedgerClient;
use crate::signer::{SignatureStrategy, UntrustedLocalSigner};
use crate::strkey::is_valid_account_id;
use crate::transaction::{TransactionBuilder, MAX_MEMO_TEXT_LEN};
use crate::wallet::WalletConnector;
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// A native XLM payment requested by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub from_address: String,
    pub to_address: String,
    /// Whole-XLM decimal string, as entered
    pub amount: String,
    pub network: Network,
    #[serde(default)]
    pub memo: Option<String>,
}

impl PaymentIntent {
    pub fn new(
        from_address: impl Into<String>,
        to_address: impl Into<String>,
        amount: impl Into<String>,
        network: Network,
    ) -> Self {
        Self {
            from_address: from_address.into(),
            to_address: to_address.into(),
            amount: amount.into(),
            network,
            memo: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Memo to attach, if any. Empty memos are dropped.
    pub fn memo_text(&self) -> Option<&str> {
        self.memo.as_deref().filter(|m| !m.is_empty())
    }

    /// Precondition check, run before any signing request
    pub fn validate(&self) -> Result<()> {
        if self.to_address.trim().is_empty() {
            return Err(BridgeError::InvalidPayment("Destination address is required".to_string()));
        }
        if self.amount.trim().is_empty() {
            return Err(BridgeError::InvalidPayment("Amount is required".to_string()));
        }

        parse_xlm(&self.amount)?;

        if !is_valid_account_id(&self.from_address) {
            return Err(BridgeError::InvalidPayment(format!(
                "Source is not a Stellar account: {}",
                self.from_address
            )));
        }
        if !is_valid_account_id(&self.to_address) {
            return Err(BridgeError::InvalidPayment(format!(
                "Destination is not a Stellar account: {}",
                self.to_address
            )));
        }

        if let Some(memo) = self.memo_text() {
            if memo.len() > MAX_MEMO_TEXT_LEN {
                return Err(BridgeError::InvalidPayment(format!(
                    "Memo is {} bytes, limit is {}",
                    memo.len(),
                    MAX_MEMO_TEXT_LEN
                )));
            }
        }

        Ok(())
    }
}

/// Builds and signs payments for one network
pub struct PaymentSigner<'a> {
    config: &'a StellarConfig,
    ledger: &'a dyn LedgerClient,
    wallet: &'a dyn WalletConnector,
    strategy: &'a dyn SignatureStrategy,
}

impl<'a> PaymentSigner<'a> {
    pub fn new(
        config: &'a StellarConfig,
        ledger: &'a dyn LedgerClient,
        wallet: &'a dyn WalletConnector,
    ) -> Self {
        Self {
            config,
            ledger,
            wallet,
            strategy: &UntrustedLocalSigner,
        }
    }

    pub fn with_strategy(mut self, strategy: &'a dyn SignatureStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Build, hash, sign and serialize `intent`
    pub async fn build_and_sign(&self, intent: &PaymentIntent) -> Result<SignedEnvelope> {
        let account = self.wallet.account().ok_or(BridgeError::NotConnected)?;

        intent.validate()?;

        if intent.network != self.config.network || intent.network != self.ledger.network() {
            return Err(BridgeError::Config(format!(
                "Payment for {} routed to a {} signer",
                intent.network, self.config.network
            )));
        }

        debug!(
            "Building {} payment: {} XLM {} -> {}",
            intent.network, intent.amount, intent.from_address, intent.to_address
        );

        let source = self
            .ledger
            .load_account(&intent.from_address)
            .await
            .map_err(|e| BridgeError::SourceAccount {
                account_id: intent.from_address.clone(),
                reason: e.to_string(),
            })?;

        let mut builder = TransactionBuilder::new(self.config, &source).map_err(|e| {
            BridgeError::SourceAccount {
                account_id: intent.from_address.clone(),
                reason: e.to_string(),
            }
        })?;
        builder = builder.payment_xlm(&intent.to_address, &intent.amount);
        if let Some(memo) = intent.memo_text() {
            builder = builder.memo_text(memo);
        }

        let tx = builder.build().map_err(|e| match e {
            BridgeError::InvalidPayment(_) | BridgeError::Config(_) => e,
            other => BridgeError::Serialization(other.to_string()),
        })?;
        let hash = tx
            .hash(&self.config.network_passphrase)
            .map_err(|e| BridgeError::Serialization(e.to_string()))?;

        let wallet_signature = self.wallet.sign_data(&hash).await.map_err(|e| match e {
            BridgeError::NotConnected | BridgeError::Signing(_) => e,
            other => BridgeError::Signing(other.to_string()),
        })?;

        let signature = self.strategy.authorize(&account, &wallet_signature, &hash)?;

        if let Ok(signer) = UntrustedLocalSigner::keypair_for(&account) {
            if signer.public_key() != intent.from_address {
                warn!(
                    "Signing key {} does not control source {}; the ledger will reject this transaction",
                    signer.public_key(),
                    intent.from_address
                );
            }
        }

        let envelope = TransactionEnvelope::new(tx, vec![signature]);
        let signed = SignedEnvelope::seal(&envelope, &hash)?;

        info!(
            "Signed {} payment {} with {} strategy",
            intent.network,
            signed.hash(),
            self.strategy.name()
        );
        Ok(signed)
    }
}
