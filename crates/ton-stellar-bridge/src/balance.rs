// ============================================================================
// TON-STELLAR-BRIDGE - Balance Reader
// ============================================================================
// Native XLM balance lookups. This is the tolerant tier: a missing account is
// the normal state of a fresh address, so every failure degrades to a zero
// balance plus a log line and never reaches the caller.
// ============================================================================

use crate::config::Network;
use crate::error::BridgeError;
use crate::horizon::LedgerClient;
use crate::strkey::is_valid_account_id;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Balance reported for accounts that could not be read
pub const ZERO_BALANCE: &str = "0";

/// Native balance of one account on one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account_id: String,
    pub network: Network,
    /// Whole-XLM decimal string as reported by Horizon
    pub native_balance: String,
    pub sequence: Option<String>,
    /// False when the account was not found or could not be read
    pub exists: bool,
}

impl AccountSnapshot {
    fn empty(account_id: &str, network: Network) -> Self {
        Self {
            account_id: account_id.to_string(),
            network,
            native_balance: ZERO_BALANCE.to_string(),
            sequence: None,
            exists: false,
        }
    }
}

/// Read the native balance of `account_id`, degrading every failure to "0"
pub async fn fetch_balance(ledger: &dyn LedgerClient, account_id: &str) -> AccountSnapshot {
    let network = ledger.network();

    if !is_valid_account_id(account_id) {
        warn!("Not reading {} balance of malformed account id {:?}", network, account_id);
        return AccountSnapshot::empty(account_id, network);
    }

    match ledger.load_account(account_id).await {
        Ok(account) => {
            let native_balance = account
                .native_balance()
                .unwrap_or(ZERO_BALANCE)
                .to_string();
            debug!("{} balance for {}: {} XLM", network, account_id, native_balance);

            AccountSnapshot {
                account_id: account_id.to_string(),
                network,
                native_balance,
                sequence: Some(account.sequence),
                exists: true,
            }
        }
        Err(BridgeError::AccountNotFound(_)) => {
            debug!("Account {} not found on {}", account_id, network);
            AccountSnapshot::empty(account_id, network)
        }
        Err(e) => {
            warn!("Balance lookup on {} failed for {}: {}", network, account_id, e);
            AccountSnapshot::empty(account_id, network)
        }
    }
}

/// Read both networks concurrently; neither failure affects the other
pub async fn check_balances(
    testnet: &dyn LedgerClient,
    mainnet: &dyn LedgerClient,
    account_id: &str,
) -> (AccountSnapshot, AccountSnapshot) {
    tokio::join!(
        fetch_balance(testnet, account_id),
        fetch_balance(mainnet, account_id)
    )
}
