// ============================================================================
// TON-STELLAR-BRIDGE - TON Wallet to Stellar Bridge
// ============================================================================
// Lets a connected TON wallet hold, fund and send Stellar XLM.
//
// Key caveat: the Stellar keypair is a PLACEHOLDER derived from the TON public
// key, and payments are signed with that derived key instead of the wallet's
// own signature. Nothing here provides wallet custody.
//
// Features:
// - Derive a Stellar G... address from a TON public key
// - Read native balances on testnet and mainnet
// - Fund testnet accounts via friendbot
// - Build, sign and submit native XLM payments
// - Decode signed envelopes
// ============================================================================

pub mod amount;
pub mod balance;
pub mod bridge;
pub mod config;
pub mod derive;
pub mod envelope;
pub mod error;
pub mod faucet;
pub mod horizon;
pub mod payment;
pub mod signer;
pub mod strkey;
pub mod submit;
pub mod transaction;
pub mod wallet;

pub use balance::AccountSnapshot;
pub use bridge::{Balances, Bridge, BridgeSession, PaymentReceipt, SessionState};
pub use config::{BridgeConfig, Network, StellarConfig};
pub use derive::{derive_stellar_address, derive_stellar_keypair, generate_random_keypair, StellarKeypair};
pub use envelope::{DecodedEnvelope, DecoratedSignature, SignedEnvelope, TransactionEnvelope};
pub use error::BridgeError;
pub use faucet::{Faucet, FriendbotClient};
pub use horizon::{AccountInfo, Balance, HorizonClient, LedgerClient, TransactionResponse};
pub use payment::{PaymentIntent, PaymentSigner};
pub use signer::{SignatureStrategy, UntrustedLocalSigner};
pub use submit::{SubmitResult, TransactionSubmitter};
pub use transaction::{Memo, Transaction, TransactionBuilder};
pub use wallet::{LocalTonWallet, NoWallet, WalletAccount, WalletConnector, WalletSignature};

/// Re-export for convenience
pub type Result<T> = std::result::Result<T, BridgeError>;
