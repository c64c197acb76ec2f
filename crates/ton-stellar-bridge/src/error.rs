// ============================================================================
// TON-STELLAR-BRIDGE - Error Types
// ============================================================================
// Two tiers: balance reads absorb their failures (see balance.rs), every
// other operation surfaces one of these variants to the caller.
// ============================================================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    // ==================== Bridge Errors ====================
    #[error("Address derivation failed: {0}")]
    Derivation(String),

    #[error("No TON wallet connected")]
    NotConnected,

    #[error("Invalid payment: {0}")]
    InvalidPayment(String),

    #[error("Source account {account_id} unavailable: {reason}")]
    SourceAccount { account_id: String, reason: String },

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Envelope serialization failed: {0}")]
    Serialization(String),

    #[error("Faucet funding failed with HTTP {status}: {detail}")]
    Funding { status: u16, detail: String },

    #[error("Transaction submission failed: {detail}")]
    Submission { status: Option<u16>, detail: String },

    // ==================== Key Errors ====================
    #[error("Invalid Stellar address: {0}")]
    InvalidStellarAddress(String),

    #[error("Invalid secret seed")]
    InvalidSecretSeed,

    // ==================== Ledger Errors ====================
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Transaction rejected: {reason}")]
    TransactionRejected { status: u16, reason: String },

    #[error("Horizon API error (HTTP {status}): {detail}")]
    Horizon { status: u16, detail: String },

    #[error("Rate limited - try again later")]
    RateLimited,

    // ==================== Network Errors ====================
    #[error("Network request failed: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // ==================== Configuration Errors ====================
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    /// Stable identifier for the error kind, independent of the message.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::Derivation(_) => "BRIDGE_DERIVATION",
            BridgeError::NotConnected => "BRIDGE_NOT_CONNECTED",
            BridgeError::InvalidPayment(_) => "BRIDGE_INVALID_PAYMENT",
            BridgeError::SourceAccount { .. } => "BRIDGE_SOURCE_ACCOUNT",
            BridgeError::Signing(_) => "BRIDGE_SIGNING",
            BridgeError::Serialization(_) => "BRIDGE_SERIALIZATION",
            BridgeError::Funding { .. } => "BRIDGE_FUNDING",
            BridgeError::Submission { .. } => "BRIDGE_SUBMISSION",
            BridgeError::InvalidStellarAddress(_) => "BRIDGE_INVALID_ADDRESS",
            BridgeError::InvalidSecretSeed => "BRIDGE_INVALID_SEED",
            BridgeError::AccountNotFound(_) => "BRIDGE_ACCOUNT_NOT_FOUND",
            BridgeError::TransactionRejected { .. } => "BRIDGE_TX_REJECTED",
            BridgeError::Horizon { .. } => "BRIDGE_HORIZON",
            BridgeError::RateLimited => "BRIDGE_RATE_LIMITED",
            BridgeError::Network(_) => "BRIDGE_NETWORK",
            BridgeError::MalformedResponse(_) => "BRIDGE_MALFORMED_RESPONSE",
            BridgeError::Config(_) => "BRIDGE_CONFIG",
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            BridgeError::Funding { status, .. }
            | BridgeError::TransactionRejected { status, .. }
            | BridgeError::Horizon { status, .. } => Some(*status),
            BridgeError::Submission { status, .. } => *status,
            BridgeError::RateLimited => Some(429),
            _ => None,
        }
    }

    /// Wrap any failure from the submit path as a submission error.
    pub(crate) fn into_submission(self) -> BridgeError {
        match self {
            BridgeError::Submission { .. } => self,
            other => BridgeError::Submission {
                status: other.status(),
                detail: other.to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BridgeError::Network(format!("Request timed out: {}", err))
        } else if err.is_decode() {
            BridgeError::MalformedResponse(err.to_string())
        } else {
            BridgeError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::MalformedResponse(err.to_string())
    }
}

impl From<hex::FromHexError> for BridgeError {
    fn from(err: hex::FromHexError) -> Self {
        BridgeError::Derivation(format!("Invalid hex key: {}", err))
    }
}

impl From<stellar_xdr::curr::Error> for BridgeError {
    fn from(err: stellar_xdr::curr::Error) -> Self {
        BridgeError::Serialization(format!("Invalid transaction XDR: {}", err))
    }
}
