//! External wallet connector.
//!
//! The bridge never talks to TON Connect directly. A connector reports the
//! connected account (if any) and signs arbitrary payloads on request; the
//! user may reject the request on the wallet side.

use crate::error::BridgeError;
use crate::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use ed25519_dalek::{Signer, SigningKey};
use serde::{Deserialize, Serialize};

/// Account of the connected external wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    /// Wallet address as reported by the wallet
    pub address: String,
    /// Hex-encoded wallet public key
    pub public_key: String,
    /// Chain identifier (e.g. "-239" for TON mainnet)
    pub chain: String,
}

/// Result of a payload signing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSignature {
    /// Base64 signature produced by the wallet
    pub signature: String,
    /// Address that produced it
    pub address: String,
}

/// Connection to an external (TON) wallet
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Connected account, `None` while disconnected
    fn account(&self) -> Option<WalletAccount>;

    /// Ask the wallet to sign `payload`; rejection surfaces as `Signing`
    async fn sign_data(&self, payload: &[u8]) -> Result<WalletSignature>;
}

/// Connector with no session
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWallet;

#[async_trait]
impl WalletConnector for NoWallet {
    fn account(&self) -> Option<WalletAccount> {
        None
    }

    async fn sign_data(&self, _payload: &[u8]) -> Result<WalletSignature> {
        Err(BridgeError::NotConnected)
    }
}

/// TON TESTNET chain id used by TON Connect
pub const TON_TESTNET_CHAIN: &str = "-3";

/// In-process Ed25519 wallet standing in for TON Connect.
///
/// TON wallets use Ed25519 keys, so signing here matches what a real wallet
/// would return for a raw-payload request.
pub struct LocalTonWallet {
    key: SigningKey,
    address: String,
    chain: String,
}

impl LocalTonWallet {
    pub fn new(secret: [u8; 32], address: impl Into<String>) -> Self {
        Self {
            key: SigningKey::from_bytes(&secret),
            address: address.into(),
            chain: TON_TESTNET_CHAIN.to_string(),
        }
    }

    /// Wallet from a 32-byte hex secret; the address defaults to the raw
    /// workchain-0 form of the public key
    pub fn from_secret_hex(secret_hex: &str, address: Option<&str>) -> Result<Self> {
        let bytes = hex::decode(secret_hex.trim())
            .map_err(|e| BridgeError::Config(format!("Invalid TON secret key: {}", e)))?;
        let secret: [u8; 32] = bytes
            .try_into()
            .map_err(|_| BridgeError::Config("TON secret key must be 32 bytes".to_string()))?;

        let key = SigningKey::from_bytes(&secret);
        let address = address
            .map(str::to_string)
            .unwrap_or_else(|| format!("0:{}", hex::encode(key.verifying_key().as_bytes())));

        Ok(Self::new(secret, address))
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.key.verifying_key().as_bytes())
    }
}

#[async_trait]
impl WalletConnector for LocalTonWallet {
    fn account(&self) -> Option<WalletAccount> {
        Some(WalletAccount {
            address: self.address.clone(),
            public_key: self.public_key_hex(),
            chain: self.chain.clone(),
        })
    }

    async fn sign_data(&self, payload: &[u8]) -> Result<WalletSignature> {
        let signature = self.key.sign(payload);
        Ok(WalletSignature {
            signature: general_purpose::STANDARD.encode(signature.to_bytes()),
            address: self.address.clone(),
        })
    }
}
