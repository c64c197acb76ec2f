// ============================================================================
// TON-STELLAR-BRIDGE - Address Derivation
// ============================================================================
// Maps a TON wallet public key to a Stellar keypair.
//
// This is a PLACEHOLDER mapping, not a cryptographic bridge: the first 64 hex
// characters of the TON key (right-padded with '0') are used directly as an
// Ed25519 seed. The resulting Stellar account has no relation to the TON
// wallet's spending key, and anyone who knows the TON public key can
// reconstruct its secret seed.
// ============================================================================

use crate::error::BridgeError;
use crate::strkey::{decode_secret_seed, encode_account_id, encode_secret_seed};
use crate::Result;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;

/// Hex characters consumed from the TON key (32 bytes)
const SEED_HEX_LEN: usize = 64;

// ============================================================================
// STELLAR KEYPAIR
// ============================================================================

/// Ed25519 keypair addressed by a Stellar G... account id
#[derive(Clone)]
pub struct StellarKeypair {
    signing_key: SigningKey,
}

impl StellarKeypair {
    /// Keypair from a raw 32-byte Ed25519 seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Keypair from a Stellar S... secret
    pub fn from_secret_seed(secret: &str) -> Result<Self> {
        let seed = decode_secret_seed(secret)?;
        Ok(Self::from_seed(&seed))
    }

    /// Fresh random keypair
    pub fn random() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// G... account id
    pub fn public_key(&self) -> String {
        encode_account_id(self.verifying_key().as_bytes())
    }

    /// S... secret seed
    pub fn secret_seed(&self) -> String {
        encode_secret_seed(&self.signing_key.to_bytes())
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.verifying_key().to_bytes()
    }

    /// Signature hint: last 4 bytes of the public key
    pub fn signature_hint(&self) -> [u8; 4] {
        let public = self.public_key_bytes();
        [public[28], public[29], public[30], public[31]]
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }
}

impl fmt::Debug for StellarKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StellarKeypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// DERIVATION
// ============================================================================

/// Derive the placeholder Stellar keypair for a TON public key (hex)
///
/// # Example
/// ```
/// use ton_stellar_bridge::derive::derive_stellar_keypair;
///
/// let short = derive_stellar_keypair("ab").unwrap();
/// let padded = derive_stellar_keypair(&format!("ab{}", "0".repeat(62))).unwrap();
/// assert_eq!(short.public_key(), padded.public_key());
/// ```
pub fn derive_stellar_keypair(ton_public_key_hex: &str) -> Result<StellarKeypair> {
    let seed = derive_seed(ton_public_key_hex)?;
    Ok(StellarKeypair::from_seed(&seed))
}

/// Derive the placeholder Stellar G... address for a TON public key (hex)
pub fn derive_stellar_address(ton_public_key_hex: &str) -> Result<String> {
    Ok(derive_stellar_keypair(ton_public_key_hex)?.public_key())
}

/// Generate an unrelated random keypair
pub fn generate_random_keypair() -> StellarKeypair {
    StellarKeypair::random()
}

fn derive_seed(ton_public_key_hex: &str) -> Result<[u8; 32]> {
    // Only the first 64 characters count; anything beyond is never decoded
    let truncated: String = ton_public_key_hex.chars().take(SEED_HEX_LEN).collect();
    let padded = format!("{:0<width$}", truncated, width = SEED_HEX_LEN);

    let bytes = hex::decode(&padded).map_err(|e| {
        BridgeError::Derivation(format!("TON public key is not valid hex: {}", e))
    })?;

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&bytes[..32]);
    Ok(seed)
}

// ============================================================================
// TESTS
// ============================================================================
