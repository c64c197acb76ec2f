// ============================================================================
// TON-STELLAR-BRIDGE - Signature Strategies
// ============================================================================
// A TON Connect signature is an Ed25519 signature by the TON wallet key, which
// is not the key that controls the derived Stellar account. A strategy turns
// the wallet's answer into a signature the Stellar ledger will accept.
//
// Only the untrusted local strategy exists today. A real implementation needs
// a cross-scheme signature conversion or a remote co-signer.
// ============================================================================

use crate::derive::{derive_stellar_keypair, StellarKeypair};
use crate::envelope::DecoratedSignature;
use crate::error::BridgeError;
use crate::wallet::{WalletAccount, WalletSignature};
use crate::Result;
use tracing::warn;

/// Turns a wallet signature over a transaction hash into a ledger signature
pub trait SignatureStrategy: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Produce the decorated signature to attach to the envelope
    fn authorize(
        &self,
        wallet: &WalletAccount,
        wallet_signature: &WalletSignature,
        tx_hash: &[u8; 32],
    ) -> Result<DecoratedSignature>;
}

/// Discards the wallet signature and signs with the keypair re-derived from
/// the wallet public key.
///
/// The resulting transaction is valid on the ledger, but its authorizing key
/// is reconstructible from public data. It offers no custody guarantee.
#[derive(Debug, Default, Clone, Copy)]
pub struct UntrustedLocalSigner;

impl UntrustedLocalSigner {
    /// Keypair this strategy will sign with for `wallet`
    pub fn keypair_for(wallet: &WalletAccount) -> Result<StellarKeypair> {
        derive_stellar_keypair(&wallet.public_key).map_err(|e| match e {
            BridgeError::Derivation(detail) => BridgeError::Signing(detail),
            other => BridgeError::Signing(other.to_string()),
        })
    }
}

impl SignatureStrategy for UntrustedLocalSigner {
    fn name(&self) -> &'static str {
        "untrusted-local"
    }

    fn authorize(
        &self,
        wallet: &WalletAccount,
        wallet_signature: &WalletSignature,
        tx_hash: &[u8; 32],
    ) -> Result<DecoratedSignature> {
        let keypair = Self::keypair_for(wallet)?;

        warn!(
            "Discarding wallet signature from {} ({} chars); signing with locally derived key {}",
            wallet_signature.address,
            wallet_signature.signature.len(),
            keypair.public_key()
        );

        Ok(DecoratedSignature::sign_hash(&keypair, tx_hash))
    }
}
