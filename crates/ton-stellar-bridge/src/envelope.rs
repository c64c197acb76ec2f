// ============================================================================
// TON-STELLAR-BRIDGE - Transaction Envelopes
// ============================================================================
// TransactionEnvelope (ENVELOPE_TYPE_TX):
//   - Transaction
//   - DecoratedSignature<20>: 4-byte hint + opaque<64> signature
// encoded and parsed through `stellar_xdr`.
//
// A SignedEnvelope is the base64 wire form handed between signing and
// submission. It is never mutated after creation.
// ============================================================================

use crate::derive::StellarKeypair;
use crate::error::BridgeError;
use crate::transaction::Transaction;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use stellar_xdr::curr::{self as xdr, Limits, ReadXdr, WriteXdr};

/// Signature plus the hint identifying its key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedSignature {
    pub hint: [u8; 4],
    pub signature: Vec<u8>,
}

impl DecoratedSignature {
    /// Sign a transaction hash with a Stellar keypair
    pub fn sign_hash(keypair: &StellarKeypair, tx_hash: &[u8; 32]) -> Self {
        Self {
            hint: keypair.signature_hint(),
            signature: keypair.sign(tx_hash).to_bytes().to_vec(),
        }
    }

    fn to_stellar_xdr(&self) -> Result<xdr::DecoratedSignature> {
        Ok(xdr::DecoratedSignature {
            hint: xdr::SignatureHint(self.hint),
            signature: xdr::Signature(self.signature.clone().try_into()?),
        })
    }
}

impl From<&xdr::DecoratedSignature> for DecoratedSignature {
    fn from(sig: &xdr::DecoratedSignature) -> Self {
        Self {
            hint: sig.hint.0,
            signature: sig.signature.0.to_vec(),
        }
    }
}

/// Transaction with its signatures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    pub tx: Transaction,
    pub signatures: Vec<DecoratedSignature>,
}

impl TransactionEnvelope {
    pub fn new(tx: Transaction, signatures: Vec<DecoratedSignature>) -> Self {
        Self { tx, signatures }
    }

    /// ENVELOPE_TYPE_TX envelope in `stellar_xdr` form
    pub fn to_stellar_xdr(&self) -> Result<xdr::TransactionEnvelope> {
        let signatures = self
            .signatures
            .iter()
            .map(DecoratedSignature::to_stellar_xdr)
            .collect::<Result<Vec<_>>>()?;

        Ok(xdr::TransactionEnvelope::Tx(xdr::TransactionV1Envelope {
            tx: self.tx.to_stellar_xdr().map_err(as_serialization)?,
            signatures: signatures.try_into().map_err(|_| {
                BridgeError::Serialization(format!(
                    "Too many signatures: {}",
                    self.signatures.len()
                ))
            })?,
        }))
    }

    pub fn from_stellar_xdr(envelope: &xdr::TransactionEnvelope) -> Result<Self> {
        match envelope {
            xdr::TransactionEnvelope::Tx(v1) => Ok(Self {
                tx: Transaction::from_stellar_xdr(&v1.tx).map_err(as_serialization)?,
                signatures: v1.signatures.iter().map(DecoratedSignature::from).collect(),
            }),
            other => Err(BridgeError::Serialization(format!(
                "Unsupported envelope type {}",
                other.name()
            ))),
        }
    }

    pub fn to_xdr(&self) -> Result<Vec<u8>> {
        Ok(self.to_stellar_xdr()?.to_xdr(Limits::none())?)
    }

    pub fn from_xdr(bytes: &[u8]) -> Result<Self> {
        Self::from_stellar_xdr(&xdr::TransactionEnvelope::from_xdr(bytes, Limits::none())?)
    }

    /// Canonical base64 wire form
    pub fn to_base64(&self) -> Result<String> {
        Ok(self.to_stellar_xdr()?.to_xdr_base64(Limits::none())?)
    }

    pub fn from_base64(envelope: &str) -> Result<Self> {
        let parsed = xdr::TransactionEnvelope::from_xdr_base64(envelope.trim(), Limits::none())?;
        Self::from_stellar_xdr(&parsed)
    }
}

/// Signed, serialized transaction ready for submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    xdr: String,
    hash: String,
}

impl SignedEnvelope {
    /// Serialize a signed envelope, recording the hash it was signed under
    pub fn seal(envelope: &TransactionEnvelope, tx_hash: &[u8; 32]) -> Result<Self> {
        Ok(Self {
            xdr: envelope.to_base64()?,
            hash: hex::encode(tx_hash),
        })
    }

    /// Wrap an envelope received from elsewhere; its hash is unknown until
    /// decoded against a passphrase
    pub fn from_wire(xdr: impl Into<String>) -> Self {
        Self {
            xdr: xdr.into(),
            hash: String::new(),
        }
    }

    /// Base64 XDR
    pub fn xdr(&self) -> &str {
        &self.xdr
    }

    /// Hex transaction hash at signing time (empty for `from_wire`)
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Parse the envelope and compute its hash under `passphrase`
    pub fn decode(&self, passphrase: &str) -> Result<DecodedEnvelope> {
        let envelope = TransactionEnvelope::from_base64(&self.xdr)?;
        let hash = envelope.tx.hash(passphrase).map_err(as_serialization)?;
        Ok(DecodedEnvelope {
            envelope,
            hash: hex::encode(hash),
            network_passphrase: passphrase.to_string(),
        })
    }
}

impl fmt::Display for SignedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xdr)
    }
}

/// Envelope parsed against a specific network passphrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedEnvelope {
    pub envelope: TransactionEnvelope,
    /// Hex hash computed under `network_passphrase`
    pub hash: String,
    pub network_passphrase: String,
}

fn as_serialization(err: BridgeError) -> BridgeError {
    match err {
        BridgeError::Serialization(_) => err,
        other => BridgeError::Serialization(other.to_string()),
    }
}
