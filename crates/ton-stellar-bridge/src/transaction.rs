// ============================================================================
// TON-STELLAR-BRIDGE - Transaction Builder
// ============================================================================
// Build Stellar transactions and compute their network-scoped signing hash.
//
// Stellar transactions consist of:
// - Source account
// - Sequence number (account sequence + 1)
// - Fee
// - Time bounds
// - Memo (optional)
// - Operations (only native/asset payments here)
//
// The domain types below are what callers build and inspect; the wire form
// is the `stellar_xdr` Transaction they convert to and from.
// ============================================================================

use crate::amount::{format_xlm, parse_xlm};
use crate::config::StellarConfig;
use crate::error::BridgeError;
use crate::horizon::AccountInfo;
use crate::strkey::{decode_account_id, encode_account_id};
use crate::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use stellar_xdr::curr::{self as xdr, Limits, WriteXdr};

/// Upper bound of a MEMO_TEXT payload, in bytes
pub const MAX_MEMO_TEXT_LEN: usize = 28;

// ============================================================================
// TRANSACTION TYPES
// ============================================================================

/// Stellar asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    Native,
    CreditAlphaNum4 { code: String, issuer: String },
    CreditAlphaNum12 { code: String, issuer: String },
}

/// Transaction memo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Memo {
    #[default]
    None,
    Text(String),
    Id(u64),
    Hash([u8; 32]),
    Return([u8; 32]),
}

/// Validity window (unix seconds, 0 = unbounded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

/// Payment of `amount` (whole-XLM decimal) of `asset`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOp {
    pub destination: String,
    pub asset: Asset,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationBody {
    Payment(PaymentOp),
}

/// Transaction operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Overrides the transaction source when set
    pub source_account: Option<String>,
    pub body: OperationBody,
}

/// Unsigned transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub source_account: String,
    pub fee: u32,
    pub sequence: i64,
    pub time_bounds: Option<TimeBounds>,
    pub memo: Memo,
    pub operations: Vec<Operation>,
}

// ============================================================================
// TRANSACTION BUILDER
// ============================================================================

/// Builder for Stellar transactions
pub struct TransactionBuilder {
    source_account: String,
    sequence: i64,
    fee: u32,
    operations: Vec<Operation>,
    memo: Memo,
    timeout_seconds: u64,
}

impl TransactionBuilder {
    /// Create builder for a loaded source account
    pub fn new(config: &StellarConfig, source_account: &AccountInfo) -> Result<Self> {
        let sequence = source_account.sequence_number()?;
        Ok(Self::from_sequence(config, &source_account.id, sequence))
    }

    /// Create builder from account address and its current sequence
    pub fn from_sequence(config: &StellarConfig, source_account: &str, sequence: i64) -> Self {
        Self {
            source_account: source_account.to_string(),
            sequence: sequence.saturating_add(1),
            fee: config.base_fee,
            operations: Vec::new(),
            memo: Memo::None,
            timeout_seconds: config.tx_timeout_seconds,
        }
    }

    /// Set text memo
    pub fn memo_text(mut self, text: &str) -> Self {
        self.memo = Memo::Text(text.to_string());
        self
    }

    /// Add operation
    pub fn add_operation(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    /// Add XLM payment operation
    pub fn payment_xlm(self, destination: &str, amount: &str) -> Self {
        self.add_operation(Operation {
            source_account: None,
            body: OperationBody::Payment(PaymentOp {
                destination: destination.to_string(),
                asset: Asset::Native,
                amount: amount.to_string(),
            }),
        })
    }

    /// Build the transaction, valid from now for the configured timeout
    pub fn build(self) -> Result<Transaction> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.build_at(now)
    }

    /// Build the transaction as if it were `now_unix` seconds
    pub fn build_at(self, now_unix: u64) -> Result<Transaction> {
        if self.operations.is_empty() {
            return Err(BridgeError::InvalidPayment(
                "Transaction must have at least one operation".to_string(),
            ));
        }

        // Fee is charged per operation
        let fee = self
            .fee
            .checked_mul(self.operations.len() as u32)
            .ok_or_else(|| BridgeError::InvalidPayment("Fee overflow".to_string()))?;

        let max_time = now_unix.checked_add(self.timeout_seconds).ok_or_else(|| {
            BridgeError::Config(format!(
                "Transaction timeout of {}s is out of range",
                self.timeout_seconds
            ))
        })?;

        let tx = Transaction {
            source_account: self.source_account,
            fee,
            sequence: self.sequence,
            time_bounds: Some(TimeBounds { min_time: 0, max_time }),
            memo: self.memo,
            operations: self.operations,
        };

        // Surface encoding problems (bad addresses, amounts, memo) at build time
        tx.to_stellar_xdr()?;
        Ok(tx)
    }
}

// ============================================================================
// SIGNING PAYLOAD
// ============================================================================

/// sha256 of the network passphrase
pub fn network_id(passphrase: &str) -> [u8; 32] {
    Sha256::digest(passphrase.as_bytes()).into()
}

impl Transaction {
    /// TransactionSignaturePayload: network id + ENVELOPE_TYPE_TX + tx
    pub fn signature_payload(&self, passphrase: &str) -> Result<Vec<u8>> {
        let payload = xdr::TransactionSignaturePayload {
            network_id: xdr::Hash(network_id(passphrase)),
            tagged_transaction: xdr::TransactionSignaturePayloadTaggedTransaction::Tx(
                self.to_stellar_xdr()?,
            ),
        };
        Ok(payload.to_xdr(Limits::none())?)
    }

    /// Transaction hash: the bytes every signer signs
    pub fn hash(&self, passphrase: &str) -> Result<[u8; 32]> {
        let payload = self.signature_payload(passphrase)?;
        Ok(Sha256::digest(&payload).into())
    }

    /// Encode the transaction body (without envelope)
    pub fn to_xdr(&self) -> Result<Vec<u8>> {
        Ok(self.to_stellar_xdr()?.to_xdr(Limits::none())?)
    }

    // ==================== XDR Conversion ====================

    pub(crate) fn to_stellar_xdr(&self) -> Result<xdr::Transaction> {
        let cond = match self.time_bounds {
            Some(bounds) => xdr::Preconditions::Time(xdr::TimeBounds {
                min_time: xdr::TimePoint(bounds.min_time),
                max_time: xdr::TimePoint(bounds.max_time),
            }),
            None => xdr::Preconditions::None,
        };

        let operations = self
            .operations
            .iter()
            .map(operation_to_xdr)
            .collect::<Result<Vec<_>>>()?;

        Ok(xdr::Transaction {
            source_account: muxed_account(&self.source_account)?,
            fee: self.fee,
            seq_num: xdr::SequenceNumber(self.sequence),
            cond,
            memo: memo_to_xdr(&self.memo)?,
            operations: operations.try_into().map_err(|_| {
                BridgeError::Serialization(format!(
                    "Too many operations: {}",
                    self.operations.len()
                ))
            })?,
            ext: xdr::TransactionExt::V0,
        })
    }

    pub(crate) fn from_stellar_xdr(tx: &xdr::Transaction) -> Result<Self> {
        let time_bounds = match &tx.cond {
            xdr::Preconditions::None => None,
            xdr::Preconditions::Time(bounds) => Some(TimeBounds {
                min_time: bounds.min_time.0,
                max_time: bounds.max_time.0,
            }),
            xdr::Preconditions::V2(_) => return Err(unsupported("v2 preconditions")),
        };

        if !matches!(tx.ext, xdr::TransactionExt::V0) {
            return Err(unsupported("transaction extension"));
        }

        Ok(Transaction {
            source_account: muxed_account_id(&tx.source_account)?,
            fee: tx.fee,
            sequence: tx.seq_num.0,
            time_bounds,
            memo: memo_from_xdr(&tx.memo)?,
            operations: tx
                .operations
                .iter()
                .map(operation_from_xdr)
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

// ============================================================================
// XDR CONVERSION HELPERS
// ============================================================================

fn muxed_account(address: &str) -> Result<xdr::MuxedAccount> {
    Ok(xdr::MuxedAccount::Ed25519(xdr::Uint256(decode_account_id(address)?)))
}

fn account_id(address: &str) -> Result<xdr::AccountId> {
    Ok(xdr::AccountId(xdr::PublicKey::PublicKeyTypeEd25519(xdr::Uint256(
        decode_account_id(address)?,
    ))))
}

fn muxed_account_id(account: &xdr::MuxedAccount) -> Result<String> {
    match account {
        xdr::MuxedAccount::Ed25519(key) => Ok(encode_account_id(&key.0)),
        xdr::MuxedAccount::MuxedEd25519(_) => Err(unsupported("muxed (M...) accounts")),
    }
}

fn account_id_string(account: &xdr::AccountId) -> String {
    let xdr::PublicKey::PublicKeyTypeEd25519(key) = &account.0;
    encode_account_id(&key.0)
}

fn memo_to_xdr(memo: &Memo) -> Result<xdr::Memo> {
    Ok(match memo {
        Memo::None => xdr::Memo::None,
        Memo::Text(text) => {
            if text.len() > MAX_MEMO_TEXT_LEN {
                return Err(BridgeError::InvalidPayment(format!(
                    "Memo text is {} bytes, limit is {}",
                    text.len(),
                    MAX_MEMO_TEXT_LEN
                )));
            }
            xdr::Memo::Text(text.as_bytes().to_vec().try_into()?)
        }
        Memo::Id(id) => xdr::Memo::Id(*id),
        Memo::Hash(hash) => xdr::Memo::Hash(xdr::Hash(*hash)),
        Memo::Return(hash) => xdr::Memo::Return(xdr::Hash(*hash)),
    })
}

fn memo_from_xdr(memo: &xdr::Memo) -> Result<Memo> {
    Ok(match memo {
        xdr::Memo::None => Memo::None,
        xdr::Memo::Text(text) => Memo::Text(
            String::from_utf8(text.to_vec())
                .map_err(|_| BridgeError::Serialization("Memo text is not UTF-8".to_string()))?,
        ),
        xdr::Memo::Id(id) => Memo::Id(*id),
        xdr::Memo::Hash(hash) => Memo::Hash(hash.0),
        xdr::Memo::Return(hash) => Memo::Return(hash.0),
    })
}

fn operation_to_xdr(op: &Operation) -> Result<xdr::Operation> {
    let source_account = op.source_account.as_deref().map(muxed_account).transpose()?;

    let body = match &op.body {
        OperationBody::Payment(payment) => xdr::OperationBody::Payment(xdr::PaymentOp {
            destination: muxed_account(&payment.destination)?,
            asset: asset_to_xdr(&payment.asset)?,
            amount: parse_xlm(&payment.amount)?,
        }),
    };

    Ok(xdr::Operation { source_account, body })
}

fn operation_from_xdr(op: &xdr::Operation) -> Result<Operation> {
    let source_account = op.source_account.as_ref().map(muxed_account_id).transpose()?;

    let body = match &op.body {
        xdr::OperationBody::Payment(payment) => OperationBody::Payment(PaymentOp {
            destination: muxed_account_id(&payment.destination)?,
            asset: asset_from_xdr(&payment.asset)?,
            amount: format_xlm(payment.amount),
        }),
        other => {
            return Err(BridgeError::Serialization(format!(
                "Unsupported operation {}",
                other.name()
            )))
        }
    };

    Ok(Operation { source_account, body })
}

fn asset_to_xdr(asset: &Asset) -> Result<xdr::Asset> {
    Ok(match asset {
        Asset::Native => xdr::Asset::Native,
        Asset::CreditAlphaNum4 { code, issuer } => xdr::Asset::CreditAlphanum4(xdr::AlphaNum4 {
            asset_code: xdr::AssetCode4(asset_code_bytes::<4>(code)?),
            issuer: account_id(issuer)?,
        }),
        Asset::CreditAlphaNum12 { code, issuer } => {
            xdr::Asset::CreditAlphanum12(xdr::AlphaNum12 {
                asset_code: xdr::AssetCode12(asset_code_bytes::<12>(code)?),
                issuer: account_id(issuer)?,
            })
        }
    })
}

fn asset_from_xdr(asset: &xdr::Asset) -> Result<Asset> {
    Ok(match asset {
        xdr::Asset::Native => Asset::Native,
        xdr::Asset::CreditAlphanum4(credit) => Asset::CreditAlphaNum4 {
            code: asset_code_string(&credit.asset_code.0)?,
            issuer: account_id_string(&credit.issuer),
        },
        xdr::Asset::CreditAlphanum12(credit) => Asset::CreditAlphaNum12 {
            code: asset_code_string(&credit.asset_code.0)?,
            issuer: account_id_string(&credit.issuer),
        },
    })
}

fn asset_code_bytes<const N: usize>(code: &str) -> Result<[u8; N]> {
    if code.is_empty() || code.len() > N || !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(BridgeError::InvalidPayment(format!("Invalid asset code: {}", code)));
    }
    let mut bytes = [0u8; N];
    bytes[..code.len()].copy_from_slice(code.as_bytes());
    Ok(bytes)
}

fn asset_code_string(bytes: &[u8]) -> Result<String> {
    let trimmed: Vec<u8> = bytes.iter().copied().take_while(|&b| b != 0).collect();
    String::from_utf8(trimmed)
        .map_err(|_| BridgeError::Serialization("Asset code is not ASCII".to_string()))
}

fn unsupported(what: &str) -> BridgeError {
    BridgeError::Serialization(format!("Unsupported {}", what))
}
