// ============================================================================
// TON-STELLAR-BRIDGE - StrKey Encoding/Decoding
// ============================================================================
// Stellar "StrKey" encoding: version byte + 32 key bytes + CRC16 checksum,
// rendered as unpadded RFC 4648 base32.
//
//   G... account ids    (version 6 << 3)
//   S... secret seeds   (version 18 << 3)
// ============================================================================

use crate::error::BridgeError;
use crate::Result;

/// StrKey version byte for account ids (G...)
const VERSION_ACCOUNT_ID: u8 = 6 << 3;

/// StrKey version byte for ed25519 secret seeds (S...)
const VERSION_SECRET_SEED: u8 = 18 << 3;

/// CRC16-CCITT polynomial
const CRC16_POLY: u16 = 0x1021;

/// Encoded StrKey length for 32-byte payloads
const STRKEY_LEN: usize = 56;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Encode raw Ed25519 public key bytes as a Stellar G... account id
///
/// # Example
/// ```
/// use ton_stellar_bridge::strkey::encode_account_id;
///
/// let address = encode_account_id(&[0u8; 32]);
/// assert_eq!(address, "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF");
/// ```
pub fn encode_account_id(key_bytes: &[u8; 32]) -> String {
    encode_check(VERSION_ACCOUNT_ID, key_bytes)
}

/// Decode a Stellar G... account id to raw Ed25519 public key bytes
pub fn decode_account_id(address: &str) -> Result<[u8; 32]> {
    if !address.starts_with('G') {
        return Err(BridgeError::InvalidStellarAddress(format!(
            "{}: must start with 'G'",
            address
        )));
    }
    decode_check(VERSION_ACCOUNT_ID, address)
        .map_err(|reason| BridgeError::InvalidStellarAddress(format!("{}: {}", address, reason)))
}

/// Check whether a string is a well-formed G... account id
pub fn is_valid_account_id(address: &str) -> bool {
    decode_account_id(address).is_ok()
}

/// Encode a 32-byte Ed25519 seed as a Stellar S... secret
pub fn encode_secret_seed(seed: &[u8; 32]) -> String {
    encode_check(VERSION_SECRET_SEED, seed)
}

/// Decode a Stellar S... secret to its 32-byte Ed25519 seed
pub fn decode_secret_seed(secret: &str) -> Result<[u8; 32]> {
    if !secret.starts_with('S') {
        return Err(BridgeError::InvalidSecretSeed);
    }
    decode_check(VERSION_SECRET_SEED, secret).map_err(|_| BridgeError::InvalidSecretSeed)
}

// ============================================================================
// VERSIONED CHECKSUM ENCODING
// ============================================================================

fn encode_check(version: u8, key_bytes: &[u8]) -> String {
    // version byte + key bytes + 2 checksum bytes
    let mut payload = Vec::with_capacity(1 + key_bytes.len() + 2);
    payload.push(version);
    payload.extend_from_slice(key_bytes);

    // Checksum is little-endian
    let checksum = crc16(&payload);
    payload.extend_from_slice(&checksum.to_le_bytes());

    base32_encode(&payload)
}

fn decode_check(version: u8, encoded: &str) -> std::result::Result<[u8; 32], String> {
    if encoded.len() != STRKEY_LEN {
        return Err(format!("expected {} chars, got {}", STRKEY_LEN, encoded.len()));
    }

    let decoded = base32_decode(encoded)?;
    if decoded.len() != 35 {
        return Err("invalid decoded length".to_string());
    }
    if decoded[0] != version {
        return Err("invalid version byte".to_string());
    }

    let stored_checksum = u16::from_le_bytes([decoded[33], decoded[34]]);
    if stored_checksum != crc16(&decoded[..33]) {
        return Err("checksum mismatch".to_string());
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&decoded[1..33]);
    Ok(key)
}

// ============================================================================
// BASE32 ENCODING (Stellar uses RFC 4648 base32, no padding)
// ============================================================================

const BASE32_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

fn base32_encode(data: &[u8]) -> String {
    let mut result = String::with_capacity((data.len() * 8 + 4) / 5);
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in data {
        buffer = (buffer << 8) | (byte as u64);
        bits_in_buffer += 8;

        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let index = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[index] as char);
        }
    }

    if bits_in_buffer > 0 {
        let index = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[index] as char);
    }

    result
}

fn base32_decode(encoded: &str) -> std::result::Result<Vec<u8>, String> {
    let mut result = Vec::with_capacity(encoded.len() * 5 / 8);
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for c in encoded.chars() {
        let value = match c {
            'A'..='Z' => (c as u8) - b'A',
            '2'..='7' => (c as u8) - b'2' + 26,
            _ => return Err(format!("invalid base32 character: {}", c)),
        };

        buffer = (buffer << 5) | (value as u64);
        bits_in_buffer += 5;

        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            result.push(((buffer >> bits_in_buffer) & 0xFF) as u8);
        }
    }

    Ok(result)
}

// ============================================================================
// CRC16-CCITT (XModem variant used by Stellar)
// ============================================================================

fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;

    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

// ============================================================================
// TESTS
// ============================================================================
