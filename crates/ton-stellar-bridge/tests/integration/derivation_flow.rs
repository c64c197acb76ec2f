//! Integration Tests: Address Derivation
//!
//! The TON to Stellar mapping is a placeholder. These tests pin its exact
//! behavior rather than any real bridging property.

use ton_stellar_bridge::strkey::{decode_account_id, is_valid_account_id};
use ton_stellar_bridge::{
    derive_stellar_address, derive_stellar_keypair, generate_random_keypair, BridgeError,
    StellarKeypair,
};

/// Test: same TON key, same Stellar account
#[test]
fn test_derivation_is_deterministic() {
    let key = "a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f90";
    let first = derive_stellar_address(key).expect("derive failed");
    let second = derive_stellar_address(key).expect("derive failed");

    assert_eq!(first, second);
    assert!(first.starts_with('G'));
    assert!(is_valid_account_id(&first));
}

/// Test: short keys are right-padded with zeros
#[test]
fn test_short_key_matches_padded_key() {
    let padded = format!("ab{}", "0".repeat(62));
    assert_eq!(
        derive_stellar_address("ab").unwrap(),
        derive_stellar_address(&padded).unwrap()
    );
}

/// Test: the derived key is the hex seed used directly
#[test]
fn test_derived_key_uses_hex_as_seed() {
    let key = "11".repeat(32);
    let keypair = derive_stellar_keypair(&key).unwrap();
    let expected = StellarKeypair::from_seed(&[0x11; 32]);

    assert_eq!(keypair.public_key(), expected.public_key());
    assert_eq!(decode_account_id(&keypair.public_key()).unwrap(), keypair.public_key_bytes());
}

/// Test: the secret seed round-trips through its S... form
#[test]
fn test_secret_seed_restores_keypair() {
    let keypair = derive_stellar_keypair("deadbeef").unwrap();
    let secret = keypair.secret_seed();
    assert!(secret.starts_with('S'));

    let restored = StellarKeypair::from_secret_seed(&secret).expect("seed decode failed");
    assert_eq!(restored.public_key(), keypair.public_key());
}

/// Test: random keypairs are independent of any TON key
#[test]
fn test_random_keypairs_differ() {
    let a = generate_random_keypair();
    let b = generate_random_keypair();
    assert_ne!(a.public_key(), b.public_key());
    assert!(is_valid_account_id(&a.public_key()));
}

/// Test: non-hex input fails instead of producing an address
#[test]
fn test_non_hex_key_is_derivation_error() {
    for bad in ["ghij", "dead beef", "0xdeadbeef"] {
        let result = derive_stellar_address(bad);
        assert!(matches!(result, Err(BridgeError::Derivation(_))), "{}", bad);
    }
}
