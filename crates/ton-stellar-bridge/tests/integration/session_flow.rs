//! Integration Tests: Bridge Session Flow
//!
//! Drives a `BridgeSession` against in-memory ledgers, faucet and wallet:
//! - Connect, derive, read balances, fund
//! - Build and sign payments
//! - Submission and the loading/error state around every call

use super::support::{Harness, StubFaucet, StubLedger, StubWallet};
use pretty_assertions::assert_eq;
use ton_stellar_bridge::config::TESTNET_PASSPHRASE;
use ton_stellar_bridge::{
    BridgeError, Network, PaymentIntent, SessionState, SignedEnvelope,
};

const DEADBEEF_ADDRESS: &str = "GDDD3FRCH55BSYNKISYY242HQNIBOH35CQP42NSJABR62XK2JOV5MED6";
const DESTINATION: &str = "GAYRSPR7JPNCE55UYTCI3O5DVYFXGK6RH66XI7YVQ6QBJX4PZBQFUR2H";

/// Test: the documented deadbeef walkthrough
#[tokio::test]
async fn test_deadbeef_end_to_end() {
    let harness = Harness::new(StubWallet::connected("deadbeef"));
    let session = &harness.session;

    // Derivation is stable across calls
    let first = session.derive_address("deadbeef").await.expect("derive failed");
    let second = session.derive_address("deadbeef").await.expect("derive failed");
    assert_eq!(first, DEADBEEF_ADDRESS);
    assert_eq!(first, second);

    // Unfunded on both networks
    let before = session.check_balances(&first).await.expect("balances never fail");
    assert_eq!(before.testnet.native_balance, "0");
    assert_eq!(before.mainnet.native_balance, "0");
    assert!(!before.testnet.exists);

    // Fund, which refreshes both networks
    let after_fund = session.fund_testnet(&first).await.expect("funding failed");
    assert_eq!(after_fund.testnet.native_balance, "10000.0000000");
    assert_eq!(after_fund.mainnet.native_balance, "0");
    assert_eq!(harness.faucet.request_count(), 1);

    let after = session.check_balances(&first).await.unwrap();
    assert!(after.testnet.native_balance.parse::<f64>().unwrap() > 0.0);

    let state = session.state().await;
    assert_eq!(
        state,
        SessionState {
            is_loading: false,
            last_error: None,
            stellar_address: Some(DEADBEEF_ADDRESS.to_string()),
            testnet_balance: Some("10000.0000000".to_string()),
            mainnet_balance: Some("0".to_string()),
        }
    );
}

/// Test: connecting derives the wallet address and fetches balances
#[tokio::test]
async fn test_connect_sets_address_and_balances() {
    let harness = Harness::new(StubWallet::connected("deadbeef"));
    harness.mainnet.credit(DEADBEEF_ADDRESS, "3.5000000");

    let balances = harness.session.connect().await.expect("connect failed");
    assert_eq!(balances.mainnet.native_balance, "3.5000000");

    let state = harness.session.state().await;
    assert_eq!(state.stellar_address.as_deref(), Some(DEADBEEF_ADDRESS));
    assert_eq!(state.mainnet_balance.as_deref(), Some("3.5000000"));
    assert_eq!(harness.testnet.load_count(), 1);
    assert_eq!(harness.mainnet.load_count(), 1);
}

/// Test: a fresh random keypair reads as zero everywhere
#[tokio::test]
async fn test_fresh_keypair_has_zero_balances() {
    let harness = Harness::new(StubWallet::disconnected());
    let keypair = harness.session.bridge().generate_keypair();

    let balances = harness.session.check_balances(&keypair.public_key()).await.unwrap();
    assert_eq!(balances.testnet.native_balance, "0");
    assert_eq!(balances.mainnet.native_balance, "0");
    assert_eq!(harness.session.state().await.last_error, None);
}

/// Test: faucet failure propagates with its status and is recorded
#[tokio::test]
async fn test_funding_failure_sets_error() {
    let testnet = StubLedger::new(Network::Testnet);
    let mainnet = StubLedger::new(Network::Mainnet);
    let faucet = StubFaucet::failing(testnet.clone(), 400);
    let harness = Harness::with_faucet(StubWallet::connected("deadbeef"), testnet, mainnet, faucet);

    let err = harness.session.fund_testnet(DEADBEEF_ADDRESS).await.unwrap_err();
    assert!(matches!(err, BridgeError::Funding { status: 400, .. }));
    assert_eq!(harness.faucet.request_count(), 1);

    let state = harness.session.state().await;
    assert!(!state.is_loading);
    assert!(state.last_error.unwrap().contains("400"));
    assert_eq!(harness.testnet.load_count(), 0);
}

/// Test: no wallet session means no network traffic at all
#[tokio::test]
async fn test_sign_without_wallet_is_not_connected() {
    let harness = Harness::new(StubWallet::disconnected());
    let intent = PaymentIntent::new(DEADBEEF_ADDRESS, DESTINATION, "1", Network::Testnet);

    let result = harness.session.sign_payment(&intent).await;
    assert_eq!(result, Err(BridgeError::NotConnected));
    assert_eq!(harness.testnet.load_count(), 0);
    assert_eq!(harness.mainnet.load_count(), 0);
    assert_eq!(harness.wallet.sign_count(), 0);

    let state = harness.session.state().await;
    assert!(state.last_error.is_some());
    assert!(!state.is_loading);
}

/// Test: empty destination or amount is rejected before signing
#[tokio::test]
async fn test_incomplete_intent_rejected_before_signing() {
    let harness = Harness::new(StubWallet::connected("deadbeef"));
    harness.testnet.credit(DEADBEEF_ADDRESS, "100.0000000");

    for (to, amount) in [("", "1"), (DESTINATION, "")] {
        let intent = PaymentIntent::new(DEADBEEF_ADDRESS, to, amount, Network::Testnet);
        let result = harness.session.sign_payment(&intent).await;
        assert!(matches!(result, Err(BridgeError::InvalidPayment(_))), "{:?}", (to, amount));
    }

    assert_eq!(harness.wallet.sign_count(), 0);
    assert_eq!(harness.testnet.load_count(), 0);
}

/// Test: unfunded source aborts with a source account error
#[tokio::test]
async fn test_unfunded_source_is_source_account_error() {
    let harness = Harness::new(StubWallet::connected("deadbeef"));
    let intent = PaymentIntent::new(DEADBEEF_ADDRESS, DESTINATION, "1", Network::Testnet);

    let err = harness.session.sign_payment(&intent).await.unwrap_err();
    assert_eq!(err.code(), "BRIDGE_SOURCE_ACCOUNT");
    assert_eq!(harness.wallet.sign_count(), 0);
}

/// Test: wallet rejection surfaces as a signing error
#[tokio::test]
async fn test_wallet_rejection_is_signing_error() {
    let harness = Harness::new(StubWallet::rejecting("deadbeef"));
    harness.testnet.credit(DEADBEEF_ADDRESS, "100.0000000");
    let intent = PaymentIntent::new(DEADBEEF_ADDRESS, DESTINATION, "1", Network::Testnet);

    let err = harness.session.sign_payment(&intent).await.unwrap_err();
    assert!(matches!(err, BridgeError::Signing(_)));
    assert_eq!(harness.wallet.sign_count(), 1);
}

/// Test: signing produces an envelope the submitter accepts
#[tokio::test]
async fn test_sign_then_submit() {
    let harness = Harness::new(StubWallet::connected("deadbeef"));
    harness.testnet.credit(DEADBEEF_ADDRESS, "100.0000000");
    let intent =
        PaymentIntent::new(DEADBEEF_ADDRESS, DESTINATION, "2.5", Network::Testnet).with_memo("rent");

    let envelope = harness.session.sign_payment(&intent).await.expect("sign failed");
    assert!(harness.testnet.submitted().is_empty());

    let decoded = envelope.decode(TESTNET_PASSPHRASE).expect("decode failed");
    assert_eq!(decoded.hash, envelope.hash());
    assert_eq!(decoded.envelope.tx.sequence, 1001);

    let result = harness
        .session
        .submit_signed(&envelope, Network::Testnet)
        .await
        .expect("submit failed");
    assert_eq!(result.network, Network::Testnet);
    assert_eq!(harness.testnet.submitted(), vec![envelope.xdr().to_string()]);
}

/// Test: send_payment submits and refreshes the sender balances
#[tokio::test]
async fn test_send_payment_refreshes_balances() {
    let harness = Harness::new(StubWallet::connected("deadbeef"));
    harness.testnet.credit(DEADBEEF_ADDRESS, "100.0000000");
    let intent = PaymentIntent::new(DEADBEEF_ADDRESS, DESTINATION, "1", Network::Testnet);

    let receipt = harness.session.send_payment(&intent).await.expect("send failed");
    assert_eq!(receipt.balances.testnet.account_id, DEADBEEF_ADDRESS);
    assert_eq!(harness.testnet.submitted().len(), 1);
    assert!(harness.mainnet.submitted().is_empty());

    let state = harness.session.state().await;
    assert_eq!(state.testnet_balance.as_deref(), Some("100.0000000"));
}

/// Test: malformed envelope is a submission error and leaves state settled
#[tokio::test]
async fn test_malformed_envelope_sets_error() {
    let harness = Harness::new(StubWallet::connected("deadbeef"));

    let err = harness
        .session
        .submit_signed(&SignedEnvelope::from_wire("bm90IGFuIGVudmVsb3Bl"), Network::Testnet)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BRIDGE_SUBMISSION");

    let state = harness.session.state().await;
    assert!(state.last_error.is_some());
    assert!(!state.is_loading);
    assert!(harness.testnet.submitted().is_empty());

    // The next successful call clears the error
    harness.session.check_balances(DEADBEEF_ADDRESS).await.unwrap();
    assert_eq!(harness.session.state().await.last_error, None);
}

/// Test: derivation failures are recorded like any other
#[tokio::test]
async fn test_bad_ton_key_sets_error() {
    let harness = Harness::new(StubWallet::disconnected());

    let err = harness.session.derive_address("not hex").await.unwrap_err();
    assert!(matches!(err, BridgeError::Derivation(_)));
    assert!(harness.session.state().await.last_error.is_some());

    harness.session.clear_error().await;
    assert_eq!(harness.session.state().await.last_error, None);
}
