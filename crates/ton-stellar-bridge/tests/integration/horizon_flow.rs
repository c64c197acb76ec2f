//! Integration Tests: Horizon and Friendbot over HTTP
//!
//! Runs the real HTTP clients against wiremock servers:
//! - Account loads, including the unfunded 404 path
//! - Friendbot funding requests
//! - Transaction submission and rejection

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use ton_stellar_bridge::{
    Bridge, BridgeConfig, BridgeError, Faucet, FriendbotClient, HorizonClient, LedgerClient,
    Network, NoWallet, PaymentIntent, SignedEnvelope, StellarConfig, WalletConnector,
};
use ton_stellar_bridge::wallet::LocalTonWallet;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADDRESS: &str = "GDDD3FRCH55BSYNKISYY242HQNIBOH35CQP42NSJABR62XK2JOV5MED6";
const DESTINATION: &str = "GAYRSPR7JPNCE55UYTCI3O5DVYFXGK6RH66XI7YVQ6QBJX4PZBQFUR2H";

fn account_json(balance: &str) -> serde_json::Value {
    json!({
        "id": ADDRESS,
        "account_id": ADDRESS,
        "sequence": "123456789",
        "subentry_count": 0,
        "balances": [{ "balance": balance, "asset_type": "native" }]
    })
}

fn bridge_for(
    testnet: &MockServer,
    mainnet: &MockServer,
    wallet: Arc<dyn WalletConnector>,
) -> Bridge {
    let config = BridgeConfig {
        testnet: StellarConfig::testnet().with_horizon_url(testnet.uri()),
        mainnet: StellarConfig::mainnet().with_horizon_url(mainnet.uri()),
        friendbot_url: format!("{}/friendbot", testnet.uri()),
    };
    Bridge::from_config(config, wallet).expect("Failed to build bridge")
}

/// Test: an existing account reports its native balance
#[tokio::test]
async fn test_load_account_reads_native_balance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}", ADDRESS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_json("42.0000000")))
        .expect(1)
        .mount(&server)
        .await;

    let client = HorizonClient::new(StellarConfig::testnet().with_horizon_url(server.uri()))
        .expect("Failed to create client");
    let account = client.load_account(ADDRESS).await.expect("load failed");

    assert_eq!(account.native_balance(), Some("42.0000000"));
    assert_eq!(account.sequence_number().unwrap(), 123_456_789);
}

/// Test: 404 on one network and 500 on the other both read as zero
#[tokio::test]
async fn test_unfunded_and_failing_networks_read_zero() {
    let testnet = MockServer::start().await;
    let mainnet = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}", ADDRESS)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "status": 404 })))
        .mount(&testnet)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}", ADDRESS)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mainnet)
        .await;

    let bridge = bridge_for(&testnet, &mainnet, Arc::new(NoWallet));
    let balances = bridge.check_balances(ADDRESS).await;

    assert_eq!(balances.testnet.native_balance, "0");
    assert_eq!(balances.mainnet.native_balance, "0");
    assert_eq!(balances.mainnet.network, Network::Mainnet);
}

/// Test: a malformed account id reads as zero and never reaches Horizon
#[tokio::test]
async fn test_malformed_account_id_not_sent_to_horizon() {
    let testnet = MockServer::start().await;
    let mainnet = MockServer::start().await;

    for server in [&testnet, &mainnet] {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(account_json("99.0000000")))
            .expect(0)
            .mount(server)
            .await;
    }

    let bridge = bridge_for(&testnet, &mainnet, Arc::new(NoWallet));
    let balances = bridge.check_balances("../transactions").await;

    assert_eq!(balances.testnet.native_balance, "0");
    assert_eq!(balances.mainnet.native_balance, "0");
    assert!(!balances.testnet.exists);
}

/// Test: friendbot is called with the addr query parameter
#[tokio::test]
async fn test_friendbot_funding_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/friendbot"))
        .and(query_param("addr", ADDRESS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hash": "ab" })))
        .expect(1)
        .mount(&server)
        .await;

    let faucet = FriendbotClient::new(
        format!("{}/friendbot", server.uri()),
        std::time::Duration::from_secs(5),
    )
    .expect("Failed to create faucet");
    faucet.fund(ADDRESS).await.expect("funding failed");
}

/// Test: friendbot refusal carries the HTTP status
#[tokio::test]
async fn test_friendbot_failure_status() {
    let testnet = MockServer::start().await;
    let mainnet = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/friendbot"))
        .respond_with(ResponseTemplate::new(400).set_body_string("account already funded"))
        .mount(&testnet)
        .await;

    let bridge = bridge_for(&testnet, &mainnet, Arc::new(NoWallet));
    let err = bridge.fund_testnet(ADDRESS).await.unwrap_err();

    assert_eq!(
        err,
        BridgeError::Funding { status: 400, detail: "account already funded".to_string() }
    );
}

/// Test: a funded account is visible right after friendbot succeeds
#[tokio::test]
async fn test_fund_then_refresh() {
    let testnet = MockServer::start().await;
    let mainnet = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/friendbot"))
        .and(query_param("addr", ADDRESS))
        .respond_with(ResponseTemplate::new(200))
        .mount(&testnet)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}", ADDRESS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_json("10000.0000000")))
        .mount(&testnet)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}", ADDRESS)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mainnet)
        .await;

    let bridge = bridge_for(&testnet, &mainnet, Arc::new(NoWallet));
    let balances = bridge.fund_testnet(ADDRESS).await.expect("funding failed");

    assert_eq!(balances.testnet.native_balance, "10000.0000000");
    assert_eq!(balances.mainnet.native_balance, "0");
}

/// Test: ledger rejection becomes a submission error with result codes
#[tokio::test]
async fn test_submission_rejected() {
    let testnet = MockServer::start().await;
    let mainnet = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}", ADDRESS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_json("100.0000000")))
        .mount(&testnet)
        .await;
    Mock::given(method("POST"))
        .and(path("/transactions"))
        .and(body_string_contains("tx="))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": "Transaction Failed",
            "status": 400,
            "extras": { "result_codes": { "transaction": "tx_bad_auth" } }
        })))
        .expect(1)
        .mount(&testnet)
        .await;

    // Any TON key works here; the derived signer will not own ADDRESS
    let wallet = LocalTonWallet::from_secret_hex(&"07".repeat(32), None).unwrap();
    let bridge = bridge_for(&testnet, &mainnet, Arc::new(wallet));

    let intent = PaymentIntent::new(ADDRESS, DESTINATION, "1", Network::Testnet);
    let err = bridge.send_payment(&intent).await.unwrap_err();

    assert_eq!(err.code(), "BRIDGE_SUBMISSION");
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("tx_bad_auth"));
}

/// Test: accepted submission returns hash and ledger
#[tokio::test]
async fn test_submission_accepted() {
    let testnet = MockServer::start().await;
    let mainnet = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/accounts/{}", ADDRESS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_json("100.0000000")))
        .mount(&testnet)
        .await;
    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hash": "e3b0c442",
            "ledger": 987,
            "successful": true,
            "fee_charged": "100000"
        })))
        .mount(&testnet)
        .await;

    let wallet = LocalTonWallet::from_secret_hex(&"07".repeat(32), None).unwrap();
    let bridge = bridge_for(&testnet, &mainnet, Arc::new(wallet));

    let intent = PaymentIntent::new(ADDRESS, DESTINATION, "1", Network::Testnet);
    let envelope: SignedEnvelope = bridge.sign_payment(&intent).await.expect("sign failed");
    let result = bridge
        .submit_signed(&envelope, Network::Testnet)
        .await
        .expect("submit failed");

    assert_eq!(result.hash, "e3b0c442");
    assert_eq!(result.ledger, Some(987));
}
