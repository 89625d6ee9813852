//! End-to-end pipeline tests against a mocked JSON-RPC endpoint.
//!
//! A mockito HTTP server stands in for the chain: requests are routed by
//! method name (and call selector for `eth_call`) so the whole stage
//! sequence runs without a node. Signing is real; only the network is
//! mocked.

use std::path::Path;

use alloy_primitives::U256;
use dexup_bootstrap::{
    ArtifactPaths, BootstrapError, Bootstrapper, ChainClient, StateReporter, to_base_units,
};
use mockito::{Matcher, Server, ServerGuard};

/// Well-known local development key (Hardhat/Anvil account 0).
const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address every mocked deployment receipt reports.
const DEPLOYED_ADDRESS: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

/// Pair address the mocked factory lookup returns.
const PAIR_ADDRESS: &str = "cafebabecafebabecafebabecafebabecafebabe";

const TX_HASH: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";

fn write_artifacts(dir: &Path) -> ArtifactPaths {
    let write = |name: &str| {
        let path = dir.join(name);
        std::fs::write(&path, r#"{"abi": [], "bytecode": "0x6080604052"}"#).unwrap();
        path
    };
    ArtifactPaths {
        erc20: write("MockERC20.json"),
        factory: write("DexFactory.json"),
        router: write("DexRouter.json"),
    }
}

fn config(server: &ServerGuard, artifacts: ArtifactPaths) -> Bootstrapper {
    Bootstrapper {
        rpc_url: server.url(),
        private_key: DEV_KEY.to_string(),
        artifacts,
        initial_supply: 1_000_000,
        mint_amount: 2000,
        approve_amount: 1000,
        liquidity_amount: 1000,
        confirmation_timeout_secs: 5,
    }
}

fn result_body(result: &str) -> String {
    format!(r#"{{"jsonrpc":"2.0","id":1,"result":{result}}}"#)
}

/// One 32-byte ABI word as unprefixed hex.
fn word(value: U256) -> String {
    format!("{:0>64}", format!("{value:x}"))
}

fn method_matcher(method: &str) -> Matcher {
    Matcher::Regex(format!(r#""method":"{method}""#))
}

/// Match an `eth_call` whose calldata starts with the given selector.
fn call_matcher(selector: &str) -> Matcher {
    Matcher::Regex(format!(r#""method":"eth_call".*0x{selector}"#))
}

/// Register the mocks shared by every scenario: chain id, transaction
/// count and a confirming receipt for every broadcast.
async fn mock_chain_basics(server: &mut ServerGuard, start_nonce: u64) {
    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_chainId"))
        .with_body(result_body(r#""0x7a69""#))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_getTransactionCount"))
        .with_body(result_body(&format!(r#""0x{start_nonce:x}""#)))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_getTransactionReceipt"))
        .with_body(result_body(&format!(
            r#"{{"transactionHash":"{TX_HASH}","status":"0x1","contractAddress":"{DEPLOYED_ADDRESS}","blockNumber":"0x1"}}"#
        )))
        .create_async()
        .await;
}

/// Register the read-only call mocks for a healthy chain.
async fn mock_views(server: &mut ServerGuard, pair_address: &str) {
    // balanceOf: construction supply plus the minted amount.
    let balance = to_base_units(1_000_000) + to_base_units(2000);
    server
        .mock("POST", "/")
        .match_body(call_matcher("70a08231"))
        .with_body(result_body(&format!(r#""0x{}""#, word(balance))))
        .create_async()
        .await;

    // getPair: one address word.
    server
        .mock("POST", "/")
        .match_body(call_matcher("e6a43905"))
        .with_body(result_body(&format!(
            r#""0x{:0>64}""#,
            pair_address
        )))
        .create_async()
        .await;

    // getReserves: two uint112 reserves and a timestamp.
    let reserve = to_base_units(1000);
    server
        .mock("POST", "/")
        .match_body(call_matcher("0902f1ac"))
        .with_body(result_body(&format!(
            r#""0x{}{}{}""#,
            word(reserve),
            word(reserve),
            word(U256::ZERO)
        )))
        .create_async()
        .await;
}

#[tokio::test]
async fn test_full_bootstrap_happy_path() {
    let mut server = Server::new_async().await;
    let dir = tempdir::TempDir::new("dexup-test").unwrap();

    mock_chain_basics(&mut server, 5).await;
    mock_views(&mut server, PAIR_ADDRESS).await;

    // 4 deploys + 2 mints + createPair + 2 approves + addLiquidity.
    let broadcasts = server
        .mock("POST", "/")
        .match_body(method_matcher("eth_sendRawTransaction"))
        .with_body(result_body(&format!(r#""{TX_HASH}""#)))
        .expect(10)
        .create_async()
        .await;

    let report = config(&server, write_artifacts(dir.path()))
        .run()
        .await
        .unwrap();

    broadcasts.assert_async().await;

    assert_eq!(report.transactions, 10);
    assert_eq!(
        report.token_a.to_string().to_lowercase(),
        DEPLOYED_ADDRESS
    );
    assert_eq!(
        report.pair.to_string().to_lowercase(),
        format!("0x{PAIR_ADDRESS}")
    );
    assert_eq!(report.balance_a, to_base_units(1_002_000));
    assert_eq!(report.balance_b, to_base_units(1_002_000));
    assert_eq!(report.reserve0, to_base_units(1000));
    assert_eq!(report.reserve1, to_base_units(1000));

    // The derived pair address is stable: repeated lookups after creation
    // return the same non-zero address.
    let client = ChainClient::connect(&server.url()).await.unwrap();
    let reporter = StateReporter::new(client);
    let first = reporter
        .pair_address(report.factory, report.token_a, report.token_b)
        .await
        .unwrap();
    let second = reporter
        .pair_address(report.factory, report.token_a, report.token_b)
        .await
        .unwrap();
    assert_eq!(first, report.pair);
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_receipt_never_arriving_is_confirmation_timeout() {
    let mut server = Server::new_async().await;
    let dir = tempdir::TempDir::new("dexup-test").unwrap();

    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_chainId"))
        .with_body(result_body(r#""0x7a69""#))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_getTransactionCount"))
        .with_body(result_body(r#""0x0""#))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_sendRawTransaction"))
        .with_body(result_body(&format!(r#""{TX_HASH}""#)))
        .create_async()
        .await;
    // The transaction is never included: the receipt stays null and the
    // bounded wait must expire instead of hanging.
    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_getTransactionReceipt"))
        .with_body(result_body("null"))
        .create_async()
        .await;

    let mut bootstrapper = config(&server, write_artifacts(dir.path()));
    bootstrapper.confirmation_timeout_secs = 2;

    let err = bootstrapper.run().await.unwrap_err();

    match err {
        BootstrapError::ConfirmationTimeout {
            tx_hash,
            waited_secs,
        } => {
            assert_eq!(tx_hash, TX_HASH);
            assert_eq!(waited_secs, 2);
        }
        other => panic!("expected ConfirmationTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_zero_pair_address_is_dependency_unresolved() {
    let mut server = Server::new_async().await;
    let dir = tempdir::TempDir::new("dexup-test").unwrap();

    mock_chain_basics(&mut server, 0).await;
    // The factory lookup reports the zero address: pair creation never
    // materialized.
    mock_views(&mut server, "0000000000000000000000000000000000000000").await;

    // Only the stages up to the pair lookup may broadcast:
    // 4 deploys + 2 mints + createPair.
    let broadcasts = server
        .mock("POST", "/")
        .match_body(method_matcher("eth_sendRawTransaction"))
        .with_body(result_body(&format!(r#""{TX_HASH}""#)))
        .expect(7)
        .create_async()
        .await;

    let err = config(&server, write_artifacts(dir.path()))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, BootstrapError::DependencyUnresolved(_)));
    broadcasts.assert_async().await;
}

#[tokio::test]
async fn test_broadcast_rejection_surfaces_reason() {
    let mut server = Server::new_async().await;
    let dir = tempdir::TempDir::new("dexup-test").unwrap();

    mock_chain_basics(&mut server, 0).await;
    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_sendRawTransaction"))
        .with_body(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"insufficient funds for gas * price + value"}}"#)
        .create_async()
        .await;

    let err = config(&server, write_artifacts(dir.path()))
        .run()
        .await
        .unwrap_err();

    match err {
        BootstrapError::SubmissionRejected { reason } => {
            assert!(reason.contains("insufficient funds"));
        }
        other => panic!("expected SubmissionRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reverted_transaction_is_rejected() {
    let mut server = Server::new_async().await;
    let dir = tempdir::TempDir::new("dexup-test").unwrap();

    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_chainId"))
        .with_body(result_body(r#""0x7a69""#))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_getTransactionCount"))
        .with_body(result_body(r#""0x0""#))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_sendRawTransaction"))
        .with_body(result_body(&format!(r#""{TX_HASH}""#)))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_getTransactionReceipt"))
        .with_body(result_body(&format!(
            r#"{{"transactionHash":"{TX_HASH}","status":"0x0","contractAddress":null,"blockNumber":"0x1"}}"#
        )))
        .create_async()
        .await;

    let err = config(&server, write_artifacts(dir.path()))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, BootstrapError::SubmissionRejected { .. }));
}

#[tokio::test]
async fn test_deployment_without_address_fails() {
    let mut server = Server::new_async().await;
    let dir = tempdir::TempDir::new("dexup-test").unwrap();

    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_chainId"))
        .with_body(result_body(r#""0x7a69""#))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_getTransactionCount"))
        .with_body(result_body(r#""0x0""#))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_sendRawTransaction"))
        .with_body(result_body(&format!(r#""{TX_HASH}""#)))
        .create_async()
        .await;
    // Confirmed, but no contract address: the constructor reverted.
    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_getTransactionReceipt"))
        .with_body(result_body(&format!(
            r#"{{"transactionHash":"{TX_HASH}","status":"0x1","contractAddress":null,"blockNumber":"0x1"}}"#
        )))
        .create_async()
        .await;

    let err = config(&server, write_artifacts(dir.path()))
        .run()
        .await
        .unwrap_err();

    match err {
        BootstrapError::DeploymentFailed { name } => assert_eq!(name, "TokenA"),
        other => panic!("expected DeploymentFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_is_connectivity_error() {
    let dir = tempdir::TempDir::new("dexup-test").unwrap();
    let artifacts = write_artifacts(dir.path());

    let bootstrapper = Bootstrapper {
        rpc_url: "http://127.0.0.1:1".to_string(),
        private_key: DEV_KEY.to_string(),
        artifacts,
        initial_supply: 1_000_000,
        mint_amount: 2000,
        approve_amount: 1000,
        liquidity_amount: 1000,
        confirmation_timeout_secs: 5,
    };

    let err = bootstrapper.run().await.unwrap_err();
    assert!(matches!(err, BootstrapError::Connectivity { .. }));
}

#[tokio::test]
async fn test_malformed_private_key_is_signing_error() {
    let mut server = Server::new_async().await;
    let dir = tempdir::TempDir::new("dexup-test").unwrap();

    server
        .mock("POST", "/")
        .match_body(method_matcher("eth_chainId"))
        .with_body(result_body(r#""0x7a69""#))
        .create_async()
        .await;

    let mut bootstrapper = config(&server, write_artifacts(dir.path()));
    bootstrapper.private_key = "0xnot-a-key".to_string();

    let err = bootstrapper.run().await.unwrap_err();
    assert!(matches!(err, BootstrapError::Signing(_)));
}
