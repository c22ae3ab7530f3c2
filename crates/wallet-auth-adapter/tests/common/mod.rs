/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for wallet-auth-adapter tests

use wallet_auth_adapter::{ChainConfig, UiConfig, Web3AuthNetwork, Web3AuthOptions};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Well-known development key (first account of the default test mnemonic)
#[allow(dead_code)]
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Setup a mock JSON-RPC server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Answer `rpc_method` with `result` on the mock server
pub async fn mount_rpc_result(server: &MockServer, rpc_method: &str, result: serde_json::Value) {
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({ "method": rpc_method })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": result,
        })))
        .mount(server)
        .await;
}

#[allow(dead_code)]
/// Polygon options pointed at `rpc_target`
pub fn options_for(rpc_target: &str) -> Web3AuthOptions {
    let mut chain_config = ChainConfig::polygon_mainnet();
    chain_config.rpc_target = rpc_target.to_string();
    Web3AuthOptions {
        client_id: "test-client-id".to_string(),
        chain_config,
        ui_config: UiConfig::default(),
        web3auth_network: Web3AuthNetwork::SapphireDevnet,
    }
}
