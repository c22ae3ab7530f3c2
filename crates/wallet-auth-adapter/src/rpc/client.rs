/*
[INPUT]:  RPC endpoint URL and HTTP timeouts
[OUTPUT]: Decoded JSON-RPC 2.0 results over HTTP
[POS]:    Chain layer - core RPC client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{AdapterError, Result};
use crate::rpc::ProviderHandle;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// JSON-RPC client for a single chain endpoint
pub struct HttpRpcClient {
    http_client: Client,
    endpoint: Url,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    /// Create a new client with default configuration
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), endpoint)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, endpoint: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            endpoint: Url::parse(endpoint)?,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Call `method` and decode its `result`
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params: &params,
        };
        debug!(method, id, host = self.endpoint.host_str(), "sending rpc request");

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AdapterError::status_error(status, text));
        }

        let bytes = response.bytes().await?;
        let envelope: RpcResponse = serde_json::from_slice(&bytes)?;
        if let Some(error) = envelope.error {
            return Err(AdapterError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(serde_json::from_value(envelope.result)?)
    }
}

// Endpoint URLs may embed API keys, so only the host is printed.
impl fmt::Debug for HttpRpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRpcClient")
            .field("host", &self.endpoint.host_str())
            .finish()
    }
}

#[async_trait]
impl ProviderHandle for HttpRpcClient {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        self.call(method, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_call_decodes_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_partial_json(json!({
                "jsonrpc": "2.0",
                "method": "eth_chainId",
                "params": [],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": "0x89",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpRpcClient::new(&server.uri()).unwrap();
        let chain_id: String = client.call("eth_chainId", json!([])).await.unwrap();
        assert_eq!(chain_id, "0x89");
    }

    #[tokio::test]
    async fn test_call_surfaces_rpc_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32602, "message": "invalid argument 0" },
            })))
            .mount(&server)
            .await;

        let client = HttpRpcClient::new(&server.uri()).unwrap();
        let err = client
            .request("eth_getBalance", json!(["nope", "latest"]))
            .await
            .unwrap_err();

        match err {
            AdapterError::Rpc { code, message } => {
                assert_eq!(code, -32602);
                assert_eq!(message, "invalid argument 0");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_surfaces_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = HttpRpcClient::new(&server.uri()).unwrap();
        let err = client.request("eth_blockNumber", json!([])).await.unwrap_err();

        assert!(err.is_retryable());
        assert!(matches!(err, AdapterError::Status { status: 503, .. }));
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let err = HttpRpcClient::new("not a url").unwrap_err();
        assert!(matches!(err, AdapterError::UrlParse(_)));
    }

    #[test]
    fn test_debug_hides_api_key_path() {
        let client = HttpRpcClient::new("https://polygon-amoy.infura.io/v3/secret-key").unwrap();
        let printed = format!("{client:?}");
        assert!(printed.contains("polygon-amoy.infura.io"));
        assert!(!printed.contains("secret-key"));
    }
}
