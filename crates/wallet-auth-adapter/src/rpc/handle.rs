/*
[INPUT]:  JSON-RPC method names and parameters
[OUTPUT]: Raw JSON results from the chain connection
[POS]:    Chain layer - provider handle abstraction
[UPDATE]: When changing the request contract or mock behavior
*/

use std::fmt;
use std::sync::{Mutex, PoisonError};

use alloy_primitives::U256;
use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::{AdapterError, Result};

/// Chain connection returned by an auth provider's connect flow
///
/// Mirrors the EIP-1193 `request({ method, params })` surface.
#[async_trait]
pub trait ProviderHandle: fmt::Debug + Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value>;
}

/// Mock provider handle for testing
#[derive(Debug)]
pub struct MockProviderHandle {
    accounts: Vec<String>,
    chain_id: String,
    balance: U256,
    fail_balance: bool,
    calls: Mutex<Vec<String>>,
}

impl MockProviderHandle {
    /// Create a handle exposing one account holding `balance` base units
    pub fn new(address: &str, balance: U256) -> Self {
        Self {
            accounts: vec![address.to_string()],
            chain_id: "0x89".to_string(),
            balance,
            fail_balance: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make `eth_getBalance` fail with an RPC error
    pub fn failing_balance(mut self) -> Self {
        self.fail_balance = true;
        self
    }

    /// Methods requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|m| m.as_str() == method).count()
    }
}

#[async_trait]
impl ProviderHandle for MockProviderHandle {
    async fn request(&self, method: &str, _params: Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(method.to_string());

        match method {
            "eth_requestAccounts" | "eth_accounts" => Ok(json!(self.accounts)),
            "eth_chainId" => Ok(json!(self.chain_id)),
            "eth_getBalance" if self.fail_balance => Err(AdapterError::Rpc {
                code: -32000,
                message: "header not found".to_string(),
            }),
            "eth_getBalance" => Ok(json!(format!("0x{:x}", self.balance))),
            "personal_sign" => Ok(json!("0xmock_signature")),
            other => Err(AdapterError::Rpc {
                code: -32601,
                message: format!("method {other} not found"),
            }),
        }
    }
}
