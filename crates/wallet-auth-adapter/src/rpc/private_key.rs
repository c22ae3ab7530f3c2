/*
[INPUT]:  EVM private key (hex string), chain id, upstream RPC handle
[OUTPUT]: Local answers for account/sign methods, forwarded chain reads
[POS]:    Chain layer - key-backed provider handle
[UPDATE]: When adding locally answered methods or changing signature format
*/

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use alloy_primitives::Address;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{AdapterError, Result};
use crate::rpc::ProviderHandle;

/// EIP-1193 code for an account the provider does not control
const UNAUTHORIZED: i64 = 4100;
const INVALID_PARAMS: i64 = -32602;

/// Provider handle that owns a secp256k1 key
///
/// Account discovery, chain id and `personal_sign` are answered in process;
/// every other method goes to the upstream RPC handle.
pub struct PrivateKeyProvider {
    signer: PrivateKeySigner,
    address: Address,
    chain_id: u64,
    upstream: Arc<dyn ProviderHandle>,
}

impl PrivateKeyProvider {
    /// Supports both "0x"-prefixed and non-prefixed hex strings.
    pub fn new(private_key_hex: &str, chain_id: u64, upstream: Arc<dyn ProviderHandle>) -> Result<Self> {
        let trimmed = private_key_hex.trim();
        let key = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let signer = PrivateKeySigner::from_str(key)
            .map_err(|e| AdapterError::Config(format!("Invalid EVM private key: {e}")))?;
        let address = signer.address();

        Ok(Self {
            signer,
            address,
            chain_id,
            upstream,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn personal_sign(&self, params: &Value) -> Result<Value> {
        let data = params
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| AdapterError::Rpc {
                code: INVALID_PARAMS,
                message: "personal_sign expects [data, address]".to_string(),
            })?;

        if let Some(requested) = params.get(1).and_then(Value::as_str) {
            let requested = Address::from_str(requested).map_err(|e| AdapterError::Rpc {
                code: INVALID_PARAMS,
                message: format!("invalid address '{requested}': {e}"),
            })?;
            if requested != self.address {
                return Err(AdapterError::Rpc {
                    code: UNAUTHORIZED,
                    message: format!("account {requested} is not managed by this provider"),
                });
            }
        }

        let message = decode_message(data);
        let signature = self
            .signer
            .sign_message(&message)
            .await
            .map_err(|e| AdapterError::Signer(format!("Failed to sign EVM message: {e}")))?;

        // [r, s, v]
        Ok(json!(format!("0x{}", hex::encode(signature.as_bytes()))))
    }
}

/// `personal_sign` data is hex when it parses as such, raw UTF-8 otherwise
fn decode_message(data: &str) -> Vec<u8> {
    match data.strip_prefix("0x") {
        Some(encoded) => hex::decode(encoded).unwrap_or_else(|_| data.as_bytes().to_vec()),
        None => data.as_bytes().to_vec(),
    }
}

impl fmt::Debug for PrivateKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyProvider")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("upstream", &self.upstream)
            .finish()
    }
}

#[async_trait]
impl ProviderHandle for PrivateKeyProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        match method {
            "eth_accounts" | "eth_requestAccounts" => {
                Ok(json!([self.address.to_checksum(None)]))
            }
            "eth_chainId" => Ok(json!(format!("0x{:x}", self.chain_id))),
            "personal_sign" => self.personal_sign(&params).await,
            _ => {
                debug!(method, "forwarding request upstream");
                self.upstream.request(method, params).await
            }
        }
    }
}
