/*
[INPUT]:  Provider handle from an auth provider's connect flow
[OUTPUT]: Signer address, native balance, chain id, message signatures
[POS]:    Chain layer - typed reads over a provider handle
[UPDATE]: When adding account queries or signer operations
*/

use std::str::FromStr;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use serde_json::{Value, json};

use crate::error::{AdapterError, Result};
use crate::rpc::{ProviderHandle, parse_quantity};

/// Typed view over a chain connection
#[derive(Debug, Clone)]
pub struct ChainReader {
    handle: Arc<dyn ProviderHandle>,
}

impl ChainReader {
    pub fn new(handle: Arc<dyn ProviderHandle>) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &Arc<dyn ProviderHandle> {
        &self.handle
    }

    pub async fn chain_id(&self) -> Result<u64> {
        let value = self.handle.request("eth_chainId", json!([])).await?;
        let chain_id = parse_quantity(&value)?;
        u64::try_from(chain_id)
            .map_err(|e| AdapterError::InvalidResponse(format!("chain id out of range: {e}")))
    }

    /// Signer for the first account the connection exposes
    ///
    /// Asks with `eth_requestAccounts`; handles that reject it as an RPC
    /// method are retried with `eth_accounts`.
    pub async fn signer(&self) -> Result<ChainSigner> {
        let accounts = match self.handle.request("eth_requestAccounts", json!([])).await {
            Ok(accounts) => accounts,
            Err(AdapterError::Rpc { .. }) => self.handle.request("eth_accounts", json!([])).await?,
            Err(err) => return Err(err),
        };

        let first = accounts
            .as_array()
            .and_then(|list| list.first())
            .and_then(Value::as_str)
            .ok_or_else(|| AdapterError::InvalidResponse("provider returned no accounts".to_string()))?;

        Ok(ChainSigner {
            handle: self.handle.clone(),
            address: parse_address(first)?,
        })
    }

    /// Native balance in base units at the latest block
    pub async fn balance(&self, address: Address) -> Result<U256> {
        let value = self
            .handle
            .request(
                "eth_getBalance",
                json!([address.to_checksum(None), "latest"]),
            )
            .await?;
        parse_quantity(&value)
    }
}

/// Account bound to a chain connection
#[derive(Debug, Clone)]
pub struct ChainSigner {
    handle: Arc<dyn ProviderHandle>,
    address: Address,
}

impl ChainSigner {
    pub fn address(&self) -> Address {
        self.address
    }

    /// EIP-55 checksummed address
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    /// `personal_sign` over the UTF-8 bytes of `message`
    pub async fn sign_message(&self, message: &str) -> Result<String> {
        let data = format!("0x{}", hex::encode(message.as_bytes()));
        let value = self
            .handle
            .request("personal_sign", json!([data, self.address_string()]))
            .await?;

        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AdapterError::InvalidResponse(format!("expected signature string, got {value}")))
    }
}

fn parse_address(raw: &str) -> Result<Address> {
    Address::from_str(raw.trim())
        .map_err(|e| AdapterError::InvalidResponse(format!("invalid account address '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::MockProviderHandle;

    const ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[tokio::test]
    async fn test_signer_and_balance() {
        let handle = Arc::new(MockProviderHandle::new(
            ADDRESS,
            U256::from(1_000_000_000_000_000_000u64),
        ));
        let reader = ChainReader::new(handle.clone());

        let signer = reader.signer().await.unwrap();
        assert_eq!(signer.address_string(), ADDRESS);

        let balance = reader.balance(signer.address()).await.unwrap();
        assert_eq!(balance, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(handle.calls(), vec!["eth_requestAccounts", "eth_getBalance"]);
    }

    #[tokio::test]
    async fn test_chain_id() {
        let handle = Arc::new(MockProviderHandle::new(ADDRESS, U256::ZERO));
        let reader = ChainReader::new(handle);
        assert_eq!(reader.chain_id().await.unwrap(), 137);
    }

    #[tokio::test]
    async fn test_signer_rejects_empty_accounts() {
        #[derive(Debug)]
        struct NoAccounts;

        #[async_trait::async_trait]
        impl ProviderHandle for NoAccounts {
            async fn request(&self, method: &str, _params: Value) -> Result<Value> {
                match method {
                    "eth_requestAccounts" => Err(AdapterError::Rpc {
                        code: -32601,
                        message: "method not found".to_string(),
                    }),
                    _ => Ok(json!([])),
                }
            }
        }

        let reader = ChainReader::new(Arc::new(NoAccounts));
        let err = reader.signer().await.unwrap_err();
        assert!(matches!(err, AdapterError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_sign_message_goes_through_handle() {
        let handle = Arc::new(MockProviderHandle::new(ADDRESS, U256::ZERO));
        let signer = ChainReader::new(handle.clone()).signer().await.unwrap();

        let signature = signer.sign_message("hello").await.unwrap();
        assert_eq!(signature, "0xmock_signature");
        assert_eq!(handle.call_count("personal_sign"), 1);
    }
}
