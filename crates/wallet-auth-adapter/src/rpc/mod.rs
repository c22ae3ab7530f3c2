/*
[INPUT]:  Chain connection handles and JSON-RPC endpoints
[OUTPUT]: Account addresses, balances, signatures, display amounts
[POS]:    Chain layer - EIP-1193 style provider plumbing
[UPDATE]: When adding chain methods or provider implementations
*/

pub mod client;
pub mod handle;
pub mod private_key;
pub mod reader;
pub mod units;

pub use client::{ClientConfig, HttpRpcClient};
pub use handle::{MockProviderHandle, ProviderHandle};
pub use private_key::PrivateKeyProvider;
pub use reader::{ChainReader, ChainSigner};
pub use units::{ETHER_DECIMALS, format_ether, format_units, parse_base_units, parse_quantity};
