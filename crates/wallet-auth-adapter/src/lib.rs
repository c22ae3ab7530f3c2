/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public wallet-auth adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod error;
pub mod rpc;

// Re-export commonly used types from auth
pub use auth::{
    AuthProvider,
    AuthProviderFactory,
    ChainConfig,
    ChainNamespace,
    DEFAULT_SESSION_SECONDS,
    LocalKeyAuthFactory,
    LocalKeyAuthProvider,
    LocalWalletSettings,
    MockAuthFactory,
    MockAuthProvider,
    ModalConfig,
    SessionClock,
    UiConfig,
    UserProfile,
    Web3AuthNetwork,
    Web3AuthOptions,
};

pub use error::{AdapterError, AuthError, Result};

// Amount and address primitives used across the public API
pub use alloy_primitives::{Address, U256};

// Re-export commonly used types from rpc
pub use rpc::{
    ChainReader,
    ChainSigner,
    ClientConfig,
    HttpRpcClient,
    MockProviderHandle,
    PrivateKeyProvider,
    ProviderHandle,
    format_ether,
    format_units,
};
