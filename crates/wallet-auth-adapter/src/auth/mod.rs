/*
[INPUT]:  Auth client options, wallet keys, and provider responses
[OUTPUT]: Auth provider contracts, profiles, and concrete providers
[POS]:    Auth layer - wallet login/session abstraction
[UPDATE]: When auth provider contract or provider implementations change
*/

pub mod local;
pub mod mock;
pub mod options;
pub mod profile;
pub mod provider;
pub mod session;

pub use local::{
    ConsentPrompt, DEFAULT_SESSION_SECONDS, LocalKeyAuthFactory, LocalKeyAuthProvider,
    LocalWalletSettings,
};
pub use mock::{MockAuthFactory, MockAuthProvider};
pub use options::{
    AUTH_ADAPTER, AdapterModalConfig, ChainConfig, ChainNamespace, LoginMethodConfig, ModalConfig,
    PrimaryButton, UiConfig, UiMode, UxMode, Web3AuthNetwork, Web3AuthOptions,
};
pub use profile::UserProfile;
pub use provider::{AuthProvider, AuthProviderFactory};
pub use session::{SessionClock, SessionData};
