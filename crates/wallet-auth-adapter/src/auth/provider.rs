/*
[INPUT]:  Construction options and modal overrides
[OUTPUT]: Chain connection handles and user profiles
[POS]:    Auth layer - auth provider integration abstraction
[UPDATE]: When adding new provider types or changing the login contract
*/

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::{ModalConfig, UserProfile, Web3AuthOptions};
use crate::error::Result;
use crate::rpc::ProviderHandle;

/// Trait for wallet authentication providers
///
/// Implement this trait for a hosted wallet SDK bridge or a local key provider.
/// Methods take `&self`; implementations keep their mutable state behind locks
/// so a provider can be shared as `Arc<dyn AuthProvider>`.
#[async_trait]
pub trait AuthProvider: fmt::Debug + Send + Sync {
    /// Prepare the login surface
    async fn init_modal(&self, modal: &ModalConfig) -> Result<()>;

    /// Run the connect flow and return the chain connection
    ///
    /// Dismissing the login surface yields `AuthError::UserCancelled`.
    async fn connect(&self) -> Result<Arc<dyn ProviderHandle>>;

    /// Profile of the connected identity
    async fn user_info(&self) -> Result<UserProfile>;

    /// Terminate the provider session
    async fn logout(&self) -> Result<()>;

    /// Whether a session is live (including one restored during `init_modal`)
    fn connected(&self) -> bool;

    /// Chain connection of the live session
    fn provider(&self) -> Option<Arc<dyn ProviderHandle>>;
}

/// Builds auth providers from construction options
pub trait AuthProviderFactory: Send + Sync {
    fn construct(&self, options: Web3AuthOptions) -> Result<Arc<dyn AuthProvider>>;
}
