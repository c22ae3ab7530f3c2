/*
[INPUT]:  Construction options, local wallet key, optional consent prompt
[OUTPUT]: Key-backed chain connection, profile, session lifecycle
[POS]:    Auth layer - development auth provider without a hosted SDK
[UPDATE]: When login flow, session restore, or profile shape changes
*/

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::auth::{
    AUTH_ADAPTER, AuthProvider, AuthProviderFactory, ChainNamespace, ModalConfig, SessionClock,
    UserProfile, Web3AuthOptions,
};
use crate::error::{AdapterError, AuthError, Result};
use crate::rpc::{ClientConfig, HttpRpcClient, PrivateKeyProvider, ProviderHandle};

/// Default session lifetime, matching hosted SDK defaults (one week)
pub const DEFAULT_SESSION_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Blocking consent hook run on each connect
///
/// `Err` carries the refusal message; "user closed the modal" is a
/// cancellation, anything else a rejection.
pub type ConsentPrompt = Arc<dyn Fn() -> std::result::Result<(), String> + Send + Sync>;

/// Wallet settings for the local provider
#[derive(Debug, Clone)]
pub struct LocalWalletSettings {
    /// Hex secp256k1 key; empty means no wallet is available
    pub private_key: String,
    /// Display attributes returned from `user_info`
    pub profile: UserProfile,
    /// Treat the wallet as an already-restored session during `init_modal`
    pub auto_connect: bool,
    pub session_seconds: u64,
}

impl Default for LocalWalletSettings {
    fn default() -> Self {
        Self {
            private_key: String::new(),
            profile: UserProfile::default(),
            auto_connect: false,
            session_seconds: DEFAULT_SESSION_SECONDS,
        }
    }
}

#[derive(Default)]
struct LocalState {
    ready: bool,
    chain_id: u64,
    upstream: Option<Arc<dyn ProviderHandle>>,
    provider: Option<Arc<PrivateKeyProvider>>,
}

/// Auth provider backed by a private key held in process
pub struct LocalKeyAuthProvider {
    options: Web3AuthOptions,
    settings: LocalWalletSettings,
    rpc_config: ClientConfig,
    consent: Option<ConsentPrompt>,
    state: RwLock<LocalState>,
    session: SessionClock,
}

impl LocalKeyAuthProvider {
    pub fn new(options: Web3AuthOptions, settings: LocalWalletSettings) -> Self {
        Self {
            options,
            settings,
            rpc_config: ClientConfig::default(),
            consent: None,
            state: RwLock::new(LocalState::default()),
            session: SessionClock::new(),
        }
    }

    pub fn with_rpc_config(mut self, rpc_config: ClientConfig) -> Self {
        self.rpc_config = rpc_config;
        self
    }

    pub fn with_consent(mut self, consent: ConsentPrompt) -> Self {
        self.consent = Some(consent);
        self
    }

    pub fn options(&self) -> &Web3AuthOptions {
        &self.options
    }

    pub fn session(&self) -> &SessionClock {
        &self.session
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, LocalState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, LocalState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.read_state().ready {
            Ok(())
        } else {
            Err(AuthError::NotInitialized.into())
        }
    }

    /// Build the key-backed handle and start a session for it
    fn establish(&self) -> Result<Arc<PrivateKeyProvider>> {
        if self.settings.private_key.trim().is_empty() {
            return Err(AuthError::Rejected("no local wallet key configured".to_string()).into());
        }

        let (chain_id, upstream) = {
            let state = self.read_state();
            let upstream = state.upstream.clone().ok_or(AuthError::NotInitialized)?;
            (state.chain_id, upstream)
        };

        let provider = Arc::new(PrivateKeyProvider::new(
            &self.settings.private_key,
            chain_id,
            upstream,
        )?);
        let session = self
            .session
            .start(provider.address(), self.settings.session_seconds);
        info!(
            address = %provider.address(),
            session_id = %session.session_id,
            expires_at = %session.expires_at,
            "local wallet session started"
        );

        self.write_state().provider = Some(provider.clone());
        Ok(provider)
    }

    async fn ask_consent(&self) -> Result<()> {
        let Some(consent) = self.consent.clone() else {
            return Ok(());
        };

        tokio::task::spawn_blocking(move || consent())
            .await
            .map_err(|e| AuthError::Rejected(format!("consent prompt failed: {e}")))?
            .map_err(|message| AuthError::from_message(message).into())
    }
}

impl fmt::Debug for LocalKeyAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("LocalKeyAuthProvider")
            .field("client_id", &self.options.client_id)
            .field("chain_id", &self.options.chain_config.chain_id)
            .field("ready", &state.ready)
            .field("connected", &state.provider.is_some())
            .finish()
    }
}

#[async_trait]
impl AuthProvider for LocalKeyAuthProvider {
    async fn init_modal(&self, modal: &ModalConfig) -> Result<()> {
        let chain = &self.options.chain_config;
        if chain.chain_namespace != ChainNamespace::Eip155 {
            return Err(AdapterError::Config(format!(
                "local wallet supports eip155 chains only, got {:?}",
                chain.chain_namespace
            )));
        }
        if !modal.is_adapter_visible(AUTH_ADAPTER) {
            return Err(AdapterError::Config(
                "login modal has no visible adapters".to_string(),
            ));
        }

        let chain_id = chain.chain_id_u64()?;
        let upstream: Arc<dyn ProviderHandle> = Arc::new(HttpRpcClient::with_config(
            self.rpc_config.clone(),
            &chain.rpc_target,
        )?);

        {
            let mut state = self.write_state();
            state.ready = true;
            state.chain_id = chain_id;
            state.upstream = Some(upstream);
        }
        debug!(chain_id, network = ?self.options.web3auth_network, "local auth modal ready");

        if self.settings.auto_connect {
            self.establish()?;
        }
        Ok(())
    }

    async fn connect(&self) -> Result<Arc<dyn ProviderHandle>> {
        self.ensure_ready()?;
        self.ask_consent().await?;
        let provider: Arc<dyn ProviderHandle> = self.establish()?;
        Ok(provider)
    }

    async fn user_info(&self) -> Result<UserProfile> {
        self.ensure_ready()?;
        if self.session.is_expired() {
            return Err(AuthError::SessionExpired.into());
        }
        let session = self
            .session
            .current()
            .filter(|_| self.session.is_active())
            .ok_or(AuthError::NotConnected)?;

        let mut profile = self.settings.profile.clone();
        profile.verifier.get_or_insert_with(|| "local".to_string());
        profile
            .verifier_id
            .get_or_insert_with(|| session.address.to_checksum(None));
        profile
            .type_of_login
            .get_or_insert_with(|| "private_key".to_string());
        profile
            .extra
            .insert("sessionId".to_string(), json!(session.session_id.to_string()));
        Ok(profile)
    }

    async fn logout(&self) -> Result<()> {
        self.ensure_ready()?;
        if self.read_state().provider.is_none() {
            return Err(AuthError::NotConnected.into());
        }

        self.write_state().provider = None;
        self.session.clear();
        info!("local wallet session ended");
        Ok(())
    }

    fn connected(&self) -> bool {
        self.read_state().provider.is_some() && self.session.is_active()
    }

    fn provider(&self) -> Option<Arc<dyn ProviderHandle>> {
        if !self.session.is_active() {
            return None;
        }
        self.read_state()
            .provider
            .clone()
            .map(|provider| provider as Arc<dyn ProviderHandle>)
    }
}

/// Builds `LocalKeyAuthProvider`s sharing one wallet and consent hook
#[derive(Clone)]
pub struct LocalKeyAuthFactory {
    settings: LocalWalletSettings,
    rpc_config: ClientConfig,
    consent: Option<ConsentPrompt>,
}

impl LocalKeyAuthFactory {
    pub fn new(settings: LocalWalletSettings, rpc_config: ClientConfig) -> Self {
        Self {
            settings,
            rpc_config,
            consent: None,
        }
    }

    pub fn with_consent(mut self, consent: ConsentPrompt) -> Self {
        self.consent = Some(consent);
        self
    }
}

impl AuthProviderFactory for LocalKeyAuthFactory {
    fn construct(&self, options: Web3AuthOptions) -> Result<Arc<dyn AuthProvider>> {
        options.ui_config.validate()?;

        let mut provider = LocalKeyAuthProvider::new(options, self.settings.clone())
            .with_rpc_config(self.rpc_config.clone());
        if let Some(consent) = &self.consent {
            provider = provider.with_consent(consent.clone());
        }
        Ok(Arc::new(provider))
    }
}
