/*
[INPUT]:  AppConfig, auth provider factory, user-triggered actions
[OUTPUT]: Session transitions and typed operation errors
[POS]:    Application core - drives initialize/login/logout/fetch sequence
[UPDATE]: When operation ordering, fetch policy, or error mapping changes
*/

use std::sync::Arc;

use thiserror::Error;
use tracing::{Level, debug, error, info, warn};
use wallet_auth_adapter::{
    AdapterError, AuthProvider, AuthProviderFactory, ChainConfig, ChainReader, format_ether,
};

use crate::config::AppConfig;
use crate::session::{Session, SessionAction, SessionState, StateError};
use crate::view::SessionView;

/// Failures of orchestrator operations
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("auth client already initialized")]
    AlreadyInitialized,

    #[error("auth client not initialized yet")]
    NotInitialized,

    #[error("chain provider not connected yet")]
    NotConnected,

    #[error("login cancelled by user")]
    Cancelled,

    #[error(transparent)]
    InvalidTransition(#[from] StateError),

    #[error("failed to initialize auth client: {0}")]
    Initialize(AdapterError),

    #[error("login failed: {0}")]
    Login(AdapterError),

    #[error("logout failed: {0}")]
    Logout(AdapterError),

    #[error("failed to fetch account details: {0}")]
    AccountDetails(AdapterError),

    #[error("failed to fetch user info: {0}")]
    Profile(AdapterError),

    #[error("failed to sign message: {0}")]
    Sign(AdapterError),
}

impl OrchestratorError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OrchestratorError::Cancelled)
    }

    /// Cancellation is routine; everything else is an error
    pub fn log_level(&self) -> Level {
        if self.is_cancelled() {
            Level::INFO
        } else {
            Level::ERROR
        }
    }

    /// Log this failure at its level, tagged with the operation name
    pub fn report(&self, operation: &str) {
        if self.log_level() == Level::INFO {
            info!(operation, reason = %self, "operation cancelled");
        } else {
            error!(operation, error = %self, "operation failed");
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// Sequences auth and chain calls over the single session
///
/// Account details are fetched eagerly: right after a successful login and
/// after a session restored during initialization.
pub struct SessionOrchestrator {
    config: AppConfig,
    chain: ChainConfig,
    factory: Arc<dyn AuthProviderFactory>,
    session: Session,
}

impl SessionOrchestrator {
    pub fn new(config: AppConfig, factory: Arc<dyn AuthProviderFactory>) -> Self {
        let chain = config.chain_config();
        Self {
            config,
            chain,
            factory,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// Presentation of the current session
    pub fn view(&self) -> SessionView {
        SessionView::from_session(&self.session, &self.chain.ticker)
    }

    /// Construct the auth client and prepare its login surface
    ///
    /// Runs once. The session always leaves `Initializing`: to `Idle`,
    /// `Authenticated` (restored session) or `Failed`, including when this
    /// future is dropped before completing.
    pub async fn initialize(&mut self) -> Result<&Session> {
        if self.session.state() != SessionState::Uninitialized {
            return Err(OrchestratorError::AlreadyInitialized);
        }
        let guard = self.session.begin_initialize()?;
        info!(
            chain_id = %self.chain.chain_id,
            network = ?self.config.network,
            "initializing auth client"
        );

        let client = Self::prepare_client(self.factory.as_ref(), &self.config)
            .await
            .map_err(OrchestratorError::Initialize)?;

        let restored = if client.connected() {
            client.provider()
        } else {
            None
        };
        let is_restored = restored.is_some();
        guard.commit(client, restored)?;

        if is_restored {
            info!("restored existing provider session");
            if let Err(err) = self.refresh_profile().await {
                warn!(error = %err, "profile unavailable for restored session");
            }
            if let Err(err) = self.fetch_account_details().await {
                warn!(error = %err, "account details unavailable for restored session");
            }
        } else {
            info!("auth client ready");
        }

        Ok(&self.session)
    }

    async fn prepare_client(
        factory: &dyn AuthProviderFactory,
        config: &AppConfig,
    ) -> wallet_auth_adapter::Result<Arc<dyn AuthProvider>> {
        let client = factory.construct(config.auth_options())?;
        client.init_modal(&config.modal).await?;
        Ok(client)
    }

    fn client(&self) -> Result<Arc<dyn AuthProvider>> {
        self.session.auth_client().cloned().ok_or_else(|| {
            debug!("auth client not initialized yet");
            OrchestratorError::NotInitialized
        })
    }

    /// Run the provider's connect flow and load the profile
    ///
    /// Nothing is committed unless both connect and user info succeed.
    pub async fn login(&mut self) -> Result<&Session> {
        let client = self.client()?;
        self.session.ensure(SessionAction::LoggedIn)?;

        let provider = client.connect().await.map_err(|err| {
            if err.is_cancellation() {
                OrchestratorError::Cancelled
            } else {
                OrchestratorError::Login(err)
            }
        })?;
        let profile = client.user_info().await.map_err(OrchestratorError::Login)?;

        info!(user = profile.display_name(), "login succeeded");
        self.session.commit_login(provider, profile)?;

        if let Err(err) = self.fetch_account_details().await {
            warn!(error = %err, "account details unavailable after login");
        }
        Ok(&self.session)
    }

    /// End the provider session; state is untouched if the provider fails
    pub async fn logout(&mut self) -> Result<&Session> {
        let client = self.client()?;
        self.session.ensure(SessionAction::LoggedOut)?;

        client.logout().await.map_err(OrchestratorError::Logout)?;
        self.session.commit_logout()?;
        info!("logged out");
        Ok(&self.session)
    }

    /// Read signer address and native balance; stale values stay on failure
    pub async fn fetch_account_details(&mut self) -> Result<&Session> {
        let handle = self
            .session
            .chain_provider()
            .cloned()
            .ok_or(OrchestratorError::NotConnected)?;
        let reader = ChainReader::new(handle);

        let signer = reader
            .signer()
            .await
            .map_err(OrchestratorError::AccountDetails)?;
        let balance = reader
            .balance(signer.address())
            .await
            .map_err(OrchestratorError::AccountDetails)?;

        let balance = format_ether(balance);
        debug!(address = %signer.address(), %balance, "account details fetched");
        self.session
            .set_account_details(signer.address_string(), balance);
        Ok(&self.session)
    }

    /// Re-read the profile from the auth client
    pub async fn refresh_profile(&mut self) -> Result<&Session> {
        let client = self.client()?;
        if !self.session.is_authenticated() {
            return Err(OrchestratorError::NotConnected);
        }

        let profile = client.user_info().await.map_err(OrchestratorError::Profile)?;
        self.session.set_profile(profile);
        Ok(&self.session)
    }

    /// `personal_sign` a UTF-8 message with the connected account
    pub async fn sign_message(&self, message: &str) -> Result<String> {
        let handle = self
            .session
            .chain_provider()
            .cloned()
            .ok_or(OrchestratorError::NotConnected)?;

        let signer = ChainReader::new(handle)
            .signer()
            .await
            .map_err(OrchestratorError::Sign)?;
        signer
            .sign_message(message)
            .await
            .map_err(OrchestratorError::Sign)
    }
}
