/*
[INPUT]:  Scripted outcomes for each provider call
[OUTPUT]: Deterministic auth provider and factory for tests
[POS]:    Auth layer - test doubles
[UPDATE]: When the auth provider contract changes
*/

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::auth::{AuthProvider, AuthProviderFactory, ModalConfig, UserProfile, Web3AuthOptions};
use crate::error::{AdapterError, AuthError, Result};
use crate::rpc::ProviderHandle;

#[derive(Debug, Default)]
struct MockState {
    init_error: Option<AuthError>,
    connect_error: Option<AuthError>,
    user_info_error: Option<AuthError>,
    logout_error: Option<AuthError>,
    hang_init: bool,
    connected: bool,
    init_calls: usize,
    connect_calls: usize,
    logout_calls: usize,
}

/// Mock auth provider with scripted failures
#[derive(Debug)]
pub struct MockAuthProvider {
    handle: Arc<dyn ProviderHandle>,
    profile: UserProfile,
    state: Mutex<MockState>,
}

impl MockAuthProvider {
    /// Provider whose connect flow yields `handle` and whose user is `profile`
    pub fn new(handle: Arc<dyn ProviderHandle>, profile: UserProfile) -> Self {
        Self {
            handle,
            profile,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Start out connected, as if a previous session was restored
    pub fn already_connected(self) -> Self {
        self.lock().connected = true;
        self
    }

    pub fn with_init_error(self, error: AuthError) -> Self {
        self.lock().init_error = Some(error);
        self
    }

    /// Make `init_modal` never resolve, like a provider that hangs
    pub fn with_hanging_init(self) -> Self {
        self.lock().hang_init = true;
        self
    }

    pub fn with_user_info_error(self, error: AuthError) -> Self {
        self.lock().user_info_error = Some(error);
        self
    }

    /// Script the next connect attempts to fail; `None` clears the failure
    pub fn set_connect_error(&self, error: Option<AuthError>) {
        self.lock().connect_error = error;
    }

    /// Script the next logout attempts to fail; `None` clears the failure
    pub fn set_logout_error(&self, error: Option<AuthError>) {
        self.lock().logout_error = error;
    }

    pub fn init_calls(&self) -> usize {
        self.lock().init_calls
    }

    pub fn connect_calls(&self) -> usize {
        self.lock().connect_calls
    }

    pub fn logout_calls(&self) -> usize {
        self.lock().logout_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn init_modal(&self, _modal: &ModalConfig) -> Result<()> {
        let (hang, init_error) = {
            let mut state = self.lock();
            state.init_calls += 1;
            (state.hang_init, state.init_error.clone())
        };
        if hang {
            std::future::pending::<()>().await;
        }
        match init_error {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }

    async fn connect(&self) -> Result<Arc<dyn ProviderHandle>> {
        let mut state = self.lock();
        state.connect_calls += 1;
        if let Some(error) = state.connect_error.clone() {
            return Err(error.into());
        }
        state.connected = true;
        Ok(self.handle.clone())
    }

    async fn user_info(&self) -> Result<UserProfile> {
        let state = self.lock();
        if let Some(error) = state.user_info_error.clone() {
            return Err(error.into());
        }
        if !state.connected {
            return Err(AuthError::NotConnected.into());
        }
        Ok(self.profile.clone())
    }

    async fn logout(&self) -> Result<()> {
        let mut state = self.lock();
        state.logout_calls += 1;
        if let Some(error) = state.logout_error.clone() {
            return Err(error.into());
        }
        state.connected = false;
        Ok(())
    }

    fn connected(&self) -> bool {
        self.lock().connected
    }

    fn provider(&self) -> Option<Arc<dyn ProviderHandle>> {
        self.lock().connected.then(|| self.handle.clone())
    }
}

/// Factory handing out one shared mock provider
#[derive(Debug, Clone)]
pub struct MockAuthFactory {
    provider: Arc<MockAuthProvider>,
    construct_error: Option<String>,
    constructed: Arc<Mutex<Vec<Web3AuthOptions>>>,
}

impl MockAuthFactory {
    pub fn new(provider: Arc<MockAuthProvider>) -> Self {
        Self {
            provider,
            construct_error: None,
            constructed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make `construct` fail with a configuration error
    pub fn failing(mut self, message: &str) -> Self {
        self.construct_error = Some(message.to_string());
        self
    }

    pub fn provider(&self) -> &Arc<MockAuthProvider> {
        &self.provider
    }

    /// Options passed to every `construct` call so far
    pub fn constructed(&self) -> Vec<Web3AuthOptions> {
        self.constructed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuthProviderFactory for MockAuthFactory {
    fn construct(&self, options: Web3AuthOptions) -> Result<Arc<dyn AuthProvider>> {
        self.constructed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(options);

        if let Some(message) = &self.construct_error {
            return Err(AdapterError::Config(message.clone()));
        }
        let provider: Arc<dyn AuthProvider> = self.provider.clone();
        Ok(provider)
    }
}
