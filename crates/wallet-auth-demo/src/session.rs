/*
[INPUT]:  Auth client handle, chain connection, profile, account details
[OUTPUT]: Session record with validated lifecycle transitions
[POS]:    Session domain logic - state machine for login lifecycle
[UPDATE]: When session states or transition rules change
*/

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;
use wallet_auth_adapter::{AuthProvider, ProviderHandle, UserProfile};

/// Lifecycle of the single session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Initializing,
    Idle,
    Authenticated,
    /// Initialization failed; the auth client is unusable
    Failed,
}

/// Events that move the session between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    BeginInitialize,
    Initialized,
    /// Initialization found a live provider session
    Restored,
    InitializeFailed,
    LoggedIn,
    LoggedOut,
}

/// Errors occurring during state transitions
#[derive(Debug, Clone, Error)]
pub enum StateError {
    #[error("Invalid transition: {from:?} -> {action:?}")]
    InvalidTransition {
        from: SessionState,
        action: SessionAction,
    },
}

impl SessionState {
    /// Target state for `action`, if the transition is allowed
    pub fn next(self, action: SessionAction) -> Option<SessionState> {
        match (self, action) {
            (SessionState::Uninitialized, SessionAction::BeginInitialize) => {
                Some(SessionState::Initializing)
            }
            (SessionState::Initializing, SessionAction::Initialized) => Some(SessionState::Idle),
            (SessionState::Initializing, SessionAction::Restored) => {
                Some(SessionState::Authenticated)
            }
            (SessionState::Initializing, SessionAction::InitializeFailed) => {
                Some(SessionState::Failed)
            }
            (SessionState::Idle, SessionAction::LoggedIn) => Some(SessionState::Authenticated),
            (SessionState::Authenticated, SessionAction::LoggedOut) => Some(SessionState::Idle),
            _ => None,
        }
    }

    pub fn can_apply(self, action: SessionAction) -> bool {
        self.next(action).is_some()
    }
}

/// The one session owned by an orchestrator
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    auth_client: Option<Arc<dyn AuthProvider>>,
    chain_provider: Option<Arc<dyn ProviderHandle>>,
    profile: Option<UserProfile>,
    wallet_address: String,
    wallet_balance: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn is_initializing(&self) -> bool {
        self.state == SessionState::Initializing
    }

    pub fn auth_client(&self) -> Option<&Arc<dyn AuthProvider>> {
        self.auth_client.as_ref()
    }

    pub fn chain_provider(&self) -> Option<&Arc<dyn ProviderHandle>> {
        self.chain_provider.as_ref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn wallet_address(&self) -> &str {
        &self.wallet_address
    }

    pub fn wallet_balance(&self) -> &str {
        &self.wallet_balance
    }

    /// Fail with `InvalidTransition` unless `action` is allowed now
    pub fn ensure(&self, action: SessionAction) -> Result<(), StateError> {
        if self.state.can_apply(action) {
            Ok(())
        } else {
            Err(StateError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    pub(crate) fn apply(&mut self, action: SessionAction) -> Result<(), StateError> {
        self.ensure(action)?;
        if let Some(next) = self.state.next(action) {
            self.state = next;
        }
        Ok(())
    }

    /// Enter `Initializing`; the returned guard leaves it on every path
    pub(crate) fn begin_initialize(&mut self) -> Result<InitializeGuard<'_>, StateError> {
        self.apply(SessionAction::BeginInitialize)?;
        Ok(InitializeGuard {
            session: self,
            settled: false,
        })
    }

    pub(crate) fn commit_initialized(
        &mut self,
        client: Arc<dyn AuthProvider>,
        restored: Option<Arc<dyn ProviderHandle>>,
    ) -> Result<(), StateError> {
        match restored {
            Some(provider) => {
                self.apply(SessionAction::Restored)?;
                self.chain_provider = Some(provider);
            }
            None => self.apply(SessionAction::Initialized)?,
        }
        self.auth_client = Some(client);
        Ok(())
    }

    pub(crate) fn commit_login(
        &mut self,
        provider: Arc<dyn ProviderHandle>,
        profile: UserProfile,
    ) -> Result<(), StateError> {
        self.apply(SessionAction::LoggedIn)?;
        self.chain_provider = Some(provider);
        self.profile = Some(profile);
        Ok(())
    }

    pub(crate) fn commit_logout(&mut self) -> Result<(), StateError> {
        self.apply(SessionAction::LoggedOut)?;
        self.chain_provider = None;
        self.profile = None;
        self.wallet_address.clear();
        self.wallet_balance.clear();
        Ok(())
    }

    pub(crate) fn set_profile(&mut self, profile: UserProfile) {
        if self.is_authenticated() {
            self.profile = Some(profile);
        }
    }

    pub(crate) fn set_account_details(&mut self, address: String, balance: String) {
        if self.is_authenticated() {
            self.wallet_address = address;
            self.wallet_balance = balance;
        }
    }
}

/// Scoped `Initializing` state
///
/// Dropped without `commit`, including by a cancelled future, it applies
/// `InitializeFailed`.
pub(crate) struct InitializeGuard<'a> {
    session: &'a mut Session,
    settled: bool,
}

impl InitializeGuard<'_> {
    pub(crate) fn commit(
        mut self,
        client: Arc<dyn AuthProvider>,
        restored: Option<Arc<dyn ProviderHandle>>,
    ) -> Result<(), StateError> {
        let result = self.session.commit_initialized(client, restored);
        self.settled = result.is_ok();
        result
    }
}

impl Drop for InitializeGuard<'_> {
    fn drop(&mut self) {
        if !self.settled && self.session.apply(SessionAction::InitializeFailed).is_ok() {
            warn!("initialization did not complete; auth client unusable");
        }
    }
}
