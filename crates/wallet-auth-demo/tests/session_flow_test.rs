/*
[INPUT]:  Mock auth provider and chain handle with scripted outcomes
[OUTPUT]: Test results for the orchestrated session lifecycle
[POS]:    Integration tests - session orchestration
[UPDATE]: When operation ordering or state rules change
*/

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{ADDRESS, alice, harness, harness_with, one_ether};
use tokio_test::assert_ok;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use wallet_auth_adapter::{AuthError, MockAuthFactory, MockAuthProvider, MockProviderHandle, U256};
use wallet_auth_demo::view::LOGIN_BUTTON;
use wallet_auth_demo::{AppConfig, OrchestratorError, SessionOrchestrator, SessionState, SessionView};

/// Records the level of every event it sees
#[derive(Clone, Default)]
struct LevelRecorder(Arc<Mutex<Vec<Level>>>);

impl<S: Subscriber> Layer<S> for LevelRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.0.lock().unwrap().push(*event.metadata().level());
    }
}

impl LevelRecorder {
    fn levels(&self) -> Vec<Level> {
        self.0.lock().unwrap().clone()
    }
}

#[tokio::test]
async fn test_alice_login_logout_scenario() {
    let mut h = harness(one_ether());

    assert_eq!(h.orchestrator.view(), SessionView::Loading);
    assert_ok!(h.orchestrator.initialize().await);
    assert_eq!(h.orchestrator.session().state(), SessionState::Idle);
    assert!(h.orchestrator.view().render("Demo").contains(LOGIN_BUTTON));

    assert_ok!(h.orchestrator.login().await);
    let text = h.orchestrator.view().render("Demo");
    assert!(text.contains("Welcome, Alice"));
    assert!(text.contains(&format!("Address: {ADDRESS}")));
    assert!(text.contains("Balance: 1.0 POL"));
    assert!(!text.contains(LOGIN_BUTTON));

    assert_ok!(h.orchestrator.logout().await);
    assert!(h.orchestrator.view().is_login_prompt());
    assert_eq!(h.factory.constructed().len(), 1);
}

#[tokio::test]
async fn test_login_then_logout_clears_session() {
    let mut h = harness(U256::from(42u64));
    assert_ok!(h.orchestrator.initialize().await);

    for _ in 0..3 {
        assert_ok!(h.orchestrator.login().await);
        assert!(h.orchestrator.session().is_authenticated());
        assert_eq!(h.orchestrator.session().wallet_balance(), "0.000000000000000042");

        assert_ok!(h.orchestrator.logout().await);
        let session = h.orchestrator.session();
        assert!(!session.is_authenticated());
        assert!(session.profile().is_none());
        assert!(session.chain_provider().is_none());
        assert!(session.wallet_address().is_empty());
        assert!(session.wallet_balance().is_empty());
    }
    assert_eq!(h.provider.logout_calls(), 3);
}

#[tokio::test]
async fn test_fetch_without_provider_never_calls_chain() {
    let mut h = harness(one_ether());

    let err = h.orchestrator.fetch_account_details().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::NotConnected));

    assert_ok!(h.orchestrator.initialize().await);
    let err = h.orchestrator.fetch_account_details().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::NotConnected));
    assert!(h.handle.calls().is_empty());
}

#[tokio::test]
async fn test_login_before_initialize_is_rejected() {
    let mut h = harness(one_ether());
    let err = h.orchestrator.login().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::NotInitialized));
    assert_eq!(h.provider.connect_calls(), 0);
}

#[tokio::test]
async fn test_initialize_failure_never_sticks_initializing() {
    let mut h = harness_with(MockProviderHandle::new(ADDRESS, one_ether()), |p| {
        p.with_init_error(AuthError::Rejected("invalid client id".to_string()))
    });

    let err = h.orchestrator.initialize().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Initialize(_)));
    assert_eq!(err.log_level(), Level::ERROR);

    let session = h.orchestrator.session();
    assert_eq!(session.state(), SessionState::Failed);
    assert!(!session.is_initializing());
    assert!(session.auth_client().is_none());
    assert_eq!(h.orchestrator.view(), SessionView::Unavailable);

    let err = h.orchestrator.login().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::NotInitialized));
}

#[tokio::test]
async fn test_dropped_initialize_settles_as_failed() {
    let mut h = harness_with(MockProviderHandle::new(ADDRESS, one_ether()), |p| {
        p.with_hanging_init()
    });

    let timed_out = tokio::time::timeout(Duration::from_millis(50), h.orchestrator.initialize())
        .await
        .is_err();
    assert!(timed_out);
    assert_eq!(h.provider.init_calls(), 1);

    let session = h.orchestrator.session();
    assert!(!session.is_initializing());
    assert_eq!(session.state(), SessionState::Failed);
    assert!(session.auth_client().is_none());
    assert_eq!(h.orchestrator.view(), SessionView::Unavailable);

    let err = h.orchestrator.login().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::NotInitialized));
}

#[tokio::test]
async fn test_construct_failure_leaves_client_unusable() {
    let handle = Arc::new(MockProviderHandle::new(ADDRESS, one_ether()));
    let provider = Arc::new(MockAuthProvider::new(handle, alice()));
    let factory = MockAuthFactory::new(provider.clone()).failing("bad options");
    let mut orchestrator = SessionOrchestrator::new(AppConfig::default(), Arc::new(factory));

    assert!(orchestrator.initialize().await.is_err());
    assert_eq!(orchestrator.session().state(), SessionState::Failed);
    assert_eq!(provider.init_calls(), 0);
}

#[tokio::test]
async fn test_cancelled_login_is_info_level() {
    let mut h = harness(one_ether());
    assert_ok!(h.orchestrator.initialize().await);
    h.provider.set_connect_error(Some(AuthError::UserCancelled));

    let err = h.orchestrator.login().await.unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(err.log_level(), Level::INFO);
    assert!(!h.orchestrator.session().is_authenticated());

    h.provider.set_connect_error(None);
    assert_ok!(h.orchestrator.login().await);
    assert!(h.orchestrator.session().is_authenticated());
}

#[tokio::test]
async fn test_cancelled_login_emits_no_error_event() {
    let mut h = harness(one_ether());
    assert_ok!(h.orchestrator.initialize().await);
    h.provider.set_connect_error(Some(AuthError::UserCancelled));

    let recorder = LevelRecorder::default();
    let _default = tracing::subscriber::set_default(
        tracing_subscriber::registry().with(recorder.clone()),
    );

    let err = h.orchestrator.login().await.unwrap_err();
    err.report("login");

    let levels = recorder.levels();
    assert!(levels.contains(&Level::INFO));
    assert!(!levels.contains(&Level::ERROR));
    assert!(!levels.contains(&Level::WARN));
}

#[tokio::test]
async fn test_failed_login_report_emits_error_event() {
    let mut h = harness(one_ether());
    assert_ok!(h.orchestrator.initialize().await);
    h.provider
        .set_connect_error(Some(AuthError::Rejected("popup blocked".to_string())));

    let recorder = LevelRecorder::default();
    let _default = tracing::subscriber::set_default(
        tracing_subscriber::registry().with(recorder.clone()),
    );

    let err = h.orchestrator.login().await.unwrap_err();
    err.report("login");
    assert_eq!(recorder.levels(), vec![Level::ERROR]);
}

#[tokio::test]
async fn test_other_login_failure_is_error_level() {
    let mut h = harness(one_ether());
    assert_ok!(h.orchestrator.initialize().await);
    h.provider
        .set_connect_error(Some(AuthError::Rejected("popup blocked".to_string())));

    let err = h.orchestrator.login().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Login(_)));
    assert_eq!(err.log_level(), Level::ERROR);
    assert_eq!(h.orchestrator.session().state(), SessionState::Idle);
}

#[tokio::test]
async fn test_failed_logout_keeps_state() {
    let mut h = harness(one_ether());
    assert_ok!(h.orchestrator.initialize().await);
    assert_ok!(h.orchestrator.login().await);
    h.provider
        .set_logout_error(Some(AuthError::Rejected("network down".to_string())));

    let err = h.orchestrator.logout().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Logout(_)));

    let session = h.orchestrator.session();
    assert!(session.is_authenticated());
    assert_eq!(session.profile().map(|p| p.display_name()), Some("Alice"));
    assert_eq!(session.wallet_address(), ADDRESS);
    assert_eq!(session.wallet_balance(), "1.0");
}

#[tokio::test]
async fn test_balance_failure_keeps_login_and_stale_values() {
    let mut h = harness_with(
        MockProviderHandle::new(ADDRESS, one_ether()).failing_balance(),
        |p| p,
    );
    assert_ok!(h.orchestrator.initialize().await);

    assert_ok!(h.orchestrator.login().await);
    assert!(h.orchestrator.session().is_authenticated());
    assert!(h.orchestrator.session().wallet_balance().is_empty());

    let err = h.orchestrator.fetch_account_details().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::AccountDetails(_)));
    assert_eq!(h.handle.call_count("eth_getBalance"), 2);
}

#[tokio::test]
async fn test_restored_session_is_authenticated_with_details() {
    let mut h = harness_with(MockProviderHandle::new(ADDRESS, one_ether()), |p| {
        p.already_connected()
    });

    assert_ok!(h.orchestrator.initialize().await);
    let session = h.orchestrator.session();
    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(session.profile().map(|p| p.display_name()), Some("Alice"));
    assert_eq!(session.wallet_address(), ADDRESS);
    assert_eq!(session.wallet_balance(), "1.0");
    assert_eq!(h.provider.connect_calls(), 0);
}
