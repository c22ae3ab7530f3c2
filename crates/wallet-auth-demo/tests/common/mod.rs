/*
[INPUT]:  Scripted auth outcomes and chain responses
[OUTPUT]: Orchestrators wired to mock providers, temp config files
[POS]:    Test infrastructure - shared across demo integration tests
[UPDATE]: When adding new test fixtures
*/

//! Common test utilities for wallet-auth-demo tests

use std::path::PathBuf;
use std::sync::Arc;

use wallet_auth_adapter::{
    MockAuthFactory, MockAuthProvider, MockProviderHandle, U256, UserProfile,
};
use wallet_auth_demo::{AppConfig, SessionOrchestrator};

#[allow(dead_code)]
pub const ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Well-known development key whose address is `ADDRESS`
#[allow(dead_code)]
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[allow(dead_code)]
pub struct Harness {
    pub orchestrator: SessionOrchestrator,
    pub provider: Arc<MockAuthProvider>,
    pub handle: Arc<MockProviderHandle>,
    pub factory: MockAuthFactory,
}

#[allow(dead_code)]
pub fn alice() -> UserProfile {
    UserProfile {
        name: Some("Alice".to_string()),
        picture: Some("url".to_string()),
        ..UserProfile::default()
    }
}

#[allow(dead_code)]
pub fn one_ether() -> U256 {
    U256::from(1_000_000_000_000_000_000u64)
}

/// Orchestrator over a mock provider answering with `handle`
#[allow(dead_code)]
pub fn harness_with(
    handle: MockProviderHandle,
    customize: impl FnOnce(MockAuthProvider) -> MockAuthProvider,
) -> Harness {
    let handle = Arc::new(handle);
    let provider = Arc::new(customize(MockAuthProvider::new(handle.clone(), alice())));
    let factory = MockAuthFactory::new(provider.clone());
    let orchestrator = SessionOrchestrator::new(AppConfig::default(), Arc::new(factory.clone()));
    Harness {
        orchestrator,
        provider,
        handle,
        factory,
    }
}

#[allow(dead_code)]
pub fn harness(balance: U256) -> Harness {
    harness_with(MockProviderHandle::new(ADDRESS, balance), |p| p)
}

/// Write `contents` to a fresh YAML file under the system temp dir
#[allow(dead_code)]
pub fn write_temp_config(contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wallet-auth-demo-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("config.yaml");
    std::fs::write(&path, contents).expect("write temp config");
    path
}
