/*
[INPUT]:  Public API exports for wallet-auth-demo crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod orchestrator;
pub mod session;
pub mod view;

// Re-export main types for convenience
pub use config::AppConfig;
pub use orchestrator::{OrchestratorError, SessionOrchestrator};
pub use session::{Session, SessionAction, SessionState, StateError};
pub use view::{ProfileCard, SessionView};
