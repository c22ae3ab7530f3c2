/*
[INPUT]:  Error sources (HTTP, JSON-RPC, serialization, auth provider, signer)
[OUTPUT]: Structured error types with cancellation and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Message hosted wallet SDKs use when the login modal is dismissed
const USER_CLOSED_MODAL: &str = "user closed the modal";

/// Failures reported by an auth provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The user dismissed the login surface
    #[error("User closed the modal")]
    UserCancelled,

    /// The provider was used before `init_modal` completed
    #[error("Auth client is not initialized")]
    NotInitialized,

    /// No wallet connection exists
    #[error("Wallet is not connected")]
    NotConnected,

    /// The provider session ran past its expiry
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Any other refusal from the provider
    #[error("Auth provider rejected the request: {0}")]
    Rejected(String),
}

impl AuthError {
    /// Classify a provider message, recognizing modal cancellation
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.to_ascii_lowercase().contains(USER_CLOSED_MODAL) {
            AuthError::UserCancelled
        } else {
            AuthError::Rejected(message)
        }
    }
}

/// Main error type for the wallet-auth adapter
#[derive(Error, Debug)]
pub enum AdapterError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON-RPC endpoint returned an error object
    #[error("RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    /// Auth provider failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key or signing failure
    #[error("Signer error: {0}")]
    Signer(String),
}

impl AdapterError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            AdapterError::Http(_) | AdapterError::InvalidResponse(_) => true,
            AdapterError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Check if the user dismissed the login flow
    pub fn is_cancellation(&self) -> bool {
        matches!(self, AdapterError::Auth(AuthError::UserCancelled))
    }

    /// Check if error indicates a missing or stale session
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            AdapterError::Auth(
                AuthError::NotInitialized | AuthError::NotConnected | AuthError::SessionExpired
            )
        )
    }

    /// Create a status error from code and body
    pub fn status_error(status: StatusCode, body: impl Into<String>) -> Self {
        AdapterError::Status {
            status: status.as_u16(),
            body: body.into(),
        }
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;
