//! Error types for the Trip Planner client.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The server could not be reached, or the transport failed mid-request.
    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// A call that was expected to succeed returned a non-2xx status.
    #[error("Protocol error (status {status}): {body}")]
    Protocol { status: u16, body: String },

    #[error("Session not found: {session_id} (app {app_name}, user {user_id})")]
    SessionNotFound {
        app_name: String,
        user_id: String,
        session_id: String,
    },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ClientError {
    /// Create a protocol error from a status and raw response body.
    pub fn protocol(status: u16, body: impl Into<String>) -> Self {
        Self::Protocol {
            status,
            body: body.into(),
        }
    }

    pub fn session_not_found(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self::SessionNotFound {
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Protocol { status, .. } => Some(*status),
            Self::Connection(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Connection(err) if err.is_timeout() => ErrorCategory::Timeout,
            Self::Connection(_) => ErrorCategory::Connection,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) | Self::InvalidArgument(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::SessionNotFound { .. } => ErrorCategory::Session,
            Self::Protocol { status, .. } => match status {
                404 => ErrorCategory::Session,
                409 => ErrorCategory::Conflict,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Protocol,
            },
        }
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Connection
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Connection => RecoverySuggestion::CheckServer,
            ErrorCategory::RateLimit | ErrorCategory::Server => {
                RecoverySuggestion::RetryWithBackoff
            }
            ErrorCategory::Timeout => RecoverySuggestion::IncreaseTimeout,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Session | ErrorCategory::Conflict => {
                RecoverySuggestion::CreateFreshSession
            }
            _ => RecoverySuggestion::InspectResponse,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ClientError>;
