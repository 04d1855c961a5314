//! Error types for the client

use thiserror::Error;

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Normalized failure of a remote call
///
/// The `Display` text is what the user sees.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Server answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// No response: connect failure, reset, timeout
    #[error("Connection to server failed")]
    Transport(#[source] reqwest::Error),

    /// Body was not JSON or did not have the expected shape
    #[error("Unexpected response from server")]
    Malformed { detail: String },
}

impl ApiError {
    /// Message used when the server gives no usable reason
    pub const FALLBACK_MESSAGE: &'static str = "API Error";

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::Malformed {
            detail: detail.into(),
        }
    }

    /// HTTP status of an application rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors returned by controller operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Required input missing or invalid; nothing was sent
    #[error("{0}")]
    Validation(String),

    /// No session; the user must log in first
    #[error("LOGIN REQUIRED")]
    NotAuthenticated,

    /// The session does not grant this action; nothing was sent
    #[error("{0}")]
    NotPermitted(String),

    /// The remote call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local session storage failed
    #[error("Session storage error: {0}")]
    Session(urquest_core::Error),
}

impl From<urquest_core::Error> for ClientError {
    fn from(error: urquest_core::Error) -> Self {
        match error {
            urquest_core::Error::InvalidInput(message) => Self::Validation(message),
            other => Self::Session(other),
        }
    }
}
