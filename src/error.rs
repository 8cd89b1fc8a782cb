use thiserror::Error;

/// Errors raised while fetching or locating spreadsheet data
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Request failed with status {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    pub fn not_found(message: impl Into<String>) -> Self {
        BridgeError::NotFound(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        BridgeError::Config(message.into())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        BridgeError::InvalidResponse(message.into())
    }

    /// Whether a lookup path that hit this error can be abandoned in favour
    /// of the next one. Authentication and configuration problems affect
    /// every path equally.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BridgeError::Transport { .. }
                | BridgeError::Http(_)
                | BridgeError::InvalidResponse(_)
                | BridgeError::NotFound(_)
        )
    }

    /// HTTP status carried by the error, if the remote answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            BridgeError::Transport { status, .. } => Some(*status),
            BridgeError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
