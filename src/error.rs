use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuiteError {
    /// Transport worked but the login was rejected.
    #[error("Authentication failed with status {status}: {body}")]
    AuthenticationFailure { status: u16, body: String },

    /// Transport and status worked but the response broke the expected shape.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Unexpected status: expected {expected}, got {actual}: {body}")]
    UnexpectedStatus {
        expected: String,
        actual: u16,
        body: String,
    },

    #[error("Expectation failed: {0}")]
    Expectation(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SuiteError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SuiteError::AuthenticationFailure { status, .. } => Some(*status),
            SuiteError::UnexpectedStatus { actual, .. } => Some(*actual),
            SuiteError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, SuiteError::AuthenticationFailure { .. })
    }

    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, SuiteError::ProtocolViolation(_))
    }
}

pub type Result<T> = std::result::Result<T, SuiteError>;
