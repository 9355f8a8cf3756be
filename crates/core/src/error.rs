//! Transport and configuration error model.

use thiserror::Error;

/// Result type used by service collaborators (auth, route listing).
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure talking to a backend collaborator.
///
/// Keep this focused on transport/payload failures. Session consequences
/// (forcing re-authentication, clearing state) are decided by the callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request never produced a response (DNS, refused, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status.
    #[error("http error ({0}): {1}")]
    Http(u16, String),

    /// The envelope carried a non-success business code.
    #[error("api error ({code}): {msg}")]
    Api { code: String, msg: String },

    /// The payload did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// No credential was available for an authenticated call.
    #[error("missing credential")]
    MissingCredential,
}

impl ServiceError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn api(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            msg: msg.into(),
        }
    }
}

/// Invalid configuration value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
