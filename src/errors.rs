// src/errors.rs

use thiserror::Error;

/// Errors raised by the ambient parts of the client: configuration, logging
/// and the terminal runtime. Chat exchanges never surface these; they
/// degrade to a bot notice instead.
#[derive(Debug, Error)]
pub enum CatalogChatError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("logging error: {0}")]
    Logging(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CatalogChatError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn api_error(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    pub fn logging_error(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}

pub type CatalogChatResult<T> = Result<T, CatalogChatError>;

/// Outcome of a failed call to the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The endpoint answered with a non-2xx status. The body is not read.
    #[error("chat endpoint returned HTTP {0}")]
    Status(u16),

    /// No response was received.
    #[error("request failed: {0}")]
    Transport(String),

    /// A 2xx response whose body is not a valid chat response.
    #[error("failed to decode chat response: {0}")]
    Decode(String),
}
