//! Error types for the book API client.
//!
//! # Design
//! `Unauthorized` and `Rejected` get dedicated variants because callers
//! frequently distinguish "log in again" and "the backend refused the
//! operation" from "the server returned an unexpected status." All other
//! non-200 responses land in `Http` with the raw status code and body for
//! debugging.

use thiserror::Error;

/// Errors returned by `BookClient` parse methods and by dispatchers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The server returned 401: the token is missing, expired or invalid.
    #[error("unauthorized")]
    Unauthorized,

    /// The backend answered with its envelope but a non-zero `code`.
    #[error("rejected by backend (code {code}): {msg}")]
    Rejected { code: i64, msg: String },

    /// The server returned a non-200 status other than 401.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The base URL and endpoint path did not form a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// Client configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
