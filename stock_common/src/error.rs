//! Error types shared between client and server.
//!
//! `StockError` covers the three request-level failure kinds (`QuoteUnavailable`,
//! `PersistenceUnavailable`, `InvalidRequest`) together with the plumbing errors
//! raised while starting the server or talking to it from the client.
use std::io;
use std::sync::PoisonError;

use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum StockError {
    /// The upstream price source failed, timed out, or returned no usable price.
    #[error("Quote unavailable for {symbol}: {reason}")]
    QuoteUnavailable {
        /// Normalized symbol whose quote could not be fetched.
        symbol: String,
        /// Short description of the upstream failure.
        reason: String,
    },

    /// The like record store could not be reached or a write failed.
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// The request does not name one or two usable symbols.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Invalid startup configuration, such as a malformed URL.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport failure on the client side, or an error body returned by the server.
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Named failure kind, reported to HTTP callers in the `error` field.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum ErrorKind {
    QuoteUnavailable,
    PersistenceUnavailable,
    InvalidRequest,
    Internal,
}

impl StockError {
    /// Builds a `QuoteUnavailable` error for `symbol`.
    pub fn quote_unavailable(symbol: &str, reason: impl Into<String>) -> Self {
        StockError::QuoteUnavailable {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    /// Failure kind of this error. Plumbing errors report as `Internal`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StockError::QuoteUnavailable { .. } => ErrorKind::QuoteUnavailable,
            StockError::PersistenceUnavailable(_) => ErrorKind::PersistenceUnavailable,
            StockError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            StockError::Io(_)
            | StockError::SerdeJson(_)
            | StockError::Config(_)
            | StockError::Http(_) => ErrorKind::Internal,
        }
    }
}

impl<T> From<PoisonError<T>> for StockError {
    fn from(err: PoisonError<T>) -> Self {
        StockError::PersistenceUnavailable(format!("store lock poisoned: {}", err))
    }
}
