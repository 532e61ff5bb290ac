//! Unified error types for sentio.
//!
//! Every failure the analysis pipeline can surface to a caller is a variant
//! here, with a stable string prefix and a stable numeric code for the
//! protocol boundary. Most upstream failures (fetch, render, inference) are
//! recovered locally and never reach the caller; the variants exist for the
//! few paths that do surface and for structured logging in between.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the sentio service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The extraction pipeline produced zero review candidates.
    ///
    /// This is the one user-visible pipeline error; the message carries
    /// actionable guidance for the caller.
    #[error("NO_REVIEWS_FOUND: {0}")]
    NoReviews(String),

    /// Invalid or unsupported URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response or network failure on the static fetch path.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Headless render session failed.
    #[error("RENDER_FAILED: {0}")]
    RenderFailed(String),

    /// Sentiment backend failed to score a batch.
    #[error("INFERENCE_FAILED: {0}")]
    Inference(String),

    /// Review store operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            // NoReviews is a client error: the caller supplied a page
            // without reviews, so it maps to invalid-params like any other
            // bad input.
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::NoReviews(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
            Error::RenderFailed(msg) => (-32012, msg.clone()),
            Error::Inference(msg) => (-32010, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
