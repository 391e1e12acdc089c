//! Error types for tokens-sync

/// Result type for tokens-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a synchronization run.
///
/// Four kinds are distinguished: `Response` (the remote call arrived but
/// the server reported failure), `Request` (transport-level failure),
/// `Compute` (SDK-side validation or resolution failure) and
/// `Processing` (document or configuration parse/transform failure).
/// None are swallowed; the orchestrator aborts the run on the first one.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Remote call succeeded in transit but the server returned failure
    #[error("Server returned an error: {message}")]
    Response { message: String },

    /// Transport-level failure, e.g. unreachable network
    #[error("Request failed: {message}")]
    Request { message: String },

    /// SDK-side validation or resolution failure
    #[error("Compute error: {message}")]
    Compute { message: String },

    /// Document or configuration parse/transform failure
    #[error("Processing error: {message}")]
    Processing { message: String },

    /// Parser error from tokens-parser (a processing failure)
    #[error(transparent)]
    Parser(#[from] tokens_parser::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a `Compute` error.
    pub fn compute(message: impl Into<String>) -> Self {
        Error::Compute {
            message: message.into(),
        }
    }

    /// Shorthand for a `Processing` error.
    pub fn processing(message: impl Into<String>) -> Self {
        Error::Processing {
            message: message.into(),
        }
    }

    /// Shorthand for a `Response` error.
    pub fn response(message: impl Into<String>) -> Self {
        Error::Response {
            message: message.into(),
        }
    }

    /// Shorthand for a `Request` error.
    pub fn request(message: impl Into<String>) -> Self {
        Error::Request {
            message: message.into(),
        }
    }
}
