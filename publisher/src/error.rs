//! Error types for the KM client.

use thiserror::Error;

/// Result type for KM client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// KM client errors.
///
/// An explicit rejection by the server is not an error; it comes back as an
/// unsuccessful [`PublishOutcome`](crate::client::PublishOutcome).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client could not be constructed (bad URL, TLS setup)
    #[error("Client setup error: {0}")]
    Build(String),

    /// Network error that outlived every retry (connection, timeout, 5xx, 429)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a body that is not the expected JSON
    #[error("Decode error: {0}")]
    Decode(String),
}
