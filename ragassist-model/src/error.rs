//! Error types for the `ragassist-model` crate.

use thiserror::Error;

/// Errors raised while selecting or calling a language model backend.
#[derive(Debug, Error)]
pub enum ModelError {
    /// None of the provider credentials is set.
    #[error("No valid API key found. Please set one of: {} in your .env file", list_keys(.keys))]
    NoProvider {
        /// The credential variables that were checked, in priority order.
        keys: Vec<String>,
    },

    /// The request could not be built or sent.
    #[error("{provider} request failed: {message}")]
    Request {
        /// The backend that failed.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The backend answered with an error status or an unusable body.
    #[error("{provider} returned an invalid response: {message}")]
    Response {
        /// The backend that failed.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A client could not be configured.
    #[error("Model configuration error: {0}")]
    Config(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Render `["A", "B", "C"]` as `A, B, or C`.
fn list_keys(keys: &[String]) -> String {
    match keys {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} or {second}"),
        [rest @ .., last] => format!("{}, or {last}", rest.join(", ")),
    }
}
