//! Error types for the Cinematch plugin.
//!
//! [`CinematchError`] covers both the failure taxonomy of the remote
//! recommendation service (transport, not-found, application-level and
//! timeout failures) and the local concerns of the plugin (configuration and
//! themes). [`Result`] is the crate-wide alias. All variants are
//! implemented with `thiserror`.

use thiserror::Error;

/// The main error type for Cinematch operations.
///
/// The first four variants are produced by the request gateway when it
/// normalizes an HTTP outcome. None of them is fatal: the interaction state
/// machine resets the affected piece of state and stays interactable.
///
/// # Examples
///
/// ```
/// use cinematch::CinematchError;
///
/// let err = CinematchError::Application("unknown movie".to_string());
/// assert_eq!(err.to_string(), "Service reported an error: unknown movie");
/// ```
#[derive(Debug, Error)]
pub enum CinematchError {
    /// The transport failed, the service answered with a non-2xx status, or a
    /// 2xx body could not be decoded.
    #[error("Network error: {0}")]
    Network(String),

    /// The service has no movie with the requested title.
    #[error("Movie not found: {0}")]
    NotFound(String),

    /// The service returned a 2xx response carrying a semantic `error` field.
    #[error("Service reported an error: {0}")]
    Application(String),

    /// No response arrived before the request deadline.
    #[error("Request timed out after {after_secs:.1}s")]
    Timeout {
        /// Configured timeout that elapsed.
        after_secs: f64,
    },

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),
}

/// A specialized `Result` type for Cinematch operations.
pub type Result<T> = std::result::Result<T, CinematchError>;
