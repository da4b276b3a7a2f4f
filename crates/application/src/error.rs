//! Application error types

use eavesdrop_domain::DomainError;
use thiserror::Error;

use crate::ports::HttpClientError;

/// Application-level errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// An HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),

    /// A template referenced variables no earlier step captured.
    #[error("unresolved variables in '{template}': {}", names.join(", "))]
    UnresolvedVariables {
        /// The template being resolved.
        template: String,
        /// Variable names that had no value.
        names: Vec<String>,
    },

    /// A capture found nothing to extract.
    #[error("capture '{variable}' failed: {reason}")]
    Capture {
        /// Variable the capture would have written.
        variable: String,
        /// Why nothing was captured.
        reason: String,
    },

    /// The run configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
