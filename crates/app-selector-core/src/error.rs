//! Error taxonomy for the selector engine.

use thiserror::Error;

/// Errors reported by the selection-list engine and its collaborators.
///
/// An empty candidate set is deliberately absent: it is a regular session
/// path that shows an informational popup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// A widget or page could not be constructed.
    #[error("failed to create {what}")]
    ResourceExhaustion { what: &'static str },

    /// Out-of-range or missing input. Nothing was mutated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested registration, page or candidate does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A platform collaborator reported a failure.
    #[error("{service} service failed: {message}")]
    Service {
        service: &'static str,
        message: String,
    },

    /// The layout was torn down and can no longer be used.
    #[error("layout was already destroyed")]
    LayoutDestroyed,
}

impl SelectorError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn service(service: &'static str, message: impl Into<String>) -> Self {
        Self::Service {
            service,
            message: message.into(),
        }
    }

    /// Returns true for failures the caller may safely ignore.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T, E = SelectorError> = std::result::Result<T, E>;
