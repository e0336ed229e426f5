//! Error types for the scoped-search engine.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::class::ClassId;

/// Raised when a search is attempted while an ORM-level scope restricts the
/// calling class and the caller did not pass `ignore_scopes`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot search {class} through an active ORM scope; pass ignore_scopes to search anyway")]
pub struct MixedScopesError {
    /// Class whose ambient scope was active
    pub class: ClassId,
}

/// Failure reported by the search-execution backend.
///
/// Display and `source()` forward to the backend's own error.
#[derive(Debug)]
pub struct ExecutionError(Box<dyn StdError + Send + Sync + 'static>);

impl ExecutionError {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(Box::new(error))
    }

    /// Wrap a plain message, for backends without a typed error.
    pub fn message(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self(message.into())
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.0
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for ExecutionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync + 'static>> for ExecutionError {
    fn from(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Self(error)
    }
}

/// Errors that can occur while merging or executing a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Ambient ORM scope active without `ignore_scopes`
    #[error(transparent)]
    MixedScopes(#[from] MixedScopesError),

    /// The request was already executed
    #[error("This search request has already been made; it can no longer be modified")]
    PopulatedResults,

    /// Scope name not registered on the model
    #[error("Unknown search scope: {0}")]
    UnknownScope(String),

    /// Value of the wrong shape for a well-known option key
    #[error("Invalid value for option {key}: {message}")]
    InvalidOption { key: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend failure, passed through unchanged
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl SearchError {
    pub fn is_mixed_scopes(&self) -> bool {
        matches!(self, SearchError::MixedScopes(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("connection refused")]
    struct DaemonDown;

    #[test]
    fn test_execution_error_passes_through() {
        let err = SearchError::from(ExecutionError::new(DaemonDown));
        assert_eq!(err.to_string(), "connection refused");
        assert!(!err.is_mixed_scopes());

        match err {
            SearchError::Execution(inner) => assert!(inner.downcast_ref::<DaemonDown>().is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_mixed_scopes_is_distinguishable() {
        let err = SearchError::from(MixedScopesError {
            class: ClassId::new("Article"),
        });
        assert!(err.is_mixed_scopes());
        assert!(err.to_string().contains("Article"));
    }

    #[test]
    fn test_message_error() {
        let err = ExecutionError::message("syntax error near '|'");
        assert_eq!(err.to_string(), "syntax error near '|'");
    }
}
