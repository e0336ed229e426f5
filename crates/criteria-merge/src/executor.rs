//! Search execution seam.
//!
//! The merge engine never talks to the search daemon itself. A finalized
//! request is handed to a [`SearchExecutor`], which owns the protocol, any
//! network concurrency and its own error reporting.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use criteria_types::{ClassId, DocumentId, ExecutionError};

use crate::request::FinalizedRequest;

/// A single matched document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMatch {
    /// Class the document belongs to
    pub class: ClassId,

    /// Document ID
    pub id: DocumentId,
}

impl DocumentMatch {
    pub fn new(class: impl Into<ClassId>, id: DocumentId) -> Self {
        Self {
            class: class.into(),
            id,
        }
    }
}

/// Results of one executed request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Matches returned for this request
    pub matches: Vec<DocumentMatch>,

    /// Total number of matches known to the backend
    pub total_entries: u64,
}

impl ResultSet {
    pub fn new(matches: Vec<DocumentMatch>) -> Self {
        let total_entries = matches.len() as u64;
        Self {
            matches,
            total_entries,
        }
    }

    /// Identifiers of the returned matches.
    pub fn ids(&self) -> Vec<DocumentId> {
        self.matches.iter().map(|m| m.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Trait for search-execution backends.
///
/// `execute` is a blocking call; errors are surfaced to callers unchanged.
pub trait SearchExecutor: Send + Sync {
    fn execute(&self, request: &FinalizedRequest) -> Result<ResultSet, ExecutionError>;
}

/// Mock executor for testing.
///
/// Serves a fixed corpus, filtered by the request's target classes and
/// excluded ids, and records every request it is asked to execute.
#[derive(Default)]
pub struct MockSearchExecutor {
    /// Documents available to every request
    pub corpus: Vec<DocumentMatch>,
    /// Fail every request with this message
    pub failure: Option<String>,
    executed: Mutex<Vec<FinalizedRequest>>,
}

impl MockSearchExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add documents to the corpus.
    pub fn with_documents<I>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = DocumentMatch>,
    {
        self.corpus.extend(documents);
        self
    }

    /// Make every execution fail.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Requests executed so far, in order.
    pub fn executed(&self) -> Vec<FinalizedRequest> {
        self.executed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn execution_count(&self) -> usize {
        self.executed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl SearchExecutor for MockSearchExecutor {
    fn execute(&self, request: &FinalizedRequest) -> Result<ResultSet, ExecutionError> {
        self.executed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        if let Some(message) = &self.failure {
            return Err(ExecutionError::message(message.clone()));
        }

        let options = request.options();
        let matches = self
            .corpus
            .iter()
            .filter(|m| options.classes.is_empty() || options.classes.contains(&m.class))
            .filter(|m| !options.without_ids.contains(&m.id))
            .cloned()
            .collect();

        Ok(ResultSet::new(matches))
    }
}
