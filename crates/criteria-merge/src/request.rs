//! Search request accumulator.
//!
//! A [`SearchRequest`] starts empty and has fragments folded into it in
//! order. Once merging is complete it is finalized into an immutable
//! [`FinalizedRequest`] for the executor, and may be populated at most once.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use criteria_types::{ClassId, ExecutionError, Fragment, QueryJoin, SearchOptions};

use crate::executor::{ResultSet, SearchExecutor};
use crate::query::QueryCombiner;

/// Which kind of search object seeds the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    /// Record-oriented search
    Records,
    /// Facet-oriented search
    Facets,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Records => "records",
            SearchKind::Facets => "facets",
        }
    }
}

/// Immutable snapshot of a merged request, as sent to the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedRequest {
    kind: SearchKind,
    query: String,
    options: SearchOptions,
}

impl FinalizedRequest {
    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn classes(&self) -> &BTreeSet<ClassId> {
        &self.options.classes
    }
}

/// Mutable accumulator for one search call.
pub struct SearchRequest {
    kind: SearchKind,
    query: String,
    options: SearchOptions,
    combiner: Arc<dyn QueryCombiner>,
    results: Option<ResultSet>,
}

impl SearchRequest {
    /// Create an empty request combining query terms with [`QueryJoin::Space`].
    pub fn new(kind: SearchKind) -> Self {
        Self::with_combiner(kind, Arc::new(QueryJoin::Space))
    }

    pub fn with_combiner(kind: SearchKind, combiner: Arc<dyn QueryCombiner>) -> Self {
        Self {
            kind,
            query: String::new(),
            options: SearchOptions::default(),
            combiner,
            results: None,
        }
    }

    /// Fold a fragment into this request.
    ///
    /// A non-empty term replaces an empty query or is combined with the
    /// existing one. Options follow [`SearchOptions::merge`].
    pub fn merge(&mut self, fragment: &Fragment) {
        if let Some(term) = fragment.query_term() {
            self.query = if self.query.is_empty() {
                term.to_string()
            } else {
                self.combiner.combine(&self.query, term)
            };
        }
        self.options.merge(fragment.search_options());

        debug!(
            kind = self.kind.as_str(),
            query = %self.query,
            classes = self.options.classes.len(),
            "Merged fragment"
        );
    }

    /// Snapshot the merged state for execution.
    pub fn finalize(&self) -> FinalizedRequest {
        FinalizedRequest {
            kind: self.kind,
            query: self.query.clone(),
            options: self.options.clone(),
        }
    }

    /// Execute the request, once. Later calls return the stored results.
    pub fn populate(
        &mut self,
        executor: &dyn SearchExecutor,
    ) -> Result<&ResultSet, ExecutionError> {
        let results = match self.results.take() {
            Some(results) => results,
            None => {
                let results = executor.execute(&self.finalize())?;
                info!(
                    kind = self.kind.as_str(),
                    query = %self.query,
                    matches = results.matches.len(),
                    total = results.total_entries,
                    "Search request populated"
                );
                results
            }
        };
        Ok(self.results.insert(results))
    }

    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn classes(&self) -> &BTreeSet<ClassId> {
        &self.options.classes
    }

    pub fn is_populated(&self) -> bool {
        self.results.is_some()
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }
}

impl fmt::Debug for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchRequest")
            .field("kind", &self.kind)
            .field("query", &self.query)
            .field("options", &self.options)
            .field("populated", &self.is_populated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{DocumentMatch, MockSearchExecutor};
    use serde_json::json;

    #[test]
    fn test_new_request_is_empty() {
        let request = SearchRequest::new(SearchKind::Records);
        assert_eq!(request.query(), "");
        assert!(request.classes().is_empty());
        assert!(!request.is_populated());
    }

    #[test]
    fn test_first_term_sets_query() {
        let mut request = SearchRequest::new(SearchKind::Records);
        request.merge(&Fragment::term("ruby"));
        assert_eq!(request.query(), "ruby");
    }

    #[test]
    fn test_terms_are_combined() {
        let mut request = SearchRequest::new(SearchKind::Records);
        request.merge(&Fragment::term("ruby"));
        request.merge(&Fragment::options(SearchOptions::new()));
        request.merge(&Fragment::term("rails"));
        assert_eq!(request.query(), "ruby rails");
    }

    #[test]
    fn test_custom_combiner() {
        let mut request =
            SearchRequest::with_combiner(SearchKind::Records, Arc::new(QueryJoin::Or));
        request.merge(&Fragment::term("ruby"));
        request.merge(&Fragment::term("rails"));
        assert_eq!(request.query(), "(ruby) | (rails)");
    }

    #[test]
    fn test_merge_does_not_touch_fragment() {
        let fragment = Fragment::new(Some("ruby"), SearchOptions::new().with_class("Tag"));
        let before = fragment.clone();

        let mut request = SearchRequest::new(SearchKind::Facets);
        request.merge(&fragment);
        request.merge(&Fragment::options(SearchOptions::new().with_class("Article")));

        assert_eq!(fragment, before);
        assert_eq!(request.classes().len(), 2);
    }

    #[test]
    fn test_finalize_snapshot() {
        let mut request = SearchRequest::new(SearchKind::Facets);
        request.merge(&Fragment::new(
            Some("ruby"),
            SearchOptions::new().with_option("order", "id"),
        ));

        let finalized = request.finalize();
        request.merge(&Fragment::term("rails"));

        assert_eq!(finalized.kind(), SearchKind::Facets);
        assert_eq!(finalized.query(), "ruby");
        assert_eq!(finalized.options().option("order"), Some(&json!("id")));
    }

    #[test]
    fn test_populate_executes_once() {
        let executor =
            MockSearchExecutor::new().with_documents(vec![DocumentMatch::new("Article", 1)]);
        let mut request = SearchRequest::new(SearchKind::Records);

        assert_eq!(request.populate(&executor).unwrap().ids(), vec![1]);
        assert_eq!(request.populate(&executor).unwrap().ids(), vec![1]);

        assert!(request.is_populated());
        assert_eq!(executor.execution_count(), 1);
    }

    #[test]
    fn test_failed_populate_leaves_request_unpopulated() {
        let executor = MockSearchExecutor::new().with_failure("timeout");
        let mut request = SearchRequest::new(SearchKind::Records);

        assert!(request.populate(&executor).is_err());
        assert!(!request.is_populated());
    }
}
