//! Class-level search entry points.
//!
//! [`SearchModel`] binds a model descriptor to its collaborators (executor,
//! ambient scope inspector, query combiner) and exposes `search`, `facets`,
//! `search_for_ids` and `search_count`. Each call builds a fresh request,
//! runs it through the merge pipeline and hands back a [`Search`] handle.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use criteria_types::{
    ClassId, DocumentId, Fragment, QueryJoin, SearchError, SearchOptions, SearchSettings,
};

use crate::executor::{ResultSet, SearchExecutor};
use crate::guard::{AmbientScope, NoAmbientScope};
use crate::merger::{MergePlan, Merger};
use crate::model::ModelDescriptor;
use crate::query::QueryCombiner;
use crate::request::{FinalizedRequest, SearchKind, SearchRequest};

/// A merged search, executed lazily on first access unless `populate` was set.
pub struct Search {
    merger: Merger,
    executor: Arc<dyn SearchExecutor>,
}

impl Search {
    fn new(merger: Merger, executor: Arc<dyn SearchExecutor>) -> Self {
        Self { merger, executor }
    }

    pub fn request(&self) -> &SearchRequest {
        self.merger.request()
    }

    pub fn finalize(&self) -> FinalizedRequest {
        self.merger.request().finalize()
    }

    pub fn is_populated(&self) -> bool {
        self.merger.request().is_populated()
    }

    /// Refine the search further. Fails once it has been executed.
    pub fn merge(
        &mut self,
        term: Option<&str>,
        options: SearchOptions,
    ) -> Result<&SearchRequest, SearchError> {
        self.merger.merge(term, options)
    }

    /// Execute the search if it has not run yet.
    pub fn populate(&mut self) -> Result<&ResultSet, SearchError> {
        self.merger.populate(self.executor.as_ref())
    }

    pub fn ids(&mut self) -> Result<Vec<DocumentId>, SearchError> {
        Ok(self.populate()?.ids())
    }

    pub fn total_entries(&mut self) -> Result<u64, SearchError> {
        Ok(self.populate()?.total_entries)
    }

    pub fn into_request(self) -> SearchRequest {
        self.merger.into_request()
    }
}

impl fmt::Debug for Search {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Search")
            .field("request", self.merger.request())
            .finish_non_exhaustive()
    }
}

/// Search entry points for one model class.
#[derive(Clone)]
pub struct SearchModel {
    descriptor: Arc<ModelDescriptor>,
    executor: Arc<dyn SearchExecutor>,
    ambient: Arc<dyn AmbientScope>,
    combiner: Arc<dyn QueryCombiner>,
}

impl SearchModel {
    /// Create a model with no ambient scoping and space-joined queries.
    pub fn new(descriptor: ModelDescriptor, executor: Arc<dyn SearchExecutor>) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            executor,
            ambient: Arc::new(NoAmbientScope),
            combiner: Arc::new(QueryJoin::Space),
        }
    }

    pub fn with_ambient_scope(mut self, ambient: Arc<dyn AmbientScope>) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_combiner(mut self, combiner: Arc<dyn QueryCombiner>) -> Self {
        self.combiner = combiner;
        self
    }

    /// Apply loaded settings.
    pub fn with_settings(self, settings: &SearchSettings) -> Self {
        self.with_combiner(Arc::new(settings.query_join))
    }

    pub fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    pub fn class(&self) -> &ClassId {
        self.descriptor.class()
    }

    /// Record search.
    pub fn search(
        &self,
        query: Option<&str>,
        options: SearchOptions,
    ) -> Result<Search, SearchError> {
        self.execute_plan(
            SearchKind::Records,
            vec![Fragment::new(query, options)],
            Vec::new(),
            false,
        )
    }

    /// Facet search; same pipeline, facet-oriented seed.
    pub fn facets(
        &self,
        query: Option<&str>,
        options: SearchOptions,
    ) -> Result<Search, SearchError> {
        self.execute_plan(
            SearchKind::Facets,
            vec![Fragment::new(query, options)],
            Vec::new(),
            false,
        )
    }

    /// Identifiers-only search.
    ///
    /// With `populate: true` the request executes once, already in ids-only mode.
    pub fn search_for_ids(
        &self,
        query: Option<&str>,
        options: SearchOptions,
    ) -> Result<Search, SearchError> {
        self.execute_plan(
            SearchKind::Records,
            vec![Fragment::new(query, options)],
            Vec::new(),
            true,
        )
    }

    /// Total number of matches, without hydrating records.
    pub fn search_count(
        &self,
        query: Option<&str>,
        options: SearchOptions,
    ) -> Result<u64, SearchError> {
        self.search_for_ids(query, options)?.total_entries()
    }

    /// Record search using a named scope's fragments as the criteria.
    pub fn search_scope(&self, name: &str, args: &[Value]) -> Result<Search, SearchError> {
        let fragments = self.descriptor.resolve_scope(name, args)?;
        debug!(class = %self.class(), scope = name, "Searching through named scope");
        self.execute_plan(SearchKind::Records, fragments, Vec::new(), false)
    }

    /// Run the merge pipeline and apply eager population.
    ///
    /// With `ids_only`, the identifiers-only flag is merged after the class
    /// pinning step and before population, so `populate` executes the
    /// identifiers-only request exactly once.
    pub(crate) fn execute_plan(
        &self,
        kind: SearchKind,
        caller: Vec<Fragment>,
        trailing: Vec<Fragment>,
        ids_only: bool,
    ) -> Result<Search, SearchError> {
        let seed = SearchRequest::with_combiner(kind, Arc::clone(&self.combiner));
        let plan = MergePlan {
            class: self.descriptor.class(),
            default_scope: self.descriptor.default_scope_fragments(),
            caller,
            trailing,
            ambient: self.ambient.as_ref(),
        };

        let mut merger = Merger::new(seed).run(plan)?;
        if ids_only {
            merger.merge(None, SearchOptions::new().with_ids_only(true))?;
        }
        merger.populate_if_requested(self.executor.as_ref())?;

        Ok(Search::new(merger, Arc::clone(&self.executor)))
    }
}

impl fmt::Debug for SearchModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchModel")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
