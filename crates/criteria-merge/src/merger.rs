//! Fragment merger and the merge pipeline.
//!
//! Pipeline order for one call:
//! 1. default-scope fragments, when the model declares a default scope
//! 2. the caller's query/options fragment
//! 3. the ambient scope guard, against the state after step 2
//! 4. any trailing fragments (e.g. a relation's owner filter)
//! 5. the calling class, added to the target classes
//!
//! Eager population is decided afterwards by [`Merger::populate_if_requested`],
//! so callers can fold in one more fragment first (`ids_only`).

use tracing::debug;

use criteria_types::{ClassId, Fragment, SearchError, SearchOptions};

use crate::executor::{ResultSet, SearchExecutor};
use crate::guard::{AmbientScope, ScopeGuard};
use crate::request::SearchRequest;

/// Inputs for one pass through the merge pipeline.
pub struct MergePlan<'a> {
    /// The calling class
    pub class: &'a ClassId,
    /// Resolved default scope; `None` when the model declares none
    pub default_scope: Option<Vec<Fragment>>,
    /// Caller-supplied criteria, merged in order
    pub caller: Vec<Fragment>,
    /// Fragments merged after the guard and before class pinning
    pub trailing: Vec<Fragment>,
    /// ORM scoping state, consulted at the guard step
    pub ambient: &'a dyn AmbientScope,
}

/// Folds fragments into the search request it owns.
#[derive(Debug)]
pub struct Merger {
    request: SearchRequest,
}

impl Merger {
    pub fn new(request: SearchRequest) -> Self {
        Self { request }
    }

    /// Merge a query term and options.
    pub fn merge(
        &mut self,
        term: Option<&str>,
        options: SearchOptions,
    ) -> Result<&SearchRequest, SearchError> {
        self.merge_fragment(&Fragment::new(term, options))
    }

    /// Merge one fragment. Fails once the request has been executed.
    pub fn merge_fragment(&mut self, fragment: &Fragment) -> Result<&SearchRequest, SearchError> {
        if self.request.is_populated() {
            return Err(SearchError::PopulatedResults);
        }
        self.request.merge(fragment);
        Ok(&self.request)
    }

    /// Run the pipeline described in the module docs.
    pub fn run(mut self, plan: MergePlan<'_>) -> Result<Self, SearchError> {
        if let Some(fragments) = &plan.default_scope {
            debug!(class = %plan.class, fragments = fragments.len(), "Applying default scope");
            for fragment in fragments {
                self.merge_fragment(fragment)?;
            }
        }

        for fragment in &plan.caller {
            self.merge_fragment(fragment)?;
        }

        ScopeGuard::check(
            plan.ambient.is_active(plan.class),
            plan.class,
            self.request.options(),
        )?;

        for fragment in &plan.trailing {
            self.merge_fragment(fragment)?;
        }

        self.merge_fragment(&Fragment::options(
            SearchOptions::new().with_class(plan.class.clone()),
        ))?;

        Ok(self)
    }

    /// Execute now if the merged options ask for `populate`.
    pub fn populate_if_requested(
        &mut self,
        executor: &dyn SearchExecutor,
    ) -> Result<(), SearchError> {
        if self.request.options().wants_populate() {
            self.populate(executor)?;
        }
        Ok(())
    }

    /// Execute the request unless it already has results.
    pub fn populate(&mut self, executor: &dyn SearchExecutor) -> Result<&ResultSet, SearchError> {
        Ok(self.request.populate(executor)?)
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    pub fn into_request(self) -> SearchRequest {
        self.request
    }
}
