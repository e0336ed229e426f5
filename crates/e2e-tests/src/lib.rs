//! End-to-end test infrastructure for scoped-search.
//!
//! Provides a shared TestHarness with a recording executor, a toggleable
//! ambient scope and the model fixtures used across the E2E tests.

use std::sync::Arc;

use criteria_merge::{
    AmbientScopeFlag, DocumentMatch, MockSearchExecutor, ModelDescriptor, SearchModel,
};
use criteria_types::{Fragment, SearchOptions};

/// Shared test harness for E2E tests.
///
/// Every model built from one harness shares its executor and ambient flag,
/// so tests can count executions and toggle ORM scoping in one place.
pub struct TestHarness {
    /// Recording executor over [`corpus`]
    pub executor: Arc<MockSearchExecutor>,
    /// Ambient ORM scope, inactive initially
    pub ambient: Arc<AmbientScopeFlag>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_executor(MockSearchExecutor::new().with_documents(corpus()))
    }

    pub fn with_executor(executor: MockSearchExecutor) -> Self {
        Self {
            executor: Arc::new(executor),
            ambient: Arc::new(AmbientScopeFlag::default()),
        }
    }

    /// Bind a descriptor to this harness's collaborators.
    pub fn model(&self, descriptor: ModelDescriptor) -> SearchModel {
        SearchModel::new(descriptor, self.executor.clone())
            .with_ambient_scope(self.ambient.clone())
    }

    /// `Article`, default scope ordering by publication date.
    pub fn articles(&self) -> SearchModel {
        self.model(article_descriptor())
    }

    /// `Tag`, no default scope.
    pub fn tags(&self) -> SearchModel {
        self.model(ModelDescriptor::new("Tag"))
    }

    /// `Comment`, no default scope; searched through article relations.
    pub fn comments(&self) -> SearchModel {
        self.model(ModelDescriptor::new("Comment"))
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Descriptor for `Article` with a `published_at desc` default scope.
pub fn article_descriptor() -> ModelDescriptor {
    ModelDescriptor::new("Article").with_default_scope_fn(|| {
        vec![Fragment::options(
            SearchOptions::new().with_option("order", "published_at desc"),
        )]
    })
}

/// Documents served by the harness executor.
pub fn corpus() -> Vec<DocumentMatch> {
    vec![
        DocumentMatch::new("Article", 1),
        DocumentMatch::new("Article", 2),
        DocumentMatch::new("Article", 3),
        DocumentMatch::new("Tag", 10),
        DocumentMatch::new("Tag", 11),
        DocumentMatch::new("Comment", 100),
    ]
}
