//! # criteria-merge
//!
//! Criteria merging engine for scoped-search.
//!
//! A model class accumulates search criteria from several sources (its
//! default scope, the caller's query and options, a relation's owner filter)
//! and this crate folds them into exactly one executable search request.
//!
//! ## Core Concepts
//!
//! - **Search Request**: accumulator the fragments are folded into
//! - **Merger**: runs the fixed-order merge pipeline and decides population
//! - **Scope Guard**: rejects searches made through an active ORM scope
//! - **Search Model**: class-level `search`/`facets`/`search_for_ids`/`search_count`
//! - **Relation**: the same operations, restricted to one owner
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use criteria_merge::{DocumentMatch, MockSearchExecutor, ModelDescriptor, SearchModel};
//! use criteria_types::{Fragment, SearchOptions};
//!
//! let executor = Arc::new(
//!     MockSearchExecutor::new().with_documents(vec![DocumentMatch::new("Article", 1)]),
//! );
//! let descriptor = ModelDescriptor::new("Article").with_default_scope_fn(|| {
//!     vec![Fragment::options(
//!         SearchOptions::new().with_option("order", "published_at desc"),
//!     )]
//! });
//! let articles = SearchModel::new(descriptor, executor);
//!
//! let mut search = articles
//!     .search(Some("ruby"), SearchOptions::new().with_class("Tag"))
//!     .unwrap();
//! assert_eq!(search.request().query(), "ruby");
//! assert_eq!(search.ids().unwrap(), vec![1]);
//! ```

pub mod executor;
pub mod guard;
pub mod merger;
pub mod model;
pub mod query;
pub mod relation;
pub mod request;
pub mod searchable;

pub use executor::{DocumentMatch, MockSearchExecutor, ResultSet, SearchExecutor};
pub use guard::{AmbientScope, AmbientScopeFlag, NoAmbientScope, ScopeGuard, ScopeInspector};
pub use merger::{MergePlan, Merger};
pub use model::{ModelDescriptor, ScopeResolver, DEFAULT_SCOPE_NAME};
pub use query::{CombineWith, QueryCombiner};
pub use relation::Relation;
pub use request::{FinalizedRequest, SearchKind, SearchRequest};
pub use searchable::{Search, SearchModel};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::executor::SearchExecutor;
    pub use crate::guard::AmbientScope;
    pub use crate::model::ModelDescriptor;
    pub use crate::searchable::{Search, SearchModel};
    pub use criteria_types::{ClassId, Fragment, SearchError, SearchOptions};
}
