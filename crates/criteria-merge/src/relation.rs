//! Search through a has-many style relation.
//!
//! A relation is itself a row-level restriction on the ORM side, so searches
//! made through it always pass `ignore_scopes` and instead pin the owner with
//! an attribute filter merged after the caller's criteria.

use serde_json::Value;

use criteria_types::{Fragment, SearchError, SearchOptions};

use crate::request::SearchKind;
use crate::searchable::{Search, SearchModel};

/// Related records of one owner, searchable through the owning key.
#[derive(Debug, Clone)]
pub struct Relation<'m> {
    model: &'m SearchModel,
    owner_key: String,
    owner_id: Value,
}

impl<'m> Relation<'m> {
    pub fn new(
        model: &'m SearchModel,
        owner_key: impl Into<String>,
        owner_id: impl Into<Value>,
    ) -> Self {
        Self {
            model,
            owner_key: owner_key.into(),
            owner_id: owner_id.into(),
        }
    }

    pub fn owner_key(&self) -> &str {
        &self.owner_key
    }

    pub fn owner_id(&self) -> &Value {
        &self.owner_id
    }

    pub fn search(
        &self,
        query: Option<&str>,
        options: SearchOptions,
    ) -> Result<Search, SearchError> {
        self.run(SearchKind::Records, query, options, false)
    }

    pub fn facets(
        &self,
        query: Option<&str>,
        options: SearchOptions,
    ) -> Result<Search, SearchError> {
        self.run(SearchKind::Facets, query, options, false)
    }

    pub fn search_for_ids(
        &self,
        query: Option<&str>,
        options: SearchOptions,
    ) -> Result<Search, SearchError> {
        self.run(SearchKind::Records, query, options, true)
    }

    pub fn search_count(
        &self,
        query: Option<&str>,
        options: SearchOptions,
    ) -> Result<u64, SearchError> {
        self.search_for_ids(query, options)?.total_entries()
    }

    fn owner_filter(&self) -> Fragment {
        Fragment::options(
            SearchOptions::new().with_attribute(self.owner_key.clone(), self.owner_id.clone()),
        )
    }

    fn run(
        &self,
        kind: SearchKind,
        query: Option<&str>,
        options: SearchOptions,
        ids_only: bool,
    ) -> Result<Search, SearchError> {
        let caller = Fragment::new(query, options.with_ignore_scopes(true));
        self.model
            .execute_plan(kind, vec![caller], vec![self.owner_filter()], ids_only)
    }
}

impl SearchModel {
    /// Records of this model belonging to `owner_id` through `owner_key`.
    pub fn related(
        &self,
        owner_key: impl Into<String>,
        owner_id: impl Into<Value>,
    ) -> Relation<'_> {
        Relation::new(self, owner_key, owner_id)
    }
}
