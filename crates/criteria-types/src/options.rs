//! Search options with merge-aware well-known keys.
//!
//! Most keys follow last-fragment-wins. The exceptions are the target class
//! set and the excluded-id set, which are unioned, and the attribute filter
//! maps, which are merged key by key so that a default scope's filters and a
//! caller's filters both apply.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::class::ClassId;
use crate::error::SearchError;

/// Keys with a typed field on [`SearchOptions`]; never stored in `extra`.
pub const RESERVED_KEYS: &[&str] = &[
    "classes",
    "ignore_scopes",
    "populate",
    "ids_only",
    "without_ids",
    "conditions",
    "with",
    "without",
    "with_all",
    "without_all",
];

/// Document identifier as reported by the search backend.
pub type DocumentId = u64;

/// Options carried by a fragment and accumulated by a search request.
///
/// Keys the merger does not interpret are kept in [`SearchOptions::extra`]
/// and handed to the execution backend untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Target model classes (additive)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub classes: BTreeSet<ClassId>,

    /// Opt out of the ambient-scope guard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_scopes: Option<bool>,

    /// Execute eagerly at merge time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub populate: Option<bool>,

    /// Return identifiers without hydrating records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids_only: Option<bool>,

    /// Documents excluded from results (additive)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub without_ids: BTreeSet<DocumentId>,

    /// Field-scoped text conditions (merged per key)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub conditions: Map<String, Value>,

    /// Attribute filters that must match (merged per key)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub with: Map<String, Value>,

    /// Attribute filters that must not match (merged per key)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub without: Map<String, Value>,

    /// Multi-value filters requiring every value (merged per key)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub with_all: Map<String, Value>,

    /// Multi-value filters excluding every value (merged per key)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub without_all: Map<String, Value>,

    /// Backend tuning keys, opaque to the merger (last-wins)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: impl Into<ClassId>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn with_classes<I, C>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ClassId>,
    {
        self.classes.extend(classes.into_iter().map(Into::into));
        self
    }

    pub fn with_ignore_scopes(mut self, ignore: bool) -> Self {
        self.ignore_scopes = Some(ignore);
        self
    }

    pub fn with_populate(mut self, populate: bool) -> Self {
        self.populate = Some(populate);
        self
    }

    pub fn with_ids_only(mut self, ids_only: bool) -> Self {
        self.ids_only = Some(ids_only);
        self
    }

    pub fn without_id(mut self, id: DocumentId) -> Self {
        self.without_ids.insert(id);
        self
    }

    pub fn with_condition(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with.insert(attribute.into(), value.into());
        self
    }

    pub fn without_attribute(
        mut self,
        attribute: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.without.insert(attribute.into(), value.into());
        self
    }

    /// Set an option by key.
    ///
    /// Well-known keys land in their typed field with that field's merge
    /// rule. A value of the wrong shape for a well-known key is dropped; use
    /// [`SearchOptions::set_option`] to see the error.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let _ = self.set_option(key.into(), value.into());
        self
    }

    /// Set an option by key, failing on a mis-shaped well-known value.
    pub fn set_option(&mut self, key: String, value: Value) -> Result<(), SearchError> {
        if !is_reserved_key(&key) {
            self.extra.insert(key, value);
            return Ok(());
        }
        if value.is_null() {
            return Ok(());
        }

        let mut single = Map::new();
        single.insert(key.clone(), value);
        let typed: SearchOptions =
            serde_json::from_value(Value::Object(single)).map_err(|e| {
                SearchError::InvalidOption {
                    key,
                    message: e.to_string(),
                }
            })?;
        self.merge(&typed);
        Ok(())
    }

    /// Look up a passthrough option.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn ignores_scopes(&self) -> bool {
        self.ignore_scopes == Some(true)
    }

    pub fn wants_populate(&self) -> bool {
        self.populate == Some(true)
    }

    pub fn is_ids_only(&self) -> bool {
        self.ids_only == Some(true)
    }

    /// Fold `incoming` into these options.
    ///
    /// `None` flags and JSON `null` values leave the existing value alone.
    pub fn merge(&mut self, incoming: &SearchOptions) {
        self.classes.extend(incoming.classes.iter().cloned());
        self.without_ids.extend(incoming.without_ids.iter().copied());

        merge_flag(&mut self.ignore_scopes, incoming.ignore_scopes);
        merge_flag(&mut self.populate, incoming.populate);
        merge_flag(&mut self.ids_only, incoming.ids_only);

        merge_map(&mut self.conditions, &incoming.conditions);
        merge_map(&mut self.with, &incoming.with);
        merge_map(&mut self.without, &incoming.without);
        merge_map(&mut self.with_all, &incoming.with_all);
        merge_map(&mut self.without_all, &incoming.without_all);

        for (key, value) in &incoming.extra {
            if value.is_null() {
                continue;
            }
            let _ = self.set_option(key.clone(), value.clone());
        }
    }
}

/// Whether `key` names a typed field rather than a passthrough option.
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

fn merge_flag(existing: &mut Option<bool>, incoming: Option<bool>) {
    if incoming.is_some() {
        *existing = incoming;
    }
}

fn merge_map(existing: &mut Map<String, Value>, incoming: &Map<String, Value>) {
    for (key, value) in incoming {
        if value.is_null() {
            continue;
        }
        existing.insert(key.clone(), value.clone());
    }
}
