//! Model descriptors: the class identity plus its search scopes.
//!
//! A scope is a resolver returning one or more fragments. The default scope,
//! when declared, names one registered scope and is resolved with no
//! arguments at the start of every search on the model.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use criteria_types::{ClassId, Fragment, SearchError};

/// Resolves positional scope arguments into fragments.
pub type ScopeResolver = Arc<dyn Fn(&[Value]) -> Vec<Fragment> + Send + Sync>;

/// Name the default scope is registered under by [`ModelDescriptor::with_default_scope_fn`].
pub const DEFAULT_SCOPE_NAME: &str = "default";

/// Static search configuration of one model class.
#[derive(Clone)]
pub struct ModelDescriptor {
    class: ClassId,
    scopes: BTreeMap<String, ScopeResolver>,
    default_scope: Option<String>,
}

impl ModelDescriptor {
    pub fn new(class: impl Into<ClassId>) -> Self {
        Self {
            class: class.into(),
            scopes: BTreeMap::new(),
            default_scope: None,
        }
    }

    /// Register a named scope.
    pub fn with_scope<F>(mut self, name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&[Value]) -> Vec<Fragment> + Send + Sync + 'static,
    {
        self.scopes.insert(name.into(), Arc::new(resolver));
        self
    }

    /// Declare a registered scope as the default scope.
    pub fn with_default_scope(mut self, name: &str) -> Result<Self, SearchError> {
        if !self.scopes.contains_key(name) {
            return Err(SearchError::UnknownScope(name.to_string()));
        }
        self.default_scope = Some(name.to_string());
        Ok(self)
    }

    /// Register a zero-argument resolver and make it the default scope.
    pub fn with_default_scope_fn<F>(mut self, resolver: F) -> Self
    where
        F: Fn() -> Vec<Fragment> + Send + Sync + 'static,
    {
        self.scopes.insert(
            DEFAULT_SCOPE_NAME.to_string(),
            Arc::new(move |_args: &[Value]| resolver()),
        );
        self.default_scope = Some(DEFAULT_SCOPE_NAME.to_string());
        self
    }

    pub fn class(&self) -> &ClassId {
        &self.class
    }

    pub fn has_default_scope(&self) -> bool {
        self.default_scope.is_some()
    }

    /// Resolve the default scope, or `None` when the model declares none.
    pub fn default_scope_fragments(&self) -> Option<Vec<Fragment>> {
        let name = self.default_scope.as_deref()?;
        self.scopes.get(name).map(|resolver| resolver(&[]))
    }

    /// Resolve a named scope with positional arguments.
    pub fn resolve_scope(&self, name: &str, args: &[Value]) -> Result<Vec<Fragment>, SearchError> {
        self.scopes
            .get(name)
            .map(|resolver| resolver(args))
            .ok_or_else(|| SearchError::UnknownScope(name.to_string()))
    }

    pub fn scope_names(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(String::as_str)
    }
}

impl fmt::Debug for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDescriptor")
            .field("class", &self.class)
            .field("scopes", &self.scopes.keys().collect::<Vec<_>>())
            .field("default_scope", &self.default_scope)
            .finish()
    }
}
