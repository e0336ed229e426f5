//! Ambient scope guard.
//!
//! The search backend cannot honour a row-filtering scope that is active on
//! the ORM side. Searching from inside one is rejected unless the caller
//! opts out explicitly with `ignore_scopes`.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use criteria_types::{ClassId, MixedScopesError, SearchOptions};

/// Read-only view of the ORM's scoping state.
pub trait AmbientScope: Send + Sync {
    /// Is a restrictive scope currently active for `class`?
    fn is_active(&self, class: &ClassId) -> bool;
}

/// Inspector for callers without any ORM scoping.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAmbientScope;

impl AmbientScope for NoAmbientScope {
    fn is_active(&self, _class: &ClassId) -> bool {
        false
    }
}

/// Toggleable flag, for hosts that track scoping with a single switch.
#[derive(Debug, Default)]
pub struct AmbientScopeFlag {
    active: AtomicBool,
}

impl AmbientScopeFlag {
    pub fn new(active: bool) -> Self {
        Self {
            active: AtomicBool::new(active),
        }
    }

    pub fn activate(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    pub fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

impl AmbientScope for AmbientScopeFlag {
    fn is_active(&self, _class: &ClassId) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Per-class predicate.
pub struct ScopeInspector<F>(pub F);

impl<F> AmbientScope for ScopeInspector<F>
where
    F: Fn(&ClassId) -> bool + Send + Sync,
{
    fn is_active(&self, class: &ClassId) -> bool {
        (self.0)(class)
    }
}

/// Stateless policy check run between the caller's fragment and class pinning.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeGuard;

impl ScopeGuard {
    /// Reject when an ambient scope is active and `ignore_scopes` is not set.
    pub fn check(
        ambient_scope_active: bool,
        class: &ClassId,
        options: &SearchOptions,
    ) -> Result<(), MixedScopesError> {
        if ambient_scope_active && !options.ignores_scopes() {
            warn!(class = %class, "Search attempted through an active ORM scope");
            return Err(MixedScopesError {
                class: class.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> ClassId {
        ClassId::new("Article")
    }

    #[test]
    fn test_no_ambient_scope_passes() {
        assert!(ScopeGuard::check(false, &article(), &SearchOptions::new()).is_ok());
    }

    #[test]
    fn test_ambient_scope_rejects() {
        let err = ScopeGuard::check(true, &article(), &SearchOptions::new()).unwrap_err();
        assert_eq!(err.class, article());
    }

    #[test]
    fn test_ignore_scopes_opts_out() {
        let options = SearchOptions::new().with_ignore_scopes(true);
        assert!(ScopeGuard::check(true, &article(), &options).is_ok());
    }

    #[test]
    fn test_explicit_false_still_rejects() {
        let options = SearchOptions::new().with_ignore_scopes(false);
        assert!(ScopeGuard::check(true, &article(), &options).is_err());
    }

    #[test]
    fn test_scope_flag_toggles() {
        let flag = AmbientScopeFlag::default();
        assert!(!flag.is_active(&article()));
        flag.activate();
        assert!(flag.is_active(&article()));
        flag.deactivate();
        assert!(!flag.is_active(&article()));
    }

    #[test]
    fn test_per_class_inspector() {
        let inspector = ScopeInspector(|class: &ClassId| class.as_str() == "Article");
        assert!(inspector.is_active(&article()));
        assert!(!inspector.is_active(&ClassId::new("Tag")));
        assert!(!NoAmbientScope.is_active(&article()));
    }
}
