//! Criteria fragments.
//!
//! A fragment is one partial set of search criteria: an optional free-text
//! term, a set of options, or both. Fragments are immutable; merging reads
//! them and only ever mutates the accumulating request.

use serde::{Deserialize, Serialize};

use crate::options::SearchOptions;

/// One immutable partial set of search criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    term: Option<String>,
    #[serde(default)]
    options: SearchOptions,
}

impl Fragment {
    pub fn new(term: Option<&str>, options: SearchOptions) -> Self {
        Self {
            term: term.map(str::to_string),
            options,
        }
    }

    /// A fragment that introduces text only.
    pub fn term(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            options: SearchOptions::default(),
        }
    }

    /// A fragment that introduces options only.
    pub fn options(options: SearchOptions) -> Self {
        Self {
            term: None,
            options,
        }
    }

    /// The term, if one was supplied. Blank terms are reported as absent.
    pub fn query_term(&self) -> Option<&str> {
        self.term.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn search_options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.query_term().is_none() && self.options == SearchOptions::default()
    }
}

impl From<&str> for Fragment {
    fn from(term: &str) -> Self {
        Self::term(term)
    }
}

impl From<SearchOptions> for Fragment {
    fn from(options: SearchOptions) -> Self {
        Self::options(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_term_is_absent() {
        assert_eq!(Fragment::term("   ").query_term(), None);
        assert!(Fragment::term("").is_empty());
        assert_eq!(Fragment::term("ruby").query_term(), Some("ruby"));
    }

    #[test]
    fn test_options_only_fragment() {
        let fragment = Fragment::from(SearchOptions::new().with_populate(true));
        assert_eq!(fragment.query_term(), None);
        assert!(fragment.search_options().wants_populate());
        assert!(!fragment.is_empty());
    }

    #[test]
    fn test_deserialize_scope_fragment() {
        let fragment: Fragment = serde_json::from_value(json!({
            "options": {"order": "published_at desc"}
        }))
        .unwrap();

        assert_eq!(fragment.query_term(), None);
        assert_eq!(
            fragment.search_options().option("order"),
            Some(&json!("published_at desc"))
        );
    }
}
