//! Configuration loading for scoped-search.
//!
//! Layered config: defaults -> user config file -> explicit config file -> env vars.
//! The user config file lives at `<config dir>/scoped-search/config.{toml,yaml,json}`.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::SearchError;

/// How two non-empty query terms from different fragments are combined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum QueryJoin {
    /// Plain space join: `a b` (default)
    #[default]
    Space,
    /// Grouped implicit AND: `(a) (b)`
    And,
    /// Grouped OR: `(a) | (b)`
    Or,
}

impl QueryJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryJoin::Space => "space",
            QueryJoin::And => "and",
            QueryJoin::Or => "or",
        }
    }

    /// Parse from string, returning None for unknown joins.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "space" => Some(QueryJoin::Space),
            "and" => Some(QueryJoin::And),
            "or" => Some(QueryJoin::Or),
            _ => None,
        }
    }
}

impl std::str::FromStr for QueryJoin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown query join: {}", s))
    }
}

impl TryFrom<String> for QueryJoin {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Engine settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchSettings {
    /// Strategy for combining query terms across fragments
    #[serde(default)]
    pub query_join: QueryJoin,
}

impl SearchSettings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. User config file (optional)
    /// 3. Explicit config file (required when given)
    /// 4. Environment variables (SCOPED_SEARCH_*)
    pub fn load(config_path: Option<&str>) -> Result<Self, SearchError> {
        let config_dir = ProjectDirs::from("", "", "scoped-search")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("query_join", QueryJoin::default().as_str())
            .map_err(|e| SearchError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: SCOPED_SEARCH_QUERY_JOIN
        builder = builder.add_source(
            Environment::with_prefix("SCOPED_SEARCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| SearchError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = SearchSettings::default();
        assert_eq!(settings.query_join, QueryJoin::Space);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("scoped-search.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "query_join = \"or\"").unwrap();

        let settings = SearchSettings::load(Some(&path.to_string_lossy())).unwrap();
        assert_eq!(settings.query_join, QueryJoin::Or);
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");

        let err = SearchSettings::load(Some(&path.to_string_lossy())).unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn test_unknown_join_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "query_join = \"xor\"\n").unwrap();

        let err = SearchSettings::load(Some(&path.to_string_lossy())).unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn test_config_file_join_is_case_insensitive() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("upper.toml");
        std::fs::write(&path, "query_join = \"AND\"\n").unwrap();

        let settings = SearchSettings::load(Some(&path.to_string_lossy())).unwrap();
        assert_eq!(settings.query_join, QueryJoin::And);

        let json: SearchSettings = serde_json::from_str(r#"{"query_join":"Or"}"#).unwrap();
        assert_eq!(json.query_join, QueryJoin::Or);
    }

    #[test]
    fn test_query_join_parse() {
        assert_eq!("AND".parse::<QueryJoin>().unwrap(), QueryJoin::And);
        assert_eq!(QueryJoin::parse("space"), Some(QueryJoin::Space));
        assert!("xor".parse::<QueryJoin>().is_err());
    }

    #[test]
    fn test_settings_serialization() {
        let settings = SearchSettings {
            query_join: QueryJoin::And,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"query_join":"and"}"#);
    }
}
