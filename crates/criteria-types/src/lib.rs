//! # criteria-types
//!
//! Shared value types for the scoped-search criteria engine.
//!
//! This crate defines the data that flows through a merge:
//! - Class identifiers: which model classes a search targets
//! - Search options: well-known merge-aware keys plus a passthrough map
//! - Fragments: immutable partial search criteria
//! - Settings: layered configuration for the merge engine
//!
//! ## Usage
//!
//! ```rust
//! use criteria_types::{ClassId, Fragment, SearchOptions};
//!
//! let fragment = Fragment::new(
//!     Some("ruby"),
//!     SearchOptions::new().with_class(ClassId::new("Tag")),
//! );
//! assert_eq!(fragment.query_term(), Some("ruby"));
//! ```

pub mod class;
pub mod config;
pub mod error;
pub mod fragment;
pub mod options;

pub use class::ClassId;
pub use config::{QueryJoin, SearchSettings};
pub use error::{ExecutionError, MixedScopesError, SearchError};
pub use fragment::Fragment;
pub use options::{DocumentId, SearchOptions, RESERVED_KEYS};
