//! Query-term combination.
//!
//! When two fragments both carry text, the accumulated query and the new
//! term are combined by a [`QueryCombiner`]. The grammar belongs to the
//! search backend, so the combiner is pluggable per model.

use criteria_types::QueryJoin;

/// Combines an accumulated non-empty query with an incoming non-empty term.
pub trait QueryCombiner: Send + Sync {
    fn combine(&self, existing: &str, incoming: &str) -> String;
}

impl QueryCombiner for QueryJoin {
    fn combine(&self, existing: &str, incoming: &str) -> String {
        match self {
            QueryJoin::Space => format!("{} {}", existing, incoming),
            QueryJoin::And => format!("({}) ({})", existing, incoming),
            QueryJoin::Or => format!("({}) | ({})", existing, incoming),
        }
    }
}

/// Adapts a closure into a [`QueryCombiner`].
pub struct CombineWith<F>(pub F);

impl<F> QueryCombiner for CombineWith<F>
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn combine(&self, existing: &str, incoming: &str) -> String {
        (self.0)(existing, incoming)
    }
}
