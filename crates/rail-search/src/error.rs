use thiserror::Error;

/// Errors produced by `rail-search`.
///
/// Not reaching a goal is *not* an error; see
/// [`SearchOutcome::goal`](crate::SearchOutcome::goal).
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("edge weight {0} is negative or not a number")]
    InvalidWeight(f64),
}

pub type SearchResult<T> = Result<T, SearchError>;
