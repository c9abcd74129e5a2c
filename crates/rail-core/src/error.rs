//! Error type for the core value types.

use thiserror::Error;

/// Errors from parsing or constructing `rail-core` values.
#[derive(Debug, Error)]
pub enum RailError {
    #[error("parse error: {0}")]
    Parse(String),
}
