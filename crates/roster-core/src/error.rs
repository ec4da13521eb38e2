//! Error types for `roster-core`.

use thiserror::Error;

use crate::form::ValidationErrors;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid form input: {0}")]
  Validation(#[from] ValidationErrors),

  #[error("unknown sort key: {0:?}")]
  UnknownSortKey(String),

  #[error("unknown sort direction: {0:?}")]
  UnknownSortDirection(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
