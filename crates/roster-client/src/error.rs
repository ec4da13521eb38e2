//! Error types for `roster-client`.

use thiserror::Error;

/// Why the remote read failed. The `Display` text is what ends up in
/// `StoreState::error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
  #[error("Failed to fetch users: {status_code} {status_text}")]
  Status {
    status_code: u16,
    status_text: String,
  },

  #[error("{0}")]
  Transport(String),

  #[error("Failed to read users: {0}")]
  Decode(String),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),

  #[error("store actor has stopped")]
  StoreClosed,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
