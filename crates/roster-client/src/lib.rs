//! Fetch pipeline for the Roster user directory.
//!
//! [`ApiClient`] performs the one remote read, [`fetch::load`] drives the
//! store's request status around it, and [`StoreHandle`] serialises mutations
//! from several callers through a single queue.

pub mod actor;
pub mod client;
pub mod error;
pub mod fetch;

pub use actor::StoreHandle;
pub use client::{ApiClient, ApiConfig};
pub use error::{Error, FetchError, Result};
pub use fetch::{CancelToken, LoadOutcome, LoadSink, UserSource, load};

#[cfg(test)]
mod tests;
