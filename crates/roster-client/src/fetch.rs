//! The fetch coordinator: one remote read, with the store's request status
//! driven around it.
//!
//! The read is the only suspension point. If the caller's context goes away
//! while it is in flight, the result is dropped instead of being written to
//! the store.

use std::{
  future::Future,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use roster_core::{Operation, User, UserStore, id::IdGenerator};
use tracing::{debug, info, warn};

use crate::error::FetchError;

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Where the user list comes from.
pub trait UserSource: Send + Sync {
  fn fetch_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, FetchError>> + Send + '_;
}

/// The subset of store operations the coordinator is allowed to call.
pub trait LoadSink {
  fn set_loading(&mut self, flag: bool);
  fn set_all(&mut self, users: Vec<User>);
  fn set_error(&mut self, message: String);
}

impl<G: IdGenerator> LoadSink for UserStore<G> {
  fn set_loading(&mut self, flag: bool) {
    self.dispatch(Operation::SetLoading(flag));
  }

  fn set_all(&mut self, users: Vec<User>) {
    self.dispatch(Operation::SetAll(users));
  }

  fn set_error(&mut self, message: String) {
    self.dispatch(Operation::SetError(message));
  }
}

// ─── Cancellation ────────────────────────────────────────────────────────────

/// Shared flag checked before a load commits its result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
  pub fn new() -> Self { Self::default() }

  pub fn cancel(&self) { self.0.store(true, Ordering::SeqCst); }

  pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::SeqCst) }

  /// A guard that cancels this token when dropped, tying the token to the
  /// lifetime of whatever holds the guard.
  pub fn guard(&self) -> CancelGuard { CancelGuard(self.clone()) }
}

#[derive(Debug)]
pub struct CancelGuard(CancelToken);

impl Drop for CancelGuard {
  fn drop(&mut self) { self.0.cancel(); }
}

// ─── Load ────────────────────────────────────────────────────────────────────

/// What a call to [`load`] did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
  /// `set_all` was called with this many users.
  Loaded(usize),
  /// `set_error` was called with this message.
  Failed(String),
  /// The token was cancelled while the read was in flight; the store was
  /// left in `loading`.
  Discarded,
}

/// Mark the store as loading, read from `source`, and commit the result unless
/// `token` was cancelled in the meantime.
pub async fn load<S, K>(source: &S, sink: &mut K, token: &CancelToken) -> LoadOutcome
where
  S: UserSource,
  K: LoadSink,
{
  sink.set_loading(true);

  let result = source.fetch_users().await;

  if token.is_cancelled() {
    debug!(ok = result.is_ok(), "load cancelled; discarding result");
    return LoadOutcome::Discarded;
  }

  match result {
    Ok(users) => {
      let count = users.len();
      info!(count, "users loaded");
      sink.set_all(users);
      LoadOutcome::Loaded(count)
    }
    Err(e) => {
      let message = e.to_string();
      warn!(error = %message, "loading users failed");
      sink.set_error(message.clone());
      LoadOutcome::Failed(message)
    }
  }
}
