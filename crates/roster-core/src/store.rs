//! The entity store: the single owner and sole writer of the user collection.
//!
//! Every change goes through [`reduce`], a pure transition
//! `(StoreState, Operation) -> StoreState`. [`UserStore`] wraps the state
//! together with the id generator and is what callers hold.

use tracing::debug;

use crate::{
  id::{IdGenerator, SequentialIds},
  user::{NewUser, User, UserId},
};

// ─── State ───────────────────────────────────────────────────────────────────

/// Canonical collection plus request status.
///
/// `loading` and `error` are never both set. `id` is unique across `users`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
  /// Insertion/display order, not sorted.
  pub users:   Vec<User>,
  pub loading: bool,
  pub error:   Option<String>,
}

/// Where the store is in its request lifecycle, derived from [`StoreState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
  Idle,
  Loading,
  Loaded,
  Errored,
}

impl StoreState {
  pub fn status(&self) -> RequestStatus {
    if self.loading {
      RequestStatus::Loading
    } else if self.error.is_some() {
      RequestStatus::Errored
    } else if self.users.is_empty() {
      RequestStatus::Idle
    } else {
      RequestStatus::Loaded
    }
  }

  /// Deterministic lookup by id.
  pub fn find(&self, id: UserId) -> Option<&User> {
    self.users.iter().find(|u| u.id == id)
  }
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// The only legal ways to change a [`StoreState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
  SetAll(Vec<User>),
  SetLoading(bool),
  SetError(String),
  /// Prepend an already-materialised record. Id uniqueness is the caller's
  /// responsibility; [`UserStore::add`] guarantees it.
  Add(User),
  /// Wholesale replacement of the entry with the same id.
  Update(User),
  Remove(UserId),
}

impl Operation {
  fn name(&self) -> &'static str {
    match self {
      Self::SetAll(_) => "set_all",
      Self::SetLoading(_) => "set_loading",
      Self::SetError(_) => "set_error",
      Self::Add(_) => "add",
      Self::Update(_) => "update",
      Self::Remove(_) => "remove",
    }
  }
}

/// Apply one operation. Unknown ids in `Update`/`Remove` are silent no-ops.
pub fn reduce(mut state: StoreState, op: Operation) -> StoreState {
  debug!(op = op.name(), users = state.users.len(), "applying store operation");
  match op {
    Operation::SetLoading(flag) => {
      state.loading = flag;
      state.error = None;
    }
    Operation::SetError(message) => {
      state.loading = false;
      state.error = Some(message);
    }
    Operation::SetAll(users) => {
      state.users = users;
      state.loading = false;
      state.error = None;
    }
    Operation::Add(user) => {
      state.users.insert(0, user);
    }
    Operation::Update(user) => {
      if let Some(slot) = state.users.iter_mut().find(|u| u.id == user.id) {
        *slot = user;
      }
    }
    Operation::Remove(id) => {
      state.users.retain(|u| u.id != id);
    }
  }
  state
}

// ─── UserStore ───────────────────────────────────────────────────────────────

/// The entity store. Holds the state and the id strategy used by [`add`].
///
/// [`add`]: UserStore::add
#[derive(Debug, Clone, Default)]
pub struct UserStore<G = SequentialIds> {
  state: StoreState,
  ids:   G,
}

impl UserStore<SequentialIds> {
  pub fn new() -> Self { Self::default() }
}

impl<G: IdGenerator> UserStore<G> {
  /// Create an empty store that assigns ids with `ids`.
  pub fn with_ids(ids: G) -> Self {
    Self {
      state: StoreState::default(),
      ids,
    }
  }

  /// Current snapshot.
  pub fn state(&self) -> &StoreState { &self.state }

  pub fn users(&self) -> &[User] { &self.state.users }

  pub fn find(&self, id: UserId) -> Option<&User> { self.state.find(id) }

  /// Run `op` through [`reduce`].
  pub fn dispatch(&mut self, op: Operation) {
    let state = std::mem::take(&mut self.state);
    self.state = reduce(state, op);
  }

  pub fn set_loading(&mut self, flag: bool) {
    self.dispatch(Operation::SetLoading(flag));
  }

  pub fn set_error(&mut self, message: impl Into<String>) {
    self.dispatch(Operation::SetError(message.into()));
  }

  /// Replace the collection verbatim, order preserved.
  pub fn set_all(&mut self, users: Vec<User>) {
    self.dispatch(Operation::SetAll(users));
  }

  /// Materialise `input` under a fresh id, put it first, and return it.
  pub fn add(&mut self, input: NewUser) -> User {
    let id = self.ids.next_id(&self.state.users);
    debug_assert!(
      self.find(id).is_none(),
      "id generator returned taken id {id}"
    );
    let user = input.materialize(id);
    self.dispatch(Operation::Add(user.clone()));
    user
  }

  /// Replace the entry whose id matches `user.id`; no-op if there is none.
  pub fn update(&mut self, user: User) {
    self.dispatch(Operation::Update(user));
  }

  /// Remove the entry with `id`; no-op if there is none.
  pub fn remove(&mut self, id: UserId) {
    self.dispatch(Operation::Remove(id));
  }
}
