//! A single-queue front for [`UserStore`] when more than one task mutates it.
//!
//! The store moves into a spawned task that applies commands strictly in
//! arrival order. Readers see the latest state through a `watch` channel.

use roster_core::{
  NewUser, Operation, StoreState, User, UserId, UserStore, id::IdGenerator,
};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use crate::{
  error::{Error, Result},
  fetch::LoadSink,
};

enum Command {
  Apply(Operation),
  Add(NewUser, oneshot::Sender<User>),
  Snapshot(oneshot::Sender<StoreState>),
}

/// Cloneable handle to a store running in its own task.
///
/// The task stops once every handle has been dropped.
#[derive(Debug, Clone)]
pub struct StoreHandle {
  tx:    mpsc::UnboundedSender<Command>,
  state: watch::Receiver<StoreState>,
}

impl StoreHandle {
  /// Move `store` into a new task. Must be called inside a tokio runtime.
  pub fn spawn<G>(store: UserStore<G>) -> Self
  where
    G: IdGenerator + Send + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(store.state().clone());
    tokio::spawn(run(store, rx, state_tx));
    Self {
      tx,
      state: state_rx,
    }
  }

  fn send(&self, command: Command) -> Result<()> {
    self.tx.send(command).map_err(|_| Error::StoreClosed)
  }

  pub fn set_loading(&self, flag: bool) -> Result<()> {
    self.send(Command::Apply(Operation::SetLoading(flag)))
  }

  pub fn set_error(&self, message: impl Into<String>) -> Result<()> {
    self.send(Command::Apply(Operation::SetError(message.into())))
  }

  pub fn set_all(&self, users: Vec<User>) -> Result<()> {
    self.send(Command::Apply(Operation::SetAll(users)))
  }

  pub fn update(&self, user: User) -> Result<()> {
    self.send(Command::Apply(Operation::Update(user)))
  }

  pub fn remove(&self, id: UserId) -> Result<()> {
    self.send(Command::Apply(Operation::Remove(id)))
  }

  /// Queue an add and wait for the materialised record.
  pub async fn add(&self, input: NewUser) -> Result<User> {
    let (reply, rx) = oneshot::channel();
    self.send(Command::Add(input, reply))?;
    rx.await.map_err(|_| Error::StoreClosed)
  }

  /// The state after every command queued before this call has been applied.
  pub async fn settled(&self) -> Result<StoreState> {
    let (reply, rx) = oneshot::channel();
    self.send(Command::Snapshot(reply))?;
    rx.await.map_err(|_| Error::StoreClosed)
  }

  /// The most recently published state, without waiting for queued commands.
  pub fn snapshot(&self) -> StoreState { self.state.borrow().clone() }

  pub fn find(&self, id: UserId) -> Option<User> {
    self.state.borrow().find(id).cloned()
  }

  /// Wait until the published state changes.
  pub async fn changed(&mut self) -> Result<()> {
    self.state.changed().await.map_err(|_| Error::StoreClosed)
  }
}

async fn run<G: IdGenerator>(
  mut store: UserStore<G>,
  mut rx: mpsc::UnboundedReceiver<Command>,
  state_tx: watch::Sender<StoreState>,
) {
  while let Some(command) = rx.recv().await {
    match command {
      Command::Apply(op) => {
        store.dispatch(op);
        state_tx.send_replace(store.state().clone());
      }
      Command::Add(input, reply) => {
        let user = store.add(input);
        state_tx.send_replace(store.state().clone());
        if reply.send(user).is_err() {
          debug!("add reply dropped by caller");
        }
      }
      Command::Snapshot(reply) => {
        // Nobody waiting is fine.
        let _ = reply.send(store.state().clone());
      }
    }
  }
  debug!("store queue closed");
}

impl LoadSink for StoreHandle {
  fn set_loading(&mut self, flag: bool) {
    if let Err(e) = StoreHandle::set_loading(self, flag) {
      warn!(%e, "dropping set_loading");
    }
  }

  fn set_all(&mut self, users: Vec<User>) {
    if let Err(e) = StoreHandle::set_all(self, users) {
      warn!(%e, "dropping set_all");
    }
  }

  fn set_error(&mut self, message: String) {
    if let Err(e) = StoreHandle::set_error(self, message) {
      warn!(%e, "dropping set_error");
    }
  }
}
