//! Id assignment for locally created records.

use crate::user::{User, UserId};

/// First id handed out by [`SequentialIds::default`]. Upstream ids sit well
/// below this.
pub const LOCAL_ID_SEED: UserId = 1000;

/// Strategy for assigning ids to new records.
///
/// The returned id must not appear in `existing`.
pub trait IdGenerator {
  fn next_id(&mut self, existing: &[User]) -> UserId;
}

/// Monotonically increasing counter that skips any id already taken.
#[derive(Debug, Clone)]
pub struct SequentialIds {
  next: UserId,
}

impl SequentialIds {
  pub fn starting_at(next: UserId) -> Self { Self { next } }
}

impl Default for SequentialIds {
  fn default() -> Self { Self::starting_at(LOCAL_ID_SEED) }
}

impl IdGenerator for SequentialIds {
  fn next_id(&mut self, existing: &[User]) -> UserId {
    loop {
      let candidate = self.next;
      self.next += 1;
      if !existing.iter().any(|u| u.id == candidate) {
        return candidate;
      }
    }
  }
}

impl<F> IdGenerator for F
where
  F: FnMut(&[User]) -> UserId,
{
  fn next_id(&mut self, existing: &[User]) -> UserId { self(existing) }
}
