//! The view projector: a pure filter + sort over the store's users.
//!
//! Nothing here owns state. [`ViewState`] is held by the caller and passed in
//! on every render.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::Deserialize;
use strum::{EnumIter, IntoStaticStr};

use crate::{Error, user::User};

// ─── Sort parameters ─────────────────────────────────────────────────────────

/// The column a listing is sorted by.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortKey {
  #[default]
  Name,
  Email,
  Company,
}

impl SortKey {
  /// The string a record is compared by, before lower-casing.
  fn value(self, user: &User) -> &str {
    match self {
      Self::Name => &user.name,
      Self::Email => &user.email,
      Self::Company => user.company_name(),
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Name => "Name",
      Self::Email => "Email",
      Self::Company => "Company",
    }
  }
}

impl fmt::Display for SortKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name: &'static str = (*self).into();
    f.write_str(name)
  }
}

impl FromStr for SortKey {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "name" => Ok(Self::Name),
      "email" => Ok(Self::Email),
      "company" => Ok(Self::Company),
      _ => Err(Error::UnknownSortKey(s.to_owned())),
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
  #[default]
  #[serde(alias = "asc")]
  Ascending,
  #[serde(alias = "desc")]
  Descending,
}

impl SortDirection {
  pub fn flipped(self) -> Self {
    match self {
      Self::Ascending => Self::Descending,
      Self::Descending => Self::Ascending,
    }
  }

  fn apply(self, ordering: Ordering) -> Ordering {
    match self {
      Self::Ascending => ordering,
      Self::Descending => ordering.reverse(),
    }
  }
}

impl fmt::Display for SortDirection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name: &'static str = (*self).into();
    f.write_str(name)
  }
}

impl FromStr for SortDirection {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "asc" | "ascending" => Ok(Self::Ascending),
      "desc" | "descending" => Ok(Self::Descending),
      _ => Err(Error::UnknownSortDirection(s.to_owned())),
    }
  }
}

// ─── ViewState ───────────────────────────────────────────────────────────────

/// Search and sort parameters owned by whoever renders the listing. Has no
/// effect on the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
  pub query:     String,
  pub sort_key:  SortKey,
  pub direction: SortDirection,
}

impl ViewState {
  /// Column-header behaviour: picking the active key flips the direction,
  /// picking another key switches to it ascending.
  pub fn sort_by(&mut self, key: SortKey) {
    if self.sort_key == key {
      self.direction = self.direction.flipped();
    } else {
      self.sort_key = key;
      self.direction = SortDirection::Ascending;
    }
  }

  /// [`project`] with these parameters.
  pub fn project<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
    project(users, &self.query, self.sort_key, self.direction)
  }
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// Filter `users` by `query` and sort by `key` in `direction`.
///
/// The query is trimmed and matched case-insensitively as a substring of the
/// name or the email; a blank query keeps everything. Sorting compares the
/// lower-cased key value, treats a missing company as `""`, and is stable in
/// both directions.
pub fn project<'a>(
  users: &'a [User],
  query: &str,
  key: SortKey,
  direction: SortDirection,
) -> Vec<&'a User> {
  let needle = query.trim().to_lowercase();

  let mut rows: Vec<(String, &User)> = users
    .iter()
    .filter(|u| matches_query(u, &needle))
    .map(|u| (key.value(u).to_lowercase(), u))
    .collect();

  rows.sort_by(|(a, _), (b, _)| direction.apply(a.cmp(b)));
  rows.into_iter().map(|(_, u)| u).collect()
}

fn matches_query(user: &User, needle: &str) -> bool {
  needle.is_empty()
    || user.name.to_lowercase().contains(needle)
    || user.email.to_lowercase().contains(needle)
}

/// Why a projection came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
  /// There is nothing in the store at all.
  NoUsers,
  /// The store has users but the query excludes all of them.
  NoMatches,
}

impl EmptyState {
  /// `None` when there is something to show.
  pub fn classify(total: usize, shown: usize) -> Option<Self> {
    match (total, shown) {
      (0, _) => Some(Self::NoUsers),
      (_, 0) => Some(Self::NoMatches),
      _ => None,
    }
  }
}
