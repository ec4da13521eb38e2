//! User records, the entities held by the store.
//!
//! Records arrive from the upstream `/users` endpoint in JSON and are trusted
//! as-is. Records created locally go through [`NewUser::materialize`], which
//! fills in the fields the upstream would otherwise have supplied.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Primary key for every lookup and mutation.
pub type UserId = u64;

/// Shown in place of optional fields that were left blank.
pub const PLACEHOLDER: &str = "—";

// ─── Company ─────────────────────────────────────────────────────────────────

/// The structured company shape served by the upstream source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
  #[serde(default)]
  pub name:         String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub catch_phrase: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bs:           Option<String>,
}

/// A company is either a bare name or a structured object; both are accepted
/// when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Company {
  PlainName(String),
  Structured(CompanyDetails),
}

impl Company {
  /// The display name regardless of shape.
  pub fn display_name(&self) -> &str {
    match self {
      Self::PlainName(name) => name,
      Self::Structured(details) => &details.name,
    }
  }

  pub fn details(&self) -> Option<&CompanyDetails> {
    match self {
      Self::PlainName(_) => None,
      Self::Structured(details) => Some(details),
    }
  }
}

// ─── Address ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geo {
  #[serde(default)]
  pub lat: String,
  #[serde(default)]
  pub lng: String,
}

/// A postal address; every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub street:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub suite:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub city:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub zipcode: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub geo:     Option<Geo>,
}

impl Address {
  /// Whether there is anything worth showing in an address section.
  pub fn is_empty(&self) -> bool {
    self.street.as_deref().is_none_or(str::is_empty)
      && self.city.as_deref().is_none_or(str::is_empty)
  }
}

// ─── User ────────────────────────────────────────────────────────────────────

/// A single directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:       UserId,
  #[serde(default)]
  pub name:     String,
  #[serde(default)]
  pub email:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub website:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub company:  Option<Company>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:  Option<Address>,
  /// Set only on records created locally in this session. Never read from or
  /// written to the wire.
  #[serde(skip)]
  pub is_new:   bool,
}

impl User {
  /// Company display name, or `""` when there is no company.
  pub fn company_name(&self) -> &str {
    self.company.as_ref().map(Company::display_name).unwrap_or_default()
  }

  /// Up to two upper-cased initials taken from the name.
  pub fn initials(&self) -> String {
    self
      .name
      .split_whitespace()
      .take(2)
      .filter_map(|word| word.chars().next())
      .flat_map(char::to_uppercase)
      .collect()
  }
}

// ─── NewUser ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::UserStore::add`]. The id is always assigned by the
/// store; it is not accepted from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
  pub name:    String,
  pub email:   String,
  pub phone:   Option<String>,
  pub website: Option<String>,
  pub company: Option<String>,
}

impl NewUser {
  /// Convenience constructor with all optional fields left blank.
  pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      email: email.into(),
      ..Self::default()
    }
  }

  /// Build the stored record under `id`: placeholders for blank optional
  /// fields, a username derived from the name, and the `is_new` marker.
  pub fn materialize(self, id: UserId) -> User {
    let username = derive_username(&self.name);
    User {
      id,
      name: self.name,
      email: self.email,
      username: Some(username),
      phone: Some(or_placeholder(self.phone)),
      website: Some(or_placeholder(self.website)),
      company: Some(Company::Structured(CompanyDetails {
        name: or_placeholder(self.company),
        ..CompanyDetails::default()
      })),
      address: None,
      is_new: true,
    }
  }
}

/// Lower-case the name and replace every run of whitespace with a single `.`.
pub fn derive_username(name: &str) -> String {
  static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

  WHITESPACE.replace_all(&name.to_lowercase(), ".").into_owned()
}

fn or_placeholder(value: Option<String>) -> String {
  value
    .filter(|v| !v.is_empty())
    .unwrap_or_else(|| PLACEHOLDER.to_owned())
}
