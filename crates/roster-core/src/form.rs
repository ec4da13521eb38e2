//! Add/edit form input: field metadata, validation, and conversion into the
//! store's inputs.
//!
//! The store never validates field content; callers run [`UserForm::validate`]
//! before handing the result to [`crate::store::UserStore::add`] or
//! [`crate::store::UserStore::update`].

use std::{fmt, sync::LazyLock};

use regex::Regex;
use strum::EnumIter;
use thiserror::Error;

use crate::user::{Company, CompanyDetails, NewUser, User};

// ─── Fields ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Field {
  Name,
  Email,
  Phone,
  Website,
  Company,
}

impl Field {
  pub fn label(self) -> &'static str {
    match self {
      Self::Name => "Full Name",
      Self::Email => "Email",
      Self::Phone => "Phone",
      Self::Website => "Website",
      Self::Company => "Company Name",
    }
  }

  pub fn placeholder(self) -> &'static str {
    match self {
      Self::Name => "John Doe",
      Self::Email => "john@example.com",
      Self::Phone => "+1-555-0100",
      Self::Website => "example.com",
      Self::Company => "Acme Corp",
    }
  }

  pub fn is_required(self) -> bool { matches!(self, Self::Name | Self::Email) }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
  #[error("Name is required.")]
  NameRequired,
  #[error("Email is required.")]
  EmailRequired,
  #[error("Please enter a valid email address.")]
  EmailInvalid,
}

/// Every problem found in one pass over a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
  pub name:  Option<FieldError>,
  pub email: Option<FieldError>,
}

impl ValidationErrors {
  pub fn is_empty(&self) -> bool { self.name.is_none() && self.email.is_none() }

  pub fn get(&self, field: Field) -> Option<FieldError> {
    match field {
      Field::Name => self.name,
      Field::Email => self.email,
      _ => None,
    }
  }

  /// Forget the error on `field`, e.g. once the user edits it.
  pub fn clear(&mut self, field: Field) {
    match field {
      Field::Name => self.name = None,
      Field::Email => self.email = None,
      _ => {}
    }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let messages: Vec<String> = [self.name, self.email]
      .into_iter()
      .flatten()
      .map(|e| e.to_string())
      .collect();
    f.write_str(&messages.join(" "))
  }
}

impl std::error::Error for ValidationErrors {}

// ─── UserForm ────────────────────────────────────────────────────────────────

/// Raw text of the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
  pub name:    String,
  pub email:   String,
  pub phone:   String,
  pub website: String,
  pub company: String,
}

impl UserForm {
  /// Pre-fill an edit form from an existing record.
  pub fn for_user(user: &User) -> Self {
    Self {
      name:    user.name.clone(),
      email:   user.email.clone(),
      phone:   user.phone.clone().unwrap_or_default(),
      website: user.website.clone().unwrap_or_default(),
      company: user.company_name().to_owned(),
    }
  }

  pub fn field(&self, field: Field) -> &str {
    match field {
      Field::Name => &self.name,
      Field::Email => &self.email,
      Field::Phone => &self.phone,
      Field::Website => &self.website,
      Field::Company => &self.company,
    }
  }

  pub fn field_mut(&mut self, field: Field) -> &mut String {
    match field {
      Field::Name => &mut self.name,
      Field::Email => &mut self.email,
      Field::Phone => &mut self.phone,
      Field::Website => &mut self.website,
      Field::Company => &mut self.company,
    }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if self.name.trim().is_empty() {
      errors.name = Some(FieldError::NameRequired);
    }

    let email = self.email.trim();
    if email.is_empty() {
      errors.email = Some(FieldError::EmailRequired);
    } else if !is_valid_email(email) {
      errors.email = Some(FieldError::EmailInvalid);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
  }

  /// Validate, then build the input for an add.
  pub fn submit_new(&self) -> crate::Result<NewUser> {
    self.validate()?;
    Ok(self.to_new_user())
  }

  /// Validate, then build the replacement for `user`.
  pub fn submit_edit(&self, user: &User) -> crate::Result<User> {
    self.validate()?;
    Ok(self.merge_into(user))
  }

  /// Input for [`crate::store::UserStore::add`].
  pub fn to_new_user(&self) -> NewUser {
    NewUser {
      name:    self.name.clone(),
      email:   self.email.clone(),
      phone:   non_blank(&self.phone),
      website: non_blank(&self.website),
      company: non_blank(&self.company),
    }
  }

  /// Full replacement record for [`crate::store::UserStore::update`].
  ///
  /// Fields the form does not cover are carried over from `user`. A structured
  /// company keeps its other parts and only takes the new name.
  pub fn merge_into(&self, user: &User) -> User {
    let company = match &user.company {
      Some(Company::Structured(details)) => {
        Some(Company::Structured(CompanyDetails {
          name: self.company.clone(),
          ..details.clone()
        }))
      }
      _ => non_blank(&self.company).map(Company::PlainName),
    };

    User {
      name: self.name.clone(),
      email: self.email.clone(),
      phone: non_blank(&self.phone),
      website: non_blank(&self.website),
      company,
      ..user.clone()
    }
  }
}

fn non_blank(value: &str) -> Option<String> {
  (!value.is_empty()).then(|| value.to_owned())
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
  static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex")
  });

  EMAIL.is_match(email)
}
