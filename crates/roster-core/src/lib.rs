//! Core types for the Roster user directory.
//!
//! This crate holds the canonical user collection and everything derived from
//! it: the entity store, the view projector and form handling. HTTP and the
//! async runtime stay out of it; the fetch pipeline lives in `roster-client`.

pub mod error;
pub mod form;
pub mod id;
pub mod store;
pub mod user;
pub mod view;

pub use error::{Error, Result};
pub use store::{Operation, RequestStatus, StoreState, UserStore, reduce};
pub use user::{NewUser, User, UserId};
