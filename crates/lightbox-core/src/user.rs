//! User directory records.
//!
//! The directory is a flat account registry. Photos reference users only by
//! id; read responses resolve those references through [`crate::view`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{Error, Result};

/// A registered account.
///
/// `password_hash` is an Argon2id PHC string. The record itself never
/// serializes; responses go through [`UserSummary`] or
/// [`crate::view::UserDetail`], so the hash stays server-side.
#[derive(Debug, Clone)]
pub struct User {
  pub user_id:       Uuid,
  pub login_name:    String,
  pub password_hash: String,
  pub first_name:    String,
  pub last_name:     String,
  pub location:      Option<String>,
  pub description:   Option<String>,
  pub occupation:    Option<String>,
  pub created_at:    DateTime<Utc>,
}

/// Registration input; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub login_name:    String,
  pub password_hash: String,
  pub first_name:    String,
  pub last_name:     String,
  pub location:      Option<String>,
  pub description:   Option<String>,
  pub occupation:    Option<String>,
}

impl NewUser {
  /// Required fields must be non-empty after trimming. The raw password is
  /// checked by the transport layer before hashing.
  pub fn validate(&self) -> Result<()> {
    for (name, value) in [
      ("login_name", &self.login_name),
      ("first_name", &self.first_name),
      ("last_name", &self.last_name),
    ] {
      if value.trim().is_empty() {
        return Err(Error::EmptyField(name));
      }
    }
    Ok(())
  }
}

/// Minimal public projection of a directory record; the shape attached to
/// comments and tags by the view composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
  pub user_id:    Uuid,
  pub first_name: String,
  pub last_name:  String,
}
