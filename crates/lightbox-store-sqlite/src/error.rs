//! Error type for `lightbox-store-sqlite`.
//!
//! Backend-internal failures only (driver errors, corrupt column data).
//! Domain outcomes (not found, forbidden, invalid input) are expressed in
//! [`lightbox_core::Error`] directly; this type wraps into its `Store`
//! variant at the trait boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for lightbox_core::Error {
  fn from(err: Error) -> Self {
    lightbox_core::Error::store(err)
  }
}
