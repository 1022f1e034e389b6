//! Error types for `lightbox-core`.
//!
//! One enum carries the whole taxonomy so every layer (store backends, the
//! mutation gateway, the view composer, transport bindings) reports failures
//! in the same vocabulary. Transport layers map variants onto status codes;
//! nothing here retries automatically.

use thiserror::Error;
use uuid::Uuid;

use crate::photo::TagRect;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("photo not found: {0}")]
  PhotoNotFound(Uuid),

  #[error("comment not found: {0}")]
  CommentNotFound(Uuid),

  #[error("tag not found: {0}")]
  TagNotFound(Uuid),

  #[error("comment text is empty")]
  EmptyComment,

  #[error("tag rectangle outside the [0, 100] percent range: {0:?}")]
  InvalidRect(TagRect),

  #[error("required field is empty: {0}")]
  EmptyField(&'static str),

  #[error("only the author may delete comment {0}")]
  NotCommentAuthor(Uuid),

  #[error("only the owner may delete photo {0}")]
  NotPhotoOwner(Uuid),

  #[error("only the account holder may delete user {0}")]
  NotAccountOwner(Uuid),

  #[error("authentication required")]
  Unauthenticated,

  #[error("login name already taken: {0}")]
  LoginNameTaken(String),

  #[error("store unavailable: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a persistence-collaborator failure. The caller may retry the
  /// whole operation; the core never retries internally.
  pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
