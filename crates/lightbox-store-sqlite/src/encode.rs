//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Tag rectangle values are REAL columns;
//! IEEE-754 doubles survive that round-trip bit-exactly.

use chrono::{DateTime, Utc};
use lightbox_core::{
  photo::{Comment, Photo, Tag, TagRect},
  user::{User, UserSummary},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub login_name:    String,
  pub password_hash: String,
  pub first_name:    String,
  pub last_name:     String,
  pub location:      Option<String>,
  pub description:   Option<String>,
  pub occupation:    Option<String>,
  pub created_at:    String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      login_name:    self.login_name,
      password_hash: self.password_hash,
      first_name:    self.first_name,
      last_name:     self.last_name,
      location:      self.location,
      description:   self.description,
      occupation:    self.occupation,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings for the public summary projection.
pub struct RawUserSummary {
  pub user_id:    String,
  pub first_name: String,
  pub last_name:  String,
}

impl RawUserSummary {
  pub fn into_summary(self) -> Result<UserSummary> {
    Ok(UserSummary {
      user_id:    decode_uuid(&self.user_id)?,
      first_name: self.first_name,
      last_name:  self.last_name,
    })
  }
}

/// Raw strings read directly from a `photos` row. Sub-collections are
/// loaded by the store and attached in [`decode_photo`].
pub struct RawPhoto {
  pub photo_id:   String,
  pub owner_id:   String,
  pub file_name:  String,
  pub created_at: String,
}

impl RawPhoto {
  pub fn into_photo(
    self,
    comments: Vec<Comment>,
    tags: Vec<Tag>,
    likers: Vec<Uuid>,
  ) -> Result<Photo> {
    Ok(Photo {
      photo_id:   decode_uuid(&self.photo_id)?,
      owner:      decode_uuid(&self.owner_id)?,
      file_name:  self.file_name,
      created_at: decode_dt(&self.created_at)?,
      comments,
      tags,
      likers,
    })
  }
}

/// Raw strings read directly from a `comments` row.
pub struct RawComment {
  pub comment_id: String,
  pub author_id:  String,
  pub body:       String,
  pub created_at: String,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      author:     decode_uuid(&self.author_id)?,
      text:       self.body,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings and reals read directly from a `tags` row.
pub struct RawTag {
  pub tag_id:     String,
  pub user_id:    String,
  pub x:          f64,
  pub y:          f64,
  pub width:      f64,
  pub height:     f64,
  pub created_at: String,
}

impl RawTag {
  pub fn into_tag(self) -> Result<Tag> {
    Ok(Tag {
      tag_id:     decode_uuid(&self.tag_id)?,
      user:       decode_uuid(&self.user_id)?,
      rect:       TagRect {
        x:      self.x,
        y:      self.y,
        width:  self.width,
        height: self.height,
      },
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Everything a photo row drags along: the row itself plus its ordered
/// comments, ordered tags, and liker ids.
pub type RawPhotoBundle = (RawPhoto, Vec<RawComment>, Vec<RawTag>, Vec<String>);

/// Decode a bundle into a full aggregate.
pub fn decode_photo(bundle: RawPhotoBundle) -> Result<Photo> {
  let (raw, comments, tags, likers) = bundle;

  let comments = comments
    .into_iter()
    .map(RawComment::into_comment)
    .collect::<Result<Vec<_>>>()?;
  let tags = tags
    .into_iter()
    .map(RawTag::into_tag)
    .collect::<Result<Vec<_>>>()?;
  let likers = likers
    .iter()
    .map(|s| decode_uuid(s))
    .collect::<Result<Vec<_>>>()?;

  raw.into_photo(comments, tags, likers)
}
