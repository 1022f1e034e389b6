//! Photo aggregates and their owned sub-entities.
//!
//! A photo exclusively owns its comments, tags, and liker set; all of them
//! are mutated only through the photo. Comments keep insertion order for
//! chronological display. The liker set holds each user id at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A normalized tag rectangle.
///
/// Each value is a percentage of the photo's displayed dimensions at
/// tagging time, in `[0, 100]`. This is the only shape a tag rectangle
/// takes on the wire or in the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TagRect {
  pub x:      f64,
  pub y:      f64,
  pub width:  f64,
  pub height: f64,
}

impl TagRect {
  /// All four values finite and within `[0, 100]`.
  pub fn in_bounds(&self) -> bool {
    [self.x, self.y, self.width, self.height]
      .iter()
      .all(|v| v.is_finite() && (0.0..=100.0).contains(v))
  }
}

/// A comment on a photo. Never edited in place; deleted only by its author.
#[derive(Debug, Clone)]
pub struct Comment {
  pub comment_id: Uuid,
  pub author:     Uuid,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}

/// A spatial user tag on a photo. Carries no ownership: any authenticated
/// user may remove any tag.
#[derive(Debug, Clone)]
pub struct Tag {
  pub tag_id:     Uuid,
  /// The tagged user, not the tag's creator.
  pub user:       Uuid,
  pub rect:       TagRect,
  pub created_at: DateTime<Utc>,
}

/// The aggregate root.
///
/// `owner` is immutable after creation. `comments` and `tags` are in
/// insertion order; `likers` has set semantics (no duplicate ids).
#[derive(Debug, Clone)]
pub struct Photo {
  pub photo_id:   Uuid,
  pub owner:      Uuid,
  /// Opaque reference into the file storage collaborator.
  pub file_name:  String,
  pub created_at: DateTime<Utc>,
  pub comments:   Vec<Comment>,
  pub tags:       Vec<Tag>,
  pub likers:     Vec<Uuid>,
}
