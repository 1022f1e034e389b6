//! Read-side composition: denormalized view models.
//!
//! The composer turns raw aggregates into response shapes, resolving every
//! referenced user (comment authors, tagged users, likers) against the
//! directory in a single batched lookup per response rather than one per
//! reference. These view types are the only read shapes that leave the
//! service; store rows never do.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  photo::{Photo, TagRect},
  store::ContentStore,
  user::{User, UserSummary},
};

// ─── View models ─────────────────────────────────────────────────────────────

/// A comment with its author resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
  pub comment_id: Uuid,
  pub text:       String,
  pub created_at: DateTime<Utc>,
  /// `None` when the directory no longer has the author's record.
  pub user:       Option<UserSummary>,
}

/// A tag with the tagged user resolved. The rectangle serializes flat, as
/// four percentage numbers.
#[derive(Debug, Clone, Serialize)]
pub struct TagView {
  pub tag_id:     Uuid,
  #[serde(flatten)]
  pub rect:       TagRect,
  pub created_at: DateTime<Utc>,
  pub user:       Option<UserSummary>,
}

/// One composed photo.
///
/// Empty sub-collections serialize as empty arrays, never disappear.
/// `likers` is the raw identity array so a client can test membership
/// locally; it is never reduced to a count.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoView {
  pub photo_id:   Uuid,
  pub owner:      Uuid,
  pub file_name:  String,
  pub created_at: DateTime<Utc>,
  pub comments:   Vec<CommentView>,
  pub tags:       Vec<TagView>,
  pub likers:     Vec<Uuid>,
}

/// Where a comment lives, for the flat per-author listing.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoRef {
  pub photo_id:  Uuid,
  pub file_name: String,
  pub owner:     Uuid,
}

/// A comment flattened out of its photo for the per-author listing.
#[derive(Debug, Clone, Serialize)]
pub struct AuthoredComment {
  pub comment_id: Uuid,
  pub text:       String,
  pub created_at: DateTime<Utc>,
  pub photo:      PhotoRef,
}

/// Full profile minus credentials; the directory detail read.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
  pub user_id:     Uuid,
  pub first_name:  String,
  pub last_name:   String,
  pub location:    Option<String>,
  pub description: Option<String>,
  pub occupation:  Option<String>,
}

impl From<User> for UserDetail {
  fn from(user: User) -> Self {
    Self {
      user_id:     user.user_id,
      first_name:  user.first_name,
      last_name:   user.last_name,
      location:    user.location,
      description: user.description,
      occupation:  user.occupation,
    }
  }
}

// ─── Composition ─────────────────────────────────────────────────────────────

/// All photos owned by `user_id`, composed.
///
/// Photos with no comments and no tags are still returned, with empty
/// sequences. Fails with `UserNotFound` for an unknown owner.
pub async fn photos_of_user<S: ContentStore>(
  store: &S,
  user_id: Uuid,
) -> Result<Vec<PhotoView>> {
  let photos = store.list_photos_of_user(user_id).await?;
  let directory = resolve_referenced(store, &photos).await?;
  Ok(
    photos
      .into_iter()
      .map(|p| compose_photo(p, &directory))
      .collect(),
  )
}

/// One composed photo; also the convergence read for feed subscribers that
/// missed a like event.
pub async fn photo_view<S: ContentStore>(
  store: &S,
  photo_id: Uuid,
) -> Result<PhotoView> {
  let photo = store
    .fetch_photo(photo_id)
    .await?
    .ok_or(Error::PhotoNotFound(photo_id))?;
  let directory = resolve_referenced(store, std::slice::from_ref(&photo)).await?;
  Ok(compose_photo(photo, &directory))
}

/// Every comment authored by `user_id`, flattened with a reference to the
/// photo it lives on. Ordered photo-then-comment.
pub async fn comments_of_user<S: ContentStore>(
  store: &S,
  user_id: Uuid,
) -> Result<Vec<AuthoredComment>> {
  let photos = store.list_photos_commented_by(user_id).await?;

  let mut out = Vec::new();
  for photo in photos {
    let photo_ref = PhotoRef {
      photo_id:  photo.photo_id,
      file_name: photo.file_name.clone(),
      owner:     photo.owner,
    };
    for comment in photo.comments.into_iter().filter(|c| c.author == user_id) {
      out.push(AuthoredComment {
        comment_id: comment.comment_id,
        text:       comment.text,
        created_at: comment.created_at,
        photo:      photo_ref.clone(),
      });
    }
  }
  Ok(out)
}

/// One batched directory lookup covering every commenter, tagged user, and
/// liker across `photos`. An empty reference set skips the lookup.
async fn resolve_referenced<S: ContentStore>(
  store: &S,
  photos: &[Photo],
) -> Result<HashMap<Uuid, UserSummary>> {
  let mut ids = HashSet::new();
  for photo in photos {
    ids.extend(photo.comments.iter().map(|c| c.author));
    ids.extend(photo.tags.iter().map(|t| t.user));
    ids.extend(photo.likers.iter().copied());
  }

  if ids.is_empty() {
    return Ok(HashMap::new());
  }
  let ids: Vec<Uuid> = ids.into_iter().collect();
  store.find_users_by_ids(&ids).await
}

fn compose_photo(
  photo: Photo,
  directory: &HashMap<Uuid, UserSummary>,
) -> PhotoView {
  let comments = photo
    .comments
    .into_iter()
    .map(|c| CommentView {
      comment_id: c.comment_id,
      text:       c.text,
      created_at: c.created_at,
      user:       directory.get(&c.author).cloned(),
    })
    .collect();

  let tags = photo
    .tags
    .into_iter()
    .map(|t| TagView {
      tag_id:     t.tag_id,
      rect:       t.rect,
      created_at: t.created_at,
      user:       directory.get(&t.user).cloned(),
    })
    .collect();

  PhotoView {
    photo_id:   photo.photo_id,
    owner:      photo.owner,
    file_name:  photo.file_name,
    created_at: photo.created_at,
    comments,
    tags,
    likers:     photo.likers,
  }
}
