//! Handlers for `/photos/{id}/tags` endpoints.
//!
//! | Method   | Path                            | Notes |
//! |----------|---------------------------------|-------|
//! | `POST`   | `/photos/{id}/tags`             | Body: [`TagBody`]; 201 + resolved view |
//! | `DELETE` | `/photos/{id}/tags/{tag_id}`    | Any authenticated user; 204 |
//!
//! A tag placement arrives either as an already-normalized rectangle or as
//! the raw drag gesture, which is resolved server-side by
//! [`lightbox_core::geometry`]. A drag below the minimum selection size is
//! a 400, not a tag.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use lightbox_core::{
  files::FileStore,
  geometry::{self, Bounds, Point},
  photo::TagRect,
  store::ContentStore,
  view::TagView,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::CurrentIdentity, error::ApiError};

/// Tag placement: `{"user_id":…,"rect":{…}}` or
/// `{"user_id":…,"start":{…},"moves":[…],"bounds":{…}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TagBody {
  Resolved {
    user_id: Uuid,
    rect:    TagRect,
  },
  Gesture {
    user_id: Uuid,
    start:   Point,
    moves:   Vec<Point>,
    bounds:  Bounds,
  },
}

/// `POST /photos/{id}/tags`
pub async fn create<S, F>(
  CurrentIdentity(identity): CurrentIdentity,
  State(state): State<AppState<S, F>>,
  Path(photo_id): Path<Uuid>,
  Json(body): Json<TagBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  identity.require()?;

  let (user_id, rect) = match body {
    TagBody::Resolved { user_id, rect } => (user_id, rect),
    TagBody::Gesture { user_id, start, moves, bounds } => {
      let rect = geometry::resolve(start, &moves, bounds).ok_or_else(|| {
        ApiError::BadRequest("drag selection too small to form a tag".into())
      })?;
      (user_id, rect)
    }
  };

  let tag = state
    .gateway
    .add_tag(identity, photo_id, user_id, rect)
    .await?;

  let mut directory = state.store.find_users_by_ids(&[tag.user]).await?;
  let view = TagView {
    tag_id:     tag.tag_id,
    rect:       tag.rect,
    created_at: tag.created_at,
    user:       directory.remove(&tag.user),
  };
  Ok((StatusCode::CREATED, Json(view)))
}

/// `DELETE /photos/{id}/tags/{tag_id}`: tags carry no ownership, so any
/// authenticated user may remove any tag.
pub async fn delete<S, F>(
  CurrentIdentity(identity): CurrentIdentity,
  State(state): State<AppState<S, F>>,
  Path((photo_id, tag_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  state.gateway.remove_tag(identity, photo_id, tag_id).await?;
  Ok(StatusCode::NO_CONTENT)
}
