//! Handlers for `/photos` endpoints.
//!
//! | Method   | Path                    | Notes |
//! |----------|-------------------------|-------|
//! | `POST`   | `/photos?file_name=...` | Raw image bytes in the body; 201 + composed view |
//! | `GET`    | `/photos/{id}`          | Composed [`PhotoView`]; 404 if unknown |
//! | `DELETE` | `/photos/{id}`          | Owner only; 204 |
//! | `POST`   | `/photos/{id}/like`     | Toggle; returns the full liker set |
//!
//! A like toggle publishes one [`LikeEvent`] on the bus after the store
//! mutation lands; feed subscribers that miss it converge by re-reading
//! `GET /photos/{id}`.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use lightbox_core::{
  event::LikeEvent,
  files::FileStore,
  store::ContentStore,
  view::{self, PhotoView},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::CurrentIdentity, error::ApiError};

/// Upload body cap, applied to the upload route alone.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ─── Upload ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UploadParams {
  /// Client-side name of the image; the stored reference is derived from
  /// it but owned by the file store.
  pub file_name: String,
}

/// `POST /photos?file_name=<name>`: body is the raw image bytes.
pub async fn upload<S, F>(
  CurrentIdentity(identity): CurrentIdentity,
  State(state): State<AppState<S, F>>,
  Query(params): Query<UploadParams>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  identity.require()?;
  if body.is_empty() {
    return Err(ApiError::BadRequest("upload body is empty".into()));
  }

  let photo = state
    .gateway
    .upload_photo(identity, &body, &params.file_name)
    .await?;

  let photo_id = photo.photo_id;
  let file_name = &photo.file_name;
  tracing::info!("photo {photo_id} uploaded as {file_name}");

  // Fresh aggregates have empty sub-collections; no directory resolution
  // to do.
  let view = PhotoView {
    photo_id:   photo.photo_id,
    owner:      photo.owner,
    file_name:  photo.file_name,
    created_at: photo.created_at,
    comments:   Vec::new(),
    tags:       Vec::new(),
    likers:     Vec::new(),
  };
  Ok((StatusCode::CREATED, Json(view)))
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /photos/{id}`
pub async fn get_one<S, F>(
  CurrentIdentity(identity): CurrentIdentity,
  State(state): State<AppState<S, F>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PhotoView>, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  identity.require()?;
  Ok(Json(view::photo_view(state.store.as_ref(), id).await?))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /photos/{id}`: owner only.
pub async fn delete<S, F>(
  CurrentIdentity(identity): CurrentIdentity,
  State(state): State<AppState<S, F>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  state.gateway.delete_photo(identity, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Like toggle ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LikersBody {
  pub likers: Vec<Uuid>,
}

/// `POST /photos/{id}/like`: toggles the caller's like and returns the
/// resulting liker set, identities in first-like order.
pub async fn toggle_like<S, F>(
  CurrentIdentity(identity): CurrentIdentity,
  State(state): State<AppState<S, F>>,
  Path(id): Path<Uuid>,
) -> Result<Json<LikersBody>, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  let likers = state.gateway.toggle_like(identity, id).await?;

  state.likes.publish(LikeEvent {
    photo_id: id,
    likers:   likers.clone(),
  });

  Ok(Json(LikersBody { likers }))
}
