//! Handlers for `/photos/{id}/comments` endpoints.
//!
//! | Method   | Path                                    | Notes |
//! |----------|-----------------------------------------|-------|
//! | `POST`   | `/photos/{id}/comments`                 | Body: [`CommentBody`]; 201 + resolved view |
//! | `DELETE` | `/photos/{id}/comments/{comment_id}`    | Author only; 204 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use lightbox_core::{
  files::FileStore, store::ContentStore, view::CommentView,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::CurrentIdentity, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub text: String,
}

/// `POST /photos/{id}/comments`: appends as the session's user.
pub async fn create<S, F>(
  CurrentIdentity(identity): CurrentIdentity,
  State(state): State<AppState<S, F>>,
  Path(photo_id): Path<Uuid>,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  let comment = state
    .gateway
    .append_comment(identity, photo_id, body.text)
    .await?;

  let mut directory = state.store.find_users_by_ids(&[comment.author]).await?;
  let view = CommentView {
    comment_id: comment.comment_id,
    text:       comment.text,
    created_at: comment.created_at,
    user:       directory.remove(&comment.author),
  };
  Ok((StatusCode::CREATED, Json(view)))
}

/// `DELETE /photos/{id}/comments/{comment_id}`: author only.
pub async fn delete<S, F>(
  CurrentIdentity(identity): CurrentIdentity,
  State(state): State<AppState<S, F>>,
  Path((photo_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  state
    .gateway
    .remove_comment(identity, photo_id, comment_id)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}
