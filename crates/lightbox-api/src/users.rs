//! Handlers for `/users` endpoints.
//!
//! | Method   | Path                   | Notes |
//! |----------|------------------------|-------|
//! | `POST`   | `/users`               | Register: [`RegisterBody`]; 201 + summary |
//! | `GET`    | `/users`               | All summaries, creation order |
//! | `GET`    | `/users/{id}`          | Profile detail; 404 if unknown |
//! | `DELETE` | `/users/{id}`          | Self only; cascades, then revokes the account's sessions |
//! | `GET`    | `/users/{id}/photos`   | Composed [`PhotoView`]s |
//! | `GET`    | `/users/{id}/comments` | Flat authored comments |
//!
//! Registration is the only route here open to anonymous callers.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use lightbox_core::{
  Error as CoreError,
  files::FileStore,
  store::ContentStore,
  user::{NewUser, UserSummary},
  view::{self, AuthoredComment, PhotoView, UserDetail},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  auth::{self, CurrentIdentity},
  error::ApiError,
};

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub login_name:  String,
  pub password:    String,
  pub first_name:  String,
  pub last_name:   String,
  pub location:    Option<String>,
  pub description: Option<String>,
  pub occupation:  Option<String>,
}

/// `POST /users`: returns 201 plus the new account's summary.
pub async fn register<S, F>(
  State(state): State<AppState<S, F>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("password must not be empty".into()));
  }
  let password_hash = auth::hash_password(&body.password)?;

  let user = state
    .store
    .add_user(NewUser {
      login_name: body.login_name,
      password_hash,
      first_name: body.first_name,
      last_name: body.last_name,
      location: body.location,
      description: body.description,
      occupation: body.occupation,
    })
    .await?;

  let login_name = &user.login_name;
  tracing::info!("registered {login_name}");

  let summary = UserSummary {
    user_id:    user.user_id,
    first_name: user.first_name,
    last_name:  user.last_name,
  };
  Ok((StatusCode::CREATED, Json(summary)))
}

// ─── Directory reads ─────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S, F>(
  CurrentIdentity(identity): CurrentIdentity,
  State(state): State<AppState<S, F>>,
) -> Result<Json<Vec<UserSummary>>, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  identity.require()?;
  Ok(Json(state.store.list_users().await?))
}

/// `GET /users/{id}`
pub async fn get_one<S, F>(
  CurrentIdentity(identity): CurrentIdentity,
  State(state): State<AppState<S, F>>,
  Path(id): Path<Uuid>,
) -> Result<Json<UserDetail>, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  identity.require()?;
  let user = state
    .store
    .fetch_user(id)
    .await?
    .ok_or(CoreError::UserNotFound(id))?;
  Ok(Json(UserDetail::from(user)))
}

// ─── Account deletion ────────────────────────────────────────────────────────

/// `DELETE /users/{id}`: self only.
///
/// The gateway cascades through content and files; the account's sessions
/// are revoked here in the same request, so the deleting client's next
/// call is anonymous.
pub async fn delete_account<S, F>(
  CurrentIdentity(identity): CurrentIdentity,
  State(state): State<AppState<S, F>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  state.gateway.delete_account(identity, id).await?;
  state.sessions.revoke_user(id).await;
  tracing::info!("account {id} deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Per-user content reads ──────────────────────────────────────────────────

/// `GET /users/{id}/photos`
pub async fn photos_of<S, F>(
  CurrentIdentity(identity): CurrentIdentity,
  State(state): State<AppState<S, F>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<PhotoView>>, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  identity.require()?;
  Ok(Json(view::photos_of_user(state.store.as_ref(), id).await?))
}

/// `GET /users/{id}/comments`
pub async fn comments_of<S, F>(
  CurrentIdentity(identity): CurrentIdentity,
  State(state): State<AppState<S, F>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<AuthoredComment>>, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  identity.require()?;
  Ok(Json(view::comments_of_user(state.store.as_ref(), id).await?))
}
