//! Sessions and credentials.
//!
//! | Method   | Path       | Notes |
//! |----------|------------|-------|
//! | `POST`   | `/session` | Body: [`LoginBody`]; sets the session cookie |
//! | `DELETE` | `/session` | Revokes the presented token |
//!
//! Sessions are opaque tokens in an in-memory map, carried in an HttpOnly
//! cookie. Every request resolves to an [`Identity`] through the
//! non-rejecting [`CurrentIdentity`] extractor; whether `Anonymous` is
//! acceptable is the handler's call, so public routes and the gateway's
//! own checks share one mechanism.

use std::{collections::HashMap, convert::Infallible, sync::Arc};

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, StatusCode, header, request::Parts},
  response::IntoResponse,
};
use lightbox_core::{
  Error as CoreError, files::FileStore, gateway::Identity, store::ContentStore,
  user::UserSummary,
};
use rand_core::OsRng;
use serde::Deserialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "lightbox_session";

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash a raw password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|err| ApiError::Internal(format!("password hashing: {err}")))
}

/// Verify a raw password against a stored PHC string. An unparseable hash
/// verifies as false rather than erroring.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(password_hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Session store ───────────────────────────────────────────────────────────

/// In-memory token map. Tokens do not survive a restart; clients simply
/// log in again.
#[derive(Clone, Default)]
pub struct SessionStore {
  tokens: Arc<RwLock<HashMap<String, Uuid>>>,
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Mint a fresh token for `user_id`.
  pub async fn issue(&self, user_id: Uuid) -> String {
    let token = Uuid::new_v4().simple().to_string();
    self.tokens.write().await.insert(token.clone(), user_id);
    token
  }

  pub async fn resolve(&self, token: &str) -> Option<Uuid> {
    self.tokens.read().await.get(token).copied()
  }

  /// Drop one token. Returns whether it existed.
  pub async fn revoke(&self, token: &str) -> bool {
    self.tokens.write().await.remove(token).is_some()
  }

  /// Drop every session belonging to `user_id`, the session half of
  /// account deletion.
  pub async fn revoke_user(&self, user_id: Uuid) {
    self.tokens.write().await.retain(|_, id| *id != user_id);
  }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
  let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
  cookies.split(';').find_map(|pair| {
    let (name, value) = pair.trim().split_once('=')?;
    (name == SESSION_COOKIE).then(|| value.to_owned())
  })
}

// ─── Identity extraction ─────────────────────────────────────────────────────

/// The request's caller. Never rejects: a missing, malformed, or revoked
/// token yields [`Identity::Anonymous`].
pub struct CurrentIdentity(pub Identity);

impl<S, F> FromRequestParts<AppState<S, F>> for CurrentIdentity
where
  S: ContentStore + 'static,
  F: FileStore + 'static,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, F>,
  ) -> Result<Self, Self::Rejection> {
    let identity = match session_token(&parts.headers) {
      Some(token) => match state.sessions.resolve(&token).await {
        Some(user_id) => Identity::User(user_id),
        None => Identity::Anonymous,
      },
      None => Identity::Anonymous,
    };
    Ok(CurrentIdentity(identity))
  }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub login_name: String,
  pub password:   String,
}

/// `POST /session`: body is `{"login_name":"...","password":"..."}`.
///
/// Returns the account summary and sets the session cookie. Unknown login
/// and wrong password are indistinguishable to the caller.
pub async fn login<S, F>(
  State(state): State<AppState<S, F>>,
  Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  let user = state
    .store
    .fetch_user_by_login(&body.login_name)
    .await?
    .filter(|user| verify_password(&body.password, &user.password_hash))
    .ok_or(CoreError::Unauthenticated)?;

  let token = state.sessions.issue(user.user_id).await;
  let login_name = user.login_name;
  tracing::info!("session opened for {login_name}");

  let summary = UserSummary {
    user_id:    user.user_id,
    first_name: user.first_name,
    last_name:  user.last_name,
  };
  Ok((
    [(
      header::SET_COOKIE,
      format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/"),
    )],
    Json(summary),
  ))
}

/// `DELETE /session`: revokes the presented token and expires the cookie.
pub async fn logout<S, F>(
  State(state): State<AppState<S, F>>,
  headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore,
  F: FileStore,
{
  let token = session_token(&headers).ok_or(CoreError::Unauthenticated)?;
  if !state.sessions.revoke(&token).await {
    return Err(CoreError::Unauthenticated.into());
  }
  Ok((
    StatusCode::NO_CONTENT,
    [(
      header::SET_COOKIE,
      format!("{SESSION_COOKIE}=; Max-Age=0; HttpOnly; Path=/"),
    )],
  ))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn password_round_trip() {
    let hash = hash_password("hunter2").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("hunter2", &hash));
    assert!(!verify_password("hunter3", &hash));
    assert!(!verify_password("hunter2", "not a phc string"));
  }

  #[tokio::test]
  async fn tokens_resolve_until_revoked() {
    let sessions = SessionStore::new();
    let user_id = Uuid::new_v4();

    let token = sessions.issue(user_id).await;
    assert_eq!(sessions.resolve(&token).await, Some(user_id));

    assert!(sessions.revoke(&token).await);
    assert_eq!(sessions.resolve(&token).await, None);
    assert!(!sessions.revoke(&token).await);
  }

  #[tokio::test]
  async fn revoke_user_drops_every_session() {
    let sessions = SessionStore::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let a1 = sessions.issue(alice).await;
    let a2 = sessions.issue(alice).await;
    let b1 = sessions.issue(bob).await;

    sessions.revoke_user(alice).await;
    assert_eq!(sessions.resolve(&a1).await, None);
    assert_eq!(sessions.resolve(&a2).await, None);
    assert_eq!(sessions.resolve(&b1).await, Some(bob));
  }

  #[test]
  fn cookie_header_parsing() {
    let mut headers = HeaderMap::new();
    headers.insert(
      header::COOKIE,
      "theme=dark; lightbox_session=abc123; lang=en".parse().unwrap(),
    );
    assert_eq!(session_token(&headers).as_deref(), Some("abc123"));

    headers.insert(header::COOKIE, "theme=dark".parse().unwrap());
    assert_eq!(session_token(&headers), None);
  }
}
