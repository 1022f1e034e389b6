//! JSON + WebSocket API for Lightbox.
//!
//! Exposes an axum [`Router`] over any [`ContentStore`] / [`FileStore`]
//! pair. Sessions are in-memory cookie tokens (see [`auth`]); like events
//! fan out over an in-process broadcast channel (see [`events`]). TLS and
//! static file serving are the embedding binary's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = AppState::new(store, files, 64);
//! let app = lightbox_api::router(state);
//! ```

pub mod auth;
pub mod comments;
pub mod error;
pub mod events;
pub mod photos;
pub mod tags;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{delete, get, post},
};
use lightbox_core::{files::FileStore, gateway::Gateway, store::ContentStore};

pub use auth::SessionStore;
pub use error::ApiError;
pub use events::LikeBus;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, F> {
  pub store:    Arc<S>,
  pub gateway:  Gateway<S, F>,
  pub sessions: SessionStore,
  pub likes:    LikeBus,
}

impl<S, F> Clone for AppState<S, F> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      gateway:  self.gateway.clone(),
      sessions: self.sessions.clone(),
      likes:    self.likes.clone(),
    }
  }
}

impl<S, F> AppState<S, F>
where
  S: ContentStore,
  F: FileStore,
{
  /// Wire up state over `store` and `files`, with a like channel retaining
  /// up to `like_capacity` events per lagging subscriber.
  pub fn new(store: Arc<S>, files: Arc<F>, like_capacity: usize) -> Self {
    Self {
      gateway:  Gateway::new(Arc::clone(&store), files),
      store,
      sessions: SessionStore::new(),
      likes:    LikeBus::new(like_capacity),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn router<S, F>(state: AppState<S, F>) -> Router
where
  S: ContentStore + 'static,
  F: FileStore + 'static,
{
  Router::new()
    // Sessions
    .route(
      "/session",
      post(auth::login::<S, F>).delete(auth::logout::<S, F>),
    )
    // Directory
    .route(
      "/users",
      get(users::list::<S, F>).post(users::register::<S, F>),
    )
    .route(
      "/users/{id}",
      get(users::get_one::<S, F>).delete(users::delete_account::<S, F>),
    )
    .route("/users/{id}/photos", get(users::photos_of::<S, F>))
    .route("/users/{id}/comments", get(users::comments_of::<S, F>))
    // Photos
    .route(
      "/photos",
      post(photos::upload::<S, F>)
        .layer(DefaultBodyLimit::max(photos::MAX_UPLOAD_BYTES)),
    )
    .route(
      "/photos/{id}",
      get(photos::get_one::<S, F>).delete(photos::delete::<S, F>),
    )
    .route("/photos/{id}/like", post(photos::toggle_like::<S, F>))
    // Comments
    .route("/photos/{id}/comments", post(comments::create::<S, F>))
    .route(
      "/photos/{id}/comments/{comment_id}",
      delete(comments::delete::<S, F>),
    )
    // Tags
    .route("/photos/{id}/tags", post(tags::create::<S, F>))
    .route("/photos/{id}/tags/{tag_id}", delete(tags::delete::<S, F>))
    // Live feed
    .route("/events/likes", get(events::like_feed::<S, F>))
    .with_state(state)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
