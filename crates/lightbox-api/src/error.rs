//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use lightbox_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// The content core's taxonomy maps one-to-one onto status codes; the two
/// extra variants cover transport-level rejections that never reach the
/// core and failures of the API layer itself.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("internal error: {0}")]
  Internal(String),
}

fn core_status(err: &CoreError) -> StatusCode {
  match err {
    CoreError::EmptyComment
    | CoreError::InvalidRect(_)
    | CoreError::EmptyField(_) => StatusCode::BAD_REQUEST,

    CoreError::Unauthenticated => StatusCode::UNAUTHORIZED,

    CoreError::NotCommentAuthor(_)
    | CoreError::NotPhotoOwner(_)
    | CoreError::NotAccountOwner(_) => StatusCode::FORBIDDEN,

    CoreError::UserNotFound(_)
    | CoreError::PhotoNotFound(_)
    | CoreError::CommentNotFound(_)
    | CoreError::TagNotFound(_) => StatusCode::NOT_FOUND,

    CoreError::LoginNameTaken(_) => StatusCode::CONFLICT,

    CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Core(err) => core_status(err),
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
