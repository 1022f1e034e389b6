//! The `ContentStore` trait, the persistence boundary of the content core.
//!
//! Implemented by storage backends (e.g. `lightbox-store-sqlite`). Higher
//! layers depend on this abstraction, not on any concrete backend. The
//! trait speaks the crate's shared [`Error`](crate::Error) taxonomy
//! directly so transport layers can map not-found and forbidden outcomes
//! without knowing the backend.
//!
//! Authorization context never enters a backend beyond the explicit
//! `requester` parameters; whether a requester exists at all is decided by
//! [`crate::gateway`].
//!
//! Atomicity contract: each mutation is atomic with respect to other
//! mutations on the same photo (two concurrent like toggles by different
//! users must both land). Mutations on different photos are independent.
//! Reads may observe state slightly stale relative to in-flight mutations.

use std::{collections::HashMap, future::Future};

use uuid::Uuid;

use crate::{
  Result,
  photo::{Comment, Photo, Tag, TagRect},
  user::{NewUser, User, UserSummary},
};

/// Abstraction over a Lightbox content store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ContentStore: Send + Sync {
  // ── Directory ─────────────────────────────────────────────────────────

  /// Register a new account. Runs [`NewUser::validate`] first and fails
  /// with [`Error::LoginNameTaken`](crate::Error::LoginNameTaken) if the
  /// login name is already in use.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User>> + Send + '_;

  /// Retrieve a directory record by id. Returns `None` if not found.
  fn fetch_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>>> + Send + '_;

  /// Retrieve a directory record by login name. Returns `None` if not
  /// found.
  fn fetch_user_by_login<'a>(
    &'a self,
    login_name: &'a str,
  ) -> impl Future<Output = Result<Option<User>>> + Send + 'a;

  /// All directory records as public summaries, in creation order.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<UserSummary>>> + Send + '_;

  /// Batched directory resolution: one lookup for an arbitrary id set.
  ///
  /// Ids without a matching record are simply absent from the returned
  /// map, never an error. This is the only directory read the view
  /// composer performs per response.
  fn find_users_by_ids<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<HashMap<Uuid, UserSummary>>> + Send + 'a;

  /// Delete the account and cascade: every photo owned by `user_id` is
  /// deleted, and the user's comments, tags, and likes are removed from
  /// every remaining photo. Returns the file references of the deleted
  /// photos so the caller can release them.
  fn delete_user_cascade(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<String>>> + Send + '_;

  // ── Photos ────────────────────────────────────────────────────────────

  /// Create a photo aggregate with empty sub-collections. Fails with
  /// [`Error::UserNotFound`](crate::Error::UserNotFound) if the owner is
  /// not in the directory.
  fn create_photo(
    &self,
    owner: Uuid,
    file_name: String,
  ) -> impl Future<Output = Result<Photo>> + Send + '_;

  /// Retrieve one full aggregate. Returns `None` if not found.
  fn fetch_photo(
    &self,
    photo_id: Uuid,
  ) -> impl Future<Output = Result<Option<Photo>>> + Send + '_;

  /// All aggregates owned by `owner`, in creation order. Fails with
  /// `UserNotFound` if the owner is not in the directory.
  fn list_photos_of_user(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<Photo>>> + Send + '_;

  /// All aggregates carrying at least one comment by `author`, in creation
  /// order. Fails with `UserNotFound` if the author is not in the
  /// directory.
  fn list_photos_commented_by(
    &self,
    author: Uuid,
  ) -> impl Future<Output = Result<Vec<Photo>>> + Send + '_;

  /// Owner-only deletion of one aggregate and everything it owns. Fails
  /// with `NotPhotoOwner` if `requester` is not the owner. Returns the
  /// deleted aggregate so the caller can release its file reference.
  fn delete_photo(
    &self,
    photo_id: Uuid,
    requester: Uuid,
  ) -> impl Future<Output = Result<Photo>> + Send + '_;

  // ── Aggregate mutations ───────────────────────────────────────────────

  /// Append a comment. Fails with `PhotoNotFound` if the photo is absent
  /// and `EmptyComment` if `text` trims to nothing; the text is stored
  /// verbatim otherwise.
  fn append_comment(
    &self,
    photo_id: Uuid,
    author: Uuid,
    text: String,
  ) -> impl Future<Output = Result<Comment>> + Send + '_;

  /// Remove a comment. Fails with `NotFound` if the photo or comment is
  /// absent and `NotCommentAuthor` if `requester` did not write it.
  fn remove_comment(
    &self,
    photo_id: Uuid,
    comment_id: Uuid,
    requester: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Add a tag. Fails with `PhotoNotFound` if the photo is absent and
  /// `InvalidRect` if any rectangle value falls outside `[0, 100]`.
  fn add_tag(
    &self,
    photo_id: Uuid,
    tagged_user: Uuid,
    rect: TagRect,
  ) -> impl Future<Output = Result<Tag>> + Send + '_;

  /// Remove a tag. Fails with `NotFound` if the photo or tag is absent.
  /// Tags carry no ownership, so no authorization parameter exists here.
  fn remove_tag(
    &self,
    photo_id: Uuid,
    tag_id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Toggle `user`'s membership in the photo's liker set and return the
  /// resulting set. Toggling twice restores the original membership.
  fn toggle_like(
    &self,
    photo_id: Uuid,
    user: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>>> + Send + '_;
}
