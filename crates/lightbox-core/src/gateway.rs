//! The mutation gateway: authentication and authorization in front of the
//! store.
//!
//! Transport handlers never mutate the [`ContentStore`] directly; they hand
//! this layer an explicit [`Identity`] resolved by the session
//! collaborator. The store enforces author/owner rules against the
//! requester id it receives; this layer decides whether a requester exists
//! at all, plus the checks that need a directory lookup and the
//! file-storage side effects around photo creation and deletion.
//!
//! `Unauthenticated` is always raised before any store access.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  files::FileStore,
  photo::{Comment, Photo, Tag, TagRect},
  store::ContentStore,
};

/// The caller of a request, as resolved by the session collaborator.
///
/// Mutations require `User`; reads and feed subscriptions accept either.
/// There is no ambient request context anywhere below this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
  Anonymous,
  User(Uuid),
}

impl Identity {
  /// The authenticated user id, or [`Error::Unauthenticated`].
  pub fn require(self) -> Result<Uuid> {
    match self {
      Identity::User(id) => Ok(id),
      Identity::Anonymous => Err(Error::Unauthenticated),
    }
  }
}

/// Write-side entry point over a store and a file store.
pub struct Gateway<S, F> {
  store: Arc<S>,
  files: Arc<F>,
}

impl<S, F> Clone for Gateway<S, F> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      files: Arc::clone(&self.files),
    }
  }
}

impl<S, F> Gateway<S, F>
where
  S: ContentStore,
  F: FileStore,
{
  pub fn new(store: Arc<S>, files: Arc<F>) -> Self {
    Self { store, files }
  }

  /// Store the uploaded bytes, then create the owning aggregate.
  ///
  /// The file is written first. If aggregate creation then fails, the
  /// orphaned file is deleted best-effort: a cleanup failure is logged and
  /// the creation error is what the caller sees. The two sides are never
  /// left inconsistent in the success path.
  pub async fn upload_photo(
    &self,
    identity: Identity,
    bytes: &[u8],
    suggested_name: &str,
  ) -> Result<Photo> {
    let owner = identity.require()?;
    let file_name = self.files.save(bytes, suggested_name).await?;

    match self.store.create_photo(owner, file_name.clone()).await {
      Ok(photo) => Ok(photo),
      Err(err) => {
        if let Err(cleanup) = self.files.delete(&file_name).await {
          tracing::warn!("orphaned upload {file_name} not removed: {cleanup}");
        }
        Err(err)
      }
    }
  }

  /// Append a comment as the authenticated requester.
  pub async fn append_comment(
    &self,
    identity: Identity,
    photo_id: Uuid,
    text: String,
  ) -> Result<Comment> {
    let author = identity.require()?;
    self.store.append_comment(photo_id, author, text).await
  }

  /// Remove a comment; only its author may.
  pub async fn remove_comment(
    &self,
    identity: Identity,
    photo_id: Uuid,
    comment_id: Uuid,
  ) -> Result<()> {
    let requester = identity.require()?;
    self
      .store
      .remove_comment(photo_id, comment_id, requester)
      .await
  }

  /// Tag a user on a photo with an already-resolved rectangle.
  ///
  /// The tagged user must currently exist in the directory.
  pub async fn add_tag(
    &self,
    identity: Identity,
    photo_id: Uuid,
    tagged_user: Uuid,
    rect: TagRect,
  ) -> Result<Tag> {
    identity.require()?;
    if self.store.fetch_user(tagged_user).await?.is_none() {
      return Err(Error::UserNotFound(tagged_user));
    }
    self.store.add_tag(photo_id, tagged_user, rect).await
  }

  /// Remove a tag. Tags carry no ownership: any authenticated user may
  /// remove any tag, unlike photo and comment deletion.
  pub async fn remove_tag(
    &self,
    identity: Identity,
    photo_id: Uuid,
    tag_id: Uuid,
  ) -> Result<()> {
    identity.require()?;
    self.store.remove_tag(photo_id, tag_id).await
  }

  /// Toggle the requester's membership in the photo's liker set and return
  /// the resulting set. Owners may like their own photos.
  pub async fn toggle_like(
    &self,
    identity: Identity,
    photo_id: Uuid,
  ) -> Result<Vec<Uuid>> {
    let user = identity.require()?;
    self.store.toggle_like(photo_id, user).await
  }

  /// Owner-only photo deletion; releases the stored file best-effort after
  /// the aggregate is gone.
  pub async fn delete_photo(
    &self,
    identity: Identity,
    photo_id: Uuid,
  ) -> Result<()> {
    let requester = identity.require()?;
    let photo = self.store.delete_photo(photo_id, requester).await?;

    if let Err(err) = self.files.delete(&photo.file_name).await {
      let file_name = photo.file_name;
      tracing::warn!("deleted photo left file {file_name} behind: {err}");
    }
    Ok(())
  }

  /// Self-only account deletion.
  ///
  /// Cascades through the store (photos, and the user's comments, tags,
  /// and likes elsewhere), then releases the deleted photos' files
  /// best-effort. Session invalidation is the transport layer's half of
  /// this operation.
  pub async fn delete_account(
    &self,
    identity: Identity,
    user_id: Uuid,
  ) -> Result<()> {
    let requester = identity.require()?;
    if requester != user_id {
      return Err(Error::NotAccountOwner(user_id));
    }

    let file_names = self.store.delete_user_cascade(user_id).await?;
    for file_name in file_names {
      if let Err(err) = self.files.delete(&file_name).await {
        tracing::warn!("cascade left file {file_name} behind: {err}");
      }
    }
    Ok(())
  }
}
