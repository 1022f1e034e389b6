//! [`SqliteStore`], the SQLite implementation of [`ContentStore`].
//!
//! Every mutation runs as one transaction inside one
//! [`tokio_rusqlite::Connection::call`] closure. The connection executes
//! closures in submission order on a dedicated thread, so two concurrent
//! toggles on the same photo serialize and both land; likes live in keyed
//! rows, so there is no whole-set overwrite to lose.

use std::{collections::HashMap, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use lightbox_core::{
  Error as CoreError, Result as CoreResult,
  photo::{Comment, Photo, Tag, TagRect},
  store::ContentStore,
  user::{NewUser, User, UserSummary},
};

use crate::{
  Error, Result,
  encode::{
    RawComment, RawPhoto, RawPhotoBundle, RawTag, RawUser, RawUserSummary,
    decode_photo, decode_uuid, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Lightbox content store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store (useful for testing).
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ContentStore impl ───────────────────────────────────────────────────────

impl ContentStore for SqliteStore {
  // ── Directory ─────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> CoreResult<User> {
    input.validate()?;

    let user = User {
      user_id:       Uuid::new_v4(),
      login_name:    input.login_name,
      password_hash: input.password_hash,
      first_name:    input.first_name,
      last_name:     input.last_name,
      location:      input.location,
      description:   input.description,
      occupation:    input.occupation,
      created_at:    Utc::now(),
    };

    let id_str    = encode_uuid(user.user_id);
    let at_str    = encode_dt(user.created_at);
    let row       = user.clone();
    let taken_err = user.login_name.clone();

    let outcome: CoreResult<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let taken: bool = tx
          .query_row(
            "SELECT 1 FROM users WHERE login_name = ?1",
            rusqlite::params![row.login_name],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(Err(CoreError::LoginNameTaken(taken_err)));
        }

        tx.execute(
          "INSERT INTO users (
             user_id, login_name, password_hash, first_name, last_name,
             location, description, occupation, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            row.login_name,
            row.password_hash,
            row.first_name,
            row.last_name,
            row.location,
            row.description,
            row.occupation,
            at_str,
          ],
        )?;

        tx.commit()?;
        Ok(Ok(()))
      })
      .await
      .map_err(Error::from)?;
    outcome?;

    Ok(user)
  }

  async fn fetch_user(&self, user_id: Uuid) -> CoreResult<Option<User>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, login_name, password_hash, first_name,
                      last_name, location, description, occupation, created_at
               FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              user_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::from)?;

    Ok(raw.map(RawUser::into_user).transpose()?)
  }

  async fn fetch_user_by_login(
    &self,
    login_name: &str,
  ) -> CoreResult<Option<User>> {
    let login = login_name.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, login_name, password_hash, first_name,
                      last_name, location, description, occupation, created_at
               FROM users WHERE login_name = ?1",
              rusqlite::params![login],
              user_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::from)?;

    Ok(raw.map(RawUser::into_user).transpose()?)
  }

  async fn list_users(&self) -> CoreResult<Vec<UserSummary>> {
    let raws: Vec<RawUserSummary> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, first_name, last_name FROM users ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], summary_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::from)?;

    Ok(
      raws
        .into_iter()
        .map(RawUserSummary::into_summary)
        .collect::<Result<Vec<_>>>()?,
    )
  }

  async fn find_users_by_ids(
    &self,
    ids: &[Uuid],
  ) -> CoreResult<HashMap<Uuid, UserSummary>> {
    let id_strs: Vec<String> = ids.iter().map(|id| encode_uuid(*id)).collect();

    let raws: Vec<RawUserSummary> = self
      .conn
      .call(move |conn| {
        if id_strs.is_empty() {
          return Ok(Vec::new());
        }

        let placeholders = (1..=id_strs.len())
          .map(|i| format!("?{i}"))
          .collect::<Vec<_>>()
          .join(", ");
        let sql = format!(
          "SELECT user_id, first_name, last_name FROM users
           WHERE user_id IN ({placeholders})"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(id_strs.iter()), summary_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::from)?;

    let mut map = HashMap::with_capacity(raws.len());
    for raw in raws {
      let summary = raw.into_summary()?;
      map.insert(summary.user_id, summary);
    }
    Ok(map)
  }

  async fn delete_user_cascade(&self, user_id: Uuid) -> CoreResult<Vec<String>> {
    let id_str = encode_uuid(user_id);

    let outcome: CoreResult<Vec<String>> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !user_exists(&tx, &id_str)? {
          return Ok(Err(CoreError::UserNotFound(user_id)));
        }

        let file_names: Vec<String> = {
          let mut stmt = tx.prepare(
            "SELECT file_name FROM photos WHERE owner_id = ?1 ORDER BY rowid",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![id_str], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows
        };

        // Owned photos go first (sub-collections cascade with them), then
        // the user's traces on everyone else's photos, then the account.
        tx.execute(
          "DELETE FROM photos WHERE owner_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM comments WHERE author_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM tags WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM likes WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM users WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?;

        tx.commit()?;
        Ok(Ok(file_names))
      })
      .await
      .map_err(Error::from)?;

    outcome
  }

  // ── Photos ────────────────────────────────────────────────────────────

  async fn create_photo(
    &self,
    owner: Uuid,
    file_name: String,
  ) -> CoreResult<Photo> {
    let photo = Photo {
      photo_id:   Uuid::new_v4(),
      owner,
      file_name,
      created_at: Utc::now(),
      comments:   Vec::new(),
      tags:       Vec::new(),
      likers:     Vec::new(),
    };

    let id_str    = encode_uuid(photo.photo_id);
    let owner_str = encode_uuid(owner);
    let file_str  = photo.file_name.clone();
    let at_str    = encode_dt(photo.created_at);

    let outcome: CoreResult<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !user_exists(&tx, &owner_str)? {
          return Ok(Err(CoreError::UserNotFound(owner)));
        }

        tx.execute(
          "INSERT INTO photos (photo_id, owner_id, file_name, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, owner_str, file_str, at_str],
        )?;

        tx.commit()?;
        Ok(Ok(()))
      })
      .await
      .map_err(Error::from)?;
    outcome?;

    Ok(photo)
  }

  async fn fetch_photo(&self, photo_id: Uuid) -> CoreResult<Option<Photo>> {
    let id_str = encode_uuid(photo_id);

    let bundle: Option<RawPhotoBundle> = self
      .conn
      .call(move |conn| Ok(load_photo(conn, &id_str)?))
      .await
      .map_err(Error::from)?;

    Ok(bundle.map(decode_photo).transpose()?)
  }

  async fn list_photos_of_user(&self, owner: Uuid) -> CoreResult<Vec<Photo>> {
    let owner_str = encode_uuid(owner);

    let outcome: CoreResult<Vec<RawPhotoBundle>> = self
      .conn
      .call(move |conn| {
        if !user_exists(conn, &owner_str)? {
          return Ok(Err(CoreError::UserNotFound(owner)));
        }

        let ids: Vec<String> = {
          let mut stmt = conn.prepare(
            "SELECT photo_id FROM photos WHERE owner_id = ?1 ORDER BY rowid",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![owner_str], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows
        };

        let mut bundles = Vec::with_capacity(ids.len());
        for id in &ids {
          if let Some(bundle) = load_photo(conn, id)? {
            bundles.push(bundle);
          }
        }
        Ok(Ok(bundles))
      })
      .await
      .map_err(Error::from)?;

    Ok(
      outcome?
        .into_iter()
        .map(decode_photo)
        .collect::<Result<Vec<_>>>()?,
    )
  }

  async fn list_photos_commented_by(
    &self,
    author: Uuid,
  ) -> CoreResult<Vec<Photo>> {
    let author_str = encode_uuid(author);

    let outcome: CoreResult<Vec<RawPhotoBundle>> = self
      .conn
      .call(move |conn| {
        if !user_exists(conn, &author_str)? {
          return Ok(Err(CoreError::UserNotFound(author)));
        }

        let ids: Vec<String> = {
          let mut stmt = conn.prepare(
            "SELECT DISTINCT p.photo_id
             FROM photos p
             JOIN comments c ON c.photo_id = p.photo_id
             WHERE c.author_id = ?1
             ORDER BY p.rowid",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![author_str], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows
        };

        let mut bundles = Vec::with_capacity(ids.len());
        for id in &ids {
          if let Some(bundle) = load_photo(conn, id)? {
            bundles.push(bundle);
          }
        }
        Ok(Ok(bundles))
      })
      .await
      .map_err(Error::from)?;

    Ok(
      outcome?
        .into_iter()
        .map(decode_photo)
        .collect::<Result<Vec<_>>>()?,
    )
  }

  async fn delete_photo(
    &self,
    photo_id: Uuid,
    requester: Uuid,
  ) -> CoreResult<Photo> {
    let id_str        = encode_uuid(photo_id);
    let requester_str = encode_uuid(requester);

    let outcome: CoreResult<RawPhotoBundle> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(bundle) = load_photo(&tx, &id_str)? else {
          return Ok(Err(CoreError::PhotoNotFound(photo_id)));
        };
        if bundle.0.owner_id != requester_str {
          return Ok(Err(CoreError::NotPhotoOwner(photo_id)));
        }

        // Sub-collection rows cascade with the root.
        tx.execute(
          "DELETE FROM photos WHERE photo_id = ?1",
          rusqlite::params![id_str],
        )?;

        tx.commit()?;
        Ok(Ok(bundle))
      })
      .await
      .map_err(Error::from)?;

    Ok(decode_photo(outcome?)?)
  }

  // ── Aggregate mutations ───────────────────────────────────────────────

  async fn append_comment(
    &self,
    photo_id: Uuid,
    author: Uuid,
    text: String,
  ) -> CoreResult<Comment> {
    if text.trim().is_empty() {
      return Err(CoreError::EmptyComment);
    }

    let comment = Comment {
      comment_id: Uuid::new_v4(),
      author,
      text,
      created_at: Utc::now(),
    };

    let id_str       = encode_uuid(comment.comment_id);
    let photo_id_str = encode_uuid(photo_id);
    let author_str   = encode_uuid(author);
    let body         = comment.text.clone();
    let at_str       = encode_dt(comment.created_at);

    let outcome: CoreResult<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !photo_exists(&tx, &photo_id_str)? {
          return Ok(Err(CoreError::PhotoNotFound(photo_id)));
        }

        let seq: i64 = tx.query_row(
          "SELECT COALESCE(MAX(seq), 0) + 1 FROM comments WHERE photo_id = ?1",
          rusqlite::params![photo_id_str],
          |row| row.get(0),
        )?;

        tx.execute(
          "INSERT INTO comments (comment_id, photo_id, author_id, body,
                                 created_at, seq)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, photo_id_str, author_str, body, at_str, seq],
        )?;

        tx.commit()?;
        Ok(Ok(()))
      })
      .await
      .map_err(Error::from)?;
    outcome?;

    Ok(comment)
  }

  async fn remove_comment(
    &self,
    photo_id: Uuid,
    comment_id: Uuid,
    requester: Uuid,
  ) -> CoreResult<()> {
    let photo_id_str   = encode_uuid(photo_id);
    let comment_id_str = encode_uuid(comment_id);
    let requester_str  = encode_uuid(requester);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !photo_exists(&tx, &photo_id_str)? {
          return Ok(Err(CoreError::PhotoNotFound(photo_id)));
        }

        let author: Option<String> = tx
          .query_row(
            "SELECT author_id FROM comments
             WHERE comment_id = ?1 AND photo_id = ?2",
            rusqlite::params![comment_id_str, photo_id_str],
            |row| row.get(0),
          )
          .optional()?;
        let Some(author) = author else {
          return Ok(Err(CoreError::CommentNotFound(comment_id)));
        };
        if author != requester_str {
          return Ok(Err(CoreError::NotCommentAuthor(comment_id)));
        }

        tx.execute(
          "DELETE FROM comments WHERE comment_id = ?1",
          rusqlite::params![comment_id_str],
        )?;

        tx.commit()?;
        Ok(Ok(()))
      })
      .await
      .map_err(Error::from)?
  }

  async fn add_tag(
    &self,
    photo_id: Uuid,
    tagged_user: Uuid,
    rect: TagRect,
  ) -> CoreResult<Tag> {
    if !rect.in_bounds() {
      return Err(CoreError::InvalidRect(rect));
    }

    let tag = Tag {
      tag_id:     Uuid::new_v4(),
      user:       tagged_user,
      rect,
      created_at: Utc::now(),
    };

    let id_str       = encode_uuid(tag.tag_id);
    let photo_id_str = encode_uuid(photo_id);
    let user_str     = encode_uuid(tagged_user);
    let at_str       = encode_dt(tag.created_at);

    let outcome: CoreResult<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !photo_exists(&tx, &photo_id_str)? {
          return Ok(Err(CoreError::PhotoNotFound(photo_id)));
        }

        let seq: i64 = tx.query_row(
          "SELECT COALESCE(MAX(seq), 0) + 1 FROM tags WHERE photo_id = ?1",
          rusqlite::params![photo_id_str],
          |row| row.get(0),
        )?;

        tx.execute(
          "INSERT INTO tags (tag_id, photo_id, user_id, x, y, width, height,
                             created_at, seq)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            photo_id_str,
            user_str,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            at_str,
            seq,
          ],
        )?;

        tx.commit()?;
        Ok(Ok(()))
      })
      .await
      .map_err(Error::from)?;
    outcome?;

    Ok(tag)
  }

  async fn remove_tag(&self, photo_id: Uuid, tag_id: Uuid) -> CoreResult<()> {
    let photo_id_str = encode_uuid(photo_id);
    let tag_id_str   = encode_uuid(tag_id);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !photo_exists(&tx, &photo_id_str)? {
          return Ok(Err(CoreError::PhotoNotFound(photo_id)));
        }

        let removed = tx.execute(
          "DELETE FROM tags WHERE tag_id = ?1 AND photo_id = ?2",
          rusqlite::params![tag_id_str, photo_id_str],
        )?;
        if removed == 0 {
          return Ok(Err(CoreError::TagNotFound(tag_id)));
        }

        tx.commit()?;
        Ok(Ok(()))
      })
      .await
      .map_err(Error::from)?
  }

  async fn toggle_like(
    &self,
    photo_id: Uuid,
    user: Uuid,
  ) -> CoreResult<Vec<Uuid>> {
    let photo_id_str = encode_uuid(photo_id);
    let user_str     = encode_uuid(user);
    let at_str       = encode_dt(Utc::now());

    let outcome: CoreResult<Vec<String>> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !photo_exists(&tx, &photo_id_str)? {
          return Ok(Err(CoreError::PhotoNotFound(photo_id)));
        }

        let present: bool = tx
          .query_row(
            "SELECT 1 FROM likes WHERE photo_id = ?1 AND user_id = ?2",
            rusqlite::params![photo_id_str, user_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if present {
          tx.execute(
            "DELETE FROM likes WHERE photo_id = ?1 AND user_id = ?2",
            rusqlite::params![photo_id_str, user_str],
          )?;
        } else {
          tx.execute(
            "INSERT INTO likes (photo_id, user_id, created_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![photo_id_str, user_str, at_str],
          )?;
        }

        let likers = load_likers(&tx, &photo_id_str)?;
        tx.commit()?;
        Ok(Ok(likers))
      })
      .await
      .map_err(Error::from)?;

    Ok(
      outcome?
        .iter()
        .map(|s| decode_uuid(s))
        .collect::<Result<Vec<_>>>()?,
    )
  }
}

// ─── Row loaders ─────────────────────────────────────────────────────────────
//
// Synchronous helpers used inside `call` closures; they accept either the
// bare connection or an open transaction.

fn user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:       row.get(0)?,
    login_name:    row.get(1)?,
    password_hash: row.get(2)?,
    first_name:    row.get(3)?,
    last_name:     row.get(4)?,
    location:      row.get(5)?,
    description:   row.get(6)?,
    occupation:    row.get(7)?,
    created_at:    row.get(8)?,
  })
}

fn summary_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUserSummary> {
  Ok(RawUserSummary {
    user_id:    row.get(0)?,
    first_name: row.get(1)?,
    last_name:  row.get(2)?,
  })
}

fn user_exists(conn: &rusqlite::Connection, user_id: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM users WHERE user_id = ?1",
        rusqlite::params![user_id],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

fn photo_exists(
  conn: &rusqlite::Connection,
  photo_id: &str,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM photos WHERE photo_id = ?1",
        rusqlite::params![photo_id],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

/// Load one photo row with its ordered comments, ordered tags, and likers.
fn load_photo(
  conn: &rusqlite::Connection,
  photo_id: &str,
) -> rusqlite::Result<Option<RawPhotoBundle>> {
  let raw: Option<RawPhoto> = conn
    .query_row(
      "SELECT photo_id, owner_id, file_name, created_at
       FROM photos WHERE photo_id = ?1",
      rusqlite::params![photo_id],
      |row| {
        Ok(RawPhoto {
          photo_id:   row.get(0)?,
          owner_id:   row.get(1)?,
          file_name:  row.get(2)?,
          created_at: row.get(3)?,
        })
      },
    )
    .optional()?;

  let Some(raw) = raw else { return Ok(None) };

  let comments = {
    let mut stmt = conn.prepare(
      "SELECT comment_id, author_id, body, created_at
       FROM comments WHERE photo_id = ?1 ORDER BY seq",
    )?;
    stmt
      .query_map(rusqlite::params![photo_id], |row| {
        Ok(RawComment {
          comment_id: row.get(0)?,
          author_id:  row.get(1)?,
          body:       row.get(2)?,
          created_at: row.get(3)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  let tags = {
    let mut stmt = conn.prepare(
      "SELECT tag_id, user_id, x, y, width, height, created_at
       FROM tags WHERE photo_id = ?1 ORDER BY seq",
    )?;
    stmt
      .query_map(rusqlite::params![photo_id], |row| {
        Ok(RawTag {
          tag_id:     row.get(0)?,
          user_id:    row.get(1)?,
          x:          row.get(2)?,
          y:          row.get(3)?,
          width:      row.get(4)?,
          height:     row.get(5)?,
          created_at: row.get(6)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  let likers = load_likers(conn, photo_id)?;

  Ok(Some((raw, comments, tags, likers)))
}

fn load_likers(
  conn: &rusqlite::Connection,
  photo_id: &str,
) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn
    .prepare("SELECT user_id FROM likes WHERE photo_id = ?1 ORDER BY rowid")?;
  stmt
    .query_map(rusqlite::params![photo_id], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()
}
