//! SQL schema for the Lightbox SQLite store.
//!
//! Applied in full at connection startup; every statement is idempotent.
//! `PRAGMA user_version` tags the installed revision so future migrations
//! can gate on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    login_name    TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,    -- Argon2id PHC string
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    location      TEXT,
    description   TEXT,
    occupation    TEXT,
    created_at    TEXT NOT NULL     -- ISO 8601 UTC; server-assigned
);

-- Aggregate roots. Sub-collection rows hang off photo_id and are removed
-- with their photo.
CREATE TABLE IF NOT EXISTS photos (
    photo_id   TEXT PRIMARY KEY,
    owner_id   TEXT NOT NULL REFERENCES users(user_id),
    file_name  TEXT NOT NULL,       -- reference into the file store
    created_at TEXT NOT NULL
);

-- Comments are keyed by id; seq carries per-photo insertion order so
-- deletion is by key, never by position.
CREATE TABLE IF NOT EXISTS comments (
    comment_id TEXT PRIMARY KEY,
    photo_id   TEXT NOT NULL REFERENCES photos(photo_id) ON DELETE CASCADE,
    author_id  TEXT NOT NULL REFERENCES users(user_id),
    body       TEXT NOT NULL,
    created_at TEXT NOT NULL,
    seq        INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS tags (
    tag_id     TEXT PRIMARY KEY,
    photo_id   TEXT NOT NULL REFERENCES photos(photo_id) ON DELETE CASCADE,
    user_id    TEXT NOT NULL REFERENCES users(user_id),   -- the tagged user
    x          REAL NOT NULL,       -- percentages of displayed dimensions
    y          REAL NOT NULL,
    width      REAL NOT NULL,
    height     REAL NOT NULL,
    created_at TEXT NOT NULL,
    seq        INTEGER NOT NULL
);

-- Liker-set membership; the composite key is the set semantics.
CREATE TABLE IF NOT EXISTS likes (
    photo_id   TEXT NOT NULL REFERENCES photos(photo_id) ON DELETE CASCADE,
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    created_at TEXT NOT NULL,
    PRIMARY KEY (photo_id, user_id)
);

CREATE INDEX IF NOT EXISTS photos_owner_idx    ON photos(owner_id);
CREATE INDEX IF NOT EXISTS comments_photo_idx  ON comments(photo_id);
CREATE INDEX IF NOT EXISTS comments_author_idx ON comments(author_id);
CREATE INDEX IF NOT EXISTS tags_photo_idx      ON tags(photo_id);
CREATE INDEX IF NOT EXISTS tags_user_idx       ON tags(user_id);
CREATE INDEX IF NOT EXISTS likes_user_idx      ON likes(user_id);

PRAGMA user_version = 1;
";
