//! SQLite backend for the Lightbox content store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Photos are stored relationally
//! (comments, tags, and likes in child tables keyed by photo) and reassembled
//! into [`lightbox_core::photo::Photo`] aggregates on read.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
