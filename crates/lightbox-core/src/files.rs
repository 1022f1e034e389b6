//! The file storage boundary.

use std::future::Future;

use crate::Result;

/// Where uploaded image bytes live.
///
/// The content core stores only the returned reference, never raw bytes.
/// Failures wrap into [`Error::Store`](crate::Error::Store); orchestration
/// of the write-then-create ordering and of best-effort cleanup lives in
/// [`crate::gateway`].
pub trait FileStore: Send + Sync {
  /// Persist `bytes` under a fresh, stable reference derived from
  /// `suggested_name`.
  fn save<'a>(
    &'a self,
    bytes: &'a [u8],
    suggested_name: &'a str,
  ) -> impl Future<Output = Result<String>> + Send + 'a;

  /// Delete the file behind `file_ref`.
  fn delete<'a>(
    &'a self,
    file_ref: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;
}
