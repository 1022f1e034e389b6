//! Disk-backed storage for uploaded photo files.

use std::path::PathBuf;

use chrono::Utc;
use lightbox_core::{Error as CoreError, Result as CoreResult, files::FileStore};

/// Writes uploads into one directory, named `<millis>-<sanitised name>`.
///
/// The returned reference is the bare file name, so a database moved to a
/// new host keeps resolving as long as the upload directory moves with it.
#[derive(Clone)]
pub struct DiskFileStore {
  root: PathBuf,
}

impl DiskFileStore {
  /// Use `root` for uploads, creating the directory if needed.
  pub async fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
    let root = root.into();
    tokio::fs::create_dir_all(&root).await?;
    Ok(Self { root })
  }
}

impl FileStore for DiskFileStore {
  async fn save(
    &self,
    bytes: &[u8],
    suggested_name: &str,
  ) -> CoreResult<String> {
    let file_name = format!(
      "{}-{}",
      Utc::now().timestamp_millis(),
      sanitise(suggested_name)
    );
    tokio::fs::write(self.root.join(&file_name), bytes)
      .await
      .map_err(CoreError::store)?;
    Ok(file_name)
  }

  async fn delete(&self, file_ref: &str) -> CoreResult<()> {
    match tokio::fs::remove_file(self.root.join(sanitise(file_ref))).await {
      Ok(()) => Ok(()),
      // Already gone counts as deleted.
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(CoreError::store(e)),
    }
  }
}

/// Keep ASCII alphanumerics plus `.`, `-` and `_`; everything else,
/// path separators included, becomes `_`. Client-supplied names never
/// escape the upload directory.
fn sanitise(name: &str) -> String {
  let cleaned: String = name
    .chars()
    .map(|c| match c {
      c if c.is_ascii_alphanumeric() => c,
      '.' | '-' | '_' => c,
      _ => '_',
    })
    .collect();
  if cleaned.is_empty() {
    "upload".to_string()
  } else {
    cleaned
  }
}

#[cfg(test)]
mod tests {
  use super::sanitise;

  #[test]
  fn sanitise_neutralises_path_separators() {
    assert_eq!(sanitise("../../etc/passwd"), ".._.._etc_passwd");
    assert_eq!(sanitise("holiday photo.jpg"), "holiday_photo.jpg");
    assert_eq!(sanitise("caf\u{e9}.png"), "caf_.png");
  }

  #[test]
  fn sanitise_never_returns_an_empty_name() {
    assert_eq!(sanitise(""), "upload");
    assert_eq!(sanitise("///"), "___");
  }
}
