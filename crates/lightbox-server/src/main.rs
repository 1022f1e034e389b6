//! Lightbox server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite content store, prepares the upload directory, and
//! serves the photo-sharing API over HTTP.
//!
//! Every configuration key has a default, so the server starts a working
//! instance with `lightbox.db` and `uploads/` in the current directory
//! even without a config file. `LIGHTBOX_`-prefixed environment variables
//! override both, e.g. `LIGHTBOX_PORT=9090`.

mod files;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use lightbox_api::AppState;
use lightbox_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use files::DiskFileStore;

#[derive(Parser)]
#[command(author, version, about = "Lightbox photo-sharing server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:                  String,
  #[serde(default = "default_port")]
  port:                  u16,
  #[serde(default = "default_db_path")]
  db_path:               PathBuf,
  #[serde(default = "default_upload_dir")]
  upload_dir:            PathBuf,
  /// Broadcast buffer per like-feed subscriber before lag drops events.
  #[serde(default = "default_like_channel_capacity")]
  like_channel_capacity: usize,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8080
}

fn default_db_path() -> PathBuf {
  PathBuf::from("lightbox.db")
}

fn default_upload_dir() -> PathBuf {
  PathBuf::from("uploads")
}

fn default_like_channel_capacity() -> usize {
  64
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("LIGHTBOX"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in filesystem paths.
  let db_path    = expand_tilde(&server_cfg.db_path);
  let upload_dir = expand_tilde(&server_cfg.upload_dir);

  // Open the SQLite store and the upload directory.
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;

  let files = DiskFileStore::new(&upload_dir).await.with_context(|| {
    format!("failed to prepare upload directory {upload_dir:?}")
  })?;

  // Build application state and the router.
  let state = AppState::new(
    Arc::new(store),
    Arc::new(files),
    server_cfg.like_channel_capacity,
  );

  let app = lightbox_api::router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
