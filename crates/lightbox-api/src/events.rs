//! Live like feed.
//!
//! | Method | Path                         | Notes |
//! |--------|------------------------------|-------|
//! | `GET`  | `/events/likes[?photo_id=…]` | WebSocket; one JSON text frame per event |
//!
//! One broadcast topic carries every [`LikeEvent`]; each subscriber filters
//! by photo on its own side. Delivery is at most once: a subscriber that
//! lags past the channel capacity skips ahead and converges by re-reading
//! the photo. The feed carries nothing secret, so it is open to anonymous
//! viewers.

use axum::{
  extract::{
    Query, State,
    ws::{Message, WebSocket, WebSocketUpgrade},
  },
  response::Response,
};
use lightbox_core::{event::LikeEvent, files::FileStore, store::ContentStore};
use serde::Deserialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::AppState;

// ─── Bus ─────────────────────────────────────────────────────────────────────

/// Fan-out handle for like events. Cloning shares the underlying channel.
#[derive(Clone)]
pub struct LikeBus {
  tx: broadcast::Sender<LikeEvent>,
}

impl LikeBus {
  /// A bus retaining at most `capacity` undelivered events per subscriber.
  pub fn new(capacity: usize) -> Self {
    let (tx, _) = broadcast::channel(capacity);
    Self { tx }
  }

  /// Fire-and-forget publish. An event with no subscribers is dropped;
  /// the triggering mutation has already committed either way.
  pub fn publish(&self, event: LikeEvent) {
    if self.tx.send(event).is_err() {
      tracing::debug!("like event dropped, no subscribers");
    }
  }

  pub fn subscribe(&self) -> broadcast::Receiver<LikeEvent> {
    self.tx.subscribe()
  }
}

// ─── Feed handler ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FeedParams {
  /// Restrict the feed to one photo's events.
  pub photo_id: Option<Uuid>,
}

/// `GET /events/likes[?photo_id=…]`
pub async fn like_feed<S, F>(
  State(state): State<AppState<S, F>>,
  Query(params): Query<FeedParams>,
  upgrade: WebSocketUpgrade,
) -> Response
where
  S: ContentStore,
  F: FileStore,
{
  let rx = state.likes.subscribe();
  upgrade
    .on_upgrade(move |socket| forward_events(socket, rx, params.photo_id))
}

async fn forward_events(
  mut socket: WebSocket,
  mut rx: broadcast::Receiver<LikeEvent>,
  filter: Option<Uuid>,
) {
  loop {
    tokio::select! {
      event = rx.recv() => match event {
        Ok(event) => {
          if filter.is_some_and(|photo_id| photo_id != event.photo_id) {
            continue;
          }
          let Ok(frame) = serde_json::to_string(&event) else { continue };
          if socket.send(Message::Text(frame.into())).await.is_err() {
            break;
          }
        }
        Err(broadcast::error::RecvError::Lagged(skipped)) => {
          // Skip ahead; clients converge through GET /photos/{id}.
          tracing::debug!("like feed lagged, skipped {skipped} events");
        }
        Err(broadcast::error::RecvError::Closed) => break,
      },
      message = socket.recv() => {
        // Any inbound frame is ignored; None means the peer went away.
        if message.is_none() {
          break;
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn publish_without_subscribers_is_a_no_op() {
    let bus = LikeBus::new(8);
    bus.publish(LikeEvent {
      photo_id: Uuid::new_v4(),
      likers:   vec![],
    });
  }

  #[tokio::test]
  async fn subscribers_see_published_events() {
    let bus = LikeBus::new(8);
    let mut rx = bus.subscribe();

    let photo_id = Uuid::new_v4();
    let liker = Uuid::new_v4();
    bus.publish(LikeEvent {
      photo_id,
      likers: vec![liker],
    });

    let event = rx.recv().await.unwrap();
    assert_eq!(event.photo_id, photo_id);
    assert_eq!(event.likers, vec![liker]);
  }
}
