//! The like-feed event payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Published after every successful like toggle.
///
/// Carries the full resulting liker set, not a delta, so consumers replace
/// their copy wholesale and the order of rapid toggles cannot corrupt
/// anything. Delivery is at-most-once and purely a refresh hint: the store
/// stays the single source of truth, and a subscriber that misses an event
/// converges on its next full photo fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeEvent {
  pub photo_id: Uuid,
  pub likers:   Vec<Uuid>,
}
