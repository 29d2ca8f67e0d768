use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const EVENT_OCCUPANCY_STATS_GENERATED: &str = "occupancy_stats_generated";
pub const EVENT_RESERVATION_CREATED: &str = "reservation_created";
pub const EVENT_RESERVATION_UPDATED: &str = "reservation_updated";
pub const EVENT_RESERVATION_CANCELLED: &str = "reservation_cancelled";

/// Envelope shared with the booking system over the analytics queue.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QueueEvent {
    pub event: String,
    pub timestamp: String,
    pub data: Value,
}
