use anyhow::Context;
use tracing::info;

use crate::models::event::{
    QueueEvent, EVENT_RESERVATION_CANCELLED, EVENT_RESERVATION_CREATED, EVENT_RESERVATION_UPDATED,
};

/// Handle one raw message from the analytics queue. Returning an `Err` makes
/// the consume loop negatively acknowledge and requeue the delivery.
pub fn handle_event(body: &[u8]) -> anyhow::Result<()> {
    let message: QueueEvent =
        serde_json::from_slice(body).context("Received a malformed queue message")?;

    match message.event.as_str() {
        EVENT_RESERVATION_CREATED => {
            info!("New reservation created: {}", message.data);
        }
        EVENT_RESERVATION_UPDATED => {
            info!("Reservation updated: {}", message.data);
        }
        EVENT_RESERVATION_CANCELLED => {
            info!("Reservation cancelled: {}", message.data);
        }
        other => {
            info!("Ignoring unhandled event type: {}", other);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_reservation_lifecycle_events() {
        for event in ["reservation_created", "reservation_updated", "reservation_cancelled"] {
            let body = serde_json::to_vec(&json!({
                "event": event,
                "timestamp": "2024-05-01T12:00:00Z",
                "data": {"reservation_id": 7, "hotel_id": 3}
            }))
            .unwrap();

            assert!(handle_event(&body).is_ok());
        }
    }

    #[test]
    fn accepts_unknown_event_types() {
        let body = serde_json::to_vec(&json!({
            "event": "maintenance_window",
            "timestamp": "2024-05-01T12:00:00Z",
            "data": {}
        }))
        .unwrap();

        assert!(handle_event(&body).is_ok());
    }

    #[test]
    fn rejects_malformed_messages() {
        assert!(handle_event(b"not json at all").is_err());
        assert!(handle_event(br#"{"event": 12}"#).is_err());
    }
}
