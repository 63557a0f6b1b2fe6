//! Status-change notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sensor::FilamentStatus;

/// Payload pushed to subscribers when the sensor status changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    pub status: FilamentStatus,
    #[serde(rename = "type")]
    pub kind: String,
    pub at: DateTime<Utc>,
}

impl StatusEvent {
    pub fn status_update(status: FilamentStatus) -> Self {
        Self {
            status,
            kind: "status_update".to_string(),
            at: Utc::now(),
        }
    }
}

/// Capability to push status events to whoever is listening.
///
/// Delivery is best-effort and fire-and-forget: no queueing, no retry. If
/// nobody is subscribed the event is dropped.
pub trait NotificationSink: Send {
    fn publish(&mut self, event: &StatusEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_update_event_shape() {
        let event = StatusEvent::status_update(FilamentStatus::Absent);
        assert_eq!(event.status, FilamentStatus::Absent);
        assert_eq!(event.kind, "status_update");

        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["status"], 0);
        assert_eq!(json["type"], "status_update");
    }
}
