use super::{event_type::PunchType, location::Location};
use crate::utils::time::DisplayZone;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored punch. Rows are only ever inserted, never updated.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Event {
    pub id: i64,                           // ⇔ punches.id (AUTOINCREMENT)
    pub subject_id: String,                // ⇔ punches.subject_id
    pub kind: PunchType,                   // ⇔ punches.kind
    pub timestamp: DateTime<Utc>,          // ⇔ punches.timestamp (RFC 3339, UTC)
    pub location: Option<Location>,        // ⇔ punches.location
    pub device_metadata: Option<String>,   // ⇔ punches.device_metadata
    pub is_manual_correction: bool,        // ⇔ punches.is_manual_correction (reserved)
    pub correction_reason: Option<String>, // ⇔ punches.correction_reason (reserved)
}

impl Event {
    pub fn date_str(&self, zone: &DisplayZone) -> String {
        zone.format(&self.timestamp, "%Y-%m-%d")
    }

    pub fn time_str(&self, zone: &DisplayZone) -> String {
        zone.format(&self.timestamp, "%H:%M:%S")
    }

    pub fn location_str(&self) -> String {
        self.location
            .as_ref()
            .map(|l| l.to_db_str())
            .unwrap_or_default()
    }
}

/// Everything needed to append a punch; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub subject_id: String,
    pub kind: PunchType,
    pub timestamp: DateTime<Utc>,
    pub location: Location,
    pub device_metadata: Option<String>,
}

impl NewEvent {
    pub fn new(
        subject_id: &str,
        kind: PunchType,
        timestamp: DateTime<Utc>,
        location: Location,
    ) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            kind,
            timestamp,
            location,
            device_metadata: None,
        }
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device_metadata = Some(device.into());
        self
    }
}
