// src/export/model.rs

use crate::models::event::Event;
use crate::utils::time::DisplayZone;
use serde::Serialize;

/// Flat export row, times rendered in the display zone.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct EventExport {
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub device: String,
}

impl EventExport {
    pub fn from_event(ev: &Event, zone: &DisplayZone, device: &str) -> Self {
        Self {
            date: ev.date_str(zone),
            time: ev.time_str(zone),
            kind: ev.kind.name().to_string(),
            location: ev.location_str(),
            device: device.to_string(),
        }
    }
}

/// CSV header row.
pub(crate) fn get_headers() -> [&'static str; 5] {
    ["date", "time", "type", "location", "device"]
}

pub(crate) fn event_to_row(e: &EventExport) -> [&str; 5] {
    [&e.date, &e.time, &e.kind, &e.location, &e.device]
}
