use super::Message;
use crate::models::event::Event;
use crate::utils::time::DisplayZone;
use chrono::{DateTime, Utc};

pub fn exit_recorded(recipient: &str, at: &DateTime<Utc>, zone: &DisplayZone) -> Message {
    Message {
        recipient: recipient.to_string(),
        subject: "Exit recorded".to_string(),
        html_body: format!(
            "<h1>You have clocked out</h1><p>Recorded at: {}</p>",
            zone.format(at, "%H:%M")
        ),
    }
}

pub fn forgotten_exit(recipient: &str, event: &Event, zone: &DisplayZone) -> Message {
    Message {
        recipient: recipient.to_string(),
        subject: "Did you forget to clock out?".to_string(),
        html_body: format!(
            "<h1>Entry without exit detected</h1>\
             <p>Subject {} last punched {} on {}. Please review your records.</p>",
            event.subject_id,
            event.kind,
            zone.format(&event.timestamp, "%Y-%m-%d %H:%M:%S %:z")
        ),
    }
}
