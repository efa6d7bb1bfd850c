use super::{event::Event, event_type::PunchType};
use chrono::NaiveDate;
use serde::Serialize;

/// Read-only data behind the `status` command.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub subject_id: String,
    pub status: Option<PunchType>,
    pub allowed_actions: Vec<PunchType>,
    pub history: Vec<Event>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl StatusView {
    pub fn status_label(&self) -> &'static str {
        match self.status {
            None => "no punches yet",
            Some(PunchType::Entry) => "working",
            Some(PunchType::PauseEnd) => "working (back from pause)",
            Some(PunchType::PauseStart) => "on pause",
            Some(PunchType::Exit) => "clocked out",
        }
    }
}
