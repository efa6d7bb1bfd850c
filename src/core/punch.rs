use crate::core::transition::decide;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{append_event, latest_event};
use crate::errors::AppResult;
use crate::models::event::{Event, NewEvent};
use crate::models::event_type::PunchType;
use crate::models::location::Location;
use crate::notify::{Notifier, dispatch_detached, templates};
use crate::utils::time::DisplayZone;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::info;

/// Result of a punch request.
#[derive(Debug)]
pub enum PunchOutcome {
    /// The punch was stored.
    Recorded {
        event: Event,
        /// Set for `Exit`: the detached "exit recorded" notification.
        notification: Option<JoinHandle<()>>,
    },
    /// Not legal from the current status; nothing was written.
    Rejected { status: Option<PunchType> },
}

impl PunchOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, PunchOutcome::Recorded { .. })
    }
}

/// Who gets told about exits, and how.
pub struct ExitNotice {
    pub notifier: Arc<dyn Notifier>,
    pub recipient: String,
    pub zone: DisplayZone,
}

/// One punch request.
pub struct PunchRequest<'a> {
    pub subject_id: &'a str,
    pub kind: PunchType,
    pub latitude: Option<&'a str>,
    pub longitude: Option<&'a str>,
    pub device: Option<&'a str>,
    pub now: DateTime<Utc>,
}

impl<'a> PunchRequest<'a> {
    pub fn new(subject_id: &'a str, kind: PunchType, now: DateTime<Utc>) -> Self {
        Self {
            subject_id,
            kind,
            latitude: None,
            longitude: None,
            device: None,
            now,
        }
    }

    pub fn at(mut self, latitude: Option<&'a str>, longitude: Option<&'a str>) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }
}

/// High-level business logic for the `punch` command.
///
/// Reading the status and appending are two separate statements: two
/// concurrent requests for the same subject may both pass validation.
pub struct PunchLogic;

impl PunchLogic {
    pub fn perform(
        pool: &DbPool,
        req: &PunchRequest<'_>,
        exit_notice: Option<&ExitNotice>,
    ) -> AppResult<PunchOutcome> {
        // ------------------------------------------------
        // 1️⃣ Current status straight from the store
        // ------------------------------------------------
        let status = latest_event(&pool.conn, req.subject_id)?.map(|e| e.kind);

        // ------------------------------------------------
        // 2️⃣ Validate the transition
        // ------------------------------------------------
        if !decide(status, req.kind) {
            // Nothing is written on rejection, not even to the internal log.
            info!(
                subject = %req.subject_id,
                requested = %req.kind,
                current = ?status,
                "punch rejected"
            );
            return Ok(PunchOutcome::Rejected { status });
        }

        // ------------------------------------------------
        // 3️⃣ Append
        // ------------------------------------------------
        let mut new_event = NewEvent::new(
            req.subject_id,
            req.kind,
            req.now,
            Location::from_parts(req.latitude, req.longitude),
        );
        if let Some(device) = req.device {
            new_event = new_event.with_device(device);
        }

        let event = append_event(&pool.conn, &new_event)?;
        info!(subject = %event.subject_id, kind = %event.kind, id = event.id, "punch recorded");
        ttlog_quiet(
            &pool.conn,
            "punch",
            req.subject_id,
            &format!("{} at {}", event.kind, event.timestamp.to_rfc3339()),
        );

        // ------------------------------------------------
        // 4️⃣ Exit → notify without waiting
        // ------------------------------------------------
        let notification = match (event.kind, exit_notice) {
            (PunchType::Exit, Some(notice)) => {
                let msg =
                    templates::exit_recorded(&notice.recipient, &event.timestamp, &notice.zone);
                dispatch_detached(Arc::clone(&notice.notifier), msg)
            }
            _ => None,
        };

        Ok(PunchOutcome::Recorded {
            event,
            notification,
        })
    }
}
