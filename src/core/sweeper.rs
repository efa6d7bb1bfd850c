//! Background check for subjects who never clocked out.
//!
//! One thread, one pass at a time. Each pass opens its own connection and
//! drops it before waiting for the next one.

use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::latest_event_per_subject;
use crate::errors::AppResult;
use crate::models::event::Event;
use crate::notify::{Notifier, templates};
use crate::utils::time::DisplayZone;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{error, info, warn};

/// Latest punches that are a working state older than `threshold`.
pub fn find_stale<'a>(
    latest: &'a [Event],
    now: DateTime<Utc>,
    threshold: Duration,
) -> Vec<&'a Event> {
    let Ok(threshold) = chrono::Duration::from_std(threshold) else {
        return Vec::new();
    };

    latest
        .iter()
        .filter(|ev| ev.kind.is_working() && now.signed_duration_since(ev.timestamp) > threshold)
        .collect()
}

#[derive(Debug, Clone)]
pub struct SweepSettings {
    pub db_path: String,
    pub recipient: String,
    pub interval: Duration,
    pub threshold: Duration,
    pub zone: DisplayZone,
}

/// Outcome of one pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SweepReport {
    pub subjects_checked: usize,
    pub flagged: Vec<String>,
    pub notified: usize,
    pub failed: usize,
}

pub struct Sweeper {
    settings: SweepSettings,
    notifier: Arc<dyn Notifier>,
}

impl Sweeper {
    /// `notifier` should already be bounded (see `notify::TimedNotifier`).
    pub fn new(settings: SweepSettings, notifier: Arc<dyn Notifier>) -> Self {
        Self { settings, notifier }
    }

    /// One full pass at `now`.
    pub fn run_cycle(&self, now: DateTime<Utc>) -> AppResult<SweepReport> {
        // Scoped to this pass; dropped on return.
        let pool = DbPool::open(&self.settings.db_path)?;
        let latest = latest_event_per_subject(&pool.conn)?;

        let stale = find_stale(&latest, now, self.settings.threshold);
        let mut report = SweepReport {
            subjects_checked: latest.len(),
            ..SweepReport::default()
        };

        for ev in stale {
            warn!(
                subject = %ev.subject_id,
                kind = %ev.kind,
                since = %ev.timestamp.to_rfc3339(),
                "subject appears to have forgotten to clock out"
            );
            report.flagged.push(ev.subject_id.clone());

            let msg = templates::forgotten_exit(&self.settings.recipient, ev, &self.settings.zone);
            match self.notifier.send(&msg) {
                Ok(()) => report.notified += 1,
                Err(e) => {
                    error!(subject = %ev.subject_id, error = %e, "stale warning not delivered");
                    report.failed += 1;
                }
            }
        }

        if !report.flagged.is_empty() {
            ttlog_quiet(
                &pool.conn,
                "sweep",
                "",
                &format!(
                    "flagged {} of {} subjects: {}",
                    report.flagged.len(),
                    report.subjects_checked,
                    report.flagged.join(", ")
                ),
            );
        }

        Ok(report)
    }

    /// Start the background loop. Errors in a pass are logged; the loop goes on.
    pub fn spawn(self) -> AppResult<SweeperHandle> {
        self.spawn_limited(None)
    }

    /// Like `spawn`, but stops by itself after `max_cycles` passes (`Some(0)`
    /// runs none).
    pub fn spawn_limited(self, max_cycles: Option<u64>) -> AppResult<SweeperHandle> {
        let (tx, rx) = mpsc::channel::<()>();
        let interval = self.settings.interval;

        let join = thread::Builder::new().name("sweeper".into()).spawn(move || {
            info!(interval_secs = interval.as_secs(), "sweeper started");
            let mut cycles: u64 = 0;

            let limit_reached = |done: u64| max_cycles.is_some_and(|max| done >= max);

            while !limit_reached(cycles) {
                match self.run_cycle(Utc::now()) {
                    Ok(report) => info!(
                        checked = report.subjects_checked,
                        flagged = report.flagged.len(),
                        failed = report.failed,
                        "sweep completed"
                    ),
                    Err(e) => error!(error = %e, "sweep failed"),
                }

                cycles += 1;
                if limit_reached(cycles) {
                    break;
                }

                // The wait doubles as the shutdown listener.
                match rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            info!(cycles, "sweeper stopped");
            cycles
        })?;

        Ok(SweeperHandle { stop: tx, join })
    }
}

pub struct SweeperHandle {
    stop: Sender<()>,
    join: JoinHandle<u64>,
}

impl SweeperHandle {
    /// Wake the sweeper out of its wait and let it exit.
    pub fn shutdown(&self) {
        let _ = self.stop.send(());
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the thread to exit. Returns the number of completed passes.
    pub fn join(self) -> u64 {
        let cycles = self.join.join().unwrap_or_else(|_| {
            error!("sweeper thread panicked");
            0
        });
        drop(self.stop);
        cycles
    }

    /// `shutdown` + `join`.
    pub fn stop(self) -> u64 {
        self.shutdown();
        self.join()
    }
}
