// src/export/logic.rs

use crate::db::pool::DbPool;
use crate::db::queries::{all_events, events_in_range};
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json, render_csv};
use crate::export::model::EventExport;
use crate::models::event::Event;
use crate::ui::messages::warning;
use crate::utils::time::{DisplayZone, day_range_utc};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Parameters of one export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub subject_id: String,
    pub format: ExportFormat,
    /// `None` → `timeclock_report_<YYYYMMDD>.<ext>` in the working directory.
    pub file: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub force: bool,
    pub device_label: String,
    pub zone: DisplayZone,
}

/// High-level logic for the `export` command.
pub struct ExportLogic;

impl ExportLogic {
    /// Report file name for `today`, e.g. `timeclock_report_20240102.csv`.
    pub fn default_file_name(today: NaiveDate, format: ExportFormat) -> String {
        format!(
            "timeclock_report_{}.{}",
            today.format("%Y%m%d"),
            format.as_str()
        )
    }

    /// Render events (already newest first) as CSV text.
    pub fn render_csv(events: &[Event], zone: &DisplayZone, device: &str) -> AppResult<String> {
        render_csv(&to_rows(events, zone, device))
    }

    /// Export one subject's punches. Returns the written path, or `None` when
    /// there was nothing to export.
    pub fn export(pool: &DbPool, opts: &ExportOptions) -> AppResult<Option<PathBuf>> {
        let path = match &opts.file {
            Some(f) => PathBuf::from(f),
            None => PathBuf::from(Self::default_file_name(
                crate::utils::date::today(),
                opts.format,
            )),
        };

        ensure_writable(&path, opts.force)?;

        let events = load_events(pool, opts)?;
        if events.is_empty() {
            warning("No punches found for the selected range. Nothing to export.");
            return Ok(None);
        }

        let rows = to_rows(&events, &opts.zone, &opts.device_label);
        match opts.format {
            ExportFormat::Csv => export_csv(&rows, &path)?,
            ExportFormat::Json => export_json(&rows, &path)?,
        }

        Ok(Some(path))
    }
}

fn to_rows(events: &[Event], zone: &DisplayZone, device: &str) -> Vec<EventExport> {
    events
        .iter()
        .map(|ev| EventExport::from_event(ev, zone, device))
        .collect()
}

/// Date range when both bounds are set, every punch otherwise. Newest first.
fn load_events(pool: &DbPool, opts: &ExportOptions) -> AppResult<Vec<Event>> {
    match (opts.from, opts.to) {
        (Some(from), Some(to)) => {
            let (start, end) = day_range_utc(&opts.zone, from, to)?;
            events_in_range(&pool.conn, &opts.subject_id, &start, &end)
        }
        _ => all_events(&pool.conn, &opts.subject_id),
    }
}
