// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{event_to_row, get_headers};
use crate::export::{EventExport, notify_export_success};
use crate::ui::messages::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// CSV text: one header row, then one row per event in the given order.
/// Fields containing the delimiter are quoted by the writer.
pub(crate) fn render_csv(rows: &[EventExport]) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record(get_headers())?;
    for item in rows {
        wtr.write_record(event_to_row(item))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Export(format!("CSV flush error: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::Export(format!("CSV encoding error: {e}")))
}

/// Export JSON pretty-printed.
pub(crate) fn export_json(rows: &[EventExport], path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(rows)?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", path);
    Ok(())
}

pub(crate) fn export_csv(rows: &[EventExport], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let text = render_csv(rows)?;

    let mut file = File::create(path)?;
    file.write_all(text.as_bytes())?;

    notify_export_success("CSV", path);
    Ok(())
}
