//! Event store: the only place that talks SQL to the `punches` table.
//!
//! Every "latest" lookup orders by `timestamp DESC, id DESC`, so two punches
//! sharing a timestamp resolve to the one inserted last.

use crate::errors::{AppError, AppResult};
use crate::models::event::{Event, NewEvent};
use crate::models::event_type::PunchType;
use crate::models::location::Location;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const COLUMNS: &str = "id, subject_id, kind, timestamp, location, device_metadata, \
                       is_manual_correction, correction_reason";

/// Fixed-width UTC text so that string order equals time order.
pub fn ts_to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

pub fn map_row(row: &Row) -> Result<Event> {
    let kind_str: String = row.get("kind")?;
    let kind = PunchType::from_db_str(&kind_str)
        .ok_or_else(|| conversion_error(2, AppError::InvalidPunchType(kind_str.clone())))?;

    let ts_str: String = row.get("timestamp")?;
    let timestamp = DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| conversion_error(3, AppError::InvalidTimestamp(ts_str.clone())))?;

    let loc_str: Option<String> = row.get("location")?;
    let location = loc_str.as_deref().and_then(Location::from_db_str);

    Ok(Event {
        id: row.get("id")?,
        subject_id: row.get("subject_id")?,
        kind,
        timestamp,
        location,
        device_metadata: row.get("device_metadata")?,
        is_manual_correction: row.get::<_, i32>("is_manual_correction")? == 1,
        correction_reason: row.get("correction_reason")?,
    })
}

fn collect(rows: impl Iterator<Item = Result<Event>>) -> AppResult<Vec<Event>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Append a punch. Returns the stored row once SQLite confirmed the insert.
///
/// The timestamp is cut to the stored precision (microseconds) first, so the
/// returned event equals what later reads produce.
pub fn append_event(conn: &Connection, ev: &NewEvent) -> AppResult<Event> {
    let timestamp = ev.timestamp.trunc_subsecs(6);

    conn.execute(
        "INSERT INTO punches (subject_id, kind, timestamp, location, device_metadata)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            ev.subject_id,
            ev.kind.to_db_str(),
            ts_to_db(&timestamp),
            ev.location.to_db_str(),
            ev.device_metadata,
        ],
    )?;

    let id = conn.last_insert_rowid();

    Ok(Event {
        id,
        subject_id: ev.subject_id.clone(),
        kind: ev.kind,
        timestamp,
        location: Some(ev.location.clone()),
        device_metadata: ev.device_metadata.clone(),
        is_manual_correction: false,
        correction_reason: None,
    })
}

/// Most recent punch for one subject.
pub fn latest_event(conn: &Connection, subject_id: &str) -> AppResult<Option<Event>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM punches
         WHERE subject_id = ?1
         ORDER BY timestamp DESC, id DESC
         LIMIT 1"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([subject_id], map_row).optional()?)
}

/// One row per distinct subject: that subject's most recent punch.
pub fn latest_event_per_subject(conn: &Connection) -> AppResult<Vec<Event>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM (
             SELECT p.*,
                    ROW_NUMBER() OVER (
                        PARTITION BY subject_id
                        ORDER BY timestamp DESC, id DESC
                    ) AS rn
             FROM punches p
         )
         WHERE rn = 1
         ORDER BY subject_id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_row)?;
    collect(rows)
}

/// Punches in `[start, end)`, newest first.
pub fn events_in_range(
    conn: &Connection,
    subject_id: &str,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> AppResult<Vec<Event>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM punches
         WHERE subject_id = ?1 AND timestamp >= ?2 AND timestamp < ?3
         ORDER BY timestamp DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![subject_id, ts_to_db(start), ts_to_db(end)], map_row)?;
    collect(rows)
}

/// The `limit` most recent punches, newest first.
pub fn recent_events(conn: &Connection, subject_id: &str, limit: usize) -> AppResult<Vec<Event>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM punches
         WHERE subject_id = ?1
         ORDER BY timestamp DESC, id DESC
         LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt.query_map(params![subject_id, limit], map_row)?;
    collect(rows)
}

/// Every punch of a subject, newest first.
pub fn all_events(conn: &Connection, subject_id: &str) -> AppResult<Vec<Event>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM punches
         WHERE subject_id = ?1
         ORDER BY timestamp DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([subject_id], map_row)?;
    collect(rows)
}

pub fn count_events(conn: &Connection, subject_id: &str) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM punches WHERE subject_id = ?1",
        [subject_id],
        |row| row.get(0),
    )?)
}

/// Rows of the internal `log` table, oldest first.
pub fn load_log(conn: &Connection) -> AppResult<Vec<(i64, String, String, String, String)>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, IFNULL(target, ''), message FROM log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
