mod common;

use chrono::NaiveDate;
use common::{at, seed};
use rfichaje::db::pool::DbPool;
use rfichaje::db::queries::{all_events, append_event};
use rfichaje::export::{ExportFormat, ExportLogic, ExportOptions};
use rfichaje::models::event::NewEvent;
use rfichaje::models::event_type::PunchType::*;
use rfichaje::models::location::Location;
use rfichaje::utils::time::DisplayZone;
use std::fs;
use tempfile::TempDir;

const ALICE: &str = "alice";

fn options(file: &str, format: ExportFormat) -> ExportOptions {
    ExportOptions {
        subject_id: ALICE.into(),
        format,
        file: Some(file.to_string()),
        from: None,
        to: None,
        force: true,
        device_label: "CLI".into(),
        zone: DisplayZone::utc(),
    }
}

#[test]
fn test_csv_rows_are_newest_first() {
    let pool = DbPool::open_in_memory().expect("db");
    seed(&pool, ALICE, Entry, "2024-01-01T08:00:00Z");
    seed(&pool, ALICE, Exit, "2024-01-02T09:00:00Z");

    let events = all_events(&pool.conn, ALICE).expect("events");
    let csv = ExportLogic::render_csv(&events, &DisplayZone::utc(), "CLI").expect("csv");
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(
        lines,
        vec![
            "date,time,type,location,device",
            "2024-01-02,09:00:00,Exit,not granted,CLI",
            "2024-01-01,08:00:00,Entry,not granted,CLI",
        ]
    );
}

#[test]
fn test_csv_quotes_coordinates() {
    let pool = DbPool::open_in_memory().expect("db");
    append_event(
        &pool.conn,
        &NewEvent::new(
            ALICE,
            Entry,
            at("2024-01-01T08:00:00Z"),
            Location::from_parts(Some("40.4168"), Some("-3.7038")),
        ),
    )
    .expect("append");

    let events = all_events(&pool.conn, ALICE).expect("events");
    let csv = ExportLogic::render_csv(&events, &DisplayZone::utc(), "CLI").expect("csv");
    let row = csv.lines().nth(1).expect("data row");
    assert_eq!(row, "2024-01-01,08:00:00,Entry,\"40.4168,-3.7038\",CLI");
}

#[test]
fn test_csv_uses_display_zone() {
    let pool = DbPool::open_in_memory().expect("db");
    seed(&pool, ALICE, Entry, "2024-01-01T23:30:00Z");

    let zone = DisplayZone::parse("+01:00").expect("zone");
    let events = all_events(&pool.conn, ALICE).expect("events");
    let csv = ExportLogic::render_csv(&events, &zone, "CLI").expect("csv");
    assert!(csv.contains("2024-01-02,00:30:00,Entry"));
}

#[test]
fn test_default_file_name() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 2).expect("date");
    assert_eq!(
        ExportLogic::default_file_name(today, ExportFormat::Csv),
        "timeclock_report_20240102.csv"
    );
    assert_eq!(
        ExportLogic::default_file_name(today, ExportFormat::Json),
        "timeclock_report_20240102.json"
    );
}

#[test]
fn test_export_writes_csv_and_json_files() {
    let tmp = TempDir::new().expect("temp dir");
    let pool = DbPool::open_in_memory().expect("db");
    seed(&pool, ALICE, Entry, "2024-01-01T08:00:00Z");
    seed(&pool, ALICE, Exit, "2024-01-01T16:00:00Z");

    let csv_path = tmp.path().join("out").join("report.csv");
    let written = ExportLogic::export(
        &pool,
        &options(&csv_path.to_string_lossy(), ExportFormat::Csv),
    )
    .expect("export")
    .expect("path");
    assert_eq!(written, csv_path);
    let content = fs::read_to_string(&csv_path).expect("read csv");
    assert!(content.starts_with("date,time,type,location,device"));
    assert_eq!(content.lines().count(), 3);

    let json_path = tmp.path().join("report.json");
    ExportLogic::export(
        &pool,
        &options(&json_path.to_string_lossy(), ExportFormat::Json),
    )
    .expect("export");
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("read json")).expect("json");
    let rows = parsed.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["type"], "Exit");
    assert_eq!(rows[1]["time"], "08:00:00");
}

#[test]
fn test_export_with_range_and_empty_result() {
    let tmp = TempDir::new().expect("temp dir");
    let pool = DbPool::open_in_memory().expect("db");
    seed(&pool, ALICE, Entry, "2024-01-01T08:00:00Z");
    seed(&pool, ALICE, Exit, "2024-01-03T08:00:00Z");

    let path = tmp.path().join("jan3.csv");
    let mut opts = options(&path.to_string_lossy(), ExportFormat::Csv);
    opts.from = NaiveDate::from_ymd_opt(2024, 1, 3);
    opts.to = NaiveDate::from_ymd_opt(2024, 1, 3);
    ExportLogic::export(&pool, &opts).expect("export");
    let content = fs::read_to_string(&path).expect("read");
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("2024-01-03,08:00:00,Exit"));

    let empty = tmp.path().join("empty.csv");
    let mut opts = options(&empty.to_string_lossy(), ExportFormat::Csv);
    opts.from = NaiveDate::from_ymd_opt(2024, 2, 1);
    opts.to = NaiveDate::from_ymd_opt(2024, 2, 2);
    assert_eq!(ExportLogic::export(&pool, &opts).expect("export"), None);
    assert!(!empty.exists());
}
