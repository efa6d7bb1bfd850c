mod common;

use chrono::NaiveDate;
use common::{at, seed};
use rfichaje::db::migrate::{applied_versions, run_pending_migrations};
use rfichaje::db::pool::DbPool;
use rfichaje::db::queries::{
    all_events, events_in_range, latest_event, latest_event_per_subject, recent_events,
};
use rfichaje::db::stats::collect_stats;
use rfichaje::models::event_type::PunchType::*;
use rfichaje::utils::time::{DisplayZone, day_range_utc};

const ALICE: &str = "alice";

#[test]
fn test_same_timestamp_resolves_to_last_inserted() {
    let pool = DbPool::open_in_memory().expect("db");
    seed(&pool, ALICE, Entry, "2024-01-01T08:00:00Z");
    seed(&pool, ALICE, PauseStart, "2024-01-01T08:00:00Z");

    let latest = latest_event(&pool.conn, ALICE).expect("latest").expect("some");
    assert_eq!(latest.kind, PauseStart);

    let per_subject = latest_event_per_subject(&pool.conn).expect("latest");
    assert_eq!(per_subject.len(), 1);
    assert_eq!(per_subject[0].id, latest.id);
}

#[test]
fn test_latest_follows_timestamp_not_insertion() {
    let pool = DbPool::open_in_memory().expect("db");
    seed(&pool, ALICE, Exit, "2024-01-02T09:00:00Z");
    seed(&pool, ALICE, Entry, "2024-01-01T08:00:00Z");

    let latest = latest_event(&pool.conn, ALICE).expect("latest").expect("some");
    assert_eq!(latest.kind, Exit);

    let all = all_events(&pool.conn, ALICE).expect("all");
    assert!(all.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
}

#[test]
fn test_history_is_newest_first_and_limited() {
    let pool = DbPool::open_in_memory().expect("db");
    for day in 1..=9 {
        seed(&pool, ALICE, Entry, &format!("2024-01-0{day}T08:00:00Z"));
        seed(&pool, ALICE, Exit, &format!("2024-01-0{day}T16:00:00Z"));
    }

    let recent = recent_events(&pool.conn, ALICE, 5).expect("recent");
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].timestamp, at("2024-01-09T16:00:00Z"));
    assert!(recent.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

    assert!(recent_events(&pool.conn, "nobody", 5).expect("recent").is_empty());
}

#[test]
fn test_range_excludes_the_upper_bound() {
    let pool = DbPool::open_in_memory().expect("db");
    seed(&pool, ALICE, Entry, "2023-12-31T23:59:59Z");
    seed(&pool, ALICE, Exit, "2024-01-01T00:00:00Z");
    seed(&pool, ALICE, Entry, "2024-01-01T23:59:59Z");
    seed(&pool, ALICE, Exit, "2024-01-02T00:00:00Z");

    let day = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
    let (start, end) = day_range_utc(&DisplayZone::utc(), day, day).expect("range");
    assert_eq!(start, at("2024-01-01T00:00:00Z"));
    assert_eq!(end, at("2024-01-02T00:00:00Z"));

    let events = events_in_range(&pool.conn, ALICE, &start, &end).expect("range");
    let stamps: Vec<String> = events.iter().map(|e| e.timestamp.to_rfc3339()).collect();
    assert_eq!(
        stamps,
        vec!["2024-01-01T23:59:59+00:00", "2024-01-01T00:00:00+00:00"]
    );
}

#[test]
fn test_range_respects_display_offset() {
    let pool = DbPool::open_in_memory().expect("db");
    // 23:30 on Jan 1st in UTC is already Jan 2nd at +02:00
    seed(&pool, ALICE, Entry, "2024-01-01T23:30:00Z");

    let zone = DisplayZone::parse("+02:00").expect("zone");
    let day = NaiveDate::from_ymd_opt(2024, 1, 2).expect("date");
    let (start, end) = day_range_utc(&zone, day, day).expect("range");

    let events = events_in_range(&pool.conn, ALICE, &start, &end).expect("range");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].date_str(&zone), "2024-01-02");
    assert_eq!(events[0].time_str(&zone), "01:30:00");
}

#[test]
fn test_reversed_range_is_an_error() {
    let from = NaiveDate::from_ymd_opt(2024, 1, 5).expect("date");
    let to = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
    assert!(day_range_utc(&DisplayZone::utc(), from, to).is_err());
}

#[test]
fn test_migrations_are_idempotent() {
    let pool = DbPool::open_in_memory().expect("db");
    let before = applied_versions(&pool.conn).expect("versions");
    assert!(!before.is_empty());

    run_pending_migrations(&pool.conn).expect("re-run");
    assert_eq!(applied_versions(&pool.conn).expect("versions"), before);
}

#[test]
fn test_stats_cover_every_subject() {
    let pool = DbPool::open_in_memory().expect("db");
    let empty = collect_stats(&pool).expect("stats");
    assert_eq!(empty.total_punches, 0);
    assert_eq!(empty.first, None);

    seed(&pool, ALICE, Entry, "2024-01-01T08:00:00Z");
    seed(&pool, ALICE, Exit, "2024-01-01T16:00:00Z");
    seed(&pool, "bob", Entry, "2024-01-02T07:00:00Z");

    let stats = collect_stats(&pool).expect("stats");
    assert_eq!(stats.total_punches, 3);
    assert_eq!(stats.subjects, 2);
    assert_eq!(stats.first.as_deref(), Some("2024-01-01T08:00:00.000000Z"));
    assert_eq!(stats.last.as_deref(), Some("2024-01-02T07:00:00.000000Z"));
}
