mod common;

use common::{RecordingNotifier, at, seed};
use rfichaje::core::punch::{ExitNotice, PunchLogic, PunchOutcome, PunchRequest};
use rfichaje::core::status::{HistoryFilter, StatusLogic};
use rfichaje::db::pool::DbPool;
use rfichaje::db::queries::{count_events, latest_event, recent_events};
use rfichaje::models::event_type::PunchType::{self, *};
use rfichaje::models::location::Location;
use rfichaje::notify::Notifier;
use rfichaje::utils::time::DisplayZone;
use std::sync::Arc;

const ALICE: &str = "11111111-1111-1111-1111-111111111111";

fn punch(pool: &DbPool, kind: PunchType, ts: &str) -> PunchOutcome {
    PunchLogic::perform(pool, &PunchRequest::new(ALICE, kind, at(ts)), None).expect("punch")
}

#[test]
fn test_cold_start_only_entry_is_allowed() {
    let pool = DbPool::open_in_memory().expect("db");

    let view = StatusLogic::build_view(
        &pool,
        ALICE,
        HistoryFilter::default(),
        20,
        &DisplayZone::utc(),
    )
    .expect("view");
    assert_eq!(view.status, None);
    assert_eq!(view.allowed_actions, vec![Entry]);
    assert!(view.history.is_empty());

    for kind in [Exit, PauseStart, PauseEnd] {
        let outcome = punch(&pool, kind, "2024-01-01T08:00:00Z");
        assert!(matches!(outcome, PunchOutcome::Rejected { status: None }));
    }
    assert_eq!(count_events(&pool.conn, ALICE).expect("count"), 0);

    assert!(punch(&pool, Entry, "2024-01-01T08:00:00Z").is_recorded());
}

#[test]
fn test_full_day_cycle() {
    let pool = DbPool::open_in_memory().expect("db");

    let steps = [
        (Entry, "2024-01-01T08:00:00Z", vec![Exit, PauseStart]),
        (PauseStart, "2024-01-01T12:00:00Z", vec![PauseEnd]),
        (PauseEnd, "2024-01-01T12:30:00Z", vec![Exit, PauseStart]),
        (Exit, "2024-01-01T17:00:00Z", vec![Entry]),
    ];

    for (kind, ts, allowed_after) in steps {
        assert!(punch(&pool, kind, ts).is_recorded(), "{kind} rejected");
        let view = StatusLogic::build_view(
            &pool,
            ALICE,
            HistoryFilter::default(),
            20,
            &DisplayZone::utc(),
        )
        .expect("view");
        assert_eq!(view.status, Some(kind));
        assert_eq!(view.allowed_actions, allowed_after);
    }

    let history = recent_events(&pool.conn, ALICE, 20).expect("history");
    let kinds: Vec<PunchType> = history.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![Exit, PauseEnd, PauseStart, Entry]);
}

#[test]
fn test_out_of_order_steps_are_rejected() {
    let pool = DbPool::open_in_memory().expect("db");
    punch(&pool, Entry, "2024-01-01T08:00:00Z");

    // Can't resume a pause that never started
    assert!(!punch(&pool, PauseEnd, "2024-01-01T09:00:00Z").is_recorded());
    punch(&pool, PauseStart, "2024-01-01T10:00:00Z");
    // Can't leave while paused
    assert!(!punch(&pool, Exit, "2024-01-01T10:05:00Z").is_recorded());

    let latest = latest_event(&pool.conn, ALICE).expect("latest").expect("some");
    assert_eq!(latest.kind, PauseStart);
    assert_eq!(count_events(&pool.conn, ALICE).expect("count"), 2);
}

#[test]
fn test_repeated_rejection_writes_nothing() {
    let pool = DbPool::open_in_memory().expect("db");
    punch(&pool, Entry, "2024-01-01T08:00:00Z");

    for minute in 1..=3 {
        let outcome = punch(&pool, Entry, &format!("2024-01-01T08:0{minute}:00Z"));
        assert!(matches!(
            outcome,
            PunchOutcome::Rejected {
                status: Some(Entry)
            }
        ));
    }
    assert_eq!(count_events(&pool.conn, ALICE).expect("count"), 1);
}

#[test]
fn test_subjects_are_independent() {
    let pool = DbPool::open_in_memory().expect("db");
    let bob = "22222222-2222-2222-2222-222222222222";

    punch(&pool, Entry, "2024-01-01T08:00:00Z");
    let outcome = PunchLogic::perform(
        &pool,
        &PunchRequest::new(bob, Entry, at("2024-01-01T08:01:00Z")),
        None,
    )
    .expect("punch");
    assert!(outcome.is_recorded());
}

#[test]
fn test_location_defaults_to_not_granted() {
    let pool = DbPool::open_in_memory().expect("db");

    let PunchOutcome::Recorded { event, .. } = punch(&pool, Entry, "2024-01-01T08:00:00Z") else {
        panic!("entry should be recorded");
    };
    assert_eq!(event.location, Some(Location::NotGranted));

    let req = PunchRequest::new(ALICE, Exit, at("2024-01-01T17:00:00Z"))
        .at(Some("40.4168"), Some("-3.7038"));
    let PunchOutcome::Recorded { event, .. } =
        PunchLogic::perform(&pool, &req, None).expect("punch")
    else {
        panic!("exit should be recorded");
    };
    assert_eq!(event.location_str(), "40.4168,-3.7038");

    // Only one coordinate is treated as not granted
    let req = PunchRequest::new(ALICE, Entry, at("2024-01-02T08:00:00Z")).at(Some("40.4"), None);
    let PunchOutcome::Recorded { event, .. } =
        PunchLogic::perform(&pool, &req, None).expect("punch")
    else {
        panic!("entry should be recorded");
    };
    assert_eq!(event.location, Some(Location::NotGranted));
}

#[test]
fn test_audit_fields_are_unset() {
    let pool = DbPool::open_in_memory().expect("db");
    let ev = seed(&pool, ALICE, Entry, "2024-01-01T08:00:00Z");
    assert!(!ev.is_manual_correction);
    assert_eq!(ev.correction_reason, None);
}

#[test]
fn test_exit_sends_exactly_one_notification() {
    let pool = DbPool::open_in_memory().expect("db");
    let rec = Arc::new(RecordingNotifier::default());
    let notifier: Arc<dyn Notifier> = rec.clone();
    let notice = ExitNotice {
        notifier,
        recipient: "boss@example.com".into(),
        zone: DisplayZone::utc(),
    };

    for (kind, ts) in [
        (Entry, "2024-01-01T08:00:00Z"),
        (PauseStart, "2024-01-01T12:00:00Z"),
        (PauseEnd, "2024-01-01T12:30:00Z"),
    ] {
        let outcome =
            PunchLogic::perform(&pool, &PunchRequest::new(ALICE, kind, at(ts)), Some(&notice))
                .expect("punch");
        let PunchOutcome::Recorded { notification, .. } = outcome else {
            panic!("{kind} should be recorded");
        };
        assert!(notification.is_none());
    }

    let outcome = PunchLogic::perform(
        &pool,
        &PunchRequest::new(ALICE, Exit, at("2024-01-01T17:00:00Z")),
        Some(&notice),
    )
    .expect("punch");
    let PunchOutcome::Recorded { notification, .. } = outcome else {
        panic!("exit should be recorded");
    };
    notification.expect("exit notification").join().expect("join");

    let sent = rec.messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "boss@example.com");
    assert_eq!(sent[0].subject, "Exit recorded");
    assert!(sent[0].html_body.contains("17:00"));
}

#[test]
fn test_failed_exit_notification_keeps_the_punch() {
    let pool = DbPool::open_in_memory().expect("db");
    let notice = ExitNotice {
        notifier: Arc::new(common::FailingNotifier),
        recipient: "boss@example.com".into(),
        zone: DisplayZone::utc(),
    };
    punch(&pool, Entry, "2024-01-01T08:00:00Z");

    let outcome = PunchLogic::perform(
        &pool,
        &PunchRequest::new(ALICE, Exit, at("2024-01-01T17:00:00Z")),
        Some(&notice),
    )
    .expect("punch");
    let PunchOutcome::Recorded { notification, .. } = outcome else {
        panic!("exit should be recorded");
    };
    if let Some(handle) = notification {
        handle.join().expect("join");
    }

    let latest = latest_event(&pool.conn, ALICE).expect("latest").expect("some");
    assert_eq!(latest.kind, Exit);
}

#[test]
fn test_recorded_events_match_what_the_store_reads_back() {
    let pool = DbPool::open_in_memory().expect("db");
    let steps = [
        (Entry, "2024-01-01T08:00:00.123456789Z"),
        (PauseStart, "2024-01-01T12:00:00.000000999Z"),
        (PauseEnd, "2024-01-01T12:30:00.987654321Z"),
        (Exit, "2024-01-01T17:00:00.500000001Z"),
    ];

    let mut recorded = Vec::new();
    for (kind, ts) in steps {
        let PunchOutcome::Recorded { event, .. } = punch(&pool, kind, ts) else {
            panic!("{kind} should be recorded");
        };
        let latest = latest_event(&pool.conn, ALICE).expect("latest").expect("some");
        assert_eq!(latest, event);
        recorded.push(event);
    }

    assert_eq!(recorded[0].timestamp, at("2024-01-01T08:00:00.123456Z"));

    let history = recent_events(&pool.conn, ALICE, steps.len()).expect("history");
    recorded.reverse();
    assert_eq!(history, recorded);
}
