#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Utc};
use rfichaje::db::pool::DbPool;
use rfichaje::db::queries::append_event;
use rfichaje::errors::{AppError, AppResult};
use rfichaje::models::event::{Event, NewEvent};
use rfichaje::models::event_type::PunchType;
use rfichaje::models::location::Location;
use rfichaje::notify::{Message, Notifier};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

pub fn rfi() -> Command {
    cargo_bin_cmd!("rfichaje")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rfichaje.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize a DB through the CLI (test mode: no config file is written)
pub fn init_db(db_path: &str) {
    rfi()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

pub fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

/// Append straight to the store, bypassing validation.
pub fn seed(pool: &DbPool, subject: &str, kind: PunchType, ts: &str) -> Event {
    append_event(
        &pool.conn,
        &NewEvent::new(subject, kind, at(ts), Location::NotGranted),
    )
    .expect("append event")
}

/// Keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Message>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<Message> {
        self.sent.lock().expect("lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, msg: &Message) -> AppResult<()> {
        self.sent.lock().expect("lock").push(msg.clone());
        Ok(())
    }
}

/// Always fails.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send(&self, msg: &Message) -> AppResult<()> {
        Err(AppError::Notify {
            recipient: msg.recipient.clone(),
            reason: "relay unreachable".into(),
        })
    }
}

/// Sleeps for the given duration before answering.
pub struct SlowNotifier(pub Duration);

impl Notifier for SlowNotifier {
    fn send(&self, _msg: &Message) -> AppResult<()> {
        thread::sleep(self.0);
        Ok(())
    }
}
