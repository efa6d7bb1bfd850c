//! Outbound notifications.
//!
//! `Notifier::send` reports every failure to the caller. Whether a failure is
//! propagated or only logged is decided at the call site (see
//! `dispatch_detached` and `core::sweeper`).

pub mod templates;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

pub trait Notifier: Send + Sync {
    fn send(&self, msg: &Message) -> AppResult<()>;
}

/// Writes the message to the tracing log and nothing else.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, msg: &Message) -> AppResult<()> {
        info!(
            recipient = %msg.recipient,
            subject = %msg.subject,
            body = %msg.html_body,
            "notification"
        );
        Ok(())
    }
}

/// Drops one `.html` file per message into a directory, for a mail relay
/// (or a human) to pick up.
#[derive(Debug)]
pub struct OutboxNotifier {
    dir: PathBuf,
    seq: AtomicU64,
}

impl OutboxNotifier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            seq: AtomicU64::new(0),
        }
    }

    fn render(msg: &Message) -> String {
        format!(
            "<!-- To: {} -->\n<!-- Subject: {} -->\n{}\n",
            msg.recipient, msg.subject, msg.html_body
        )
    }
}

impl Notifier for OutboxNotifier {
    fn send(&self, msg: &Message) -> AppResult<()> {
        let failed = |e: std::io::Error| AppError::Notify {
            recipient: msg.recipient.clone(),
            reason: format!("{}: {}", self.dir.display(), e),
        };

        fs::create_dir_all(&self.dir).map_err(&failed)?;

        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{:04}.html", Utc::now().format("%Y%m%dT%H%M%S%.6f"), n);
        let path = self.dir.join(name);

        fs::write(&path, Self::render(msg)).map_err(&failed)?;
        debug!(path = %path.display(), "notification written to outbox");
        Ok(())
    }
}

/// Bounds every send by `timeout`. A send that overruns keeps running on its
/// helper thread; the caller gets `AppError::NotifyTimeout` and moves on.
pub struct TimedNotifier {
    inner: Arc<dyn Notifier>,
    timeout: Duration,
}

impl TimedNotifier {
    pub fn new(inner: Arc<dyn Notifier>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl Notifier for TimedNotifier {
    fn send(&self, msg: &Message) -> AppResult<()> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let owned = msg.clone();

        thread::Builder::new()
            .name("notify-send".into())
            .spawn(move || {
                let _ = tx.send(inner.send(&owned));
            })?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Err(AppError::NotifyTimeout(msg.recipient.clone()))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(AppError::Notify {
                recipient: msg.recipient.clone(),
                reason: "sender thread terminated".into(),
            }),
        }
    }
}

/// Fire-and-forget: send on its own thread, log the outcome.
///
/// The returned handle may be joined (tests do) or dropped.
pub fn dispatch_detached(notifier: Arc<dyn Notifier>, msg: Message) -> Option<JoinHandle<()>> {
    let spawned = thread::Builder::new()
        .name("notify-detached".into())
        .spawn(move || {
            if let Err(e) = notifier.send(&msg) {
                error!(recipient = %msg.recipient, error = %e, "notification failed");
            }
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            error!(error = %e, "could not spawn notification thread");
            None
        }
    }
}

/// Outbox when `outbox_dir` is configured, log-only otherwise.
pub fn notifier_from_config(cfg: &Config) -> Arc<dyn Notifier> {
    if cfg.outbox_dir.trim().is_empty() {
        Arc::new(LogNotifier)
    } else {
        Arc::new(OutboxNotifier::new(&cfg.outbox_dir))
    }
}
