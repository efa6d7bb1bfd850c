use crate::config::Config;
use crate::core::sweeper::{SweepSettings, Sweeper};
use crate::errors::AppResult;
use crate::notify::{TimedNotifier, notifier_from_config};
use crate::ui::messages::{success, warning};
use chrono::Utc;
use std::sync::Arc;

/// Sweeper wired from the configuration, with bounded notification sends.
pub fn build_sweeper(cfg: &Config) -> AppResult<Sweeper> {
    let settings = SweepSettings {
        db_path: cfg.database.clone(),
        recipient: cfg.notify_recipient.clone(),
        interval: cfg.sweep_interval()?,
        threshold: cfg.stale_threshold()?,
        zone: cfg.display_zone()?,
    };
    let notifier = Arc::new(TimedNotifier::new(
        notifier_from_config(cfg),
        cfg.notify_timeout()?,
    ));
    Ok(Sweeper::new(settings, notifier))
}

pub fn handle(cfg: &Config) -> AppResult<()> {
    let sweeper = build_sweeper(cfg)?;
    let report = sweeper.run_cycle(Utc::now())?;

    if report.flagged.is_empty() {
        success(format!(
            "Checked {} subject(s): nobody left clocked in.",
            report.subjects_checked
        ));
    } else {
        warning(format!(
            "Checked {} subject(s), {} still clocked in past {}: {}",
            report.subjects_checked,
            report.flagged.len(),
            cfg.stale_threshold,
            report.flagged.join(", ")
        ));
        if report.failed > 0 {
            warning(format!("{} warning(s) could not be delivered.", report.failed));
        }
    }
    Ok(())
}
