use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::punch::{ExitNotice, PunchLogic, PunchOutcome, PunchRequest};
use crate::core::status::{HistoryFilter, StatusLogic};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::event_type::PunchType;
use crate::notify::{TimedNotifier, notifier_from_config};
use crate::ui::messages::{success, warning};
use chrono::Utc;
use std::sync::Arc;

/// Record a punch, then show the (possibly unchanged) status.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Punch {
        action,
        latitude,
        longitude,
    } = cmd
    {
        let kind = PunchType::pt_from_str(action)
            .ok_or_else(|| AppError::InvalidPunchType(action.to_string()))?;

        for c in [latitude, longitude].into_iter().flatten() {
            if c.trim().parse::<f64>().is_err() {
                return Err(AppError::InvalidCoordinates(c.to_string()));
            }
        }

        let zone = cfg.display_zone()?;
        let pool = DbPool::open(&cfg.database)?;

        let notice = ExitNotice {
            notifier: Arc::new(TimedNotifier::new(
                notifier_from_config(cfg),
                cfg.notify_timeout()?,
            )),
            recipient: cfg.notify_recipient.clone(),
            zone,
        };

        let device = format!("cli/{}", env!("CARGO_PKG_VERSION"));
        let mut req = PunchRequest::new(&cfg.subject_id, kind, Utc::now())
            .at(latitude.as_deref(), longitude.as_deref());
        req.device = Some(&device);

        match PunchLogic::perform(&pool, &req, Some(&notice))? {
            PunchOutcome::Recorded {
                event,
                notification,
            } => {
                success(format!(
                    "{} recorded at {}.",
                    event.kind,
                    zone.format(&event.timestamp, "%Y-%m-%d %H:%M:%S")
                ));
                // The process is about to exit; let the notice finish first.
                if let Some(handle) = notification {
                    let _ = handle.join();
                }
            }
            PunchOutcome::Rejected { status } => {
                let current = status.map(|s| s.name()).unwrap_or("none");
                warning(format!(
                    "{} is not possible right now (current status: {}). Nothing recorded.",
                    kind, current
                ));
            }
        }

        let view = StatusLogic::build_view(
            &pool,
            &cfg.subject_id,
            HistoryFilter::default(),
            cfg.history_limit,
            &zone,
        )?;
        crate::cli::commands::status::print_status(&view, &zone, false);
    }
    Ok(())
}
