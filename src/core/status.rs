use crate::core::transition::allowed_actions;
use crate::db::pool::DbPool;
use crate::db::queries::{events_in_range, latest_event, recent_events};
use crate::errors::AppResult;
use crate::models::status_view::StatusView;
use crate::utils::time::{DisplayZone, day_range_utc};
use chrono::NaiveDate;

/// Date filter of the status/history view. Only applied when both ends are set.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub struct StatusLogic;

impl StatusLogic {
    pub fn build_view(
        pool: &DbPool,
        subject_id: &str,
        filter: HistoryFilter,
        limit: usize,
        zone: &DisplayZone,
    ) -> AppResult<StatusView> {
        let status = latest_event(&pool.conn, subject_id)?.map(|e| e.kind);

        let history = match (filter.from, filter.to) {
            (Some(from), Some(to)) => {
                let (start, end) = day_range_utc(zone, from, to)?;
                events_in_range(&pool.conn, subject_id, &start, &end)?
            }
            _ => recent_events(&pool.conn, subject_id, limit)?,
        };

        Ok(StatusView {
            subject_id: subject_id.to_string(),
            status,
            allowed_actions: allowed_actions(status),
            history,
            from: filter.from,
            to: filter.to,
        })
    }
}
