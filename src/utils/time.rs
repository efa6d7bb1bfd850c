//! Time utilities: duration parsing, display time zones, day boundaries.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s)?$").expect("static duration regex")
    })
}

fn offset_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([+-])(\d{2}):?(\d{2})$").expect("static offset regex"))
}

/// Parse durations written as `8h`, `30m`, `45s`, `1h30m`, ...
pub fn parse_duration(s: &str) -> AppResult<Duration> {
    let trimmed = s.trim().to_lowercase();
    let caps = duration_re()
        .captures(&trimmed)
        .ok_or_else(|| AppError::InvalidDuration(s.to_string()))?;

    let mut secs: u64 = 0;
    let mut matched = false;
    for (group, factor) in [(1, 3600u64), (2, 60), (3, 1)] {
        if let Some(m) = caps.get(group) {
            let v: u64 = m
                .as_str()
                .parse()
                .map_err(|_| AppError::InvalidDuration(s.to_string()))?;
            secs = v
                .checked_mul(factor)
                .and_then(|x| x.checked_add(secs))
                .ok_or_else(|| AppError::InvalidDuration(s.to_string()))?;
            matched = true;
        }
    }

    if !matched {
        return Err(AppError::InvalidDuration(s.to_string()));
    }
    Ok(Duration::from_secs(secs))
}

/// Time zone used to render stored UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    Local,
    Fixed(FixedOffset),
}

impl DisplayZone {
    pub fn utc() -> Self {
        DisplayZone::Fixed(Utc.fix())
    }

    /// `local`, `utc`, or an offset such as `+02:00` / `-0530`.
    pub fn parse(s: &str) -> AppResult<Self> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("local") || t.is_empty() {
            return Ok(DisplayZone::Local);
        }
        if t.eq_ignore_ascii_case("utc") || t == "Z" {
            return Ok(Self::utc());
        }

        let caps = offset_re()
            .captures(t)
            .ok_or_else(|| AppError::Config(format!("Invalid time zone offset: {t}")))?;
        let hours: i32 = caps[2].parse().unwrap_or(0);
        let minutes: i32 = caps[3].parse().unwrap_or(0);
        let mut secs = hours * 3600 + minutes * 60;
        if &caps[1] == "-" {
            secs = -secs;
        }

        FixedOffset::east_opt(secs)
            .map(DisplayZone::Fixed)
            .ok_or_else(|| AppError::Config(format!("Time zone offset out of range: {t}")))
    }

    pub fn format(&self, ts: &DateTime<Utc>, fmt: &str) -> String {
        match self {
            DisplayZone::Local => ts.with_timezone(&Local).format(fmt).to_string(),
            DisplayZone::Fixed(off) => ts.with_timezone(off).format(fmt).to_string(),
        }
    }

    /// UTC instant of 00:00 on `date` in this zone.
    pub fn start_of_day(&self, date: NaiveDate) -> AppResult<DateTime<Utc>> {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;

        let resolved = match self {
            DisplayZone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            DisplayZone::Fixed(off) => off
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        };

        resolved.ok_or_else(|| AppError::InvalidDate(date.to_string()))
    }
}

/// `[from 00:00, to + 1 day 00:00)` in UTC.
pub fn day_range_utc(
    zone: &DisplayZone,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    if to < from {
        return Err(AppError::InvalidDate(format!(
            "end date {to} is before start date {from}"
        )));
    }
    let next = to
        .succ_opt()
        .ok_or_else(|| AppError::InvalidDate(to.to_string()))?;
    Ok((zone.start_of_day(from)?, zone.start_of_day(next)?))
}
