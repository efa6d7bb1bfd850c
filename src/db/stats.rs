use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

/// Aggregate numbers shown by `db --info`.
#[derive(Debug, Default)]
pub struct DbStats {
    pub total_punches: i64,
    pub subjects: i64,
    pub first: Option<String>,
    pub last: Option<String>,
}

pub fn collect_stats(pool: &DbPool) -> AppResult<DbStats> {
    let total_punches: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM punches", [], |row| row.get(0))?;

    let subjects: i64 = pool.conn.query_row(
        "SELECT COUNT(DISTINCT subject_id) FROM punches",
        [],
        |row| row.get(0),
    )?;

    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT timestamp FROM punches ORDER BY timestamp ASC, id ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT timestamp FROM punches ORDER BY timestamp DESC, id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(DbStats {
        total_punches,
        subjects,
        first,
        last,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    let stats = collect_stats(pool)?;

    println!(
        "{}• Total punches:{} {}{}{}",
        CYAN, RESET, GREEN, stats.total_punches, RESET
    );
    println!(
        "{}• Subjects:{} {}{}{}",
        CYAN, RESET, GREEN, stats.subjects, RESET
    );

    let fmt_first = stats
        .first
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = stats.last.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Time range (UTC):{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    println!();
    Ok(())
}
