use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, Result, params};
use tracing::{debug, info};

/// Ensure that the `log` table exists. It also tracks applied migrations.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

/// Ordered list of schema migrations. Append only.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20251210_0001_create_punches",
        description: "Created punches table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS punches (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id           TEXT NOT NULL,
            kind                 TEXT NOT NULL
                                 CHECK(kind IN ('entry','exit','pause_start','pause_end')),
            timestamp            TEXT NOT NULL,
            location             TEXT,
            device_metadata      TEXT,
            is_manual_correction INTEGER NOT NULL DEFAULT 0,
            correction_reason    TEXT
        );
        "#,
    },
    Migration {
        version: "20251210_0002_index_subject_timestamp",
        description: "Added (subject_id, timestamp) index on punches",
        sql: r#"
        CREATE INDEX IF NOT EXISTS idx_punches_subject_ts
            ON punches(subject_id, timestamp);
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        params![chrono::Utc::now().to_rfc3339(), m.version, m.description],
    )?;

    tx.commit()?;
    info!(version = m.version, "{}", m.description);
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db(). Safe to call on every open.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            debug!(version = m.version, "migration already applied");
            continue;
        }
        apply(conn, m)?;
    }

    Ok(())
}

/// Versions recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
