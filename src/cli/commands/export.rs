use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::{ExportLogic, ExportOptions};
use crate::utils::date::parse_optional_date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        from,
        to,
        force,
    } = cmd
    {
        let opts = ExportOptions {
            subject_id: cfg.subject_id.clone(),
            format: *format,
            file: file.clone(),
            from: parse_optional_date(from.as_ref())?,
            to: parse_optional_date(to.as_ref())?,
            force: *force,
            device_label: cfg.device_label.clone(),
            zone: cfg.display_zone()?,
        };

        let pool = DbPool::open(&cfg.database)?;
        ExportLogic::export(&pool, &opts)?;
    }
    Ok(())
}
