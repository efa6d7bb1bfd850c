use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::status::{HistoryFilter, StatusLogic};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::status_view::StatusView;
use crate::utils::colors::{RESET, color_for_status, colorize_punch};
use crate::utils::date::parse_optional_date;
use crate::utils::formatting::bold;
use crate::utils::table::Table;
use crate::utils::time::DisplayZone;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status {
        from,
        to,
        limit,
        json,
    } = cmd
    {
        let filter = HistoryFilter {
            from: parse_optional_date(from.as_ref())?,
            to: parse_optional_date(to.as_ref())?,
        };
        let zone = cfg.display_zone()?;
        let pool = DbPool::open(&cfg.database)?;

        let view = StatusLogic::build_view(
            &pool,
            &cfg.subject_id,
            filter,
            limit.unwrap_or(cfg.history_limit),
            &zone,
        )?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else {
            print_status(&view, &zone, true);
        }
    }
    Ok(())
}

/// Current status, the legal next actions, and optionally the history table.
pub fn print_status(view: &StatusView, zone: &DisplayZone, with_history: bool) {
    let color = color_for_status(view.status);
    println!(
        "{} {}: {}{}{}",
        bold("Subject"),
        view.subject_id,
        color,
        view.status_label(),
        RESET
    );

    let next: Vec<&str> = view.allowed_actions.iter().map(|a| a.name()).collect();
    println!("{} {}", bold("Next:"), next.join(" | "));

    if !with_history {
        return;
    }

    println!();
    match (view.from, view.to) {
        (Some(f), Some(t)) => println!("History {f} → {t}:"),
        _ => println!("Latest punches:"),
    }

    let mut table = Table::new(["#", "date", "time", "type", "location"]);
    for ev in &view.history {
        table.add_row(vec![
            ev.id.to_string(),
            ev.date_str(zone),
            ev.time_str(zone),
            colorize_punch(ev.kind),
            ev.location_str(),
        ]);
    }

    if table.is_empty() {
        println!("  (no punches)");
    } else {
        print!("{}", table.render());
    }
}
