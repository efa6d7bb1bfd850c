use crate::cli::commands::sweep::build_sweeper;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use std::io::{self, BufRead};

/// Run the sweeper in the foreground until `q` is typed or `--cycles` is reached.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Watch { cycles } = cmd {
        let sweeper = build_sweeper(cfg)?;

        info(format!(
            "Watching for forgotten exits every {} (threshold {}).",
            cfg.sweep_interval, cfg.stale_threshold
        ));

        let handle = sweeper.spawn_limited(*cycles)?;

        let done = if cycles.is_some() {
            handle.join()
        } else {
            info("Type 'q' and press Enter to stop.");
            let stdin = io::stdin();
            let mut requested = false;
            for line in stdin.lock().lines() {
                let line = line?;
                if matches!(line.trim(), "q" | "quit" | "exit") {
                    requested = true;
                    break;
                }
            }
            if requested {
                handle.stop()
            } else {
                // stdin closed: keep running until the process is killed
                handle.join()
            }
        };

        success(format!("Watcher stopped after {done} check(s)."));
    }
    Ok(())
}
