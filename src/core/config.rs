use crate::config::migrate::fill_missing_keys;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &Path) -> AppResult<()> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        println!("{}", content);
        Ok(())
    }

    /// Add keys introduced by newer versions, with their defaults.
    pub fn check(path: &Path) -> AppResult<()> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "{} not found, run `rfichaje init` first",
                path.display()
            )));
        }

        let added = fill_missing_keys(path)?;
        if added.is_empty() {
            success("Configuration is complete.");
        } else {
            info(format!("Added missing keys: {}", added.join(", ")));
        }
        Ok(())
    }

    pub fn edit(path: &Path, editor: &Option<String>) -> AppResult<()> {
        let ed = editor
            .clone()
            .or_else(|| std::env::var("VISUAL").ok())
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".into()
                } else {
                    "nano".into()
                }
            });

        let status = Command::new(&ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(format!("{ed}: {e}")))?;

        if !status.success() {
            return Err(AppError::Config(format!("{ed} exited with {status}")));
        }
        Ok(())
    }
}
