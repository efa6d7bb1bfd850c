use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            if path.exists() {
                println!("📄 {}:\n", path.display());
                ConfigLogic::print(&path)?;
            } else {
                println!("📄 Effective configuration (no file yet):\n");
                println!("{}", serde_yaml::to_string(cfg)?);
            }
        }

        if *check {
            ConfigLogic::check(&path)?;
        }

        if *edit_config {
            ConfigLogic::edit(&path, editor)?;
            success(format!("Configuration file {} edited.", path.display()));
        }
    }

    Ok(())
}
