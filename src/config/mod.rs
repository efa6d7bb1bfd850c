use crate::errors::{AppError, AppResult};
use crate::utils::time::{DisplayZone, parse_duration};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

pub mod migrate;

/// Stand-in identity until a real login exists.
pub const DEFAULT_SUBJECT: &str = "aaaa1111-bb22-cc33-dd44-eeee55556666";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_subject")]
    pub subject_id: String,
    #[serde(default = "default_recipient")]
    pub notify_recipient: String,
    /// Empty → notifications only go to the log.
    #[serde(default)]
    pub outbox_dir: String,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval: String,
    #[serde(default = "default_stale_threshold")]
    pub stale_threshold: String,
    #[serde(default = "default_notify_timeout")]
    pub notify_timeout: String,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_device_label")]
    pub device_label: String,
    /// `local`, `utc` or a fixed offset like `+01:00`.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}
fn default_recipient() -> String {
    "timeclock@localhost".to_string()
}
fn default_sweep_interval() -> String {
    "30s".to_string()
}
fn default_stale_threshold() -> String {
    "8h".to_string()
}
fn default_notify_timeout() -> String {
    "10s".to_string()
}
fn default_history_limit() -> usize {
    20
}
fn default_device_label() -> String {
    "CLI".to_string()
}
fn default_time_zone() -> String {
    "local".to_string()
}

/// A zero wait would spin the sweeper and fail every send.
fn non_zero(raw: &str) -> AppResult<Duration> {
    let d = parse_duration(raw)?;
    if d.is_zero() {
        return Err(AppError::InvalidDuration(format!("{raw} (must be greater than zero)")));
    }
    Ok(d)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            subject_id: default_subject(),
            notify_recipient: default_recipient(),
            outbox_dir: String::new(),
            sweep_interval: default_sweep_interval(),
            stale_threshold: default_stale_threshold(),
            notify_timeout: default_notify_timeout(),
            history_limit: default_history_limit(),
            device_label: default_device_label(),
            time_zone: default_time_zone(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rfichaje")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".rfichaje")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rfichaje.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rfichaje.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            Self::from_yaml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn sweep_interval(&self) -> AppResult<Duration> {
        non_zero(&self.sweep_interval)
    }

    pub fn stale_threshold(&self) -> AppResult<Duration> {
        parse_duration(&self.stale_threshold)
    }

    pub fn notify_timeout(&self) -> AppResult<Duration> {
        non_zero(&self.notify_timeout)
    }

    pub fn display_zone(&self) -> AppResult<DisplayZone> {
        DisplayZone::parse(&self.time_zone)
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> io::Result<Config> {
        let dir = Self::config_dir();
        if !is_test {
            fs::create_dir_all(&dir)?;
        }

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_db {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}
