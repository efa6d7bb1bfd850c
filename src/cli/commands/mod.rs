pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod log;
pub mod punch;
pub mod status;
pub mod sweep;
pub mod watch;
