pub mod config;
pub mod log;
pub mod punch;
pub mod status;
pub mod sweeper;
pub mod transition;
