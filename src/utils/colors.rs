/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

use crate::models::event_type::PunchType;

/// Colour of a status label.
pub fn color_for_status(status: Option<PunchType>) -> &'static str {
    match status {
        Some(kind) if kind.is_working() => GREEN,
        Some(PunchType::PauseStart) => YELLOW,
        Some(_) => RED,
        None => GREY,
    }
}

/// Colour of a punch in history listings.
pub fn colorize_punch(kind: PunchType) -> String {
    let color = match kind {
        PunchType::Entry => GREEN,
        PunchType::Exit => RED,
        PunchType::PauseStart | PunchType::PauseEnd => YELLOW,
    };
    format!("{color}{}{RESET}", kind.name())
}
