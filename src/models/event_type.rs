use serde::Serialize;
use std::fmt;

/// The four punches a subject can record.
///
/// The same enum doubles as the subject's status: the status is the kind of
/// the most recent punch, or `None` when nothing was ever recorded.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum PunchType {
    Entry,
    Exit,
    PauseStart,
    PauseEnd,
}

impl PunchType {
    pub const ALL: [PunchType; 4] = [
        PunchType::Entry,
        PunchType::Exit,
        PunchType::PauseStart,
        PunchType::PauseEnd,
    ];

    /// Column index in the transition table.
    pub fn index(&self) -> usize {
        match self {
            PunchType::Entry => 0,
            PunchType::Exit => 1,
            PunchType::PauseStart => 2,
            PunchType::PauseEnd => 3,
        }
    }

    /// Parse user input (`entry`, `pause-start`, `PauseStart`, ...).
    pub fn pt_from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "entry" | "in" => Some(Self::Entry),
            "exit" | "out" => Some(Self::Exit),
            "pausestart" => Some(Self::PauseStart),
            "pauseend" => Some(Self::PauseEnd),
            _ => None,
        }
    }

    /// Human readable name, also used in CSV exports.
    pub fn name(&self) -> &'static str {
        match self {
            PunchType::Entry => "Entry",
            PunchType::Exit => "Exit",
            PunchType::PauseStart => "PauseStart",
            PunchType::PauseEnd => "PauseEnd",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PunchType::Entry => "entry",
            PunchType::Exit => "exit",
            PunchType::PauseStart => "pause_start",
            PunchType::PauseEnd => "pause_end",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "entry" => Some(PunchType::Entry),
            "exit" => Some(PunchType::Exit),
            "pause_start" => Some(PunchType::PauseStart),
            "pause_end" => Some(PunchType::PauseEnd),
            _ => None,
        }
    }

    /// Working states: clocked in, or back from a pause.
    pub fn is_working(&self) -> bool {
        matches!(self, PunchType::Entry | PunchType::PauseEnd)
    }
}

impl fmt::Display for PunchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
