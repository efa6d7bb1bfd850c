use serde::Serialize;
use std::fmt;

/// Sentinel stored when the caller did not grant (or did not send) coordinates.
pub const NOT_GRANTED: &str = "not granted";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Location {
    Coordinates { latitude: String, longitude: String },
    NotGranted,
}

impl Location {
    /// Both coordinates present → `Coordinates`, otherwise `NotGranted`.
    pub fn from_parts(latitude: Option<&str>, longitude: Option<&str>) -> Self {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Location::Coordinates {
                latitude: lat.trim().to_string(),
                longitude: lon.trim().to_string(),
            },
            _ => Location::NotGranted,
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> String {
        match self {
            Location::Coordinates {
                latitude,
                longitude,
            } => format!("{},{}", latitude, longitude),
            Location::NotGranted => NOT_GRANTED.to_string(),
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        if s == NOT_GRANTED {
            return Some(Location::NotGranted);
        }
        let (lat, lon) = s.split_once(',')?;
        Some(Location::Coordinates {
            latitude: lat.to_string(),
            longitude: lon.to_string(),
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_db_str())
    }
}
