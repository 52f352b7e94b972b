//! Time-control categories and the round duration they imply.

use crate::InputError;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Time control chosen for the whole tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeControl {
    Bullet,
    Blitz,
    Rapid,
}

impl TimeControl {
    /// Returns the canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            TimeControl::Bullet => "bullet",
            TimeControl::Blitz => "blitz",
            TimeControl::Rapid => "rapid",
        }
    }

    /// Length of one round, in seconds.
    pub const fn round_seconds(self) -> i64 {
        match self {
            TimeControl::Bullet => 180,
            TimeControl::Blitz => 300,
            TimeControl::Rapid => 12_000,
        }
    }

    /// Length of one round.
    pub fn round_duration(self) -> Duration {
        Duration::seconds(self.round_seconds())
    }
}

impl FromStr for TimeControl {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bullet" => Ok(TimeControl::Bullet),
            "blitz" => Ok(TimeControl::Blitz),
            "rapid" => Ok(TimeControl::Rapid),
            _ => Err(InputError::UnknownTimeControl(s.to_string())),
        }
    }
}

impl std::fmt::Display for TimeControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
