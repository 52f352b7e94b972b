//! Match outcomes and the points they award.

use crate::InputError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Result of a match, read from the first-listed participant's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The first participant won.
    #[serde(rename = "W")]
    Win,
    /// The first participant lost.
    #[serde(rename = "L")]
    Loss,
    /// The match was drawn.
    #[serde(rename = "D")]
    Draw,
}

/// Points awarded to the first and second participant of a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Points {
    pub first: f64,
    pub second: f64,
}

impl Points {
    /// Total awarded for the match. Always 1.0.
    pub fn total(self) -> f64 {
        self.first + self.second
    }
}

impl Outcome {
    /// Point split for this outcome: W is 1/0, L is 0/1, D is half/half.
    pub const fn points(self) -> Points {
        match self {
            Outcome::Win => Points {
                first: 1.0,
                second: 0.0,
            },
            Outcome::Loss => Points {
                first: 0.0,
                second: 1.0,
            },
            Outcome::Draw => Points {
                first: 0.5,
                second: 0.5,
            },
        }
    }

    /// The single-letter tag used in records and prompts.
    pub const fn tag(self) -> &'static str {
        match self {
            Outcome::Win => "W",
            Outcome::Loss => "L",
            Outcome::Draw => "D",
        }
    }

    /// The same result seen from the second participant's side.
    pub const fn reversed(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
        }
    }
}

impl FromStr for Outcome {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "W" | "w" => Ok(Outcome::Win),
            "L" | "l" => Ok(Outcome::Loss),
            "D" | "d" => Ok(Outcome::Draw),
            _ => Err(InputError::UnknownOutcome(s.to_string())),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
