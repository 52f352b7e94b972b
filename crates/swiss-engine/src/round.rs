//! Rounds and the matches played in them.

use crate::Pairing;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use swiss_core::Outcome;

/// A played match. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub first: String,
    pub second: String,
    /// Result from `first`'s side.
    pub outcome: Outcome,
    /// Name of the round the match belongs to.
    pub round: String,
}

impl Match {
    /// Creates the match for an announced pairing.
    pub fn for_pairing(pairing: &Pairing, outcome: Outcome, round: impl Into<String>) -> Self {
        Self {
            first: pairing.first.clone(),
            second: pairing.second.clone(),
            outcome,
            round: round.into(),
        }
    }

    /// Whether this match is between the two sides of `pairing`, in order.
    pub fn follows(&self, pairing: &Pairing) -> bool {
        self.first == pairing.first && self.second == pairing.second
    }
}

impl std::fmt::Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} vs {} ({})",
            self.round, self.first, self.second, self.outcome
        )
    }
}

/// One round of a tournament.
///
/// A round is opened with its pairings and no matches, then filled exactly
/// once when results come in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based ordinal.
    pub number: u32,
    /// Display name, `Round <number>`.
    pub name: String,
    /// Name of the owning tournament.
    pub tournament: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Pairings announced when the round opened.
    pub pairings: Vec<Pairing>,
    /// Played matches, in pairing order. Empty until the round is scored.
    pub matches: Vec<Match>,
}

impl Round {
    /// Canonical name for the round with the given ordinal.
    pub fn name_for(number: u32) -> String {
        format!("Round {number}")
    }

    /// Parses the ordinal back out of a round name.
    pub fn number_from_name(name: &str) -> Option<u32> {
        name.strip_prefix("Round ")?.trim().parse().ok()
    }

    /// Whether results have been recorded.
    pub fn is_scored(&self) -> bool {
        !self.matches.is_empty()
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {}, from {} to {}",
            self.name, self.tournament, self.start, self.end
        )
    }
}
