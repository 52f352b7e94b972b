//! Errors raised while validating user-supplied tournament data.

use thiserror::Error;

/// Errors that can occur when decoding tournament configuration, roster
/// entries or match outcomes.
///
/// All of these are fatal for the entity being built: the caller must
/// supply corrected input, nothing is defaulted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown time control '{0}': expected bullet, blitz or rapid")]
    UnknownTimeControl(String),

    #[error("unknown category '{0}': expected men, women or other")]
    UnknownCategory(String),

    #[error("invalid date '{0}': expected yyyy/mm/dd or yyyy-mm-dd")]
    InvalidDate(String),

    #[error("invalid datetime '{0}'")]
    InvalidDateTime(String),

    #[error("invalid number for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unknown pairing policy '{0}': expected relaxation or backtracking")]
    UnknownPairingPolicy(String),

    #[error("unknown match result '{0}': expected W, L or D")]
    UnknownOutcome(String),

    #[error("participant count must be even, got {0}")]
    OddParticipantCount(u32),

    #[error("a Swiss tournament cannot have more rounds ({rounds}) than participants ({participants})")]
    TooManyRounds { rounds: u32, participants: u32 },

    #[error("tournament needs at least one round")]
    NoRounds,

    #[error("roster has {actual} participants, tournament declares {expected}")]
    RosterSize { expected: u32, actual: usize },

    #[error("participant '{0}' is registered twice")]
    DuplicateParticipant(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("tournament name '{0}' uses a reserved prefix")]
    ReservedName(String),
}

impl InputError {
    /// Builds an [`InputError::InvalidNumber`] for the named field.
    pub fn number(field: &'static str, value: impl Into<String>) -> Self {
        InputError::InvalidNumber {
            field,
            value: value.into(),
        }
    }
}
