//! Engine errors.

use crate::Stage;
use swiss_core::InputError;
use thiserror::Error;

/// Errors raised by the pairing, scoring and tournament operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Invalid configuration, roster entry or outcome tag.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The participants handed to the scoring engine are not the ones the
    /// match refers to.
    #[error("match is {expected_first} vs {expected_second}, got {given_first} vs {given_second}")]
    ParticipantMismatch {
        expected_first: String,
        expected_second: String,
        given_first: String,
        given_second: String,
    },

    #[error("round {round} has {expected} pairings, got {actual} results")]
    ResultCount {
        round: u32,
        expected: usize,
        actual: usize,
    },

    #[error("match {index} of round {round} does not follow the pairing {expected}")]
    PairingMismatch {
        round: u32,
        index: usize,
        expected: String,
    },

    #[error("participant '{0}' plays more than once in the same round")]
    DoubleBooked(String),

    #[error("participant '{0}' not found")]
    UnknownParticipant(String),

    #[error("round {0} not found")]
    UnknownRound(u32),

    #[error("cannot {action} while the tournament is {stage}")]
    InvalidStage { action: &'static str, stage: Stage },

    #[error("round window ends before it starts")]
    InvertedWindow,
}
