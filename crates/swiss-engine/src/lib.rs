//! Swiss-system tournament engine.
//!
//! Pairs participants round by round, scores results and re-ranks the field
//! while keeping rematches to a minimum. The pieces can be used on their own
//! or through the [`Tournament`] aggregate, which enforces the round life
//! cycle:
//!
//! - [`pairing`] - first-round half split and reading pairs off a sequence
//! - [`scoring`] - applying match outcomes to participants
//! - [`ranking`] - re-sorting by score with prior rank as tie-break
//! - [`rematch`] - rearranging a ranked sequence to avoid repeat meetings
//! - [`tournament`] - the aggregate and its state machine

mod announce;
mod error;
pub mod pairing;
pub mod ranking;
pub mod rematch;
mod round;
pub mod scoring;
pub mod tournament;

pub use announce::{pairing_line, standing_lines};
pub use error::EngineError;
pub use pairing::{Competitor, Pairing};
pub use rematch::{PairingPolicy, PairingReport};
pub use round::{Match, Round};
pub use tournament::{RoundPlan, Stage, Tournament, TournamentConfig, RESERVED_NAME_PREFIX};
