//! Core types for Swiss-system tournaments.
//!
//! This crate provides the value types shared by the pairing engine and the
//! arena front-end:
//! - [`Participant`] with its score, rank and opponent history
//! - [`Category`], [`TimeControl`] and [`Outcome`] with case-insensitive parsing
//! - [`parse_date`] for the two accepted date layouts
//! - [`Form`] for short or long participant rendering

mod category;
mod date;
mod error;
mod outcome;
mod participant;
mod time_control;

pub use category::Category;
pub use date::{format_datetime, parse_date, parse_datetime};
pub use error::InputError;
pub use outcome::{Outcome, Points};
pub use participant::{Form, Participant, ParticipantView};
pub use time_control::TimeControl;
