//! Swiss Arena - a tournament desk for Swiss-system events.
//!
//! This crate wires the pairing engine to its collaborators: where input
//! comes from, where announcements go and where snapshots are kept.
//!
//! # Modules
//!
//! - [`config`] - `arena.toml` loading and tournament presets
//! - [`input`] - interactive prompts and TOML scripts as input sources
//! - [`display`] - pairing and standings announcements
//! - [`runner`] - plays a whole tournament from an input source
//! - [`records`] - the stored document schema and its conversions
//! - [`storage`] - SQLite-backed document store
//! - [`queries`] - lookups over saved tournaments and players
//! - [`json_output`] - JSON export of the whole store

pub mod config;
pub mod display;
pub mod input;
pub mod json_output;
pub mod queries;
pub mod records;
pub mod runner;
pub mod storage;
