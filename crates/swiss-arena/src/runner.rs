//! Plays a whole tournament from an input source.
//!
//! The runner asks its [`InputSource`] for the settings and the roster,
//! then loops over the rounds: open, announce, collect one result per
//! pairing, score. After the last round it publishes the standings. With a
//! [`Storage`] attached, the tournament is saved after every scored round
//! (when autosave is on) and once more when it is final.

use crate::config::PresetConfig;
use crate::display::Announcer;
use crate::input::{InputSource, SourceError, TournamentEntry};
use crate::storage::{Storage, StorageError};
use chrono::NaiveDateTime;
use swiss_core::{InputError, Outcome, Participant};
use swiss_engine::{EngineError, PairingPolicy, Tournament, TournamentConfig};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to write announcement: {0}")]
    Output(#[from] std::io::Error),
}

/// Drives one tournament from first prompt to final standings.
pub struct TournamentRunner<'a, S, A> {
    source: S,
    announcer: A,
    preset: PresetConfig,
    storage: Option<&'a Storage>,
    autosave: bool,
    start: NaiveDateTime,
}

impl<'a, S: InputSource, A: Announcer> TournamentRunner<'a, S, A> {
    /// Creates a runner with the default preset, no storage, and round 1
    /// starting at `start`.
    pub fn new(source: S, announcer: A, start: NaiveDateTime) -> Self {
        Self {
            source,
            announcer,
            preset: PresetConfig::default(),
            storage: None,
            autosave: false,
            start,
        }
    }

    /// Settings used where the input leaves a gap.
    pub fn with_preset(mut self, preset: PresetConfig) -> Self {
        self.preset = preset;
        self
    }

    /// Saves into `storage`; after every round too when `autosave` is set.
    pub fn with_storage(mut self, storage: &'a Storage, autosave: bool) -> Self {
        self.storage = Some(storage);
        self.autosave = autosave;
        self
    }

    /// Gives the announcer back, e.g. to inspect what was recorded.
    pub fn into_announcer(self) -> A {
        self.announcer
    }

    /// Runs the tournament to completion and returns it in its final stage.
    ///
    /// # Errors
    ///
    /// Any invalid input, engine error or storage failure aborts the run.
    /// Rounds already saved stay saved.
    pub fn run(&mut self) -> Result<Tournament, RunError> {
        let entry = self.source.tournament()?;
        let config = self.config_from(entry)?;
        let mut tournament = Tournament::new(config)?;

        let total = tournament.config().participant_count as usize;
        let roster = (0..total)
            .map(|i| -> Result<Participant, RunError> {
                let e = self.source.participant(i, total)?;
                Ok(Participant::parse(
                    &e.last_name,
                    &e.first_name,
                    &e.date_of_birth,
                    &e.category,
                    &e.rank,
                )?)
            })
            .collect::<Result<Vec<_>, RunError>>()?;
        tournament.register(roster)?;

        while !tournament.all_rounds_played() {
            self.play_round(&mut tournament)?;
            if self.autosave {
                self.save(&tournament)?;
            }
        }

        let standings = tournament.finish()?;
        self.announcer.standings(&standings)?;
        self.save(&tournament)?;
        info!(tournament = tournament.name(), "run complete");
        Ok(tournament)
    }

    fn play_round(&mut self, tournament: &mut Tournament) -> Result<(), RunError> {
        let plan = tournament.open_round(self.start)?;
        self.announcer.round(&plan)?;

        let outcomes = plan
            .pairings
            .iter()
            .enumerate()
            .map(|(board, pairing)| -> Result<Outcome, RunError> {
                let tag = self.source.outcome(plan.number, board, pairing)?;
                debug!(round = plan.number, board, %pairing, tag = %tag, "result entered");
                Ok(tag.parse::<Outcome>()?)
            })
            .collect::<Result<Vec<_>, RunError>>()?;

        tournament.record_outcomes(&outcomes)?;
        Ok(())
    }

    fn save(&self, tournament: &Tournament) -> Result<(), RunError> {
        if let Some(storage) = self.storage {
            storage.save_tournament(tournament)?;
        }
        Ok(())
    }

    fn config_from(&self, entry: TournamentEntry) -> Result<TournamentConfig, InputError> {
        let participant_count = entry
            .participant_count
            .or_else(|| self.preset.participants.map(|n| n.to_string()))
            .ok_or(InputError::Empty("participant count"))?;
        let time_control = entry
            .time_control
            .unwrap_or_else(|| self.preset.time_control.to_string());
        let round_count = entry
            .round_count
            .unwrap_or_else(|| self.preset.rounds.to_string());
        let pairing = match entry.pairing {
            Some(text) => text.parse::<PairingPolicy>()?,
            None => self.preset.pairing,
        };

        TournamentConfig::parse(
            &entry.name,
            &entry.venue,
            &entry.date,
            &participant_count,
            &entry.description,
            &time_control,
            &round_count,
            pairing,
        )
    }
}
