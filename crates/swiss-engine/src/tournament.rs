//! The tournament aggregate.
//!
//! [`Tournament`] owns the roster and the rounds and walks them through a
//! fixed life cycle:
//!
//! ```text
//! Created -> RosterBuilt -> RoundOpen(1) -> RoundScored(1) -> RoundOpen(2) -> ... -> Final
//! ```
//!
//! Every operation checks the current [`Stage`] first and fails with
//! [`EngineError::InvalidStage`] when called out of turn. Scoring a round is
//! all or nothing and a scored round is never reopened.

use crate::rematch::{self, PairingPolicy, PairingReport};
use crate::{announce, pairing, ranking, scoring, EngineError, Match, Pairing, Round};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use swiss_core::{parse_date, InputError, Outcome, Participant, TimeControl};
use tracing::{info, warn};

/// Tournament names may not start with this. The store keeps each roster in
/// a table named with it, next to the tournament's own table.
pub const RESERVED_NAME_PREFIX: &str = "players_competing_in_";

/// Settings fixed when a tournament is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub name: String,
    pub venue: String,
    pub date: NaiveDate,
    /// Declared roster size. Must be even.
    pub participant_count: u32,
    pub description: String,
    pub time_control: TimeControl,
    /// Declared number of rounds. At most `participant_count`.
    pub round_count: u32,
    #[serde(default)]
    pub pairing: PairingPolicy,
}

impl TournamentConfig {
    /// Checks the invariants a Swiss tournament needs.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::OddParticipantCount`] when someone would be left
    /// without an opponent, and [`InputError::TooManyRounds`] when there are
    /// more rounds than participants. Names starting with
    /// [`RESERVED_NAME_PREFIX`] give [`InputError::ReservedName`].
    pub fn validate(&self) -> Result<(), InputError> {
        if self.name.trim().is_empty() {
            return Err(InputError::Empty("tournament name"));
        }
        if self.name.starts_with(RESERVED_NAME_PREFIX) {
            return Err(InputError::ReservedName(self.name.clone()));
        }
        if self.participant_count % 2 != 0 {
            return Err(InputError::OddParticipantCount(self.participant_count));
        }
        if self.round_count == 0 {
            return Err(InputError::NoRounds);
        }
        if self.round_count > self.participant_count {
            return Err(InputError::TooManyRounds {
                rounds: self.round_count,
                participants: self.participant_count,
            });
        }
        Ok(())
    }

    /// Builds and validates a configuration from raw text fields.
    #[allow(clippy::too_many_arguments)]
    pub fn parse(
        name: &str,
        venue: &str,
        date: &str,
        participant_count: &str,
        description: &str,
        time_control: &str,
        round_count: &str,
        pairing: PairingPolicy,
    ) -> Result<Self, InputError> {
        let config = Self {
            name: name.trim().to_string(),
            venue: venue.trim().to_string(),
            date: parse_date(date)?,
            participant_count: participant_count
                .trim()
                .parse()
                .map_err(|_| InputError::number("participant count", participant_count))?,
            description: description.trim().to_string(),
            time_control: time_control.parse()?,
            round_count: round_count
                .trim()
                .parse()
                .map_err(|_| InputError::number("round count", round_count))?,
            pairing,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Where a tournament is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Created,
    RosterBuilt,
    RoundOpen(u32),
    RoundScored(u32),
    Final,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Created => write!(f, "created"),
            Stage::RosterBuilt => write!(f, "waiting for round 1"),
            Stage::RoundOpen(k) => write!(f, "playing round {k}"),
            Stage::RoundScored(k) => write!(f, "done with round {k}"),
            Stage::Final => write!(f, "final"),
        }
    }
}

/// What opening a round produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPlan {
    pub number: u32,
    pub name: String,
    /// Pairings in board order; outcomes are read from `first`'s side.
    pub pairings: Vec<Pairing>,
    /// One `"<p1> will meet <p2>"` line per pairing.
    pub announcements: Vec<String>,
    /// Swaps made and rematches left by the rematch avoidance.
    pub report: PairingReport,
}

/// A Swiss-system tournament: configuration, roster and rounds.
#[derive(Debug, Clone)]
pub struct Tournament {
    config: TournamentConfig,
    participants: Vec<Participant>,
    rounds: Vec<Round>,
    stage: Stage,
}

impl Tournament {
    /// Creates a tournament with no roster.
    ///
    /// # Errors
    ///
    /// Returns the configuration error found by [`TournamentConfig::validate`].
    pub fn new(config: TournamentConfig) -> Result<Self, EngineError> {
        config.validate()?;
        info!(
            tournament = %config.name,
            participants = config.participant_count,
            rounds = config.round_count,
            time_control = %config.time_control,
            pairing = %config.pairing,
            "tournament created"
        );
        Ok(Self {
            config,
            participants: Vec::new(),
            rounds: Vec::new(),
            stage: Stage::Created,
        })
    }

    /// Rebuilds a tournament from stored parts.
    ///
    /// Scores, ranks and opponent histories are taken from `participants` as
    /// they are; matches are not replayed. The stage is inferred from the
    /// rounds: none means the roster is built, an unscored last round is
    /// open, a scored one is done. A tournament whose every round is scored
    /// comes back before its final ranking pass. Call [`Self::finish`] to
    /// rank it, or [`Self::mark_final`] if it was already finished when
    /// stored.
    pub fn restore(
        config: TournamentConfig,
        participants: Vec<Participant>,
        mut rounds: Vec<Round>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let participants = checked_roster(&config, participants)?;

        rounds.sort_by_key(|r| r.number);
        for (expected, round) in (1..).zip(&rounds) {
            if round.number != expected || round.number > config.round_count {
                return Err(EngineError::UnknownRound(round.number));
            }
        }

        let stage = match rounds.last() {
            None => Stage::RosterBuilt,
            Some(last) if last.is_scored() => Stage::RoundScored(last.number),
            Some(last) => Stage::RoundOpen(last.number),
        };

        Ok(Self {
            config,
            participants,
            rounds,
            stage,
        })
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Participants, in the order of the last ranking pass.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Looks up a participant by last name.
    pub fn participant(&self, id: &str) -> Result<&Participant, EngineError> {
        self.participants
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| EngineError::UnknownParticipant(id.to_string()))
    }

    /// Looks up a round by ordinal.
    pub fn round(&self, number: u32) -> Result<&Round, EngineError> {
        self.rounds
            .iter()
            .find(|r| r.number == number)
            .ok_or(EngineError::UnknownRound(number))
    }

    /// Whether every declared round has been scored.
    pub fn all_rounds_played(&self) -> bool {
        matches!(self.stage, Stage::RoundScored(k) if k == self.config.round_count)
            || self.stage == Stage::Final
    }

    /// Attaches the roster.
    ///
    /// The roster is kept ordered by initial rank, which is the order the
    /// first round is paired from.
    ///
    /// # Errors
    ///
    /// Fails when the roster size differs from the declared count or a last
    /// name appears twice.
    pub fn register(&mut self, roster: Vec<Participant>) -> Result<(), EngineError> {
        self.expect_stage(Stage::Created, "register participants")?;
        self.participants = checked_roster(&self.config, roster)?;
        self.stage = Stage::RosterBuilt;
        info!(tournament = %self.config.name, "roster of {} registered", self.participants.len());
        Ok(())
    }

    /// Opens the next round and computes its pairings.
    ///
    /// Round 1 pairs the top half of the roster against the bottom half.
    /// Later rounds re-rank the field, then rearrange it with the configured
    /// [`PairingPolicy`] to avoid rematches.
    ///
    /// The first round starts at `now`. Each later round starts one round
    /// length after the previous one started.
    pub fn open_round(&mut self, now: NaiveDateTime) -> Result<RoundPlan, EngineError> {
        let number = match self.stage {
            Stage::RosterBuilt => 1,
            Stage::RoundScored(k) if k < self.config.round_count => k + 1,
            stage => {
                return Err(EngineError::InvalidStage {
                    action: "open a round",
                    stage,
                })
            }
        };

        let (pairings, report) = if number == 1 {
            (pairing::first_round(&self.participants), PairingReport::default())
        } else {
            ranking::rank(&mut self.participants);
            let mut sequence: Vec<&Participant> = self.participants.iter().collect();
            rematch::arranged_pairs(&mut sequence, self.config.pairing)
        };

        let announcements = pairings
            .iter()
            .map(|p| Ok(announce::pairing_line(self.participant(&p.first)?, self.participant(&p.second)?)))
            .collect::<Result<Vec<_>, EngineError>>()?;

        let duration = self.config.time_control.round_duration();
        let start = self
            .rounds
            .last()
            .map_or(now, |previous| previous.start + duration);
        let name = Round::name_for(number);

        self.rounds.push(Round {
            number,
            name: name.clone(),
            tournament: self.config.name.clone(),
            start,
            end: start + duration,
            pairings: pairings.clone(),
            matches: Vec::new(),
        });
        self.stage = Stage::RoundOpen(number);

        info!(
            tournament = %self.config.name,
            round = number,
            swaps = report.swaps,
            "round opened"
        );
        if !report.is_clean() {
            warn!(round = number, "{} rematch(es) in this round", report.rematches.len());
        }

        Ok(RoundPlan {
            number,
            name,
            pairings,
            announcements,
            report,
        })
    }

    /// Records one outcome per pairing of the open round, in pairing order.
    pub fn record_outcomes(&mut self, outcomes: &[Outcome]) -> Result<(), EngineError> {
        let round = self.open_round_ref("record results")?;
        if outcomes.len() != round.pairings.len() {
            return Err(EngineError::ResultCount {
                round: round.number,
                expected: round.pairings.len(),
                actual: outcomes.len(),
            });
        }
        let matches = round
            .pairings
            .iter()
            .zip(outcomes)
            .map(|(p, o)| Match::for_pairing(p, *o, round.name.clone()))
            .collect();
        self.record_matches(matches)
    }

    /// Records the matches of the open round and scores them.
    ///
    /// There must be exactly one match per announced pairing, in the same
    /// order and orientation. Nothing changes unless every match checks out.
    pub fn record_matches(&mut self, matches: Vec<Match>) -> Result<(), EngineError> {
        let round = self.open_round_ref("record results")?;
        let number = round.number;
        if matches.len() != round.pairings.len() {
            return Err(EngineError::ResultCount {
                round: number,
                expected: round.pairings.len(),
                actual: matches.len(),
            });
        }
        for (index, (m, p)) in matches.iter().zip(&round.pairings).enumerate() {
            if !m.follows(p) || m.round != round.name {
                return Err(EngineError::PairingMismatch {
                    round: number,
                    index: index + 1,
                    expected: p.to_string(),
                });
            }
        }

        scoring::score_round(&mut self.participants, &matches)?;

        if let Some(round) = self.rounds.last_mut() {
            round.matches = matches;
        }
        self.stage = Stage::RoundScored(number);
        info!(tournament = %self.config.name, round = number, "round scored");
        Ok(())
    }

    /// Runs the final ranking pass and closes the tournament.
    ///
    /// Returns the standings lines, best first.
    pub fn finish(&mut self) -> Result<Vec<String>, EngineError> {
        if !matches!(self.stage, Stage::RoundScored(k) if k == self.config.round_count) {
            return Err(EngineError::InvalidStage {
                action: "finish",
                stage: self.stage,
            });
        }
        ranking::rank(&mut self.participants);
        self.stage = Stage::Final;
        info!(tournament = %self.config.name, "tournament finished");
        Ok(announce::standing_lines(&self.participants))
    }

    /// Closes a restored tournament that was finished before it was stored.
    ///
    /// Unlike [`Self::finish`] the stored ranks are kept as they are.
    pub fn mark_final(&mut self) -> Result<(), EngineError> {
        if !matches!(self.stage, Stage::RoundScored(k) if k == self.config.round_count) {
            return Err(EngineError::InvalidStage {
                action: "mark final",
                stage: self.stage,
            });
        }
        self.stage = Stage::Final;
        Ok(())
    }

    /// Standings lines for the current scores without changing any rank.
    pub fn standings(&self) -> Vec<String> {
        if self.stage == Stage::Final {
            return announce::standing_lines(&self.participants);
        }
        let mut snapshot = self.participants.clone();
        ranking::rank(&mut snapshot);
        announce::standing_lines(&snapshot)
    }

    /// Replaces the description. An empty text keeps the current one.
    /// Returns whether anything changed.
    pub fn set_description(&mut self, description: &str) -> bool {
        let description = description.trim();
        if description.is_empty() {
            return false;
        }
        self.config.description = description.to_string();
        true
    }

    /// Overrides one participant's rank.
    pub fn override_rank(&mut self, id: &str, rank: u32) -> Result<(), EngineError> {
        if self.stage == Stage::Final {
            return Err(EngineError::InvalidStage {
                action: "override a rank",
                stage: self.stage,
            });
        }
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| EngineError::UnknownParticipant(id.to_string()))?;
        info!(participant = id, from = participant.rank, to = rank, "rank overridden");
        participant.rank = rank;
        Ok(())
    }

    /// Overrides a round's time window.
    pub fn override_round_window(
        &mut self,
        number: u32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<(), EngineError> {
        if end < start {
            return Err(EngineError::InvertedWindow);
        }
        let round = self
            .rounds
            .iter_mut()
            .find(|r| r.number == number)
            .ok_or(EngineError::UnknownRound(number))?;
        round.start = start;
        round.end = end;
        Ok(())
    }

    fn expect_stage(&self, expected: Stage, action: &'static str) -> Result<(), EngineError> {
        if self.stage != expected {
            return Err(EngineError::InvalidStage {
                action,
                stage: self.stage,
            });
        }
        Ok(())
    }

    fn open_round_ref(&self, action: &'static str) -> Result<&Round, EngineError> {
        match (self.stage, self.rounds.last()) {
            (Stage::RoundOpen(k), Some(round)) if round.number == k => Ok(round),
            (stage, _) => Err(EngineError::InvalidStage { action, stage }),
        }
    }
}

/// Checks size and identity uniqueness, then orders by rank.
fn checked_roster(
    config: &TournamentConfig,
    mut roster: Vec<Participant>,
) -> Result<Vec<Participant>, EngineError> {
    if roster.len() != config.participant_count as usize {
        return Err(InputError::RosterSize {
            expected: config.participant_count,
            actual: roster.len(),
        }
        .into());
    }
    let mut seen = HashSet::new();
    for p in &roster {
        if !seen.insert(p.id()) {
            return Err(InputError::DuplicateParticipant(p.id().to_string()).into());
        }
    }
    roster.sort_by_key(|p| p.rank);
    Ok(roster)
}
