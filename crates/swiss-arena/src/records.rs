//! Stored document schema.
//!
//! Records keep the flat, string-heavy layout of the tournament files the
//! desk has always written: numbers are strings, opponent lists are JSON
//! text inside a field, rounds and matches are maps keyed by name and
//! ordinal. This module converts between those documents and the engine's
//! [`Tournament`] aggregate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use swiss_core::{format_datetime, parse_datetime, InputError, Outcome, Participant};
use swiss_engine::{
    EngineError, Match, Pairing, PairingPolicy, Round, Stage, Tournament, TournamentConfig,
};
use thiserror::Error;

/// Errors raised while decoding stored records.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("malformed opponent list for '{name}': {source}")]
    Opponents {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed round name '{0}'")]
    RoundName(String),

    #[error("malformed match number '{0}' in {1}")]
    MatchNumber(String, String),
}

/// One participant, as stored in a `players_competing_in_<name>` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub last_name: String,
    pub first_name: String,
    /// ISO date, `yyyy-mm-dd`.
    pub date_of_birth: String,
    pub sex: String,
    pub ranking: String,
    /// JSON-encoded list of last names.
    pub opponents_faced: String,
    pub result_field: String,
}

impl From<&Participant> for PlayerRecord {
    fn from(p: &Participant) -> Self {
        Self {
            last_name: p.last_name.clone(),
            first_name: p.first_name.clone(),
            date_of_birth: p.date_of_birth.format("%Y-%m-%d").to_string(),
            sex: p.category.as_str().to_string(),
            ranking: p.rank.to_string(),
            // A list of strings always serializes.
            opponents_faced: serde_json::to_string(&p.opponents).unwrap_or_else(|_| "[]".into()),
            result_field: format!("{:.1}", p.score),
        }
    }
}

impl PlayerRecord {
    /// Decodes the record back into a participant with its score and history.
    pub fn to_participant(&self) -> Result<Participant, RecordError> {
        let mut participant = Participant::parse(
            &self.last_name,
            &self.first_name,
            &self.date_of_birth,
            &self.sex,
            &self.ranking,
        )?;
        participant.score = self
            .result_field
            .trim()
            .parse()
            .map_err(|_| InputError::number("result", self.result_field.clone()))?;
        participant.opponents =
            serde_json::from_str(&self.opponents_faced).map_err(|source| RecordError::Opponents {
                name: self.last_name.clone(),
                source,
            })?;
        Ok(participant)
    }
}

/// One match inside a round record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub player1: String,
    pub player2: String,
    /// `W`, `L` or `D`, from `player1`'s side.
    pub result: String,
    pub round_name: String,
}

impl From<&Match> for MatchRecord {
    fn from(m: &Match) -> Self {
        Self {
            player1: m.first.clone(),
            player2: m.second.clone(),
            result: m.outcome.tag().to_string(),
            round_name: m.round.clone(),
        }
    }
}

impl MatchRecord {
    pub fn to_match(&self) -> Result<Match, RecordError> {
        Ok(Match {
            first: self.player1.clone(),
            second: self.player2.clone(),
            outcome: self.result.parse::<Outcome>()?,
            round: self.round_name.clone(),
        })
    }
}

/// One round, keyed by its name inside the tournament record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub tournament_name: String,
    pub start_datetime: String,
    pub end_datetime: String,
    /// Keyed by 1-based match number.
    pub matches: BTreeMap<String, MatchRecord>,
    /// Announced pairings of a round still waiting for results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pairings: Vec<Pairing>,
}

impl From<&Round> for RoundRecord {
    fn from(round: &Round) -> Self {
        let matches = round
            .matches
            .iter()
            .enumerate()
            .map(|(i, m)| ((i + 1).to_string(), MatchRecord::from(m)))
            .collect();
        Self {
            tournament_name: round.tournament.clone(),
            start_datetime: format_datetime(round.start),
            end_datetime: format_datetime(round.end),
            matches,
            pairings: if round.is_scored() {
                Vec::new()
            } else {
                round.pairings.clone()
            },
        }
    }
}

impl RoundRecord {
    /// Matches in playing order. Map keys sort as text, so order by number.
    pub fn ordered_matches(&self, round_name: &str) -> Result<Vec<&MatchRecord>, RecordError> {
        let mut numbered = self
            .matches
            .iter()
            .map(|(key, m)| {
                key.trim()
                    .parse::<u32>()
                    .map(|n| (n, m))
                    .map_err(|_| RecordError::MatchNumber(key.clone(), round_name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        numbered.sort_by_key(|(n, _)| *n);
        Ok(numbered.into_iter().map(|(_, m)| m).collect())
    }

    fn to_round(&self, name: &str) -> Result<Round, RecordError> {
        let number =
            Round::number_from_name(name).ok_or_else(|| RecordError::RoundName(name.to_string()))?;
        let matches = self
            .ordered_matches(name)?
            .into_iter()
            .map(MatchRecord::to_match)
            .collect::<Result<Vec<_>, _>>()?;
        let pairings = if matches.is_empty() {
            self.pairings.clone()
        } else {
            matches.iter().map(|m| Pairing::new(&m.first, &m.second)).collect()
        };
        Ok(Round {
            number,
            name: name.to_string(),
            tournament: self.tournament_name.clone(),
            start: parse_datetime(&self.start_datetime)?,
            end: parse_datetime(&self.end_datetime)?,
            pairings,
            matches,
        })
    }
}

/// A tournament document. Its name is the table it is stored in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub venue: String,
    pub date: String,
    pub players_number: String,
    pub description: String,
    pub time_control: String,
    pub number_of_rounds: String,
    #[serde(default)]
    pub pairing_policy: PairingPolicy,
    /// Keyed by round name, `Round <k>`.
    pub rounds: BTreeMap<String, RoundRecord>,
    /// Set once the final ranking has run.
    #[serde(default)]
    pub finished: bool,
}

impl From<&Tournament> for TournamentRecord {
    fn from(t: &Tournament) -> Self {
        let config = t.config();
        Self {
            venue: config.venue.clone(),
            date: config.date.format("%Y-%m-%d").to_string(),
            players_number: config.participant_count.to_string(),
            description: config.description.clone(),
            time_control: config.time_control.as_str().to_string(),
            number_of_rounds: config.round_count.to_string(),
            pairing_policy: config.pairing,
            rounds: t
                .rounds()
                .iter()
                .map(|r| (r.name.clone(), RoundRecord::from(r)))
                .collect(),
            finished: t.stage() == Stage::Final,
        }
    }
}

impl TournamentRecord {
    /// Decodes the configuration part of the record.
    pub fn config(&self, name: &str) -> Result<TournamentConfig, RecordError> {
        Ok(TournamentConfig::parse(
            name,
            &self.venue,
            &self.date,
            &self.players_number,
            &self.description,
            &self.time_control,
            &self.number_of_rounds,
            self.pairing_policy,
        )?)
    }

    /// Rounds in playing order.
    pub fn ordered_rounds(&self) -> Result<Vec<(u32, &str, &RoundRecord)>, RecordError> {
        let mut rounds = self
            .rounds
            .iter()
            .map(|(name, r)| {
                Round::number_from_name(name)
                    .map(|n| (n, name.as_str(), r))
                    .ok_or_else(|| RecordError::RoundName(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        rounds.sort_by_key(|(n, _, _)| *n);
        Ok(rounds)
    }

    /// Rebuilds the live aggregate from this record and its player records.
    pub fn restore(&self, name: &str, players: &[PlayerRecord]) -> Result<Tournament, RecordError> {
        let config = self.config(name)?;
        let participants = players
            .iter()
            .map(PlayerRecord::to_participant)
            .collect::<Result<Vec<_>, _>>()?;
        let rounds = self
            .ordered_rounds()?
            .into_iter()
            .map(|(_, name, r)| r.to_round(name))
            .collect::<Result<Vec<_>, _>>()?;
        let mut tournament = Tournament::restore(config, participants, rounds)?;
        if self.finished {
            tournament.mark_final()?;
        }
        Ok(tournament)
    }
}
