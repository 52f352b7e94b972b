//! Where tournament data comes from.
//!
//! An [`InputSource`] answers three kinds of questions: the tournament
//! settings, one roster entry at a time, and one match result at a time.
//! Answers are raw text; validation happens when the runner builds the
//! engine values from them.

use serde::Deserialize;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;
use swiss_engine::Pairing;
use thiserror::Error;

/// Errors raised by an input source itself, before any validation.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("input error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed script: {0}")]
    Script(#[from] toml::de::Error),

    #[error("input ended while waiting for {0}")]
    Exhausted(String),
}

/// Tournament settings as entered.
///
/// `None` means "not given"; the runner fills those from the preset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TournamentEntry {
    pub name: String,
    pub venue: String,
    pub date: String,
    pub participant_count: Option<String>,
    pub description: String,
    pub time_control: Option<String>,
    pub round_count: Option<String>,
    pub pairing: Option<String>,
}

/// One roster line as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantEntry {
    pub last_name: String,
    pub first_name: String,
    pub date_of_birth: String,
    pub category: String,
    pub rank: String,
}

/// Supplies tournament data to the runner.
pub trait InputSource {
    fn tournament(&mut self) -> Result<TournamentEntry, SourceError>;

    /// The roster entry at `index` (0-based) out of `total`.
    fn participant(&mut self, index: usize, total: usize) -> Result<ParticipantEntry, SourceError>;

    /// The result tag of the pairing on `board` (0-based) in round `round`.
    fn outcome(&mut self, round: u32, board: usize, pairing: &Pairing) -> Result<String, SourceError>;
}

/// Asks every question on a terminal-like pair of streams.
pub struct PromptInput<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> PromptInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn ask(&mut self, question: &str) -> Result<String, SourceError> {
        write!(self.writer, "{question}: ")?;
        self.writer.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(SourceError::Exhausted(question.to_string()));
        }
        Ok(line.trim().to_string())
    }

    fn ask_optional(&mut self, question: &str) -> Result<Option<String>, SourceError> {
        let answer = self.ask(question)?;
        Ok((!answer.is_empty()).then_some(answer))
    }
}

impl<R: BufRead, W: Write> InputSource for PromptInput<R, W> {
    fn tournament(&mut self) -> Result<TournamentEntry, SourceError> {
        Ok(TournamentEntry {
            name: self.ask("Tournament name")?,
            venue: self.ask("Venue")?,
            date: self.ask("Date (yyyy/mm/dd)")?,
            participant_count: self.ask_optional("Number of participants")?,
            description: self.ask("Description")?,
            time_control: self.ask_optional("Time control (bullet, blitz, rapid)")?,
            round_count: self.ask_optional("Number of rounds")?,
            pairing: self.ask_optional("Pairing policy (relaxation, backtracking)")?,
        })
    }

    fn participant(&mut self, index: usize, total: usize) -> Result<ParticipantEntry, SourceError> {
        writeln!(self.writer, "Participant {} of {}", index + 1, total)?;
        Ok(ParticipantEntry {
            last_name: self.ask("  Last name")?,
            first_name: self.ask("  First name")?,
            date_of_birth: self.ask("  Date of birth (yyyy/mm/dd)")?,
            category: self.ask("  Category (men, women, other)")?,
            rank: self.ask("  Ranking")?,
        })
    }

    fn outcome(&mut self, round: u32, _board: usize, pairing: &Pairing) -> Result<String, SourceError> {
        self.ask(&format!(
            "Round {round}, {pairing}: result for {} (W, L, D)",
            pairing.first
        ))
    }
}

#[derive(Debug, Deserialize)]
struct Script {
    tournament: ScriptTournament,
    #[serde(default)]
    players: Vec<ScriptPlayer>,
    #[serde(default)]
    rounds: Vec<ScriptRound>,
}

#[derive(Debug, Deserialize)]
struct ScriptTournament {
    name: String,
    #[serde(default)]
    venue: String,
    date: String,
    #[serde(default)]
    participants: Option<u32>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    time_control: Option<String>,
    #[serde(default)]
    rounds: Option<u32>,
    #[serde(default)]
    pairing: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScriptPlayer {
    last_name: String,
    first_name: String,
    date_of_birth: String,
    category: String,
    rank: u32,
}

#[derive(Debug, Deserialize)]
struct ScriptRound {
    results: Vec<String>,
}

/// Answers from a TOML script.
///
/// ```toml
/// [tournament]
/// name = "Spring Open"
/// venue = "Lyon"
/// date = "2024/03/09"
/// participants = 4
/// time_control = "blitz"
/// rounds = 2
///
/// [[players]]
/// last_name = "Anand"
/// first_name = "Viswanathan"
/// date_of_birth = "1969/12/11"
/// category = "men"
/// rank = 1
///
/// [[rounds]]
/// results = ["W", "D"]
/// ```
#[derive(Debug)]
pub struct ScriptedInput {
    script: Script,
}

impl ScriptedInput {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        std::fs::read_to_string(path)?.parse()
    }
}

impl FromStr for ScriptedInput {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            script: toml::from_str(s)?,
        })
    }
}

impl InputSource for ScriptedInput {
    fn tournament(&mut self) -> Result<TournamentEntry, SourceError> {
        let t = &self.script.tournament;
        Ok(TournamentEntry {
            name: t.name.clone(),
            venue: t.venue.clone(),
            date: t.date.clone(),
            participant_count: t.participants.map(|n| n.to_string()),
            description: t.description.clone(),
            time_control: t.time_control.clone(),
            round_count: t.rounds.map(|n| n.to_string()),
            pairing: t.pairing.clone(),
        })
    }

    fn participant(&mut self, index: usize, total: usize) -> Result<ParticipantEntry, SourceError> {
        let p = self
            .script
            .players
            .get(index)
            .ok_or_else(|| SourceError::Exhausted(format!("participant {} of {total}", index + 1)))?;
        Ok(ParticipantEntry {
            last_name: p.last_name.clone(),
            first_name: p.first_name.clone(),
            date_of_birth: p.date_of_birth.clone(),
            category: p.category.clone(),
            rank: p.rank.to_string(),
        })
    }

    fn outcome(&mut self, round: u32, board: usize, pairing: &Pairing) -> Result<String, SourceError> {
        (round as usize)
            .checked_sub(1)
            .and_then(|i| self.script.rounds.get(i))
            .and_then(|r| r.results.get(board))
            .cloned()
            .ok_or_else(|| SourceError::Exhausted(format!("the result of {pairing} in round {round}")))
    }
}
