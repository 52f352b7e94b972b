//! Lookups over saved tournaments and players.

use crate::records::{PlayerRecord, TournamentRecord};
use crate::storage::{Storage, StorageError};
use swiss_core::Participant;
use swiss_engine::{ranking, Match, Round, TournamentConfig};

/// How to sort a player listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerOrder {
    /// By last name, then first name.
    #[default]
    Alphabetical,
    /// By stored ranking. Across tournaments, by score first.
    Ranking,
}

/// A saved tournament as listed.
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentSummary {
    pub config: TournamentConfig,
    pub rounds_played: usize,
    pub last_saved: Option<String>,
}

impl std::fmt::Display for TournamentSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = &self.config;
        write!(
            f,
            "{} at {} on {} ({}, {} players, {}/{} rounds)",
            c.name,
            c.venue,
            c.date,
            c.time_control,
            c.participant_count,
            self.rounds_played,
            c.round_count
        )?;
        if !c.description.is_empty() {
            write!(f, ": {}", c.description)?;
        }
        Ok(())
    }
}

fn decode(records: &[PlayerRecord]) -> Result<Vec<Participant>, StorageError> {
    Ok(records
        .iter()
        .map(PlayerRecord::to_participant)
        .collect::<Result<Vec<_>, _>>()?)
}

fn alphabetical(players: &mut [Participant]) {
    players.sort_by(|a, b| {
        a.last_name
            .cmp(&b.last_name)
            .then_with(|| a.first_name.cmp(&b.first_name))
    });
}

/// Players of one tournament.
pub fn tournament_players(
    storage: &Storage,
    tournament: &str,
    order: PlayerOrder,
) -> Result<Vec<Participant>, StorageError> {
    let mut players = decode(&storage.players(tournament)?)?;
    match order {
        PlayerOrder::Alphabetical => alphabetical(&mut players),
        PlayerOrder::Ranking => players.sort_by_key(|p| p.rank),
    }
    Ok(players)
}

/// Players of every saved tournament.
///
/// Someone who played in two tournaments is listed twice.
pub fn all_players(storage: &Storage, order: PlayerOrder) -> Result<Vec<Participant>, StorageError> {
    let mut players = decode(&storage.all_players()?)?;
    match order {
        PlayerOrder::Alphabetical => alphabetical(&mut players),
        PlayerOrder::Ranking => players.sort_by(ranking::standings_order),
    }
    Ok(players)
}

/// Every saved tournament, by name.
pub fn tournaments(storage: &Storage) -> Result<Vec<TournamentSummary>, StorageError> {
    storage
        .tournaments()?
        .into_iter()
        .map(|(name, record)| summarize(storage, &name, &record))
        .collect()
}

fn summarize(
    storage: &Storage,
    name: &str,
    record: &TournamentRecord,
) -> Result<TournamentSummary, StorageError> {
    let rounds_played = record
        .rounds
        .values()
        .filter(|r| !r.matches.is_empty())
        .count();
    Ok(TournamentSummary {
        config: record.config(name)?,
        rounds_played,
        last_saved: storage.last_saved(name)?,
    })
}

/// Rounds of one tournament, in playing order.
pub fn rounds(storage: &Storage, tournament: &str) -> Result<Vec<Round>, StorageError> {
    Ok(storage.load_tournament(tournament)?.rounds().to_vec())
}

/// Matches of one tournament, round after round.
pub fn matches(storage: &Storage, tournament: &str) -> Result<Vec<Match>, StorageError> {
    Ok(rounds(storage, tournament)?
        .into_iter()
        .flat_map(|r| r.matches)
        .collect())
}
