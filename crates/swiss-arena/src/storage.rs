//! SQLite storage for tournament documents.
//!
//! Tournaments are kept as JSON documents grouped into named tables, the
//! layout the desk's export files use: one table per tournament holding its
//! record, and one `players_competing_in_<name>` table holding its roster.
//! Every save is logged in a `snapshots` table. A save writes both tables
//! and its log entry in one transaction.

use crate::records::{PlayerRecord, RecordError, TournamentRecord};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Transaction};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use swiss_engine::Tournament;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Prefix of the table holding a tournament's roster.
pub const PLAYERS_PREFIX: &str = swiss_engine::RESERVED_NAME_PREFIX;

/// Errors that can occur while reading or writing the store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid record: {0}")]
    Record(#[from] RecordError),

    #[error("no saved table named '{0}'")]
    NotFound(String),
}

/// Name of the table holding `tournament`'s players.
pub fn players_table(tournament: &str) -> String {
    format!("{PLAYERS_PREFIX}{tournament}")
}

/// What a document table holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableKind {
    Tournament,
    Players,
}

impl TableKind {
    const fn as_str(self) -> &'static str {
        match self {
            TableKind::Tournament => "tournament",
            TableKind::Players => "players",
        }
    }
}

/// One entry of the save log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub id: String,
    pub tournament: String,
    /// RFC 3339 timestamp.
    pub saved_at: String,
}

/// Every table, keyed by name, then every document keyed by its id.
pub type Dump = BTreeMap<String, BTreeMap<String, serde_json::Value>>;

/// SQLite-backed document store.
///
/// # Example
///
/// ```ignore
/// let storage = Storage::open("data/arena.db")?;
/// let snapshot = storage.save_tournament(&tournament)?;
/// let again = storage.load_tournament("Spring Open")?;
/// ```
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens or creates a store at the given path.
    ///
    /// Use `":memory:"` for a throwaway store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.init_schema()?;
        Ok(storage)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS documents (
                table_name TEXT NOT NULL,
                doc_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (table_name, doc_id)
            );

            CREATE TABLE IF NOT EXISTS snapshots (
                id TEXT PRIMARY KEY,
                tournament TEXT NOT NULL,
                saved_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Every document of `table` holding `kind`, in id order.
    fn table<T: DeserializeOwned>(
        &self,
        table: &str,
        kind: TableKind,
    ) -> Result<Vec<T>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT body FROM documents WHERE table_name = ?1 AND kind = ?2 ORDER BY doc_id",
        )?;
        let bodies = stmt
            .query_map((table, kind.as_str()), |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        if bodies.is_empty() {
            return Err(StorageError::NotFound(table.to_string()));
        }
        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(StorageError::from))
            .collect()
    }

    fn table_names(&self, kind: TableKind) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT table_name FROM documents WHERE kind = ?1 ORDER BY table_name",
        )?;
        let names = stmt
            .query_map([kind.as_str()], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Saves a tournament and its roster, replacing any earlier save under
    /// the same name.
    ///
    /// # Returns
    ///
    /// The id of the snapshot logged for this save.
    pub fn save_tournament(&self, tournament: &Tournament) -> Result<String, StorageError> {
        let name = tournament.name();
        let record = TournamentRecord::from(tournament);
        let players: Vec<PlayerRecord> = tournament
            .participants()
            .iter()
            .map(PlayerRecord::from)
            .collect();

        let tx = self.conn.unchecked_transaction()?;
        replace_table(&tx, name, TableKind::Tournament, std::slice::from_ref(&record))?;
        replace_table(&tx, &players_table(name), TableKind::Players, &players)?;

        let id = Uuid::new_v4().to_string();
        tx.execute(
            "INSERT INTO snapshots (id, tournament, saved_at) VALUES (?1, ?2, ?3)",
            (&id, name, Utc::now().to_rfc3339()),
        )?;
        tx.commit()?;
        info!(tournament = name, snapshot = %id, stage = %tournament.stage(), "tournament saved");
        Ok(id)
    }

    /// The stored record of one tournament.
    pub fn tournament_record(&self, name: &str) -> Result<TournamentRecord, StorageError> {
        self.table::<TournamentRecord>(name, TableKind::Tournament)?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    /// The stored roster of one tournament.
    pub fn players(&self, tournament: &str) -> Result<Vec<PlayerRecord>, StorageError> {
        self.table(&players_table(tournament), TableKind::Players)
    }

    /// Rebuilds a saved tournament.
    pub fn load_tournament(&self, name: &str) -> Result<Tournament, StorageError> {
        let record = self.tournament_record(name)?;
        let players = self.players(name)?;
        Ok(record.restore(name, &players)?)
    }

    /// Every saved tournament, by name.
    pub fn tournaments(&self) -> Result<Vec<(String, TournamentRecord)>, StorageError> {
        self.table_names(TableKind::Tournament)?
            .into_iter()
            .map(|name| {
                let record = self.tournament_record(&name)?;
                Ok((name, record))
            })
            .collect()
    }

    /// Every saved player of every tournament.
    pub fn all_players(&self) -> Result<Vec<PlayerRecord>, StorageError> {
        let mut all = Vec::new();
        for table in self.table_names(TableKind::Players)? {
            all.extend(self.table::<PlayerRecord>(&table, TableKind::Players)?);
        }
        Ok(all)
    }

    /// The save log, oldest first.
    pub fn snapshots(&self) -> Result<Vec<Snapshot>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, tournament, saved_at FROM snapshots ORDER BY saved_at, rowid")?;
        let snapshots = stmt
            .query_map([], |row| {
                Ok(Snapshot {
                    id: row.get(0)?,
                    tournament: row.get(1)?,
                    saved_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(snapshots)
    }

    /// Timestamp of the latest save of `tournament`, if any.
    pub fn last_saved(&self, tournament: &str) -> Result<Option<String>, StorageError> {
        let saved_at = self
            .conn
            .query_row(
                "SELECT saved_at FROM snapshots WHERE tournament = ?1
                 ORDER BY saved_at DESC, rowid DESC LIMIT 1",
                [tournament],
                |row| row.get(0),
            )
            .optional()?;
        Ok(saved_at)
    }

    /// The whole store as `{table: {doc_id: document}}`.
    pub fn dump(&self) -> Result<Dump, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT table_name, doc_id, body FROM documents ORDER BY table_name, doc_id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut dump = Dump::new();
        for (table, doc_id, body) in rows {
            dump.entry(table)
                .or_default()
                .insert(doc_id.to_string(), serde_json::from_str(&body)?);
        }
        Ok(dump)
    }
}

/// Truncates `table` and inserts `docs` with ids 1..=n.
fn replace_table<T: Serialize>(
    tx: &Transaction<'_>,
    table: &str,
    kind: TableKind,
    docs: &[T],
) -> Result<(), StorageError> {
    tx.execute("DELETE FROM documents WHERE table_name = ?1", [table])?;
    for (doc_id, doc) in (1i64..).zip(docs) {
        tx.execute(
            "INSERT INTO documents (table_name, doc_id, kind, body) VALUES (?1, ?2, ?3, ?4)",
            (table, doc_id, kind.as_str(), serde_json::to_string(doc)?),
        )?;
    }
    Ok(())
}
