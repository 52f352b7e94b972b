//! JSON export of the document store.
//!
//! The export has the same shape as the desk's historical database file:
//! an object of tables, each an object of documents keyed by id.

use crate::storage::Dump;
use std::path::Path;

/// Writes `dump` as pretty-printed JSON to `path`, creating parent
/// directories as needed.
///
/// # File Format
///
/// ```json
/// {
///   "Spring Open": {
///     "1": { "venue": "Lyon", "rounds": { "Round 1": { ... } }, ... }
///   },
///   "players_competing_in_Spring Open": {
///     "1": { "last_name": "Anand", "ranking": "1", ... }
///   }
/// }
/// ```
pub fn write_json<P: AsRef<Path>>(path: P, dump: &Dump) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, dump)?;
    Ok(())
}
