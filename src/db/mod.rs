pub mod area_repo;
pub mod connection;
pub mod department_repo;
pub mod instance_repo;
pub mod migrations;
pub mod note_repo;
pub mod pattern_repo;
pub mod state_repo;
pub mod task_repo;
pub mod template_repo;

pub use connection::*;

use rusqlite::types::Type;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::HubtasksError;

/// Read a JSON-encoded TEXT column.
pub(crate) fn json_column<T: DeserializeOwned>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, HubtasksError> {
    serde_json::to_string(value).map_err(|e| HubtasksError::database(e.to_string()))
}

pub(crate) fn new_id() -> String {
    ulid::Ulid::new().to_string()
}

/// Collapse a prefix lookup into exactly one match.
pub(crate) fn single_match<T>(
    reference: &str,
    mut matches: Vec<T>,
    describe: impl Fn(&T) -> String,
    not_found: impl FnOnce(&str) -> HubtasksError,
) -> Result<T, HubtasksError> {
    match matches.len() {
        0 => Err(not_found(reference)),
        1 => Ok(matches.remove(0)),
        _ => {
            let candidates: Vec<String> = matches.iter().map(describe).collect();
            Err(HubtasksError::ambiguous_ref(reference, &candidates))
        }
    }
}

/// Run `f` inside `BEGIN IMMEDIATE … COMMIT`, rolling back on error.
pub fn in_transaction<T>(
    conn: &rusqlite::Connection,
    f: impl FnOnce() -> Result<T, HubtasksError>,
) -> Result<T, HubtasksError> {
    conn.execute_batch("BEGIN IMMEDIATE")?;
    match f() {
        Ok(value) => {
            conn.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}
