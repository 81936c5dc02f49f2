use std::env;
use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;

use crate::config::Settings;
use crate::error::HubtasksError;

use super::migrations;

pub const DATA_DIR_NAME: &str = ".hubtasks";
pub const DB_FILE_NAME: &str = "hubtasks.db";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Locate the data directory: the configured override, or the nearest
/// `.hubtasks` directory walking up from the current directory.
pub fn find_data_dir(settings: &Settings) -> Result<PathBuf, HubtasksError> {
    if let Some(dir) = &settings.data_dir {
        return Ok(dir.clone());
    }
    let mut dir = env::current_dir().map_err(|e| HubtasksError::database(e.to_string()))?;
    loop {
        let candidate = dir.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !dir.pop() {
            return Err(HubtasksError::not_initialized());
        }
    }
}

/// Get the path to the database.
pub fn db_path(settings: &Settings) -> Result<PathBuf, HubtasksError> {
    Ok(find_data_dir(settings)?.join(DB_FILE_NAME))
}

/// Get the config file path.
pub fn config_path(settings: &Settings) -> Result<PathBuf, HubtasksError> {
    Ok(find_data_dir(settings)?.join(CONFIG_FILE_NAME))
}

/// Open a connection to the database. Returns error if not initialized.
pub fn open_db(settings: &Settings) -> Result<Connection, HubtasksError> {
    let path = db_path(settings).map_err(|_| HubtasksError::not_initialized())?;
    if !path.exists() {
        return Err(HubtasksError::not_initialized());
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Initialize the database: create the data directory, database and schema.
/// Without an override the data directory is created in the current directory.
pub fn init_db(settings: &Settings) -> Result<PathBuf, HubtasksError> {
    let dir = match &settings.data_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir()
            .map_err(|e| HubtasksError::database(e.to_string()))?
            .join(DATA_DIR_NAME),
    };
    fs::create_dir_all(&dir).map_err(|e| HubtasksError::database(e.to_string()))?;
    let path = dir.join(DB_FILE_NAME);
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    tracing::info!(path = %path.display(), "database initialized");
    Ok(path)
}

/// In-memory database with the full schema, for tests.
pub fn open_in_memory() -> Result<Connection, HubtasksError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<(), HubtasksError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}
