use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::db::connection;
use crate::error::HubtasksError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Process-wide settings read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Data directory override (`HUBTASKS_DIR`); otherwise discovered by walking up.
    pub data_dir: Option<PathBuf>,
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_filter: "hubtasks=warn".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let data_dir = env::var_os("HUBTASKS_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let log_filter = env::var("HUBTASKS_LOG").unwrap_or(defaults.log_filter);
        let log_format = match env::var("HUBTASKS_LOG_FORMAT") {
            Ok(raw) => match LogFormat::from_str(&raw) {
                Some(format) => format,
                None => bail!("HUBTASKS_LOG_FORMAT must be 'pretty' or 'json', got '{raw}'"),
            },
            Err(_) => defaults.log_format,
        };

        Ok(Self {
            data_dir,
            log_filter,
            log_format,
        })
    }
}

/// Contents of `config.json` in the data directory.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LocalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_location_id: Option<i64>,
}

/// A missing file (or data dir) reads as an empty config; a file that exists
/// but does not parse is an error naming the path.
pub fn read_local_config(settings: &Settings) -> Result<LocalConfig, HubtasksError> {
    let Ok(path) = connection::config_path(settings) else {
        return Ok(LocalConfig::default());
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LocalConfig::default()),
        Err(e) => {
            return Err(HubtasksError::database(format!(
                "Failed to read {}: {e}",
                path.display()
            )))
        }
    };
    serde_json::from_str(&content).map_err(|e| {
        HubtasksError::validation(format!("Invalid config file {}: {e}", path.display()))
    })
}

pub fn write_active_location(settings: &Settings, location_id: i64) -> Result<PathBuf, HubtasksError> {
    let path = connection::config_path(settings)?;
    // Rewriting is how a corrupt file gets repaired.
    let mut config = read_local_config(settings).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "replacing unreadable config file");
        LocalConfig::default()
    });
    config.active_location_id = Some(location_id);
    let content = serde_json::to_string_pretty(&config)?;
    fs::write(&path, content)
        .map_err(|e| HubtasksError::database(format!("Failed to write config: {e}")))?;
    tracing::debug!(location_id, path = %path.display(), "active location saved");
    Ok(path)
}

/// `--location` wins; otherwise the location saved by `location use`.
pub fn resolve_location(settings: &Settings, flag: Option<i64>) -> Result<i64, HubtasksError> {
    if let Some(id) = flag {
        return Ok(id);
    }
    read_local_config(settings)?
        .active_location_id
        .ok_or_else(HubtasksError::no_location)
}
