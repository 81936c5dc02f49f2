pub mod commands;
pub mod init;
pub mod instance;
pub mod location;
pub mod note;
pub mod settings;
pub mod status;
pub mod sweep;
pub mod task;
pub mod template;

pub use commands::*;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use crate::config::{self, Settings};
use crate::db::connection;
use crate::error::HubtasksError;
use crate::output;
use crate::schedule::clock::{self, Clock, FixedClock, SystemClock};

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub json: bool,
    pub location: Option<i64>,
    pub settings: Settings,
    clock: Box<dyn Clock>,
}

impl Context {
    pub fn new(cli: &Cli, settings: Settings) -> Result<Self, HubtasksError> {
        let clock: Box<dyn Clock> = match &cli.now {
            Some(raw) => Box::new(FixedClock(clock::parse_instant(raw)?)),
            None => Box::new(SystemClock),
        };
        Ok(Self {
            json: cli.json,
            location: cli.location,
            settings,
            clock,
        })
    }

    pub fn open_db(&self) -> Result<Connection, HubtasksError> {
        connection::open_db(&self.settings)
    }

    pub fn location_id(&self) -> Result<i64, HubtasksError> {
        config::resolve_location(&self.settings, self.location)
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

/// Map a command result onto an exit code, printing the error envelope.
pub fn finish(result: Result<i32, HubtasksError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => report_error(&e, json_output),
    }
}

pub fn report_error(e: &HubtasksError, json_output: bool) -> i32 {
    tracing::debug!(code = e.code.as_str(), error = %e, "command failed");
    if json_output {
        output::print_json(&output::json::error(e));
    } else {
        eprintln!("Error: {}", e.message);
    }
    1
}
