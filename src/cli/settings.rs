use std::io::Read;

use serde_json::json;

use crate::cli::commands::{PatternCommands, SettingsCommands, StateCommands};
use crate::cli::{finish, Context};
use crate::db::{in_transaction, pattern_repo, state_repo};
use crate::error::HubtasksError;
use crate::location;
use crate::models::LocationSettings;
use crate::output;

pub fn run(cmd: SettingsCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        SettingsCommands::Load => run_load(ctx),
        SettingsCommands::Show => run_show(ctx),
    };
    finish(result, ctx.json)
}

pub fn run_patterns(cmd: PatternCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        PatternCommands::List => run_pattern_list(ctx),
    };
    finish(result, ctx.json)
}

pub fn run_states(cmd: StateCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        StateCommands::List => run_state_list(ctx),
    };
    finish(result, ctx.json)
}

fn run_load(ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| HubtasksError::validation(format!("Failed to read stdin: {e}")))?;
    let doc: LocationSettings = serde_json::from_str(&input)?;
    doc.validate()?;

    let report = in_transaction(&conn, || location::apply_location_settings(&conn, location_id, &doc))?;

    if ctx.json {
        output::print_success(json!({
            "location_id": location_id,
            "applied": report
        }));
    } else {
        println!(
            "Loaded settings for location {location_id}: {} departments, {} patterns, {} states, {} areas ({} disabled)",
            report.departments, report.patterns, report.states, report.areas, report.disabled
        );
    }
    Ok(0)
}

fn run_show(ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let doc = location::read_location_settings(&conn, location_id)?;

    let rendered = serde_json::to_value(&doc)?;
    if ctx.json {
        output::print_success(rendered);
    } else {
        output::print_json(&rendered);
    }
    Ok(0)
}

fn run_pattern_list(ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let patterns = pattern_repo::list_patterns(&conn, location_id)?;

    if ctx.json {
        let patterns_json: Vec<_> = patterns.iter().map(output::json::pattern_json).collect();
        output::print_success(json!({ "patterns": patterns_json }));
    } else {
        output::text::print_patterns(&patterns);
    }
    Ok(0)
}

fn run_state_list(ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let states = state_repo::list_states(&conn, location_id)?;

    if ctx.json {
        let states_json: Vec<_> = states.iter().map(output::json::state_json).collect();
        output::print_success(json!({ "states": states_json }));
    } else if states.is_empty() {
        println!("No task states. Run `hubtasks settings load` first.");
    } else {
        output::text::print_states(&states);
    }
    Ok(0)
}
