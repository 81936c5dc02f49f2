use serde_json::json;

use crate::cli::commands::LocationCommands;
use crate::cli::{finish, Context};
use crate::config;
use crate::db::connection;
use crate::error::HubtasksError;
use crate::output;

pub fn run(cmd: LocationCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        LocationCommands::Use { id } => run_use(id, ctx),
        LocationCommands::Show => run_show(ctx),
    };
    finish(result, ctx.json)
}

fn run_use(id: i64, ctx: &Context) -> Result<i32, HubtasksError> {
    // Fail early when not initialized.
    connection::open_db(&ctx.settings)?;
    config::write_active_location(&ctx.settings, id)?;

    if ctx.json {
        output::print_success(json!({ "active_location_id": id }));
    } else {
        println!("Default location: {id}");
    }
    Ok(0)
}

fn run_show(ctx: &Context) -> Result<i32, HubtasksError> {
    connection::open_db(&ctx.settings)?;
    let active = config::read_local_config(&ctx.settings)?.active_location_id;

    if ctx.json {
        output::print_success(json!({ "active_location_id": active }));
    } else {
        match active {
            Some(id) => println!("Default location: {id}"),
            None => println!("No default location set."),
        }
    }
    Ok(0)
}
