use serde_json::json;

use crate::cli::{finish, Context};
use crate::db::connection;
use crate::error::HubtasksError;
use crate::output;

pub fn run(ctx: &Context) -> i32 {
    finish(run_inner(ctx), ctx.json)
}

fn run_inner(ctx: &Context) -> Result<i32, HubtasksError> {
    let path = connection::init_db(&ctx.settings)?;
    if ctx.json {
        output::print_success(json!({ "path": path.to_string_lossy() }));
    } else {
        println!("Initialized hubtasks at {}", path.display());
    }
    Ok(0)
}
