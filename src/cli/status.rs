use serde_json::json;

use crate::cli::{finish, Context};
use crate::db::{instance_repo, task_repo};
use crate::error::HubtasksError;
use crate::output;

pub fn run(ctx: &Context) -> i32 {
    finish(run_inner(ctx), ctx.json)
}

fn run_inner(ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let summary = instance_repo::location_summary(&conn, location_id, ctx.today())?;
    let active_tasks = task_repo::count_active_tasks(&conn, location_id)?;

    if ctx.json {
        output::print_success(json!({
            "location_id": location_id,
            "active_tasks": active_tasks,
            "instances": summary
        }));
    } else {
        output::text::print_summary(location_id, &summary, active_tasks);
    }
    Ok(0)
}
