use serde_json::json;

use crate::cli::{finish, Context};
use crate::error::HubtasksError;
use crate::output;
use crate::schedule::run_sweep;

pub fn run(ctx: &Context) -> i32 {
    finish(run_inner(ctx), ctx.json)
}

/// Covers every location; `--location` is ignored.
fn run_inner(ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let today = ctx.today();
    let report = run_sweep(&conn, today)?;

    if ctx.json {
        output::print_success(json!({ "date": today, "report": report }));
    } else {
        output::text::print_sweep(&report);
    }
    Ok(0)
}
