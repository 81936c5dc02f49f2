use std::collections::HashMap;

use chrono::Days;
use rusqlite::Connection;
use serde_json::json;

use crate::cli::commands::InstanceCommands;
use crate::cli::{finish, Context};
use crate::db::instance_repo::{self, BoardFilter};
use crate::db::{in_transaction, note_repo, state_repo, task_repo};
use crate::error::HubtasksError;
use crate::models::TaskInstance;
use crate::output;
use crate::schedule::complete_instance;

/// Days of history shown on the board.
const BOARD_PAST_DAYS: u64 = 90;
/// Days of upcoming work shown on the board.
const BOARD_FUTURE_DAYS: u64 = 30;

pub fn run(cmd: InstanceCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        InstanceCommands::List {
            department,
            status,
            area,
            search,
            show_completed,
            no_future,
        } => {
            let today = ctx.today();
            let filter = BoardFilter {
                from: today.checked_sub_days(Days::new(BOARD_PAST_DAYS)).unwrap_or(today),
                to: if no_future {
                    today
                } else {
                    today.checked_add_days(Days::new(BOARD_FUTURE_DAYS)).unwrap_or(today)
                },
                departments: department,
                statuses: status,
                area,
                search,
                show_completed,
            };
            run_list(&filter, ctx)
        }
        InstanceCommands::Show { id } => run_show(&id, ctx),
        InstanceCommands::Check { id, index, uncheck } => run_check(&id, index, !uncheck, ctx),
        InstanceCommands::Status { id, state } => run_status(&id, &state, ctx),
        InstanceCommands::Complete { id, by, photos } => run_complete(&id, by.as_deref(), &photos, ctx),
    };
    finish(result, ctx.json)
}

/// Resolve an instance reference and make sure it belongs to the location.
pub(crate) fn resolve_in_location(
    conn: &Connection,
    location_id: i64,
    reference: &str,
) -> Result<TaskInstance, HubtasksError> {
    let instance = instance_repo::resolve_instance(conn, reference)?;
    if instance.location_id != location_id {
        return Err(HubtasksError::instance_not_found(reference));
    }
    Ok(instance)
}

fn run_list(filter: &BoardFilter, ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let board = instance_repo::list_board(&conn, location_id, filter)?;

    if ctx.json {
        let mut checklist_lengths: HashMap<String, usize> = HashMap::new();
        let mut entries = Vec::with_capacity(board.len());
        for view in &board {
            let len = match checklist_lengths.get(&view.instance.task_id) {
                Some(len) => *len,
                None => {
                    let task = task_repo::get_task_by_id(&conn, &view.instance.task_id)?;
                    checklist_lengths.insert(task.id.clone(), task.checklist_items.len());
                    task.checklist_items.len()
                }
            };
            entries.push(output::json::board_entry(view, len));
        }
        output::print_success(json!({
            "from": filter.from,
            "to": filter.to,
            "instances": entries
        }));
    } else {
        output::text::print_board(&board);
    }
    Ok(0)
}

fn run_show(id: &str, ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let instance = resolve_in_location(&conn, location_id, id)?;
    let view = instance_repo::get_view(&conn, &instance.id)?;
    let task = task_repo::get_task_by_id(&conn, &instance.task_id)?;
    let notes = note_repo::list_notes(&conn, &instance.id)?;

    if ctx.json {
        let notes_json: Vec<_> = notes.iter().map(output::json::note_json).collect();
        output::print_success(json!({
            "instance": output::json::instance_json(&view.instance),
            "task": output::json::task_summary(&task),
            "status": {
                "slug": view.state_slug,
                "name": view.state_name,
                "color": view.state_color,
                "is_complete": view.is_complete
            },
            "department": view.department_name,
            "area": view.area_path,
            "completion_reminder": task.completion_reminder,
            "require_completion_photo": task.require_completion_photo,
            "checklist": output::json::checklist_json(&task.checklist_items, &view.instance.checklist_state),
            "notes": notes_json
        }));
    } else {
        output::text::print_instance(&view, &task.checklist_items);
        if !notes.is_empty() {
            println!("\nNotes:");
            output::text::print_notes(&notes);
        }
    }
    Ok(0)
}

fn run_check(id: &str, index: usize, checked: bool, ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let instance = resolve_in_location(&conn, location_id, id)?;
    let task = task_repo::get_task_by_id(&conn, &instance.task_id)?;

    if index >= task.checklist_items.len() {
        return Err(HubtasksError::validation(format!(
            "Checklist item {index} does not exist (task has {} items)",
            task.checklist_items.len()
        )));
    }
    let current = state_repo::get_state_by_id(&conn, &instance.status_id)?;
    if current.is_complete_state {
        return Err(HubtasksError::invalid_transition(&current.slug, "checklist edit"));
    }

    let mut checklist = instance.checklist_state.clone();
    checklist.insert(index, checked);
    let any_checked = checklist.values().any(|c| *c);

    let moved_to = in_transaction(&conn, || {
        instance_repo::update_checklist(&conn, &instance.id, &checklist)?;
        if !any_checked {
            return Ok(None);
        }
        match state_repo::find_checklist_started_state(&conn, location_id)? {
            Some(started) if started.id != instance.status_id => {
                instance_repo::update_status(&conn, &instance.id, &started.id)?;
                Ok(Some(started))
            }
            _ => Ok(None),
        }
    })?;

    let updated = instance_repo::get_instance_by_id(&conn, &instance.id)?;
    if let Some(state) = &moved_to {
        tracing::debug!(instance_id = %updated.id, state = %state.slug, "checklist started");
    }

    if ctx.json {
        output::print_success(json!({
            "instance": output::json::instance_json(&updated),
            "checklist": output::json::checklist_json(&task.checklist_items, &updated.checklist_state),
            "status_changed_to": moved_to.as_ref().map(|s| s.slug.clone())
        }));
    } else {
        println!(
            "[{}] {}. {}",
            if checked { "x" } else { " " },
            index,
            task.checklist_items[index]
        );
        println!("{}/{} items checked", updated.checked_count(), task.checklist_items.len());
        if let Some(state) = moved_to {
            println!("Status → {}", state.name);
        }
    }
    Ok(0)
}

fn run_status(id: &str, slug: &str, ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let instance = resolve_in_location(&conn, location_id, id)?;

    let target = state_repo::find_state_by_slug(&conn, location_id, slug)?
        .filter(|s| s.is_enabled)
        .ok_or_else(|| HubtasksError::state_not_found(slug))?;
    let current = state_repo::get_state_by_id(&conn, &instance.status_id)?;
    if current.is_complete_state {
        return Err(HubtasksError::invalid_transition(&current.slug, &target.slug));
    }
    if target.is_complete_state {
        return Err(HubtasksError::validation(format!(
            "'{}' is a complete state; use `hubtasks instance complete`",
            target.slug
        )));
    }

    instance_repo::update_status(&conn, &instance.id, &target.id)?;
    tracing::debug!(instance_id = %instance.id, from = %current.slug, to = %target.slug, "status changed");

    if ctx.json {
        output::print_success(json!({
            "instance_id": instance.id,
            "from": current.slug,
            "to": target.slug
        }));
    } else {
        println!("Instance {} {} → {}", instance.id, current.slug, target.slug);
    }
    Ok(0)
}

fn run_complete(id: &str, by: Option<&str>, photos: &[String], ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let instance = resolve_in_location(&conn, location_id, id)?;
    let now = ctx.now();

    let completion = in_transaction(&conn, || complete_instance(&conn, &instance.id, by, photos, now))?;

    if ctx.json {
        output::print_success(json!({
            "completed": output::json::instance_json(&completion.instance),
            "next_instance": completion.next_instance.as_ref().map(output::json::instance_json),
            "carried_notes": completion.carried_notes
        }));
    } else {
        println!("Completed instance {}", completion.instance.id);
        if let Some(next) = &completion.next_instance {
            println!("Next instance due {} ({})", next.due_date, next.id);
            if completion.carried_notes > 0 {
                println!("Carried forward {} notes", completion.carried_notes);
            }
        }
    }
    Ok(0)
}
