use rusqlite::Connection;
use serde_json::json;

use crate::cli::commands::{FutureCommands, TaskCommands, TaskFields};
use crate::cli::{finish, Context};
use crate::db::task_repo::{self, TaskRecord};
use crate::db::{area_repo, department_repo, in_transaction, new_id, pattern_repo, template_repo};
use crate::error::HubtasksError;
use crate::models::{RecurrenceType, RecurringPattern};
use crate::output;
use crate::schedule::{bulk, clock, create_instance, BulkAction};

pub fn run(cmd: TaskCommands, ctx: &Context) -> i32 {
    let result = match cmd {
        TaskCommands::Add {
            name,
            fields,
            require_photo,
            inactive,
            start,
            by,
        } => run_add(&name, fields, require_photo, !inactive, start.as_deref(), by.as_deref(), ctx),
        TaskCommands::List => run_list(ctx),
        TaskCommands::Show { id } => run_show(&id, ctx),
        TaskCommands::Edit {
            id,
            name,
            fields,
            clear_items,
            require_photo,
            active,
            update_future,
        } => run_edit(&id, name, fields, clear_items, require_photo, active, update_future, ctx),
        TaskCommands::Delete { id } => run_delete(&id, ctx),
        TaskCommands::Future(cmd) => run_future(cmd, ctx),
    };
    finish(result, ctx.json)
}

fn run_add(
    name: &str,
    fields: TaskFields,
    require_photo: bool,
    is_active: bool,
    start: Option<&str>,
    by: Option<&str>,
    ctx: &Context,
) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;

    let recurrence = parse_recurrence(fields.recurrence.as_deref().unwrap_or("none"))?;
    let start = match start {
        Some(raw) => clock::parse_date(raw)?,
        None => ctx.today(),
    };

    // Resolve every reference before any writes to fail fast
    let mut record = TaskRecord {
        name: name.trim().to_string(),
        description: non_empty(fields.description),
        recurrence_type: recurrence,
        pattern_id: None,
        department_id: None,
        area_id: None,
        checklist_items: fields.items,
        reference_photos: fields.photos,
        require_completion_photo: require_photo,
        completion_reminder: non_empty(fields.reminder),
        is_active,
    };
    if let Some(pattern) = fields.pattern.as_deref() {
        record.pattern_id = Some(resolve_pattern(&conn, location_id, pattern)?.id);
    }
    if let Some(slug) = fields.department.as_deref() {
        record.department_id = resolve_department(&conn, location_id, slug)?;
    }
    if let Some(area) = fields.area.as_deref() {
        record.area_id = resolve_area(&conn, location_id, area)?;
    }
    if let Some(template) = fields.template.as_deref() {
        record.checklist_items = template_repo::get_template(&conn, location_id, template)?.checklist_items;
    }
    validate_record(&conn, &mut record)?;

    let task_id = new_id();
    let (task, first) = in_transaction(&conn, || {
        let task = task_repo::create_task(&conn, &task_id, location_id, &record, by)?;
        // Fixed tasks are picked up by the sweep; nothing else would ever
        // create the first instance of the other kinds.
        let first = if task.is_active && task.recurrence_type != RecurrenceType::Fixed {
            create_instance(&conn, &task, start)?
        } else {
            None
        };
        Ok((task, first))
    })?;

    tracing::info!(task_id = %task.id, location_id, recurrence = task.recurrence_type.as_str(), "task added");
    if ctx.json {
        output::print_success(json!({
            "task": output::json::task_summary(&task),
            "first_instance": first.as_ref().map(output::json::instance_json)
        }));
    } else {
        println!("Added task: {} ({})", task.name, task.id);
        if let Some(first) = first {
            println!("First instance due {} ({})", first.due_date, first.id);
        }
    }
    Ok(0)
}

fn run_list(ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let tasks = task_repo::list_tasks(&conn, location_id)?;

    if ctx.json {
        let tasks_json: Vec<_> = tasks.iter().map(output::json::task_summary).collect();
        output::print_success(json!({ "tasks": tasks_json }));
    } else {
        output::text::print_task_list(&tasks);
    }
    Ok(0)
}

fn run_show(id: &str, ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let task = task_repo::resolve_task(&conn, location_id, id)?;
    let pattern = match task.pattern_id.as_deref() {
        Some(pattern_id) => Some(pattern_repo::get_pattern_by_id(&conn, pattern_id)?),
        None => None,
    };
    let future = bulk::count_future_instances(&conn, &task.id, ctx.today())?;

    if ctx.json {
        output::print_success(json!({
            "task": output::json::task_detail(&task, pattern.as_ref(), future)
        }));
    } else {
        output::text::print_task(&task, pattern.as_ref(), future);
    }
    Ok(0)
}

#[allow(clippy::too_many_arguments)]
fn run_edit(
    id: &str,
    name: Option<String>,
    fields: TaskFields,
    clear_items: bool,
    require_photo: Option<bool>,
    active: Option<bool>,
    update_future: bool,
    ctx: &Context,
) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let task = task_repo::resolve_task(&conn, location_id, id)?;

    let mut record = TaskRecord::from(&task);
    if let Some(name) = name {
        record.name = name.trim().to_string();
    }
    if fields.description.is_some() {
        record.description = non_empty(fields.description);
    }
    if let Some(raw) = fields.recurrence.as_deref() {
        record.recurrence_type = parse_recurrence(raw)?;
    }
    if let Some(pattern) = fields.pattern.as_deref() {
        record.pattern_id = Some(resolve_pattern(&conn, location_id, pattern)?.id);
    }
    if let Some(slug) = fields.department.as_deref() {
        record.department_id = resolve_department(&conn, location_id, slug)?;
    }
    if let Some(area) = fields.area.as_deref() {
        record.area_id = resolve_area(&conn, location_id, area)?;
    }
    if clear_items {
        record.checklist_items.clear();
    }
    if !fields.items.is_empty() {
        record.checklist_items = fields.items;
    }
    if let Some(template) = fields.template.as_deref() {
        record.checklist_items = template_repo::get_template(&conn, location_id, template)?.checklist_items;
    }
    if !fields.photos.is_empty() {
        record.reference_photos = fields.photos;
    }
    if fields.reminder.is_some() {
        record.completion_reminder = non_empty(fields.reminder);
    }
    if let Some(required) = require_photo {
        record.require_completion_photo = required;
    }
    if let Some(active) = active {
        record.is_active = active;
    }
    validate_record(&conn, &mut record)?;

    let today = ctx.today();
    let (updated, outcome) = in_transaction(&conn, || {
        let updated = task_repo::update_task(&conn, &task.id, &record)?;
        let outcome = if update_future {
            Some(bulk::apply(&conn, &task.id, BulkAction::Update, today)?)
        } else {
            None
        };
        Ok((updated, outcome))
    })?;

    if ctx.json {
        output::print_success(json!({
            "task": output::json::task_summary(&updated),
            "future_update": outcome
        }));
    } else {
        println!("Updated task: {} ({})", updated.name, updated.id);
        if let Some(outcome) = outcome {
            output::text::print_bulk("Future instances reset", &outcome);
        }
    }
    Ok(0)
}

fn run_delete(id: &str, ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let task = task_repo::resolve_task(&conn, location_id, id)?;

    let deleted = in_transaction(&conn, || {
        let deleted = bulk::delete_all_instances(&conn, &task.id)?;
        task_repo::delete_task(&conn, &task.id)?;
        Ok(deleted)
    })?;

    tracing::info!(task_id = %task.id, instances = deleted, "task deleted");
    if ctx.json {
        output::print_success(json!({
            "deleted": { "id": task.id, "name": task.name, "instances": deleted }
        }));
    } else {
        println!("Deleted task: {} ({}) and {deleted} instances", task.name, task.id);
    }
    Ok(0)
}

fn run_future(cmd: FutureCommands, ctx: &Context) -> Result<i32, HubtasksError> {
    let conn = ctx.open_db()?;
    let location_id = ctx.location_id()?;
    let today = ctx.today();

    let (reference, action) = match cmd {
        FutureCommands::Count { task } => {
            let task = task_repo::resolve_task(&conn, location_id, &task)?;
            let count = bulk::count_future_instances(&conn, &task.id, today)?;
            if ctx.json {
                output::print_success(json!({ "task_id": task.id, "count": count }));
            } else {
                println!("{count} future instances of {}", task.name);
            }
            return Ok(0);
        }
        FutureCommands::Update { task } => (task, BulkAction::Update),
        FutureCommands::Reschedule { task, interval } => {
            (task, BulkAction::Reschedule { interval_days: interval })
        }
        FutureCommands::Clear { task } => (task, BulkAction::Clear),
    };

    let task = task_repo::resolve_task(&conn, location_id, &reference)?;
    let outcome = bulk::apply(&conn, &task.id, action, today)?;

    if ctx.json {
        output::print_success(json!({
            "task_id": task.id,
            "action": action.as_str(),
            "outcome": outcome
        }));
    } else {
        output::text::print_bulk(action.as_str(), &outcome);
    }
    Ok(0)
}

fn parse_recurrence(raw: &str) -> Result<RecurrenceType, HubtasksError> {
    RecurrenceType::from_str(raw).ok_or_else(|| {
        HubtasksError::validation(format!(
            "Invalid recurrence '{raw}': expected none, fixed or dynamic"
        ))
    })
}

fn resolve_pattern(conn: &Connection, location_id: i64, name: &str) -> Result<RecurringPattern, HubtasksError> {
    pattern_repo::find_pattern_by_name(conn, location_id, name)?
        .ok_or_else(|| HubtasksError::pattern_not_found(name))
}

/// An empty value clears the reference.
fn resolve_department(conn: &Connection, location_id: i64, slug: &str) -> Result<Option<String>, HubtasksError> {
    if slug.is_empty() {
        return Ok(None);
    }
    let dept = department_repo::find_department_by_slug(conn, location_id, slug)?
        .ok_or_else(|| HubtasksError::department_not_found(slug))?;
    Ok(Some(dept.id))
}

fn resolve_area(conn: &Connection, location_id: i64, name: &str) -> Result<Option<String>, HubtasksError> {
    if name.is_empty() {
        return Ok(None);
    }
    let area = area_repo::find_area_by_name(conn, location_id, name)?
        .ok_or_else(|| HubtasksError::area_not_found(name))?;
    Ok(Some(area.id))
}

/// Recurring tasks need an enabled pattern of the same interval type; one-off
/// tasks carry none.
fn validate_record(conn: &Connection, record: &mut TaskRecord) -> Result<(), HubtasksError> {
    if record.name.is_empty() {
        return Err(HubtasksError::validation("Task name is required"));
    }
    if record.checklist_items.iter().any(|item| item.trim().is_empty()) {
        return Err(HubtasksError::validation("Checklist items cannot be empty"));
    }

    if !record.recurrence_type.is_recurring() {
        record.pattern_id = None;
        return Ok(());
    }
    let pattern_id = record.pattern_id.as_deref().ok_or_else(|| {
        HubtasksError::validation(format!(
            "A {} task needs a recurring pattern (--pattern)",
            record.recurrence_type.as_str()
        ))
    })?;
    let pattern = pattern_repo::get_pattern_by_id(conn, pattern_id)?;
    if pattern.interval_type.as_str() != record.recurrence_type.as_str() {
        return Err(HubtasksError::validation(format!(
            "Pattern '{}' is {}, but the task recurrence is {}",
            pattern.name,
            pattern.interval_type.as_str(),
            record.recurrence_type.as_str()
        )));
    }
    if !pattern.is_enabled {
        return Err(HubtasksError::validation(format!(
            "Pattern '{}' is disabled",
            pattern.name
        )));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
