use chrono::{Days, NaiveDate};
use rusqlite::Connection;

use crate::db::{instance_repo, new_id, state_repo};
use crate::error::HubtasksError;
use crate::models::{RecurringPattern, StateRole, Task, TaskInstance};

/// Create an instance of `task` on `date` in the location's pending state.
///
/// Returns `None` when the task already has an instance on that date. The
/// pre-check covers the common case; `ON CONFLICT DO NOTHING` covers a
/// concurrent sweep racing us to the same row.
pub fn create_instance(
    conn: &Connection,
    task: &Task,
    date: NaiveDate,
) -> Result<Option<TaskInstance>, HubtasksError> {
    if instance_repo::find_instance_by_date(conn, &task.id, date)?.is_some() {
        tracing::debug!(task_id = %task.id, %date, "instance already exists");
        return Ok(None);
    }

    let pending = state_repo::find_state_by_role(conn, task.location_id, StateRole::Pending)?
        .ok_or_else(|| {
            HubtasksError::missing_configuration(format!(
                "Location {} has no enabled state with the 'pending' role",
                task.location_id
            ))
        })?;

    let id = new_id();
    let inserted = instance_repo::insert_instance_if_absent(
        conn,
        &id,
        &task.id,
        task.location_id,
        date,
        date,
        &pending.id,
    )?;
    if !inserted {
        tracing::debug!(task_id = %task.id, %date, "instance created concurrently");
        return Ok(None);
    }

    tracing::debug!(task_id = %task.id, instance_id = %id, %date, "instance created");
    instance_repo::get_instance_by_id(conn, &id).map(Some)
}

/// Produce the next occurrence of a fixed-pattern task if it has arrived.
///
/// The next date is the last scheduled date plus the interval, or `today` for
/// a task that has never had an instance. Missed intervals are not backfilled:
/// at most one instance is created per call.
pub fn generate_next_fixed(
    conn: &Connection,
    task: &Task,
    pattern: &RecurringPattern,
    today: NaiveDate,
) -> Result<Option<TaskInstance>, HubtasksError> {
    let next_date = match instance_repo::last_scheduled_instance(conn, &task.id)? {
        Some(last) => add_days(last.scheduled_date, pattern.interval_days)?,
        None => today,
    };
    if next_date > today {
        return Ok(None);
    }
    create_instance(conn, task, next_date)
}

pub(crate) fn add_days(date: NaiveDate, days: u32) -> Result<NaiveDate, HubtasksError> {
    date.checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| HubtasksError::validation(format!("Date out of range: {date} + {days} days")))
}
