use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{instance_repo, new_id, note_repo, pattern_repo, state_repo, task_repo};
use crate::error::HubtasksError;
use crate::models::{RecurrenceType, RecurringPattern, Task, TaskInstance};

use super::generator::{add_days, create_instance};

#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub instance: TaskInstance,
    /// Successor created by the completion hook (dynamic tasks only).
    pub next_instance: Option<TaskInstance>,
    pub carried_notes: usize,
}

/// Mark an instance complete and run the completion hook.
///
/// Every precondition is checked before the first write, so a rejected
/// completion leaves the instance untouched. The caller owns the transaction.
pub fn complete_instance(
    conn: &Connection,
    instance_id: &str,
    completed_by: Option<&str>,
    photos: &[String],
    now: NaiveDateTime,
) -> Result<Completion, HubtasksError> {
    let instance = instance_repo::get_instance_by_id(conn, instance_id)?;
    let current = state_repo::get_state_by_id(conn, &instance.status_id)?;
    if current.is_complete_state {
        return Err(HubtasksError::invalid_transition(&current.slug, "complete"));
    }

    let task = task_repo::get_task_by_id(conn, &instance.task_id)?;
    if task.require_completion_photo && photos.is_empty() {
        return Err(HubtasksError::validation(format!(
            "Task '{}' requires a completion photo",
            task.name
        )));
    }

    let complete = state_repo::find_completion_state(conn, instance.location_id)?.ok_or_else(|| {
        HubtasksError::missing_configuration(format!(
            "Location {} has no enabled complete state",
            instance.location_id
        ))
    })?;
    let successor_pattern = dynamic_pattern(conn, &task)?;

    instance_repo::mark_complete(conn, &instance.id, &complete.id, completed_by, now, photos)?;
    let completed = instance_repo::get_instance_by_id(conn, &instance.id)?;
    tracing::info!(
        instance_id = %completed.id,
        task_id = %task.id,
        completed_by = completed_by.unwrap_or("-"),
        "instance completed"
    );

    let (next_instance, carried_notes) = match successor_pattern {
        Some(pattern) => on_completed(conn, &task, &pattern, &completed, now)?,
        None => (None, 0),
    };

    Ok(Completion {
        instance: completed,
        next_instance,
        carried_notes,
    })
}

/// The pattern driving the next occurrence, for an active dynamic task whose
/// pattern is enabled. A dynamic task without a pattern is misconfigured.
fn dynamic_pattern(conn: &Connection, task: &Task) -> Result<Option<RecurringPattern>, HubtasksError> {
    if task.recurrence_type != RecurrenceType::Dynamic || !task.is_active {
        return Ok(None);
    }
    let pattern_id = task.pattern_id.as_deref().ok_or_else(|| {
        HubtasksError::missing_configuration(format!(
            "Dynamic task '{}' has no recurring pattern",
            task.name
        ))
    })?;
    let pattern = pattern_repo::get_pattern_by_id(conn, pattern_id)?;
    Ok(pattern.is_enabled.then_some(pattern))
}

/// Schedule the successor `interval_days` after the completion date and carry
/// flagged notes onto it.
fn on_completed(
    conn: &Connection,
    task: &Task,
    pattern: &RecurringPattern,
    completed: &TaskInstance,
    completed_at: NaiveDateTime,
) -> Result<(Option<TaskInstance>, usize), HubtasksError> {
    let next_date = add_days(completed_at.date(), pattern.interval_days)?;
    match create_instance(conn, task, next_date)? {
        Some(next) => {
            let carried = carry_forward_notes(conn, &completed.id, &next.id)?;
            Ok((Some(next), carried))
        }
        None => Ok((None, 0)),
    }
}

/// Copy every carry-forward note of `from` onto `to`, keeping author and flag.
pub fn carry_forward_notes(conn: &Connection, from: &str, to: &str) -> Result<usize, HubtasksError> {
    let notes = note_repo::carry_forward_notes(conn, from)?;
    for note in &notes {
        note_repo::create_note(
            conn,
            &new_id(),
            to,
            &note.text,
            &note.photos,
            true,
            note.created_by.as_deref(),
        )?;
    }
    if !notes.is_empty() {
        tracing::debug!(from, to, count = notes.len(), "notes carried forward");
    }
    Ok(notes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::models::IntervalType;
    use crate::schedule::fixtures::*;

    fn first_instance(conn: &Connection, task: &Task) -> TaskInstance {
        create_instance(conn, task, date(2024, 1, 10)).unwrap().unwrap()
    }

    #[test]
    fn test_dynamic_successor_from_completion_date() {
        let conn = setup();
        let pattern = add_pattern(&conn, "Ten days after", IntervalType::Dynamic, 10);
        let task = add_task(&conn, "Deep clean oven", RecurrenceType::Dynamic, Some(&pattern));
        let instance = first_instance(&conn, &task);

        let done = complete_instance(&conn, &instance.id, Some("maria"), &[], at(2024, 1, 12, 15, 30))
            .unwrap();
        assert_eq!(done.instance.completed_by.as_deref(), Some("maria"));
        assert_eq!(done.instance.completed_at, Some(at(2024, 1, 12, 15, 30)));

        let next = done.next_instance.unwrap();
        assert_eq!(next.due_date, date(2024, 1, 22));
        assert_eq!(next.scheduled_date, date(2024, 1, 22));
        assert_eq!(instance_repo::list_instances_for_task(&conn, &task.id).unwrap().len(), 2);
    }

    #[test]
    fn test_existing_successor_not_duplicated() {
        let conn = setup();
        let pattern = add_pattern(&conn, "Weekly after", IntervalType::Dynamic, 7);
        let task = add_task(&conn, "Descale kettles", RecurrenceType::Dynamic, Some(&pattern));
        let instance = first_instance(&conn, &task);
        create_instance(&conn, &task, date(2024, 1, 17)).unwrap();

        let done = complete_instance(&conn, &instance.id, None, &[], at(2024, 1, 10, 9, 0)).unwrap();
        assert!(done.next_instance.is_none());
        assert_eq!(instance_repo::list_instances_for_task(&conn, &task.id).unwrap().len(), 2);
    }

    #[test]
    fn test_carry_forward_notes() {
        let conn = setup();
        let pattern = add_pattern(&conn, "Weekly after", IntervalType::Dynamic, 7);
        let task = add_task(&conn, "Inspect minibar", RecurrenceType::Dynamic, Some(&pattern));
        let instance = first_instance(&conn, &task);

        note_repo::create_note(&conn, &new_id(), &instance.id, "Lock is sticky", &[], true, Some("ana"))
            .unwrap();
        note_repo::create_note(&conn, &new_id(), &instance.id, "Restocked today", &[], false, None)
            .unwrap();

        let done = complete_instance(&conn, &instance.id, None, &[], at(2024, 1, 10, 11, 0)).unwrap();
        assert_eq!(done.carried_notes, 1);
        let next = done.next_instance.unwrap();
        let notes = note_repo::list_notes(&conn, &next.id).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "Lock is sticky");
        assert_eq!(notes[0].created_by.as_deref(), Some("ana"));
        assert!(notes[0].carry_forward);

        // Carried notes keep propagating.
        let again = complete_instance(&conn, &next.id, None, &[], at(2024, 1, 17, 11, 0)).unwrap();
        let notes = note_repo::list_notes(&conn, &again.next_instance.unwrap().id).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "Lock is sticky");
    }

    #[test]
    fn test_fixed_task_ignores_completion() {
        let conn = setup();
        let pattern = add_pattern(&conn, "Weekly", IntervalType::Fixed, 7);
        let task = add_task(&conn, "Test smoke alarms", RecurrenceType::Fixed, Some(&pattern));
        let instance = first_instance(&conn, &task);

        let done = complete_instance(&conn, &instance.id, None, &[], at(2024, 1, 10, 8, 0)).unwrap();
        assert!(done.next_instance.is_none());
        assert_eq!(instance_repo::list_instances_for_task(&conn, &task.id).unwrap().len(), 1);
    }

    #[test]
    fn test_already_complete_rejected() {
        let conn = setup();
        let task = add_task(&conn, "Replace bulbs", RecurrenceType::None, None);
        let instance = first_instance(&conn, &task);

        complete_instance(&conn, &instance.id, None, &[], at(2024, 1, 10, 8, 0)).unwrap();
        let err = complete_instance(&conn, &instance.id, None, &[], at(2024, 1, 11, 8, 0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
    }

    #[test]
    fn test_photo_required() {
        let conn = setup();
        let task = add_task(&conn, "Pool chemistry", RecurrenceType::None, None);
        conn.execute("UPDATE tasks SET require_completion_photo = 1 WHERE id = ?1", [&task.id])
            .unwrap();
        let instance = first_instance(&conn, &task);

        let err = complete_instance(&conn, &instance.id, None, &[], at(2024, 1, 10, 8, 0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let photos = vec!["https://example.test/pool.jpg".to_string()];
        let done = complete_instance(&conn, &instance.id, None, &photos, at(2024, 1, 10, 8, 5)).unwrap();
        assert_eq!(done.instance.completion_photos, photos);
    }

    #[test]
    fn test_missing_complete_state_leaves_instance_unchanged() {
        let conn = setup();
        let task = add_task(&conn, "Wax floors", RecurrenceType::None, None);
        let instance = first_instance(&conn, &task);
        conn.execute("UPDATE task_states SET is_enabled = 0 WHERE is_complete_state = 1", [])
            .unwrap();

        let err = complete_instance(&conn, &instance.id, None, &[], at(2024, 1, 10, 8, 0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingConfiguration);

        let unchanged = instance_repo::get_instance_by_id(&conn, &instance.id).unwrap();
        assert_eq!(unchanged.status_id, instance.status_id);
        assert!(unchanged.completed_at.is_none());
    }
}
