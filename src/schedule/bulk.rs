//! Administrative operations over a task's future instances: those due today
//! or later that are not in a complete state.
//!
//! Instances are written one at a time with no enclosing transaction. A failed
//! write is logged and counted in the outcome; the rest of the batch still runs.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::instance_repo;
use crate::error::HubtasksError;
use crate::models::TaskInstance;

use super::generator::add_days;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    /// Reset checklist progress after the task's checklist changed.
    Update,
    /// Renumber due dates from the reference date at a new interval.
    Reschedule { interval_days: u32 },
    /// Delete outright; the sweep or the next completion regenerates.
    Clear,
}

impl BulkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Reschedule { .. } => "reschedule",
            Self::Clear => "clear",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    /// Future non-completed instances found.
    pub matched: usize,
    /// Instances actually changed (or removed).
    pub applied: usize,
    pub failed: usize,
}

pub fn apply(
    conn: &Connection,
    task_id: &str,
    action: BulkAction,
    today: NaiveDate,
) -> Result<BulkOutcome, HubtasksError> {
    let outcome = match action {
        BulkAction::Update => update_future_instances(conn, task_id, today)?,
        BulkAction::Reschedule { interval_days } => {
            reschedule_future_instances(conn, task_id, interval_days, today)?
        }
        BulkAction::Clear => clear_future_instances(conn, task_id, today)?,
    };
    tracing::info!(
        task_id,
        action = action.as_str(),
        matched = outcome.matched,
        applied = outcome.applied,
        failed = outcome.failed,
        "bulk action applied"
    );
    Ok(outcome)
}

pub fn count_future_instances(conn: &Connection, task_id: &str, today: NaiveDate) -> Result<usize, HubtasksError> {
    instance_repo::count_future_open(conn, task_id, today)
}

/// Empty the checklist state of every future instance. Instances with nothing
/// checked are left alone and not counted as applied.
pub fn update_future_instances(
    conn: &Connection,
    task_id: &str,
    today: NaiveDate,
) -> Result<BulkOutcome, HubtasksError> {
    let instances = instance_repo::list_future_open(conn, task_id, today)?;
    let mut outcome = BulkOutcome {
        matched: instances.len(),
        ..Default::default()
    };
    for instance in &instances {
        match instance_repo::reset_checklist(conn, &instance.id) {
            Ok(true) => outcome.applied += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(instance_id = %instance.id, error = %e, "checklist reset failed");
                outcome.failed += 1;
            }
        }
    }
    Ok(outcome)
}

/// Assign `reference + k * interval_days` (k = 1, 2, …) to the future instances
/// in due-date order. The reference is the date of the task's latest
/// completion, or `today` if it was never completed.
pub fn reschedule_future_instances(
    conn: &Connection,
    task_id: &str,
    interval_days: u32,
    today: NaiveDate,
) -> Result<BulkOutcome, HubtasksError> {
    if interval_days == 0 {
        return Err(HubtasksError::validation("Interval must be at least 1 day"));
    }
    let reference = instance_repo::last_completion(conn, task_id)?
        .map(|at| at.date())
        .unwrap_or(today);

    let instances = instance_repo::list_future_open(conn, task_id, today)?;
    let mut moves = Vec::with_capacity(instances.len());
    let mut next = reference;
    for instance in instances {
        next = add_days(next, interval_days)?;
        moves.push((instance, next));
    }

    let mut outcome = BulkOutcome {
        matched: moves.len(),
        ..Default::default()
    };
    for (instance, date) in write_order(moves) {
        if instance.scheduled_date == date && instance.due_date == date {
            outcome.applied += 1;
            continue;
        }
        match instance_repo::update_dates(conn, &instance.id, date) {
            Ok(()) => outcome.applied += 1,
            Err(e) => {
                tracing::warn!(instance_id = %instance.id, %date, error = %e, "reschedule failed");
                outcome.failed += 1;
            }
        }
    }
    tracing::debug!(task_id, %reference, interval_days, "future instances rescheduled");
    Ok(outcome)
}

/// Order moves so no write lands on a scheduled date another instance of the
/// batch has yet to vacate: instances moving later go first, latest target
/// first, then instances moving earlier, earliest target first.
fn write_order(moves: Vec<(TaskInstance, NaiveDate)>) -> Vec<(TaskInstance, NaiveDate)> {
    let (mut later, mut earlier): (Vec<_>, Vec<_>) = moves
        .into_iter()
        .partition(|(instance, date)| *date > instance.scheduled_date);
    later.sort_by(|a, b| b.1.cmp(&a.1));
    earlier.sort_by(|a, b| a.1.cmp(&b.1));
    later.extend(earlier);
    later
}

pub fn clear_future_instances(
    conn: &Connection,
    task_id: &str,
    today: NaiveDate,
) -> Result<BulkOutcome, HubtasksError> {
    let matched = instance_repo::count_future_open(conn, task_id, today)?;
    let deleted = instance_repo::delete_future_open(conn, task_id, today)?;
    Ok(BulkOutcome {
        matched,
        applied: deleted,
        failed: 0,
    })
}

/// Remove every instance of a task, history included (notes cascade).
pub fn delete_all_instances(conn: &Connection, task_id: &str) -> Result<usize, HubtasksError> {
    let deleted = instance_repo::delete_instances_for_task(conn, task_id)?;
    tracing::debug!(task_id, deleted, "all instances deleted");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{new_id, note_repo};
    use crate::models::{ChecklistState, RecurrenceType, Task};
    use crate::schedule::completion::complete_instance;
    use crate::schedule::fixtures::*;
    use crate::schedule::generator::create_instance;

    fn instance_on(conn: &Connection, task: &Task, d: NaiveDate) -> TaskInstance {
        create_instance(conn, task, d).unwrap().unwrap()
    }

    fn due_dates(conn: &Connection, task: &Task) -> Vec<NaiveDate> {
        instance_repo::list_instances_for_task(conn, &task.id)
            .unwrap()
            .into_iter()
            .map(|i| i.due_date)
            .collect()
    }

    #[test]
    fn test_reschedule_from_today() {
        let conn = setup();
        let task = add_task(&conn, "Clean gutters", RecurrenceType::None, None);
        for d in [date(2024, 1, 12), date(2024, 1, 19), date(2024, 1, 26)] {
            instance_on(&conn, &task, d);
        }

        let outcome = reschedule_future_instances(&conn, &task.id, 14, date(2024, 1, 10)).unwrap();
        assert_eq!(outcome, BulkOutcome { matched: 3, applied: 3, failed: 0 });
        assert_eq!(
            due_dates(&conn, &task),
            vec![date(2024, 1, 24), date(2024, 2, 7), date(2024, 2, 21)]
        );
    }

    #[test]
    fn test_reschedule_from_last_completion() {
        let conn = setup();
        let task = add_task(&conn, "Service boiler", RecurrenceType::None, None);
        let done = instance_on(&conn, &task, date(2024, 1, 2));
        complete_instance(&conn, &done.id, None, &[], at(2024, 1, 3, 16, 0)).unwrap();
        let future: Vec<_> = [date(2024, 1, 20), date(2024, 2, 20), date(2024, 3, 20)]
            .into_iter()
            .map(|d| instance_on(&conn, &task, d))
            .collect();

        reschedule_future_instances(&conn, &task.id, 14, date(2024, 1, 10)).unwrap();

        let expected = [date(2024, 1, 17), date(2024, 1, 31), date(2024, 2, 14)];
        for (instance, want) in future.iter().zip(expected) {
            let moved = instance_repo::get_instance_by_id(&conn, &instance.id).unwrap();
            assert_eq!(moved.due_date, want);
            assert_eq!(moved.scheduled_date, want);
        }
        // The completed instance is not touched.
        let kept = instance_repo::get_instance_by_id(&conn, &done.id).unwrap();
        assert_eq!(kept.due_date, date(2024, 1, 2));
    }

    #[test]
    fn test_reschedule_shifts_through_occupied_dates() {
        let conn = setup();
        let task = add_task(&conn, "Rotate stock", RecurrenceType::None, None);
        // Every target except the last is currently occupied by a sibling.
        for d in [date(2024, 1, 11), date(2024, 1, 12), date(2024, 1, 13)] {
            instance_on(&conn, &task, d);
        }

        let outcome = reschedule_future_instances(&conn, &task.id, 1, date(2024, 1, 11)).unwrap();
        assert_eq!(outcome.failed, 0);
        assert_eq!(
            due_dates(&conn, &task),
            vec![date(2024, 1, 12), date(2024, 1, 13), date(2024, 1, 14)]
        );

        // And back the other way, compressing onto earlier dates.
        let outcome = reschedule_future_instances(&conn, &task.id, 1, date(2024, 1, 10)).unwrap();
        assert_eq!(outcome.failed, 0);
        assert_eq!(
            due_dates(&conn, &task),
            vec![date(2024, 1, 11), date(2024, 1, 12), date(2024, 1, 13)]
        );
    }

    #[test]
    fn test_reschedule_failure_does_not_roll_back_batch() {
        let conn = setup();
        let task = add_task(&conn, "Descale kettles", RecurrenceType::None, None);
        let done = instance_on(&conn, &task, date(2024, 1, 24));
        complete_instance(&conn, &done.id, None, &[], at(2024, 1, 3, 9, 0)).unwrap();
        let open: Vec<_> = [date(2024, 1, 12), date(2024, 1, 19), date(2024, 1, 26)]
            .into_iter()
            .map(|d| instance_on(&conn, &task, d))
            .collect();

        // The last target (01-24) is held by the completed instance.
        let outcome = reschedule_future_instances(&conn, &task.id, 7, date(2024, 1, 10)).unwrap();
        assert_eq!(outcome, BulkOutcome { matched: 3, applied: 2, failed: 1 });

        let moved = |i: &TaskInstance| instance_repo::get_instance_by_id(&conn, &i.id).unwrap().due_date;
        assert_eq!(moved(&open[0]), date(2024, 1, 10));
        assert_eq!(moved(&open[1]), date(2024, 1, 17));
        assert_eq!(moved(&open[2]), date(2024, 1, 26));
        assert_eq!(
            due_dates(&conn, &task),
            vec![date(2024, 1, 10), date(2024, 1, 17), date(2024, 1, 24), date(2024, 1, 26)]
        );
    }

    #[test]
    fn test_reschedule_rejects_zero_interval() {
        let conn = setup();
        let task = add_task(&conn, "Anything", RecurrenceType::None, None);
        assert!(reschedule_future_instances(&conn, &task.id, 0, date(2024, 1, 10)).is_err());
    }

    #[test]
    fn test_clear_scope() {
        let conn = setup();
        let task = add_task(&conn, "Trim hedges", RecurrenceType::None, None);
        let past = instance_on(&conn, &task, date(2024, 1, 5));
        let completed_future = instance_on(&conn, &task, date(2024, 1, 15));
        complete_instance(&conn, &completed_future.id, None, &[], at(2024, 1, 9, 10, 0)).unwrap();
        let today = instance_on(&conn, &task, date(2024, 1, 10));
        let later = instance_on(&conn, &task, date(2024, 1, 20));
        note_repo::create_note(&conn, &new_id(), &later.id, "Bring ladder", &[], true, None).unwrap();

        assert_eq!(count_future_instances(&conn, &task.id, date(2024, 1, 10)).unwrap(), 2);
        let outcome = clear_future_instances(&conn, &task.id, date(2024, 1, 10)).unwrap();
        assert_eq!(outcome.matched, 2);
        assert_eq!(outcome.applied, 2);

        let remaining: Vec<String> = instance_repo::list_instances_for_task(&conn, &task.id)
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(remaining, vec![past.id, completed_future.id]);
        assert!(instance_repo::get_instance_by_id(&conn, &today.id).is_err());
        assert!(note_repo::list_notes(&conn, &later.id).unwrap().is_empty());
    }

    #[test]
    fn test_update_resets_only_non_empty_checklists() {
        let conn = setup();
        let task = add_task(&conn, "Prepare banquet hall", RecurrenceType::None, None);
        let touched = instance_on(&conn, &task, date(2024, 1, 12));
        let untouched = instance_on(&conn, &task, date(2024, 1, 13));
        let past = instance_on(&conn, &task, date(2024, 1, 2));

        let progress: ChecklistState = [(0, true), (2, true)].into_iter().collect();
        instance_repo::update_checklist(&conn, &touched.id, &progress).unwrap();
        instance_repo::update_checklist(&conn, &past.id, &progress).unwrap();

        let outcome = update_future_instances(&conn, &task.id, date(2024, 1, 10)).unwrap();
        assert_eq!(outcome, BulkOutcome { matched: 2, applied: 1, failed: 0 });

        let reset = instance_repo::get_instance_by_id(&conn, &touched.id).unwrap();
        assert!(reset.checklist_state.is_empty());
        assert!(instance_repo::get_instance_by_id(&conn, &untouched.id)
            .unwrap()
            .checklist_state
            .is_empty());
        assert_eq!(
            instance_repo::get_instance_by_id(&conn, &past.id).unwrap().checked_count(),
            2
        );

        // Nothing left to reset.
        let again = update_future_instances(&conn, &task.id, date(2024, 1, 10)).unwrap();
        assert_eq!(again.applied, 0);
    }

    #[test]
    fn test_delete_all_instances() {
        let conn = setup();
        let task = add_task(&conn, "Old task", RecurrenceType::None, None);
        instance_on(&conn, &task, date(2023, 12, 1));
        instance_on(&conn, &task, date(2024, 2, 1));
        assert_eq!(delete_all_instances(&conn, &task.id).unwrap(), 2);
        assert!(due_dates(&conn, &task).is_empty());
    }

    #[test]
    fn test_apply_dispatch() {
        let conn = setup();
        let task = add_task(&conn, "Wash windows", RecurrenceType::None, None);
        instance_on(&conn, &task, date(2024, 1, 12));
        let outcome = apply(&conn, &task.id, BulkAction::Clear, date(2024, 1, 10)).unwrap();
        assert_eq!(outcome.applied, 1);
        assert_eq!(BulkAction::Reschedule { interval_days: 3 }.as_str(), "reschedule");
    }
}
