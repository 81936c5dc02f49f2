use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{instance_repo, state_repo, task_repo};
use crate::error::HubtasksError;
use crate::models::StateRole;

use super::generator::generate_next_fixed;

#[derive(Debug, Default, Clone, Serialize)]
pub struct SweepReport {
    pub promoted_overdue: usize,
    pub promoted_due: usize,
    pub generated: usize,
    pub skipped: Vec<SkippedTask>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedTask {
    pub task_id: String,
    pub task_name: String,
    pub reason: String,
}

/// The periodic pass: advance instance states by calendar date, then give
/// every active fixed-pattern task its next occurrence if it has arrived.
///
/// A task that cannot be generated is recorded in the report and the sweep
/// moves on.
pub fn run_sweep(conn: &Connection, today: NaiveDate) -> Result<SweepReport, HubtasksError> {
    tracing::info!(%today, "sweep started");
    let mut report = SweepReport::default();

    for location_id in instance_repo::locations_with_instances(conn)? {
        let (overdue, due) = advance_states(conn, location_id, today)?;
        report.promoted_overdue += overdue;
        report.promoted_due += due;
    }

    for (task, pattern) in task_repo::active_fixed_tasks(conn)? {
        match generate_next_fixed(conn, &task, &pattern, today) {
            Ok(Some(_)) => report.generated += 1,
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(task_id = %task.id, code = e.code.as_str(), error = %e, "task skipped");
                report.skipped.push(SkippedTask {
                    task_id: task.id.clone(),
                    task_name: task.name.clone(),
                    reason: e.message,
                });
            }
        }
    }

    tracing::info!(
        promoted_overdue = report.promoted_overdue,
        promoted_due = report.promoted_due,
        generated = report.generated,
        skipped = report.skipped.len(),
        "sweep finished"
    );
    Ok(report)
}

/// Apply `* → overdue` then `pending → due` for one location. States are
/// found by role; a location missing a role simply gets no transition.
fn advance_states(
    conn: &Connection,
    location_id: i64,
    today: NaiveDate,
) -> Result<(usize, usize), HubtasksError> {
    let overdue = match state_repo::find_state_by_role(conn, location_id, StateRole::Overdue)? {
        Some(state) => instance_repo::promote_overdue(conn, location_id, &state.id, today)?,
        None => {
            tracing::debug!(location_id, "no overdue state, skipping overdue transition");
            0
        }
    };

    let pending = state_repo::find_state_by_role(conn, location_id, StateRole::Pending)?;
    let due_state = state_repo::find_state_by_role(conn, location_id, StateRole::Due)?;
    let due = match (pending, due_state) {
        (Some(pending), Some(due_state)) => {
            instance_repo::promote_due(conn, location_id, &pending.id, &due_state.id, today)?
        }
        _ => {
            tracing::debug!(location_id, "pending or due state missing, skipping due transition");
            0
        }
    };

    Ok((overdue, due))
}
