use rusqlite::{params, Connection, OptionalExtension};

use crate::error::HubtasksError;
use crate::models::{StateRole, StateSettings, TaskState};

const STATE_COLUMNS: &str = "id, location_id, name, slug, color, role, is_complete_state,
     checklist_started_state, is_enabled, sort_order";

pub fn get_state_by_id(conn: &Connection, id: &str) -> Result<TaskState, HubtasksError> {
    conn.query_row(
        &format!("SELECT {STATE_COLUMNS} FROM task_states WHERE id = ?1"),
        params![id],
        row_to_state,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => HubtasksError::state_not_found(id),
        _ => HubtasksError::from(e),
    })
}

pub fn find_state_by_slug(
    conn: &Connection,
    location_id: i64,
    slug: &str,
) -> Result<Option<TaskState>, HubtasksError> {
    let state = conn
        .query_row(
            &format!("SELECT {STATE_COLUMNS} FROM task_states WHERE location_id = ?1 AND slug = ?2"),
            params![location_id, slug],
            row_to_state,
        )
        .optional()?;
    Ok(state)
}

/// The enabled state carrying `role` at a location, if one is configured.
pub fn find_state_by_role(
    conn: &Connection,
    location_id: i64,
    role: StateRole,
) -> Result<Option<TaskState>, HubtasksError> {
    let state = conn
        .query_row(
            &format!(
                "SELECT {STATE_COLUMNS} FROM task_states
                 WHERE location_id = ?1 AND role = ?2 AND is_enabled = 1
                 LIMIT 1"
            ),
            params![location_id, role.as_str()],
            row_to_state,
        )
        .optional()?;
    Ok(state)
}

/// The state a completed instance moves to: the `complete` role, or failing
/// that any enabled complete state.
pub fn find_completion_state(
    conn: &Connection,
    location_id: i64,
) -> Result<Option<TaskState>, HubtasksError> {
    if let Some(state) = find_state_by_role(conn, location_id, StateRole::Complete)? {
        return Ok(Some(state));
    }
    let state = conn
        .query_row(
            &format!(
                "SELECT {STATE_COLUMNS} FROM task_states
                 WHERE location_id = ?1 AND is_complete_state = 1 AND is_enabled = 1
                 ORDER BY sort_order ASC
                 LIMIT 1"
            ),
            params![location_id],
            row_to_state,
        )
        .optional()?;
    Ok(state)
}

pub fn find_checklist_started_state(
    conn: &Connection,
    location_id: i64,
) -> Result<Option<TaskState>, HubtasksError> {
    let state = conn
        .query_row(
            &format!(
                "SELECT {STATE_COLUMNS} FROM task_states
                 WHERE location_id = ?1 AND checklist_started_state = 1 AND is_enabled = 1
                 LIMIT 1"
            ),
            params![location_id],
            row_to_state,
        )
        .optional()?;
    Ok(state)
}

pub fn list_states(conn: &Connection, location_id: i64) -> Result<Vec<TaskState>, HubtasksError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {STATE_COLUMNS} FROM task_states WHERE location_id = ?1 ORDER BY sort_order ASC, name ASC"
    ))?;
    let states = stmt
        .query_map(params![location_id], row_to_state)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(states)
}

/// Insert or update the state identified by `(location_id, slug)`.
pub fn upsert_state(
    conn: &Connection,
    location_id: i64,
    state: &StateSettings,
) -> Result<String, HubtasksError> {
    let role = state.role.map(|r| r.as_str());
    match find_state_by_slug(conn, location_id, &state.slug)? {
        Some(existing) => {
            conn.execute(
                "UPDATE task_states
                 SET name = ?1, color = ?2, role = ?3, is_complete_state = ?4,
                     checklist_started_state = ?5, is_enabled = ?6, sort_order = ?7
                 WHERE id = ?8",
                params![
                    state.name,
                    state.color,
                    role,
                    state.is_complete_state,
                    state.checklist_started_state,
                    state.enabled,
                    state.sort_order,
                    existing.id
                ],
            )?;
            Ok(existing.id)
        }
        None => {
            let id = super::new_id();
            conn.execute(
                "INSERT INTO task_states (id, location_id, name, slug, color, role, is_complete_state,
                     checklist_started_state, is_enabled, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    id,
                    location_id,
                    state.name,
                    state.slug,
                    state.color,
                    role,
                    state.is_complete_state,
                    state.checklist_started_state,
                    state.enabled,
                    state.sort_order
                ],
            )?;
            Ok(id)
        }
    }
}

/// Drop role and checklist-started markers so a new vocabulary can be written
/// without tripping the per-location uniqueness indexes mid-sync.
pub fn clear_state_markers(conn: &Connection, location_id: i64) -> Result<(), HubtasksError> {
    conn.execute(
        "UPDATE task_states SET role = NULL, checklist_started_state = 0 WHERE location_id = ?1",
        params![location_id],
    )?;
    Ok(())
}

/// Disable every state of the location whose slug is not in `keep`.
pub fn disable_states_except(
    conn: &Connection,
    location_id: i64,
    keep: &[String],
) -> Result<usize, HubtasksError> {
    disable_except(conn, "task_states", "slug", location_id, keep)
}

pub fn count_states(conn: &Connection, location_id: i64) -> Result<i64, HubtasksError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM task_states WHERE location_id = ?1",
        params![location_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Shared by the settings repos: disable rows of `table` for a location whose
/// `key` column is not listed.
pub(crate) fn disable_except(
    conn: &Connection,
    table: &str,
    key: &str,
    location_id: i64,
    keep: &[String],
) -> Result<usize, HubtasksError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, {key} FROM {table} WHERE location_id = ?1 AND is_enabled = 1"
    ))?;
    let rows = stmt
        .query_map(params![location_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut disabled = 0;
    for (id, value) in rows {
        if !keep.contains(&value) {
            disabled += conn.execute(
                &format!("UPDATE {table} SET is_enabled = 0 WHERE id = ?1"),
                params![id],
            )?;
        }
    }
    Ok(disabled)
}

fn row_to_state(row: &rusqlite::Row) -> rusqlite::Result<TaskState> {
    Ok(TaskState {
        id: row.get(0)?,
        location_id: row.get(1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
        color: row.get(4)?,
        role: row
            .get::<_, Option<String>>(5)?
            .and_then(|r| StateRole::from_str(&r)),
        is_complete_state: row.get(6)?,
        checklist_started_state: row.get(7)?,
        is_enabled: row.get(8)?,
        sort_order: row.get(9)?,
    })
}
