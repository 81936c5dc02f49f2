use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::error::HubtasksError;
use crate::models::{ChecklistState, InstanceView, TaskInstance};

use super::{json_column, to_json};

const INSTANCE_COLUMNS: &str = "i.id, i.task_id, i.location_id, i.scheduled_date, i.due_date,
     i.status_id, i.checklist_state, i.completed_by, i.completed_at, i.completion_photos, i.created_at";

/// Instances of a task still ahead of us: due today or later and not in a
/// complete state. Bound as `?1 = task_id, ?2 = today`.
const FUTURE_OPEN: &str = "FROM task_instances i
     JOIN task_states s ON i.status_id = s.id
     WHERE i.task_id = ?1 AND i.due_date >= ?2 AND s.is_complete_state = 0";

/// Insert an instance unless one already exists for `(task_id, scheduled_date)`.
/// Returns `false` when the uniqueness constraint swallowed the insert.
pub fn insert_instance_if_absent(
    conn: &Connection,
    id: &str,
    task_id: &str,
    location_id: i64,
    scheduled_date: NaiveDate,
    due_date: NaiveDate,
    status_id: &str,
) -> Result<bool, HubtasksError> {
    let inserted = conn.execute(
        "INSERT INTO task_instances (id, task_id, location_id, scheduled_date, due_date, status_id, checklist_state)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, '{}')
         ON CONFLICT (task_id, scheduled_date) DO NOTHING",
        params![id, task_id, location_id, scheduled_date, due_date, status_id],
    )?;
    Ok(inserted == 1)
}

pub fn get_instance_by_id(conn: &Connection, id: &str) -> Result<TaskInstance, HubtasksError> {
    conn.query_row(
        &format!("SELECT {INSTANCE_COLUMNS} FROM task_instances i WHERE i.id = ?1"),
        params![id],
        row_to_instance,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => HubtasksError::instance_not_found(id),
        _ => HubtasksError::from(e),
    })
}

/// Resolve an instance by exact ID or ID prefix.
pub fn resolve_instance(conn: &Connection, reference: &str) -> Result<TaskInstance, HubtasksError> {
    if let Ok(instance) = get_instance_by_id(conn, reference) {
        return Ok(instance);
    }
    let mut stmt = conn.prepare(&format!(
        "SELECT {INSTANCE_COLUMNS} FROM task_instances i WHERE i.id LIKE ?1"
    ))?;
    let prefix = format!("{reference}%");
    let instances: Vec<TaskInstance> = stmt
        .query_map(params![prefix], row_to_instance)?
        .collect::<Result<Vec<_>, _>>()?;

    super::single_match(
        reference,
        instances,
        |i| format!("{} due {}", i.id, i.due_date),
        HubtasksError::instance_not_found,
    )
}

pub fn find_instance_by_date(
    conn: &Connection,
    task_id: &str,
    scheduled_date: NaiveDate,
) -> Result<Option<TaskInstance>, HubtasksError> {
    let instance = conn
        .query_row(
            &format!(
                "SELECT {INSTANCE_COLUMNS} FROM task_instances i
                 WHERE i.task_id = ?1 AND i.scheduled_date = ?2"
            ),
            params![task_id, scheduled_date],
            row_to_instance,
        )
        .optional()?;
    Ok(instance)
}

/// The instance with the latest scheduled date for a task.
pub fn last_scheduled_instance(
    conn: &Connection,
    task_id: &str,
) -> Result<Option<TaskInstance>, HubtasksError> {
    let instance = conn
        .query_row(
            &format!(
                "SELECT {INSTANCE_COLUMNS} FROM task_instances i
                 WHERE i.task_id = ?1
                 ORDER BY i.scheduled_date DESC
                 LIMIT 1"
            ),
            params![task_id],
            row_to_instance,
        )
        .optional()?;
    Ok(instance)
}

pub fn list_instances_for_task(conn: &Connection, task_id: &str) -> Result<Vec<TaskInstance>, HubtasksError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {INSTANCE_COLUMNS} FROM task_instances i
         WHERE i.task_id = ?1
         ORDER BY i.scheduled_date ASC"
    ))?;
    let instances = stmt
        .query_map(params![task_id], row_to_instance)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(instances)
}

pub fn update_status(conn: &Connection, id: &str, status_id: &str) -> Result<(), HubtasksError> {
    conn.execute(
        "UPDATE task_instances SET status_id = ?1 WHERE id = ?2",
        params![status_id, id],
    )?;
    Ok(())
}

pub fn update_checklist(conn: &Connection, id: &str, state: &ChecklistState) -> Result<(), HubtasksError> {
    conn.execute(
        "UPDATE task_instances SET checklist_state = ?1 WHERE id = ?2",
        params![to_json(state)?, id],
    )?;
    Ok(())
}

pub fn mark_complete(
    conn: &Connection,
    id: &str,
    status_id: &str,
    completed_by: Option<&str>,
    completed_at: NaiveDateTime,
    photos: &[String],
) -> Result<(), HubtasksError> {
    conn.execute(
        "UPDATE task_instances
         SET status_id = ?1, completed_by = ?2, completed_at = ?3, completion_photos = ?4
         WHERE id = ?5",
        params![status_id, completed_by, completed_at, to_json(photos)?, id],
    )?;
    Ok(())
}

/// Future non-completed instances of a task, earliest due first.
pub fn list_future_open(
    conn: &Connection,
    task_id: &str,
    today: NaiveDate,
) -> Result<Vec<TaskInstance>, HubtasksError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {INSTANCE_COLUMNS} {FUTURE_OPEN} ORDER BY i.due_date ASC, i.scheduled_date ASC"
    ))?;
    let instances = stmt
        .query_map(params![task_id, today], row_to_instance)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(instances)
}

pub fn count_future_open(conn: &Connection, task_id: &str, today: NaiveDate) -> Result<usize, HubtasksError> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) {FUTURE_OPEN}"),
        params![task_id, today],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

pub fn delete_future_open(conn: &Connection, task_id: &str, today: NaiveDate) -> Result<usize, HubtasksError> {
    let deleted = conn.execute(
        &format!("DELETE FROM task_instances WHERE id IN (SELECT i.id {FUTURE_OPEN})"),
        params![task_id, today],
    )?;
    Ok(deleted)
}

pub fn delete_instances_for_task(conn: &Connection, task_id: &str) -> Result<usize, HubtasksError> {
    let deleted = conn.execute(
        "DELETE FROM task_instances WHERE task_id = ?1",
        params![task_id],
    )?;
    Ok(deleted)
}

/// Reset one instance's checklist. Returns `false` if it was already empty.
pub fn reset_checklist(conn: &Connection, id: &str) -> Result<bool, HubtasksError> {
    let changed = conn.execute(
        "UPDATE task_instances SET checklist_state = '{}' WHERE id = ?1 AND checklist_state != '{}'",
        params![id],
    )?;
    Ok(changed == 1)
}

/// Move an instance to a new date; scheduled and due dates move together.
pub fn update_dates(conn: &Connection, id: &str, date: NaiveDate) -> Result<(), HubtasksError> {
    conn.execute(
        "UPDATE task_instances SET scheduled_date = ?1, due_date = ?1 WHERE id = ?2",
        params![date, id],
    )?;
    Ok(())
}

/// Completion timestamp of the most recently completed instance of a task.
pub fn last_completion(conn: &Connection, task_id: &str) -> Result<Option<NaiveDateTime>, HubtasksError> {
    let completed_at = conn
        .query_row(
            "SELECT i.completed_at FROM task_instances i
             JOIN task_states s ON i.status_id = s.id
             WHERE i.task_id = ?1 AND s.is_complete_state = 1 AND i.completed_at IS NOT NULL
             ORDER BY i.completed_at DESC
             LIMIT 1",
            params![task_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(completed_at)
}

pub fn locations_with_instances(conn: &Connection) -> Result<Vec<i64>, HubtasksError> {
    let mut stmt = conn.prepare("SELECT DISTINCT location_id FROM task_instances ORDER BY location_id")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(ids)
}

/// Every non-complete instance at a location due before `today` → `overdue_id`.
pub fn promote_overdue(
    conn: &Connection,
    location_id: i64,
    overdue_id: &str,
    today: NaiveDate,
) -> Result<usize, HubtasksError> {
    let changed = conn.execute(
        "UPDATE task_instances SET status_id = ?1
         WHERE location_id = ?2
           AND due_date < ?3
           AND status_id != ?1
           AND status_id IN (SELECT id FROM task_states WHERE is_complete_state = 0)",
        params![overdue_id, location_id, today],
    )?;
    Ok(changed)
}

/// Pending instances at a location due exactly `today` → `due_id`.
pub fn promote_due(
    conn: &Connection,
    location_id: i64,
    pending_id: &str,
    due_id: &str,
    today: NaiveDate,
) -> Result<usize, HubtasksError> {
    let changed = conn.execute(
        "UPDATE task_instances SET status_id = ?1
         WHERE location_id = ?2 AND status_id = ?3 AND due_date = ?4",
        params![due_id, location_id, pending_id, today],
    )?;
    Ok(changed)
}

/// Filters for the location board.
#[derive(Debug, Clone)]
pub struct BoardFilter {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub departments: Vec<String>,
    pub statuses: Vec<String>,
    pub area: Option<String>,
    pub search: Option<String>,
    pub show_completed: bool,
}

pub fn list_board(
    conn: &Connection,
    location_id: i64,
    filter: &BoardFilter,
) -> Result<Vec<InstanceView>, HubtasksError> {
    let mut clauses = vec![
        "i.location_id = ?".to_string(),
        "i.due_date >= ?".to_string(),
        "i.due_date <= ?".to_string(),
        "t.is_active = 1".to_string(),
    ];
    let mut values = vec![
        Value::Integer(location_id),
        Value::Text(filter.from.to_string()),
        Value::Text(filter.to.to_string()),
    ];

    if !filter.departments.is_empty() {
        clauses.push(format!("d.slug IN ({})", placeholders(filter.departments.len())));
        values.extend(filter.departments.iter().cloned().map(Value::Text));
    }
    if !filter.statuses.is_empty() {
        clauses.push(format!("s.slug IN ({})", placeholders(filter.statuses.len())));
        values.extend(filter.statuses.iter().cloned().map(Value::Text));
    }
    if let Some(area) = &filter.area {
        clauses.push("(a.name = ? OR a.full_path LIKE ?)".to_string());
        values.push(Value::Text(area.clone()));
        values.push(Value::Text(format!("%{area}%")));
    }
    if !filter.show_completed {
        clauses.push("s.is_complete_state = 0".to_string());
    }
    if let Some(search) = &filter.search {
        clauses.push("(t.name LIKE ? OR t.description LIKE ?)".to_string());
        let pattern = format!("%{search}%");
        values.push(Value::Text(pattern.clone()));
        values.push(Value::Text(pattern));
    }

    let sql = format!(
        "SELECT {INSTANCE_COLUMNS},
                t.name, t.description, t.recurrence_type, t.require_completion_photo,
                s.name, s.slug, s.color, s.is_complete_state,
                d.name, a.full_path
         FROM task_instances i
         JOIN tasks t ON i.task_id = t.id
         JOIN task_states s ON i.status_id = s.id
         LEFT JOIN departments d ON t.department_id = d.id
         LEFT JOIN areas a ON t.area_id = a.id
         WHERE {}
         ORDER BY i.due_date ASC, t.name ASC",
        clauses.join(" AND ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let views = stmt
        .query_map(params_from_iter(values.iter()), row_to_view)?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(location_id, rows = views.len(), "board query");
    Ok(views)
}

/// One instance with its task, state, department and area.
pub fn get_view(conn: &Connection, id: &str) -> Result<InstanceView, HubtasksError> {
    conn.query_row(
        &format!(
            "SELECT {INSTANCE_COLUMNS},
                    t.name, t.description, t.recurrence_type, t.require_completion_photo,
                    s.name, s.slug, s.color, s.is_complete_state,
                    d.name, a.full_path
             FROM task_instances i
             JOIN tasks t ON i.task_id = t.id
             JOIN task_states s ON i.status_id = s.id
             LEFT JOIN departments d ON t.department_id = d.id
             LEFT JOIN areas a ON t.area_id = a.id
             WHERE i.id = ?1"
        ),
        params![id],
        row_to_view,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => HubtasksError::instance_not_found(id),
        _ => HubtasksError::from(e),
    })
}

/// Instance counts per state at a location.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct LocationSummary {
    pub total: i64,
    pub by_state: Vec<StateCount>,
    pub due_today: i64,
    pub overdue: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct StateCount {
    pub slug: String,
    pub name: String,
    pub count: i64,
}

pub fn location_summary(
    conn: &Connection,
    location_id: i64,
    today: NaiveDate,
) -> Result<LocationSummary, HubtasksError> {
    let mut stmt = conn.prepare(
        "SELECT s.slug, s.name, COUNT(i.id)
         FROM task_states s
         LEFT JOIN task_instances i ON i.status_id = s.id
         WHERE s.location_id = ?1
         GROUP BY s.id
         ORDER BY s.sort_order ASC",
    )?;
    let by_state = stmt
        .query_map(params![location_id], |row| {
            Ok(StateCount {
                slug: row.get(0)?,
                name: row.get(1)?,
                count: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let (due_today, overdue, completed): (i64, i64, i64) = conn.query_row(
        "SELECT
             COALESCE(SUM(CASE WHEN s.is_complete_state = 0 AND i.due_date = ?2 THEN 1 ELSE 0 END), 0),
             COALESCE(SUM(CASE WHEN s.is_complete_state = 0 AND i.due_date < ?2 THEN 1 ELSE 0 END), 0),
             COALESCE(SUM(CASE WHEN s.is_complete_state = 1 THEN 1 ELSE 0 END), 0)
         FROM task_instances i
         JOIN task_states s ON i.status_id = s.id
         WHERE i.location_id = ?1",
        params![location_id, today],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    Ok(LocationSummary {
        total: by_state.iter().map(|s| s.count).sum(),
        by_state,
        due_today,
        overdue,
        completed,
    })
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn row_to_instance(row: &rusqlite::Row) -> rusqlite::Result<TaskInstance> {
    Ok(TaskInstance {
        id: row.get(0)?,
        task_id: row.get(1)?,
        location_id: row.get(2)?,
        scheduled_date: row.get(3)?,
        due_date: row.get(4)?,
        status_id: row.get(5)?,
        checklist_state: json_column(row, 6)?,
        completed_by: row.get(7)?,
        completed_at: row.get(8)?,
        completion_photos: json_column(row, 9)?,
        created_at: row.get(10)?,
    })
}

fn row_to_view(row: &rusqlite::Row) -> rusqlite::Result<InstanceView> {
    Ok(InstanceView {
        instance: row_to_instance(row)?,
        task_name: row.get(11)?,
        task_description: row.get(12)?,
        recurrence_type: row.get(13)?,
        require_completion_photo: row.get(14)?,
        state_name: row.get(15)?,
        state_slug: row.get(16)?,
        state_color: row.get(17)?,
        is_complete: row.get(18)?,
        department_name: row.get(19)?,
        area_path: row.get(20)?,
    })
}
