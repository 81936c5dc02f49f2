use rusqlite::{params, Connection};

use crate::error::HubtasksError;
use crate::models::{RecurrenceType, RecurringPattern, Task};

use super::{json_column, to_json};

const TASK_COLUMNS: &str = "id, location_id, name, description, recurrence_type, pattern_id,
     department_id, area_id, checklist_items, reference_photos, require_completion_photo,
     completion_reminder, is_active, created_by, created_at, updated_at";

/// Field values for creating or rewriting a task.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub name: String,
    pub description: Option<String>,
    pub recurrence_type: RecurrenceType,
    pub pattern_id: Option<String>,
    pub department_id: Option<String>,
    pub area_id: Option<String>,
    pub checklist_items: Vec<String>,
    pub reference_photos: Vec<String>,
    pub require_completion_photo: bool,
    pub completion_reminder: Option<String>,
    pub is_active: bool,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            description: task.description.clone(),
            recurrence_type: task.recurrence_type,
            pattern_id: task.pattern_id.clone(),
            department_id: task.department_id.clone(),
            area_id: task.area_id.clone(),
            checklist_items: task.checklist_items.clone(),
            reference_photos: task.reference_photos.clone(),
            require_completion_photo: task.require_completion_photo,
            completion_reminder: task.completion_reminder.clone(),
            is_active: task.is_active,
        }
    }
}

pub fn create_task(
    conn: &Connection,
    id: &str,
    location_id: i64,
    record: &TaskRecord,
    created_by: Option<&str>,
) -> Result<Task, HubtasksError> {
    conn.execute(
        "INSERT INTO tasks (id, location_id, name, description, recurrence_type, pattern_id,
             department_id, area_id, checklist_items, reference_photos, require_completion_photo,
             completion_reminder, is_active, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            id,
            location_id,
            record.name,
            record.description,
            record.recurrence_type.as_str(),
            record.pattern_id,
            record.department_id,
            record.area_id,
            to_json(&record.checklist_items)?,
            to_json(&record.reference_photos)?,
            record.require_completion_photo,
            record.completion_reminder,
            record.is_active,
            created_by
        ],
    )?;
    get_task_by_id(conn, id)
}

pub fn update_task(conn: &Connection, id: &str, record: &TaskRecord) -> Result<Task, HubtasksError> {
    let changed = conn.execute(
        "UPDATE tasks
         SET name = ?1, description = ?2, recurrence_type = ?3, pattern_id = ?4,
             department_id = ?5, area_id = ?6, checklist_items = ?7, reference_photos = ?8,
             require_completion_photo = ?9, completion_reminder = ?10, is_active = ?11,
             updated_at = datetime('now')
         WHERE id = ?12",
        params![
            record.name,
            record.description,
            record.recurrence_type.as_str(),
            record.pattern_id,
            record.department_id,
            record.area_id,
            to_json(&record.checklist_items)?,
            to_json(&record.reference_photos)?,
            record.require_completion_photo,
            record.completion_reminder,
            record.is_active,
            id
        ],
    )?;
    if changed == 0 {
        return Err(HubtasksError::task_not_found(id));
    }
    get_task_by_id(conn, id)
}

pub fn get_task_by_id(conn: &Connection, id: &str) -> Result<Task, HubtasksError> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => HubtasksError::task_not_found(id),
        _ => HubtasksError::from(e),
    })
}

/// Resolve a task by exact ID or ID prefix within a location.
pub fn resolve_task(conn: &Connection, location_id: i64, reference: &str) -> Result<Task, HubtasksError> {
    if let Ok(task) = get_task_by_id(conn, reference) {
        if task.location_id == location_id {
            return Ok(task);
        }
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE location_id = ?1 AND id LIKE ?2"
    ))?;
    let prefix = format!("{reference}%");
    let tasks: Vec<Task> = stmt
        .query_map(params![location_id, prefix], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;

    super::single_match(
        reference,
        tasks,
        |t| format!("{} ({})", t.name, t.id),
        HubtasksError::task_not_found,
    )
}

pub fn list_tasks(conn: &Connection, location_id: i64) -> Result<Vec<Task>, HubtasksError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE location_id = ?1 ORDER BY name ASC"
    ))?;
    let tasks = stmt
        .query_map(params![location_id], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Active fixed-recurrence tasks whose pattern is enabled, across all locations.
pub fn active_fixed_tasks(conn: &Connection) -> Result<Vec<(Task, RecurringPattern)>, HubtasksError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, p.id FROM tasks t
         JOIN recurring_patterns p ON t.pattern_id = p.id
         WHERE t.recurrence_type = 'fixed' AND t.is_active = 1 AND p.is_enabled = 1
         ORDER BY t.location_id ASC, t.created_at ASC",
    )?;
    let ids = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut tasks = Vec::with_capacity(ids.len());
    for (task_id, pattern_id) in ids {
        let task = get_task_by_id(conn, &task_id)?;
        let pattern = super::pattern_repo::get_pattern_by_id(conn, &pattern_id)?;
        tasks.push((task, pattern));
    }
    Ok(tasks)
}

pub fn count_active_tasks(conn: &Connection, location_id: i64) -> Result<i64, HubtasksError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM tasks WHERE location_id = ?1 AND is_active = 1",
        params![location_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn delete_task(conn: &Connection, id: &str) -> Result<(), HubtasksError> {
    let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(HubtasksError::task_not_found(id));
    }
    Ok(())
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        location_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        recurrence_type: RecurrenceType::from_str(&row.get::<_, String>(4)?).unwrap_or(RecurrenceType::None),
        pattern_id: row.get(5)?,
        department_id: row.get(6)?,
        area_id: row.get(7)?,
        checklist_items: json_column(row, 8)?,
        reference_photos: json_column(row, 9)?,
        require_completion_photo: row.get(10)?,
        completion_reminder: row.get(11)?,
        is_active: row.get(12)?,
        created_by: row.get(13)?,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}
