use rusqlite::{params, Connection};

use crate::error::HubtasksError;
use crate::models::TaskNote;

use super::{json_column, to_json};

const NOTE_COLUMNS: &str = "id, instance_id, text, photos, carry_forward, created_by, created_at";

pub fn create_note(
    conn: &Connection,
    id: &str,
    instance_id: &str,
    text: &str,
    photos: &[String],
    carry_forward: bool,
    created_by: Option<&str>,
) -> Result<TaskNote, HubtasksError> {
    conn.execute(
        "INSERT INTO task_notes (id, instance_id, text, photos, carry_forward, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, instance_id, text, to_json(photos)?, carry_forward, created_by],
    )?;
    get_note_by_id(conn, id)
}

pub fn get_note_by_id(conn: &Connection, id: &str) -> Result<TaskNote, HubtasksError> {
    conn.query_row(
        &format!("SELECT {NOTE_COLUMNS} FROM task_notes WHERE id = ?1"),
        params![id],
        row_to_note,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => HubtasksError::note_not_found(id),
        _ => HubtasksError::from(e),
    })
}

pub fn list_notes(conn: &Connection, instance_id: &str) -> Result<Vec<TaskNote>, HubtasksError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {NOTE_COLUMNS} FROM task_notes WHERE instance_id = ?1 ORDER BY created_at ASC, rowid ASC"
    ))?;
    let notes = stmt
        .query_map(params![instance_id], row_to_note)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(notes)
}

pub fn carry_forward_notes(conn: &Connection, instance_id: &str) -> Result<Vec<TaskNote>, HubtasksError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {NOTE_COLUMNS} FROM task_notes
         WHERE instance_id = ?1 AND carry_forward = 1
         ORDER BY created_at ASC, rowid ASC"
    ))?;
    let notes = stmt
        .query_map(params![instance_id], row_to_note)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(notes)
}

fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<TaskNote> {
    Ok(TaskNote {
        id: row.get(0)?,
        instance_id: row.get(1)?,
        text: row.get(2)?,
        photos: json_column(row, 3)?,
        carry_forward: row.get(4)?,
        created_by: row.get(5)?,
        created_at: row.get(6)?,
    })
}
