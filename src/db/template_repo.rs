use rusqlite::{params, Connection, OptionalExtension};

use crate::error::HubtasksError;
use crate::models::ChecklistTemplate;

use super::{json_column, to_json};

const TEMPLATE_COLUMNS: &str = "id, location_id, name, checklist_items, created_by, created_at, updated_at";

/// Create the template named `name` or replace its items. Returns the stored
/// template and whether it was newly created.
pub fn save_template(
    conn: &Connection,
    location_id: i64,
    name: &str,
    items: &[String],
    created_by: Option<&str>,
) -> Result<(ChecklistTemplate, bool), HubtasksError> {
    let created = match find_template_by_name(conn, location_id, name)? {
        Some(existing) => {
            conn.execute(
                "UPDATE checklist_templates SET checklist_items = ?1, updated_at = datetime('now')
                 WHERE id = ?2",
                params![to_json(items)?, existing.id],
            )?;
            false
        }
        None => {
            conn.execute(
                "INSERT INTO checklist_templates (id, location_id, name, checklist_items, created_by)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![super::new_id(), location_id, name, to_json(items)?, created_by],
            )?;
            true
        }
    };
    let template = find_template_by_name(conn, location_id, name)?
        .ok_or_else(|| HubtasksError::template_not_found(name))?;
    Ok((template, created))
}

pub fn find_template_by_name(
    conn: &Connection,
    location_id: i64,
    name: &str,
) -> Result<Option<ChecklistTemplate>, HubtasksError> {
    let template = conn
        .query_row(
            &format!(
                "SELECT {TEMPLATE_COLUMNS} FROM checklist_templates WHERE location_id = ?1 AND name = ?2"
            ),
            params![location_id, name],
            row_to_template,
        )
        .optional()?;
    Ok(template)
}

pub fn get_template(conn: &Connection, location_id: i64, name: &str) -> Result<ChecklistTemplate, HubtasksError> {
    find_template_by_name(conn, location_id, name)?.ok_or_else(|| HubtasksError::template_not_found(name))
}

pub fn list_templates(conn: &Connection, location_id: i64) -> Result<Vec<ChecklistTemplate>, HubtasksError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TEMPLATE_COLUMNS} FROM checklist_templates WHERE location_id = ?1 ORDER BY name ASC"
    ))?;
    let templates = stmt
        .query_map(params![location_id], row_to_template)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(templates)
}

/// Tasks seeded from a template keep their own copy of the items.
pub fn delete_template(conn: &Connection, location_id: i64, name: &str) -> Result<(), HubtasksError> {
    let deleted = conn.execute(
        "DELETE FROM checklist_templates WHERE location_id = ?1 AND name = ?2",
        params![location_id, name],
    )?;
    if deleted == 0 {
        return Err(HubtasksError::template_not_found(name));
    }
    Ok(())
}

fn row_to_template(row: &rusqlite::Row) -> rusqlite::Result<ChecklistTemplate> {
    Ok(ChecklistTemplate {
        id: row.get(0)?,
        location_id: row.get(1)?,
        name: row.get(2)?,
        checklist_items: json_column(row, 3)?,
        created_by: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
