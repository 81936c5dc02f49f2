use rusqlite::{params, Connection, OptionalExtension};

use crate::error::HubtasksError;
use crate::models::Area;

const AREA_COLUMNS: &str =
    "id, location_id, parent_id, level, name, area_type, full_path, sort_order, is_enabled";

pub fn get_area_by_id(conn: &Connection, id: &str) -> Result<Area, HubtasksError> {
    conn.query_row(
        &format!("SELECT {AREA_COLUMNS} FROM areas WHERE id = ?1"),
        params![id],
        row_to_area,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => HubtasksError::area_not_found(id),
        _ => HubtasksError::from(e),
    })
}

pub fn find_area_by_name(
    conn: &Connection,
    location_id: i64,
    name: &str,
) -> Result<Option<Area>, HubtasksError> {
    let area = conn
        .query_row(
            &format!("SELECT {AREA_COLUMNS} FROM areas WHERE location_id = ?1 AND name = ?2"),
            params![location_id, name],
            row_to_area,
        )
        .optional()?;
    Ok(area)
}

pub fn list_areas(conn: &Connection, location_id: i64) -> Result<Vec<Area>, HubtasksError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {AREA_COLUMNS} FROM areas WHERE location_id = ?1 ORDER BY full_path ASC"
    ))?;
    let areas = stmt
        .query_map(params![location_id], row_to_area)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(areas)
}

/// Insert or update the area identified by `(location_id, name)`. Parent links
/// are written separately once every area of a document has an id.
pub fn upsert_area(
    conn: &Connection,
    location_id: i64,
    name: &str,
    area_type: Option<&str>,
    sort_order: i32,
    enabled: bool,
) -> Result<String, HubtasksError> {
    match find_area_by_name(conn, location_id, name)? {
        Some(existing) => {
            conn.execute(
                "UPDATE areas SET area_type = ?1, sort_order = ?2, is_enabled = ?3 WHERE id = ?4",
                params![area_type, sort_order, enabled, existing.id],
            )?;
            Ok(existing.id)
        }
        None => {
            let id = super::new_id();
            conn.execute(
                "INSERT INTO areas (id, location_id, name, area_type, full_path, sort_order, is_enabled)
                 VALUES (?1, ?2, ?3, ?4, ?3, ?5, ?6)",
                params![id, location_id, name, area_type, sort_order, enabled],
            )?;
            Ok(id)
        }
    }
}

pub fn set_area_placement(
    conn: &Connection,
    id: &str,
    parent_id: Option<&str>,
    level: u32,
    full_path: &str,
) -> Result<(), HubtasksError> {
    conn.execute(
        "UPDATE areas SET parent_id = ?1, level = ?2, full_path = ?3 WHERE id = ?4",
        params![parent_id, level, full_path, id],
    )?;
    Ok(())
}

pub fn disable_areas_except(
    conn: &Connection,
    location_id: i64,
    keep: &[String],
) -> Result<usize, HubtasksError> {
    super::state_repo::disable_except(conn, "areas", "name", location_id, keep)
}

fn row_to_area(row: &rusqlite::Row) -> rusqlite::Result<Area> {
    Ok(Area {
        id: row.get(0)?,
        location_id: row.get(1)?,
        parent_id: row.get(2)?,
        level: row.get(3)?,
        name: row.get(4)?,
        area_type: row.get(5)?,
        full_path: row.get(6)?,
        sort_order: row.get(7)?,
        is_enabled: row.get(8)?,
    })
}
