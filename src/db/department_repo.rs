use rusqlite::{params, Connection, OptionalExtension};

use crate::error::HubtasksError;
use crate::models::{Department, DepartmentSettings};

const DEPARTMENT_COLUMNS: &str =
    "id, location_id, name, slug, icon, color, description, is_enabled, sort_order";

pub fn get_department_by_id(conn: &Connection, id: &str) -> Result<Department, HubtasksError> {
    conn.query_row(
        &format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = ?1"),
        params![id],
        row_to_department,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => HubtasksError::department_not_found(id),
        _ => HubtasksError::from(e),
    })
}

pub fn find_department_by_slug(
    conn: &Connection,
    location_id: i64,
    slug: &str,
) -> Result<Option<Department>, HubtasksError> {
    let dept = conn
        .query_row(
            &format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE location_id = ?1 AND slug = ?2"),
            params![location_id, slug],
            row_to_department,
        )
        .optional()?;
    Ok(dept)
}

pub fn list_departments(conn: &Connection, location_id: i64) -> Result<Vec<Department>, HubtasksError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE location_id = ?1 ORDER BY sort_order ASC, name ASC"
    ))?;
    let depts = stmt
        .query_map(params![location_id], row_to_department)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(depts)
}

pub fn upsert_department(
    conn: &Connection,
    location_id: i64,
    dept: &DepartmentSettings,
) -> Result<String, HubtasksError> {
    match find_department_by_slug(conn, location_id, &dept.slug)? {
        Some(existing) => {
            conn.execute(
                "UPDATE departments
                 SET name = ?1, icon = ?2, color = ?3, description = ?4, is_enabled = ?5, sort_order = ?6
                 WHERE id = ?7",
                params![
                    dept.name,
                    dept.icon,
                    dept.color,
                    dept.description,
                    dept.enabled,
                    dept.sort_order,
                    existing.id
                ],
            )?;
            Ok(existing.id)
        }
        None => {
            let id = super::new_id();
            conn.execute(
                "INSERT INTO departments
                     (id, location_id, name, slug, icon, color, description, is_enabled, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    location_id,
                    dept.name,
                    dept.slug,
                    dept.icon,
                    dept.color,
                    dept.description,
                    dept.enabled,
                    dept.sort_order
                ],
            )?;
            Ok(id)
        }
    }
}

pub fn disable_departments_except(
    conn: &Connection,
    location_id: i64,
    keep: &[String],
) -> Result<usize, HubtasksError> {
    super::state_repo::disable_except(conn, "departments", "slug", location_id, keep)
}

fn row_to_department(row: &rusqlite::Row) -> rusqlite::Result<Department> {
    Ok(Department {
        id: row.get(0)?,
        location_id: row.get(1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
        icon: row.get(4)?,
        color: row.get(5)?,
        description: row.get(6)?,
        is_enabled: row.get(7)?,
        sort_order: row.get(8)?,
    })
}
