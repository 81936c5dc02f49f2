use rusqlite::{params, Connection, OptionalExtension};

use crate::error::HubtasksError;
use crate::models::{IntervalType, PatternSettings, RecurringPattern};

const PATTERN_COLUMNS: &str =
    "id, location_id, name, interval_type, interval_days, lead_time_days, is_enabled, created_at";

pub fn get_pattern_by_id(conn: &Connection, id: &str) -> Result<RecurringPattern, HubtasksError> {
    conn.query_row(
        &format!("SELECT {PATTERN_COLUMNS} FROM recurring_patterns WHERE id = ?1"),
        params![id],
        row_to_pattern,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => HubtasksError::pattern_not_found(id),
        _ => HubtasksError::from(e),
    })
}

pub fn find_pattern_by_name(
    conn: &Connection,
    location_id: i64,
    name: &str,
) -> Result<Option<RecurringPattern>, HubtasksError> {
    let pattern = conn
        .query_row(
            &format!(
                "SELECT {PATTERN_COLUMNS} FROM recurring_patterns WHERE location_id = ?1 AND name = ?2"
            ),
            params![location_id, name],
            row_to_pattern,
        )
        .optional()?;
    Ok(pattern)
}

pub fn list_patterns(
    conn: &Connection,
    location_id: i64,
) -> Result<Vec<RecurringPattern>, HubtasksError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATTERN_COLUMNS} FROM recurring_patterns WHERE location_id = ?1 ORDER BY name ASC"
    ))?;
    let patterns = stmt
        .query_map(params![location_id], row_to_pattern)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(patterns)
}

/// Insert or update the pattern identified by `(location_id, name)`.
pub fn upsert_pattern(
    conn: &Connection,
    location_id: i64,
    pattern: &PatternSettings,
) -> Result<String, HubtasksError> {
    match find_pattern_by_name(conn, location_id, &pattern.name)? {
        Some(existing) => {
            conn.execute(
                "UPDATE recurring_patterns
                 SET interval_type = ?1, interval_days = ?2, lead_time_days = ?3, is_enabled = ?4
                 WHERE id = ?5",
                params![
                    pattern.interval_type.as_str(),
                    pattern.interval_days,
                    pattern.lead_time_days,
                    pattern.enabled,
                    existing.id
                ],
            )?;
            Ok(existing.id)
        }
        None => {
            let id = super::new_id();
            conn.execute(
                "INSERT INTO recurring_patterns
                     (id, location_id, name, interval_type, interval_days, lead_time_days, is_enabled)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    location_id,
                    pattern.name,
                    pattern.interval_type.as_str(),
                    pattern.interval_days,
                    pattern.lead_time_days,
                    pattern.enabled
                ],
            )?;
            Ok(id)
        }
    }
}

pub fn disable_patterns_except(
    conn: &Connection,
    location_id: i64,
    keep: &[String],
) -> Result<usize, HubtasksError> {
    super::state_repo::disable_except(conn, "recurring_patterns", "name", location_id, keep)
}

fn row_to_pattern(row: &rusqlite::Row) -> rusqlite::Result<RecurringPattern> {
    Ok(RecurringPattern {
        id: row.get(0)?,
        location_id: row.get(1)?,
        name: row.get(2)?,
        interval_type: IntervalType::from_str(&row.get::<_, String>(3)?).unwrap_or(IntervalType::Dynamic),
        interval_days: row.get(4)?,
        lead_time_days: row.get(5)?,
        is_enabled: row.get(6)?,
        created_at: row.get(7)?,
    })
}
