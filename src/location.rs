//! Sync a [`LocationSettings`] document into a location's configuration rows,
//! and rebuild the document from what is stored.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::db::{area_repo, department_repo, pattern_repo, state_repo};
use crate::error::HubtasksError;
use crate::hierarchy;
use crate::models::{
    default_states, AreaSettings, DepartmentSettings, LocationSettings, PatternSettings,
    StateSettings,
};

#[derive(Debug, Default, Clone, Serialize)]
pub struct SyncReport {
    pub departments: usize,
    pub patterns: usize,
    pub states: usize,
    pub areas: usize,
    /// Rows missing from the document that were disabled.
    pub disabled: usize,
}

/// Write `doc` for `location_id`. The caller owns the transaction.
///
/// Rows are matched by their natural key (department and state slug, pattern
/// and area name). Anything the document no longer lists is disabled rather
/// than deleted so tasks and instances keep their references.
pub fn apply_location_settings(
    conn: &Connection,
    location_id: i64,
    doc: &LocationSettings,
) -> Result<SyncReport, HubtasksError> {
    doc.validate()?;
    let mut report = SyncReport::default();

    for dept in &doc.departments {
        department_repo::upsert_department(conn, location_id, dept)?;
    }
    let slugs: Vec<String> = doc.departments.iter().map(|d| d.slug.clone()).collect();
    report.departments = doc.departments.len();
    report.disabled += department_repo::disable_departments_except(conn, location_id, &slugs)?;

    for pattern in &doc.recurring_patterns {
        pattern_repo::upsert_pattern(conn, location_id, pattern)?;
    }
    let names: Vec<String> = doc.recurring_patterns.iter().map(|p| p.name.clone()).collect();
    report.patterns = doc.recurring_patterns.len();
    report.disabled += pattern_repo::disable_patterns_except(conn, location_id, &names)?;

    match &doc.task_states {
        Some(states) => {
            state_repo::clear_state_markers(conn, location_id)?;
            for state in states {
                state_repo::upsert_state(conn, location_id, state)?;
            }
            let slugs: Vec<String> = states.iter().map(|s| s.slug.clone()).collect();
            report.states = states.len();
            report.disabled += state_repo::disable_states_except(conn, location_id, &slugs)?;
        }
        None => {
            report.states = ensure_default_states(conn, location_id)?;
        }
    }

    report.areas = sync_areas(conn, location_id, &doc.areas)?;
    let names: Vec<String> = doc.areas.iter().map(|a| a.name.clone()).collect();
    report.disabled += area_repo::disable_areas_except(conn, location_id, &names)?;

    tracing::info!(
        location_id,
        departments = report.departments,
        patterns = report.patterns,
        states = report.states,
        areas = report.areas,
        disabled = report.disabled,
        "location settings applied"
    );
    Ok(report)
}

/// Seed Pending/Due/Overdue/Complete if the location has no states at all.
/// Returns the number of states written.
pub fn ensure_default_states(conn: &Connection, location_id: i64) -> Result<usize, HubtasksError> {
    if state_repo::count_states(conn, location_id)? > 0 {
        return Ok(0);
    }
    let defaults = default_states();
    for state in &defaults {
        state_repo::upsert_state(conn, location_id, state)?;
    }
    tracing::debug!(location_id, "default task states seeded");
    Ok(defaults.len())
}

fn sync_areas(conn: &Connection, location_id: i64, areas: &[AreaSettings]) -> Result<usize, HubtasksError> {
    let mut ids = HashMap::new();
    for area in areas {
        let id = area_repo::upsert_area(
            conn,
            location_id,
            &area.name,
            area.area_type.as_deref(),
            area.sort_order,
            area.enabled,
        )?;
        ids.insert(area.name.clone(), id);
    }

    let parents: HashMap<String, Option<String>> = areas
        .iter()
        .map(|a| (a.name.clone(), a.parent.clone()))
        .collect();
    for area in areas {
        let (level, full_path) = hierarchy::path_of(&area.name, &parents);
        let parent_id = area.parent.as_ref().and_then(|p| ids.get(p)).map(String::as_str);
        if let Some(id) = ids.get(&area.name) {
            area_repo::set_area_placement(conn, id, parent_id, level, &full_path)?;
        }
    }
    Ok(areas.len())
}

/// Rebuild the document for a location, disabled rows included.
pub fn read_location_settings(conn: &Connection, location_id: i64) -> Result<LocationSettings, HubtasksError> {
    let departments = department_repo::list_departments(conn, location_id)?
        .into_iter()
        .map(|d| DepartmentSettings {
            name: d.name,
            slug: d.slug,
            icon: d.icon,
            color: d.color,
            description: d.description,
            enabled: d.is_enabled,
            sort_order: d.sort_order,
        })
        .collect();

    let recurring_patterns = pattern_repo::list_patterns(conn, location_id)?
        .into_iter()
        .map(|p| PatternSettings {
            name: p.name,
            interval_type: p.interval_type,
            interval_days: p.interval_days,
            lead_time_days: p.lead_time_days,
            enabled: p.is_enabled,
        })
        .collect();

    let task_states = state_repo::list_states(conn, location_id)?
        .into_iter()
        .map(|s| StateSettings {
            name: s.name,
            slug: s.slug,
            color: s.color,
            role: s.role,
            is_complete_state: s.is_complete_state,
            checklist_started_state: s.checklist_started_state,
            enabled: s.is_enabled,
            sort_order: s.sort_order,
        })
        .collect();

    let stored = area_repo::list_areas(conn, location_id)?;
    let names: HashMap<String, String> = stored.iter().map(|a| (a.id.clone(), a.name.clone())).collect();
    let areas = stored
        .into_iter()
        .map(|a| AreaSettings {
            parent: a.parent_id.as_ref().and_then(|id| names.get(id)).cloned(),
            name: a.name,
            area_type: a.area_type,
            sort_order: a.sort_order,
            enabled: a.is_enabled,
        })
        .collect();

    Ok(LocationSettings {
        departments,
        recurring_patterns,
        task_states: Some(task_states),
        areas,
    })
}
