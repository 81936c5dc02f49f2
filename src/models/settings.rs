//! Typed per-location configuration record.
//!
//! A `LocationSettings` document describes everything an administrator
//! configures for one hotel: departments, recurring patterns, the task state
//! vocabulary and the area hierarchy. Documents are parsed strictly (unknown
//! fields are rejected) and validated as a whole before anything is written.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::HubtasksError;
use crate::hierarchy;
use crate::models::{IntervalType, StateRole};

pub const MAX_LEAD_TIME_DAYS: u32 = 90;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationSettings {
    #[serde(default)]
    pub departments: Vec<DepartmentSettings>,
    #[serde(default)]
    pub recurring_patterns: Vec<PatternSettings>,
    /// `None` keeps (or seeds) the default Pending/Due/Overdue/Complete set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_states: Option<Vec<StateSettings>>,
    #[serde(default)]
    pub areas: Vec<AreaSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepartmentSettings {
    pub name: String,
    pub slug: String,
    #[serde(default = "default_department_icon")]
    pub icon: String,
    #[serde(default = "default_department_color")]
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternSettings {
    pub name: String,
    pub interval_type: IntervalType,
    pub interval_days: u32,
    #[serde(default)]
    pub lead_time_days: u32,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateSettings {
    pub name: String,
    pub slug: String,
    #[serde(default = "default_state_color")]
    pub color: String,
    #[serde(default)]
    pub role: Option<StateRole>,
    #[serde(default)]
    pub is_complete_state: bool,
    #[serde(default)]
    pub checklist_started_state: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaSettings {
    pub name: String,
    #[serde(default)]
    pub area_type: Option<String>,
    /// Name of the parent area in the same document.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

fn default_department_icon() -> String {
    "assignment_turned_in".to_string()
}

fn default_department_color() -> String {
    "#8b5cf6".to_string()
}

fn default_state_color() -> String {
    "#6b7280".to_string()
}

/// The state vocabulary every location starts with.
pub fn default_states() -> Vec<StateSettings> {
    let make = |name: &str, role: StateRole, color: &str, sort_order: i32| StateSettings {
        name: name.to_string(),
        slug: role.as_str().to_string(),
        color: color.to_string(),
        role: Some(role),
        is_complete_state: role == StateRole::Complete,
        checklist_started_state: false,
        enabled: true,
        sort_order,
    };
    vec![
        make("Pending", StateRole::Pending, "#6b7280", 0),
        make("Due", StateRole::Due, "#f59e0b", 1),
        make("Overdue", StateRole::Overdue, "#ef4444", 2),
        make("Complete", StateRole::Complete, "#10b981", 3),
    ]
}

impl LocationSettings {
    pub fn validate(&self) -> Result<(), HubtasksError> {
        let mut slugs = HashSet::new();
        for dept in &self.departments {
            require_name("Department", &dept.name)?;
            validate_slug(&dept.slug)?;
            validate_color(&dept.color)?;
            if !slugs.insert(dept.slug.as_str()) {
                return Err(HubtasksError::validation(format!(
                    "Duplicate department slug: {}",
                    dept.slug
                )));
            }
        }

        let mut names = HashSet::new();
        for pattern in &self.recurring_patterns {
            require_name("Pattern", &pattern.name)?;
            if pattern.interval_days == 0 {
                return Err(HubtasksError::validation(format!(
                    "Pattern '{}' must repeat at least every 1 day",
                    pattern.name
                )));
            }
            if pattern.lead_time_days > MAX_LEAD_TIME_DAYS {
                return Err(HubtasksError::validation(format!(
                    "Pattern '{}' lead time exceeds {MAX_LEAD_TIME_DAYS} days",
                    pattern.name
                )));
            }
            if !names.insert(pattern.name.as_str()) {
                return Err(HubtasksError::validation(format!(
                    "Duplicate pattern name: {}",
                    pattern.name
                )));
            }
        }

        if let Some(states) = &self.task_states {
            validate_states(states)?;
        }

        let mut area_names = HashSet::new();
        for area in &self.areas {
            require_name("Area", &area.name)?;
            if !area_names.insert(area.name.as_str()) {
                return Err(HubtasksError::validation(format!(
                    "Duplicate area name: {}",
                    area.name
                )));
            }
        }
        let nodes: Vec<String> = self.areas.iter().map(|a| a.name.clone()).collect();
        let mut edges = Vec::new();
        for area in &self.areas {
            if let Some(parent) = &area.parent {
                if !area_names.contains(parent.as_str()) {
                    return Err(HubtasksError::validation(format!(
                        "Area '{}' references unknown parent '{}'",
                        area.name, parent
                    )));
                }
                edges.push((area.name.clone(), parent.clone()));
            }
        }
        hierarchy::detect_cycle(&nodes, &edges)?;

        Ok(())
    }
}

fn validate_states(states: &[StateSettings]) -> Result<(), HubtasksError> {
    let mut slugs = HashSet::new();
    let mut roles = HashSet::new();
    let mut checklist_started = 0;

    for state in states {
        require_name("State", &state.name)?;
        validate_slug(&state.slug)?;
        validate_color(&state.color)?;
        if !slugs.insert(state.slug.as_str()) {
            return Err(HubtasksError::validation(format!(
                "Duplicate state slug: {}",
                state.slug
            )));
        }
        if state.role == Some(StateRole::Complete) && !state.is_complete_state {
            return Err(HubtasksError::validation(format!(
                "State '{}' has the complete role but is not a complete state",
                state.slug
            )));
        }
        if state.is_complete_state && matches!(state.role, Some(r) if r != StateRole::Complete) {
            return Err(HubtasksError::validation(format!(
                "Complete state '{}' cannot carry a non-complete role",
                state.slug
            )));
        }
        if state.checklist_started_state && state.is_complete_state {
            return Err(HubtasksError::validation(format!(
                "State '{}' cannot be both complete and checklist-started",
                state.slug
            )));
        }
        if !state.enabled {
            continue;
        }
        if let Some(role) = state.role {
            if !roles.insert(role) {
                return Err(HubtasksError::validation(format!(
                    "More than one enabled state has the '{}' role",
                    role.as_str()
                )));
            }
        }
        if state.checklist_started_state {
            checklist_started += 1;
        }
    }

    if checklist_started > 1 {
        return Err(HubtasksError::validation(
            "Only one enabled state may be the checklist-started state",
        ));
    }
    Ok(())
}

fn require_name(kind: &str, name: &str) -> Result<(), HubtasksError> {
    if name.trim().is_empty() {
        return Err(HubtasksError::validation(format!("{kind} name is required")));
    }
    Ok(())
}

/// Slugs are `^[a-z0-9][a-z0-9-]*[a-z0-9]$` or a single `[a-z0-9]`.
pub fn validate_slug(slug: &str) -> Result<(), HubtasksError> {
    let valid_edge = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    let valid = match (slug.chars().next(), slug.chars().last()) {
        (Some(first), Some(last)) => {
            valid_edge(first)
                && valid_edge(last)
                && slug.chars().all(|c| valid_edge(c) || c == '-')
        }
        _ => false,
    };
    if !valid {
        return Err(HubtasksError::validation(format!(
            "Invalid slug '{slug}': use lowercase letters, digits and hyphens"
        )));
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<(), HubtasksError> {
    let hex = color.strip_prefix('#').unwrap_or("");
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(HubtasksError::validation(format!(
            "Invalid colour '{color}': expected #rrggbb"
        )));
    }
    Ok(())
}
