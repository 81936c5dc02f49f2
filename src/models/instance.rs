use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Sparse checkbox state: checklist item index → checked.
pub type ChecklistState = BTreeMap<usize, bool>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInstance {
    pub id: String,
    pub task_id: String,
    pub location_id: i64,
    pub scheduled_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status_id: String,
    pub checklist_state: ChecklistState,
    pub completed_by: Option<String>,
    pub completed_at: Option<NaiveDateTime>,
    pub completion_photos: Vec<String>,
    pub created_at: String,
}

impl TaskInstance {
    pub fn checked_count(&self) -> usize {
        self.checklist_state.values().filter(|checked| **checked).count()
    }
}

/// An instance joined with the task, state and department it belongs to,
/// as shown on the location board.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceView {
    pub instance: TaskInstance,
    pub task_name: String,
    pub task_description: Option<String>,
    pub recurrence_type: String,
    pub require_completion_photo: bool,
    pub state_name: String,
    pub state_slug: String,
    pub state_color: String,
    pub is_complete: bool,
    pub department_name: Option<String>,
    pub area_path: Option<String>,
}
