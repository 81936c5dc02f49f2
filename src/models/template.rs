use serde::{Deserialize, Serialize};

/// A named checklist a task can be seeded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistTemplate {
    pub id: String,
    pub location_id: i64,
    pub name: String,
    pub checklist_items: Vec<String>,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
