use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub location_id: i64,
    pub name: String,
    pub slug: String,
    pub icon: String,
    pub color: String,
    pub description: Option<String>,
    pub is_enabled: bool,
    pub sort_order: i32,
}
