use serde::{Deserialize, Serialize};

/// A place within a hotel (floor, room, storeroom) that tasks can target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub location_id: i64,
    pub parent_id: Option<String>,
    pub level: u32,
    pub name: String,
    pub area_type: Option<String>,
    pub full_path: String,
    pub sort_order: i32,
    pub is_enabled: bool,
}
