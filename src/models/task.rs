use serde::{Deserialize, Serialize};

/// How a task produces its instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    /// One-off work: a single instance, never regenerated.
    None,
    /// Next instance anchored to the previous scheduled date.
    Fixed,
    /// Next instance anchored to the completion timestamp.
    Dynamic,
}

impl RecurrenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fixed => "fixed",
            Self::Dynamic => "dynamic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "fixed" => Some(Self::Fixed),
            "dynamic" => Some(Self::Dynamic),
            _ => None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub location_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub recurrence_type: RecurrenceType,
    pub pattern_id: Option<String>,
    pub department_id: Option<String>,
    pub area_id: Option<String>,
    /// Ordered checklist labels; instances track checkbox state by index.
    pub checklist_items: Vec<String>,
    pub reference_photos: Vec<String>,
    pub require_completion_photo: bool,
    pub completion_reminder: Option<String>,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
