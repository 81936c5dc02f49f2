use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalType {
    Fixed,
    Dynamic,
}

impl IntervalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Dynamic => "dynamic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fixed" => Some(Self::Fixed),
            "dynamic" => Some(Self::Dynamic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringPattern {
    pub id: String,
    pub location_id: i64,
    pub name: String,
    pub interval_type: IntervalType,
    pub interval_days: u32,
    /// How many days before the due date an instance is surfaced.
    pub lead_time_days: u32,
    pub is_enabled: bool,
    pub created_at: String,
}
