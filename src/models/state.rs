use serde::{Deserialize, Serialize};

/// Scheduler-facing meaning of a state. The sweep and the generator look
/// states up by role, so administrators may rename slugs freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateRole {
    Pending,
    Due,
    Overdue,
    Complete,
}

impl StateRole {
    pub const ALL: [StateRole; 4] = [Self::Pending, Self::Due, Self::Overdue, Self::Complete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Due => "due",
            Self::Overdue => "overdue",
            Self::Complete => "complete",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "due" => Some(Self::Due),
            "overdue" => Some(Self::Overdue),
            "complete" => Some(Self::Complete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskState {
    pub id: String,
    pub location_id: i64,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub role: Option<StateRole>,
    /// Terminal: an instance in this state is done.
    pub is_complete_state: bool,
    /// Target state once the first checklist item is ticked.
    pub checklist_started_state: bool,
    pub is_enabled: bool,
    pub sort_order: i32,
}
