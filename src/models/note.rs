use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskNote {
    pub id: String,
    pub instance_id: String,
    pub text: String,
    pub photos: Vec<String>,
    /// Copied onto the next instance generated on completion.
    pub carry_forward: bool,
    pub created_by: Option<String>,
    pub created_at: String,
}
