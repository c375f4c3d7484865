use serde::{Deserialize, Serialize};

pub type TaskId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub done: bool,
    // Absent in hand-edited files; decode as None rather than rejecting.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self::with_details(id, title, None, None)
    }

    pub fn with_details(
        id: TaskId,
        title: impl Into<String>,
        category: Option<String>,
        due_date: Option<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
            category,
            due_date,
        }
    }
}
