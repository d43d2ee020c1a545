use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Form body shared by `POST /new` and `POST /edit/{id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskInput {
    /// Free text; rejected when empty after trimming.
    #[serde(default)]
    pub content: String,
}

/// A todo item as stored in the database and rendered on the todo page.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// Username of the owner.
    pub author: String,
    pub content: String,
    /// When the task was created.
    pub date: DateTime<Utc>,
}

impl Task {
    /// Builds a task owned by `author`, stamped with the current time.
    pub fn new(author: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: author.to_string(),
            content: content.to_string(),
            date: Utc::now(),
        }
    }
}
