use std::sync::Arc;
use uuid::Uuid;

use crate::db::TaskRepository;
use crate::error::AppError;
use crate::models::Task;

pub const EMPTY_CONTENT: &str = "Task content cannot be empty";
pub const TASK_NOT_FOUND: &str = "Task not found";

/// Task lifecycle for a single owner. Every operation is scoped by the owner's username.
#[derive(Clone)]
pub struct TaskStore {
    repo: Arc<dyn TaskRepository>,
}

impl TaskStore {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    /// Number of tasks owned by `author`. Failures are logged and reported as zero.
    pub async fn count(&self, author: &str) -> u64 {
        match self.repo.count_tasks(author).await {
            Ok(count) => count,
            Err(e) => {
                log::error!("Failed to count tasks for {}: {}", author, e);
                0
            }
        }
    }

    /// Tasks owned by `author`, oldest first.
    pub async fn list(&self, author: &str) -> Result<Vec<Task>, AppError> {
        self.repo.list_tasks(author).await
    }

    pub async fn create(&self, author: &str, content: &str) -> Result<Task, AppError> {
        let content = non_empty(content)?;
        self.repo.insert_task(Task::new(author, content)).await
    }

    pub async fn update(&self, id: Uuid, author: &str, content: &str) -> Result<Task, AppError> {
        let content = non_empty(content)?;
        self.repo
            .update_task_content(id, author, content)
            .await?
            .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))
    }

    pub async fn delete(&self, id: Uuid, author: &str) -> Result<(), AppError> {
        if self.repo.delete_task(id, author).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(TASK_NOT_FOUND.into()))
        }
    }

    /// Removes every task of `author`, returning how many were deleted.
    pub async fn delete_all(&self, author: &str) -> Result<u64, AppError> {
        let removed = self.repo.delete_tasks_by_author(author).await?;
        log::info!("Removed {} tasks for {}", removed, author);
        Ok(removed)
    }
}

fn non_empty(content: &str) -> Result<&str, AppError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        Err(AppError::ValidationError(EMPTY_CONTENT.into()))
    } else {
        Ok(trimmed)
    }
}
