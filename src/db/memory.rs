use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    SessionRepository, TaskRepository, UserRepository, DUPLICATE_EMAIL, DUPLICATE_USERNAME,
};
use crate::error::AppError;
use crate::models::{NewUser, Session, Task, User};

/// Repository kept entirely in process memory. Vectors preserve insertion order.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    users: RwLock<Vec<User>>,
    sessions: RwLock<Vec<Session>>,
    tasks: RwLock<Vec<Task>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn insert_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(AppError::BadRequest(DUPLICATE_USERNAME.into()));
        }
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::BadRequest(DUPLICATE_EMAIL.into()));
        }
        let user = User::new(new_user);
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl SessionRepository for MemoryRepository {
    async fn insert_session(&self, session: Session) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|s| !s.is_expired());
        sessions.push(session);
        Ok(())
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<Session>, AppError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .iter()
            .find(|s| s.id == id && !s.is_expired())
            .cloned())
    }

    async fn delete_session(&self, id: Uuid) -> Result<bool, AppError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        Ok(sessions.len() < before)
    }
}

#[async_trait]
impl TaskRepository for MemoryRepository {
    async fn count_tasks(&self, author: &str) -> Result<u64, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().filter(|t| t.author == author).count() as u64)
    }

    async fn list_tasks(&self, author: &str) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().filter(|t| t.author == author).cloned().collect())
    }

    async fn insert_task(&self, task: Task) -> Result<Task, AppError> {
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn update_task_content(
        &self,
        id: Uuid,
        author: &str,
        content: &str,
    ) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .iter_mut()
            .find(|t| t.id == id && t.author == author)
            .map(|task| {
                task.content = content.to_string();
                task.clone()
            }))
    }

    async fn delete_task(&self, id: Uuid, author: &str) -> Result<bool, AppError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| !(t.id == id && t.author == author));
        Ok(tasks.len() < before)
    }

    async fn delete_tasks_by_author(&self, author: &str) -> Result<u64, AppError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.author != author);
        Ok((before - tasks.len()) as u64)
    }
}
