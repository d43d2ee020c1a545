//! Persistence seam.
//!
//! Stores talk to the database only through the [`UserRepository`], [`SessionRepository`]
//! and [`TaskRepository`] traits. [`PgRepository`] backs them with PostgreSQL; [`MemoryRepository`] keeps everything
//! in process memory and is used when no `DATABASE_URL` is configured and by the tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Session, Task, User};

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

pub const DUPLICATE_USERNAME: &str = "A user with the given username is already registered";
pub const DUPLICATE_EMAIL: &str = "A user with the given email is already registered";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. Fails with `AppError::BadRequest` if the username or email is taken.
    async fn insert_user(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

/// Login sessions, looked up on every request that carries a session cookie.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert_session(&self, session: Session) -> Result<(), AppError>;

    /// The session `id`, or `None` if it was deleted or has expired.
    async fn find_session(&self, id: Uuid) -> Result<Option<Session>, AppError>;

    /// Returns `false` when there was no such session.
    async fn delete_session(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn count_tasks(&self, author: &str) -> Result<u64, AppError>;

    /// Tasks of `author` in creation order.
    async fn list_tasks(&self, author: &str) -> Result<Vec<Task>, AppError>;

    async fn insert_task(&self, task: Task) -> Result<Task, AppError>;

    /// Replaces the content of the task `id` owned by `author`.
    /// Returns `None` when no such task exists.
    async fn update_task_content(
        &self,
        id: Uuid,
        author: &str,
        content: &str,
    ) -> Result<Option<Task>, AppError>;

    /// Returns `false` when no task `id` owned by `author` exists.
    async fn delete_task(&self, id: Uuid, author: &str) -> Result<bool, AppError>;

    /// Returns the number of tasks removed.
    async fn delete_tasks_by_author(&self, author: &str) -> Result<u64, AppError>;
}
