use chrono::Duration;
use std::sync::Arc;

use crate::auth::SessionKeys;
use crate::config::{Config, SESSION_TTL_DAYS};
use crate::db::{
    MemoryRepository, PgRepository, SessionRepository, TaskRepository, UserRepository,
};
use crate::error::AppError;
use crate::store::{TaskStore, UserStore};

/// Shared application state handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub tasks: TaskStore,
}

impl AppState {
    /// Builds the stores on top of a repository implementing every persistence trait.
    pub fn new<R>(repo: Arc<R>, config: &Config) -> Self
    where
        R: UserRepository + SessionRepository + TaskRepository + 'static,
    {
        let keys = SessionKeys::new(&config.session_secret, Duration::days(SESSION_TTL_DAYS));
        Self {
            users: UserStore::new(repo.clone(), repo.clone(), keys, config.bcrypt_cost),
            tasks: TaskStore::new(repo),
        }
    }

    /// Connects to PostgreSQL and migrates it when `DATABASE_URL` is configured;
    /// otherwise falls back to the in-memory repository.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        match &config.database_url {
            Some(url) => {
                let repo = PgRepository::connect(url).await?;
                repo.migrate().await?;
                Ok(Self::new(Arc::new(repo), config))
            }
            None => {
                log::warn!("DATABASE_URL not set; data will be kept in memory only");
                Ok(Self::new(Arc::new(MemoryRepository::new()), config))
            }
        }
    }
}
