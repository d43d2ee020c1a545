use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Server-side record of a login. The session token carries `id` as its `jti` claim;
/// deleting the record ends the session even though the token is still signed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(username: &str, ttl: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
