use std::env;

use crate::error::AppError;

/// Sessions last a week, matching the cookie max-age.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Runtime configuration, read once at startup and injected into the stores.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. `None` runs against the in-memory repository.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    /// HMAC key used to sign session tokens.
    pub session_secret: String,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| AppError::InternalServerError("SESSION_SECRET must be set".into()))?;
        if session_secret.is_empty() {
            return Err(AppError::InternalServerError(
                "SESSION_SECRET must not be empty".into(),
            ));
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            server_port: parse_var("PORT", 3000)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            session_secret,
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::InternalServerError(format!("{} must be a number", name))),
        Err(_) => Ok(default),
    }
}
