use std::sync::Arc;
use validator::Validate;

use crate::auth::{hash_password, verify_password, LoginRequest, RegisterRequest, SessionKeys};
use crate::db::{SessionRepository, UserRepository, DUPLICATE_EMAIL, DUPLICATE_USERNAME};
use crate::error::AppError;
use crate::models::{NewUser, Session, User};

pub const INVALID_CREDENTIALS: &str = "Password or username is incorrect";

pub const SESSION_ENDED: &str = "Session has ended";

/// Registration, credential checks and the session token round trip.
#[derive(Clone)]
pub struct UserStore {
    repo: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    keys: SessionKeys,
    bcrypt_cost: u32,
}

impl UserStore {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        keys: SessionKeys,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            repo,
            sessions,
            keys,
            bcrypt_cost,
        }
    }

    pub fn session_keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// Creates an account. Duplicate usernames or emails are `AppError::BadRequest`.
    pub async fn register(&self, form: &RegisterRequest) -> Result<User, AppError> {
        form.validate()?;

        if self.repo.find_user_by_username(&form.username).await?.is_some() {
            return Err(AppError::BadRequest(DUPLICATE_USERNAME.into()));
        }
        if self.repo.find_user_by_email(&form.email).await?.is_some() {
            return Err(AppError::BadRequest(DUPLICATE_EMAIL.into()));
        }

        let password_hash = hash_password(&form.password, self.bcrypt_cost)?;
        let user = self
            .repo
            .insert_user(NewUser {
                username: form.username.clone(),
                email: form.email.clone(),
                password_hash,
            })
            .await?;

        log::info!("Registered user {}", user.username);
        Ok(user)
    }

    /// Unknown usernames and wrong passwords fail with the same message.
    pub async fn authenticate(&self, credentials: &LoginRequest) -> Result<User, AppError> {
        credentials.validate()?;

        let user = match self.repo.find_user_by_username(&credentials.username).await? {
            Some(user) => user,
            None => {
                log::debug!("Sign-in attempt for unknown user {}", credentials.username);
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
            }
        };

        if verify_password(&credentials.password, &user.password_hash)? {
            Ok(user)
        } else {
            log::warn!("Wrong password for user {}", user.username);
            Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()))
        }
    }

    /// Opens a session for `user` and returns the opaque value stored in the session cookie.
    pub async fn serialize(&self, user: &User) -> Result<String, AppError> {
        let session = Session::new(&user.username, self.keys.ttl());
        let session_id = session.id;
        self.sessions.insert_session(session).await?;
        self.keys.generate_token(&user.username, session_id)
    }

    /// Resolves a session token back into its user. Fails with `Unauthorized` when the token
    /// is invalid or expired, its session was ended, or the user no longer exists.
    pub async fn deserialize(&self, token: &str) -> Result<User, AppError> {
        let claims = self.keys.verify_token(token)?;
        match self.sessions.find_session(claims.jti).await? {
            Some(session) if session.username == claims.sub => {}
            _ => return Err(AppError::Unauthorized(SESSION_ENDED.into())),
        }
        self.repo
            .find_user_by_username(&claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))
    }

    /// Ends the session behind `token`; the token is rejected from then on.
    pub async fn revoke(&self, token: &str) -> Result<(), AppError> {
        let claims = self.keys.verify_token(token)?;
        if !self.sessions.delete_session(claims.jti).await? {
            log::debug!("Session {} of {} was already gone", claims.jti, claims.sub);
        }
        Ok(())
    }
}
