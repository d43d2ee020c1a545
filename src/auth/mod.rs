pub mod extractors;
pub mod flash;
pub mod middleware;
pub mod password;
pub mod token;

use actix_web::cookie::{time, Cookie, SameSite};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use flash::{Flash, FlashKind};
pub use middleware::SessionMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, SessionKeys};

/// Cookie holding the signed session token.
pub const SESSION_COOKIE: &str = "todo_session";

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Sign-in form body.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Missing credentials"))]
    pub username: String,
    #[validate(length(min = 1, message = "Missing credentials"))]
    pub password: String,
}

/// Sign-up form body.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    /// Between 1 and 32 characters: letters, digits, underscores or hyphens.
    #[validate(
        length(min = 1, max = 32, message = "Username must be between 1 and 32 characters"),
        regex(
            path = "USERNAME_REGEX",
            message = "Username may only contain letters, digits, underscores or hyphens"
        )
    )]
    pub username: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

/// httpOnly session cookie that lives as long as the token inside it.
pub fn session_cookie(token: String, ttl: chrono::Duration) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .finish()
}
