//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application
//! and acts as the single error boundary for the HTTP surface.
//!
//! `AppError` implements `actix_web::error::ResponseError`. Every variant is normalized to a
//! status code and a user-facing message, which are rendered with the `error` template.
//! `LoginRequired` is the exception: it turns into a redirect to the sign-in page.
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, `bcrypt::BcryptError` and `handlebars::RenderError`
//! allow the `?` operator to be used across store, auth and view code.

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use std::fmt;
use validator::ValidationErrors;

use crate::auth::flash::{self, FlashKind};
use crate::views;

/// Shown on the error page when a failure carries no message of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "Oh No, Something Went Wrong!";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Rejected credentials or an invalid session token (HTTP 401).
    Unauthorized(String),
    /// A request that conflicts with existing data, e.g. a duplicate username (HTTP 400).
    BadRequest(String),
    /// The requested page or task does not exist for the current user (HTTP 404).
    NotFound(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// A failure reported by the database driver (HTTP 500).
    /// The detail is logged and never shown to the user.
    DatabaseError(String),
    /// A missing or empty required field (HTTP 422).
    ValidationError(String),
    /// An anonymous request reached a protected route. Carries the requested path.
    LoginRequired(String),
}

impl AppError {
    /// The message rendered on the error page.
    pub fn message(&self) -> &str {
        let msg = match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg.as_str(),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => "",
            AppError::LoginRequired(_) => "You must be signed in first!",
        };
        if msg.trim().is_empty() {
            GENERIC_ERROR_MESSAGE
        } else {
            msg
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::LoginRequired(path) => write!(f, "Login Required: {}", path),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::LoginRequired(_) => StatusCode::FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::LoginRequired(path) => {
                let mut response = HttpResponse::Found();
                response
                    .insert_header((header::LOCATION, "/signin"))
                    .cookie(flash::notice_cookie(FlashKind::Error, self.message()));
                if let Some(return_to) = flash::return_to_cookie(path) {
                    response.cookie(return_to);
                }
                response.finish()
            }
            AppError::InternalServerError(detail) | AppError::DatabaseError(detail) => {
                log::error!("{}", detail);
                views::error_page(self.status_code(), self.message())
            }
            _ => views::error_page(self.status_code(), self.message()),
        }
    }
}

/// `RowNotFound` becomes `NotFound`; everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Only the first failing field's message is kept, since it ends up in a flash notice.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);
        let first = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .next();
        AppError::ValidationError(first.unwrap_or_else(|| errors.to_string()))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(error: handlebars::RenderError) -> AppError {
        AppError::InternalServerError(format!("Failed to render view: {}", error))
    }
}
