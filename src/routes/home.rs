use actix_web::{get, HttpResponse};
use serde_json::json;

use crate::{
    auth::{AuthenticatedUser, Flash},
    error::AppError,
    views,
};

/// Landing page. Public.
#[get("/")]
pub async fn index(
    user: Option<AuthenticatedUser>,
    flash: Flash,
) -> Result<HttpResponse, AppError> {
    views::render("home", user.as_deref(), &flash, json!({}))
}
