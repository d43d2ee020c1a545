use actix_web::{cookie::Cookie, get, post, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::{
    auth::{
        flash::{self, RETURN_TO_COOKIE},
        session_cookie, AuthenticatedUser, Flash, FlashKind, LoginRequest, RegisterRequest,
        SESSION_COOKIE,
    },
    error::AppError,
    models::User,
    routes::{redirect_with_cookies, redirect_with_notice},
    state::AppState,
    views,
};

const DEFAULT_LANDING: &str = "/todo";

/// Sign-in form. Public.
#[get("/signin")]
pub async fn signin_form(
    user: Option<AuthenticatedUser>,
    flash: Flash,
) -> Result<HttpResponse, AppError> {
    views::render("signin", user.as_deref(), &flash, json!({}))
}

/// Authenticates the submitted credentials and opens a session.
///
/// On success the user lands on the page they were bounced from (remembered in the
/// `return_to` cookie), or `/todo`. Bad credentials go back to `/signin` with a notice.
#[post("/signin")]
pub async fn signin(
    state: web::Data<AppState>,
    form: web::Form<LoginRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = match state.users.authenticate(&form).await {
        Ok(user) => user,
        Err(AppError::Unauthorized(msg)) | Err(AppError::ValidationError(msg)) => {
            return Ok(redirect_with_notice("/signin", FlashKind::Error, &msg));
        }
        Err(e) => return Err(e),
    };

    let return_to = req.cookie(RETURN_TO_COOKIE);
    let landing = return_to
        .as_ref()
        .map(|c| c.value())
        .filter(|path| flash::is_local_path(path))
        .unwrap_or(DEFAULT_LANDING)
        .to_string();

    let mut cookies = vec![open_session(&state, &user).await?];
    if return_to.is_some() {
        cookies.push(flash::removal_cookie(RETURN_TO_COOKIE));
    }

    log::info!("User {} signed in", user.username);
    Ok(redirect_with_cookies(&landing, cookies))
}

/// Registration form. Public.
#[get("/signup")]
pub async fn signup_form(
    user: Option<AuthenticatedUser>,
    flash: Flash,
) -> Result<HttpResponse, AppError> {
    views::render("signup", user.as_deref(), &flash, json!({}))
}

/// Registers a new account and signs it in straight away.
///
/// Invalid or duplicate registrations are sent to `/signin` with the reason as a notice.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    form: web::Form<RegisterRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let user = match state.users.register(&form).await {
        Ok(user) => user,
        Err(AppError::ValidationError(msg)) | Err(AppError::BadRequest(msg)) => {
            log::debug!("Registration rejected: {}", msg);
            return Ok(redirect_with_notice("/signin", FlashKind::Error, &msg));
        }
        Err(e) => return Err(e),
    };

    let mut cookies = vec![
        open_session(&state, &user).await?,
        flash::notice_cookie(FlashKind::Success, "Welcome to TodoList"),
    ];
    if req.cookie(RETURN_TO_COOKIE).is_some() {
        cookies.push(flash::removal_cookie(RETURN_TO_COOKIE));
    }

    Ok(redirect_with_cookies(DEFAULT_LANDING, cookies))
}

/// Ends the session server-side, so the old cookie value no longer signs anyone in.
#[get("/signout")]
pub async fn signout(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        state.users.revoke(cookie.value()).await?;
    }
    log::info!("User {} signed out", user.username);
    Ok(redirect_with_cookies(
        "/",
        vec![
            flash::removal_cookie(SESSION_COOKIE),
            flash::notice_cookie(FlashKind::Success, "Logged out"),
        ],
    ))
}

async fn open_session(state: &AppState, user: &User) -> Result<Cookie<'static>, AppError> {
    let token = state.users.serialize(user).await?;
    Ok(session_cookie(token, state.users.session_keys().ttl()))
}
