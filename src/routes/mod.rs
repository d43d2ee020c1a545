pub mod auth;
pub mod home;
pub mod tasks;

use actix_web::{
    cookie::Cookie,
    http::header,
    web::{self, FormConfig, PathConfig},
    HttpRequest, HttpResponse,
};

use crate::auth::{flash, FlashKind};
use crate::error::AppError;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(PathConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected path: {}", err);
        AppError::NotFound("Page Not Found".into()).into()
    }))
    .app_data(FormConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Malformed form submission: {}", err)).into()
    }))
    .service(home::index)
    .service(auth::signin_form)
    .service(auth::signin)
    .service(auth::signup_form)
    .service(auth::signup)
    .service(auth::signout)
    .service(tasks::list_tasks)
    .service(tasks::create_task)
    .service(tasks::edit_task)
    .service(tasks::remove_task)
    .service(tasks::remove_all_tasks)
    .default_service(web::route().to(not_found));
}

/// Catch-all for unmatched routes.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    log::debug!("No route for {} {}", req.method(), req.path());
    Err(AppError::NotFound("Page Not Found".into()))
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn redirect_with_cookies(location: &str, cookies: Vec<Cookie<'static>>) -> HttpResponse {
    let mut response = HttpResponse::Found();
    response.insert_header((header::LOCATION, location));
    for cookie in cookies {
        response.cookie(cookie);
    }
    response.finish()
}

/// Redirects and leaves a one-shot notice for the next page.
pub(crate) fn redirect_with_notice(location: &str, kind: FlashKind, message: &str) -> HttpResponse {
    redirect_with_cookies(location, vec![flash::notice_cookie(kind, message)])
}
