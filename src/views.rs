//! Server-rendered pages.
//!
//! Templates are embedded at compile time and registered once in a process-wide
//! Handlebars registry, so the error boundary can render pages without request state.

use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use handlebars::Handlebars;
use lazy_static::lazy_static;
use serde_json::{json, Value};

use crate::auth::Flash;
use crate::error::AppError;
use crate::models::User;

const PARTIALS: &[(&str, &str)] = &[
    ("header", include_str!("../templates/partials/header.hbs")),
    ("footer", include_str!("../templates/partials/footer.hbs")),
];

const TEMPLATES: &[(&str, &str)] = &[
    ("home", include_str!("../templates/home.hbs")),
    ("signin", include_str!("../templates/signin.hbs")),
    ("signup", include_str!("../templates/signup.hbs")),
    ("todo", include_str!("../templates/todo.hbs")),
    ("error", include_str!("../templates/error.hbs")),
];

lazy_static! {
    static ref REGISTRY: Handlebars<'static> = {
        let mut registry = Handlebars::new();
        for (name, source) in PARTIALS {
            registry.register_partial(name, *source).unwrap();
        }
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, *source).unwrap();
        }
        registry
    };
}

/// Renders `template` with the layout fields every page needs plus the page's own `data`.
pub fn render(
    template: &str,
    user: Option<&User>,
    flash: &Flash,
    data: Value,
) -> Result<HttpResponse, AppError> {
    let mut context = json!({
        "current_user": user.map(|u| u.username.as_str()),
        "success": flash.success,
        "error": flash.error,
    });
    if let (Some(context), Value::Object(data)) = (context.as_object_mut(), data) {
        context.extend(data);
    }

    let body = REGISTRY.render(template, &context)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

/// The generic error page. Falls back to plain text if the template cannot be rendered.
pub fn error_page(status: StatusCode, message: &str) -> HttpResponse {
    let context = json!({
        "status_code": status.as_u16(),
        "message": message,
    });
    match REGISTRY.render("error", &context) {
        Ok(body) => HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(body),
        Err(e) => {
            log::error!("Failed to render error page: {}", e);
            HttpResponse::build(status)
                .content_type(ContentType::plaintext())
                .body(format!("{} {}", status.as_u16(), message))
        }
    }
}
