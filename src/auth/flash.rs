//! One-shot notices and the post-login return path, both carried in cookies across a redirect.

use actix_web::cookie::{time, Cookie};
use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;
use std::future::{ready, Ready};

pub const FLASH_SUCCESS_COOKIE: &str = "flash_success";
pub const FLASH_ERROR_COOKIE: &str = "flash_error";
pub const RETURN_TO_COOKIE: &str = "return_to";

/// How long a remembered return path stays usable.
const RETURN_TO_TTL_MINUTES: i64 = 10;

/// Protected pages that are safe to reopen after sign-in. Everything else reachable by GET
/// (`/signout`, `/remove/{id}`) changes state and must not be replayed.
const RETURNABLE_PAGES: &[&str] = &["/todo"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    pub fn cookie_name(self) -> &'static str {
        match self {
            FlashKind::Success => FLASH_SUCCESS_COOKIE,
            FlashKind::Error => FLASH_ERROR_COOKIE,
        }
    }
}

/// Notices that arrived with the current request.
///
/// The session middleware reads them into the request extensions and expires the cookies on
/// the way out, so each notice is shown at most once.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl Flash {
    pub fn from_cookies(req: &HttpRequest) -> Self {
        let read = |name: &str| {
            req.cookie(name)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            success: read(FLASH_SUCCESS_COOKIE),
            error: read(FLASH_ERROR_COOKIE),
        }
    }

    /// Cookie names that must be expired once this request has been answered.
    pub fn consumed_cookies(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.success.is_some() {
            names.push(FLASH_SUCCESS_COOKIE);
        }
        if self.error.is_some() {
            names.push(FLASH_ERROR_COOKIE);
        }
        names
    }
}

impl FromRequest for Flash {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let flash = req.extensions().get::<Flash>().cloned();
        ready(Ok(flash.unwrap_or_else(|| Flash::from_cookies(req))))
    }
}

pub fn notice_cookie(kind: FlashKind, message: &str) -> Cookie<'static> {
    Cookie::build(kind.cookie_name(), message.to_string())
        .path("/")
        .http_only(true)
        .finish()
}

/// Remembers `path` for one redirect after sign-in. Only local, returnable pages are kept.
pub fn return_to_cookie(path: &str) -> Option<Cookie<'static>> {
    if !is_local_path(path) || !is_returnable(path) {
        return None;
    }
    Some(
        Cookie::build(RETURN_TO_COOKIE, path.to_string())
            .path("/")
            .http_only(true)
            .max_age(time::Duration::minutes(RETURN_TO_TTL_MINUTES))
            .finish(),
    )
}

/// True when the path part of `path_and_query` is a read-only page worth returning to.
pub fn is_returnable(path_and_query: &str) -> bool {
    let path = path_and_query.split(['?', '#']).next().unwrap_or_default();
    RETURNABLE_PAGES.contains(&path)
}

/// A cookie that tells the browser to drop `name`.
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// True for same-site absolute paths such as `/todo`; rejects `//host` and full URLs.
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
