use actix_web::dev::Payload;
use actix_web::http::Method;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use std::ops::Deref;

use crate::auth::flash;
use crate::error::AppError;
use crate::models::User;

/// The signed-in user, attached to the request by `SessionMiddleware`.
///
/// Taking this extractor is what makes a handler protected: when no user is attached the
/// handler never runs and the request is answered with `AppError::LoginRequired`, which
/// redirects to `/signin`. Use `Option<AuthenticatedUser>` on public pages.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl Deref for AuthenticatedUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                // Only read pages are worth coming back to after sign-in.
                let return_to = match req.uri().path_and_query() {
                    Some(pq)
                        if *req.method() == Method::GET && flash::is_returnable(pq.as_str()) =>
                    {
                        pq.as_str().to_string()
                    }
                    _ => String::new(),
                };
                ready(Err(AppError::LoginRequired(return_to).into()))
            }
        }
    }
}
