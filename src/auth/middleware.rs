use actix_web::{
    cookie::Cookie,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::auth::{extractors::AuthenticatedUser, flash, Flash, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the session cookie into an `AuthenticatedUser` and exposes flash notices.
///
/// Runs on every request and never rejects one: gating happens in the
/// `AuthenticatedUser` extractor. On the way out it expires flash cookies that were
/// delivered with this request, and the session cookie if it no longer resolves to a user.
pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let flash = Flash::from_cookies(req.request());
        req.extensions_mut().insert(flash.clone());

        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let mut stale_session = false;
            if let (Some(token), Some(state)) = (token, state) {
                match state.users.deserialize(&token).await {
                    Ok(user) => {
                        req.extensions_mut().insert(AuthenticatedUser(user));
                    }
                    Err(AppError::Unauthorized(reason)) => {
                        log::debug!("Discarding session cookie: {}", reason);
                        stale_session = true;
                    }
                    Err(e) => {
                        log::error!("Failed to load session user: {}", e);
                    }
                }
            }

            let mut res = service.call(req).await?;

            let mut expired: Vec<&'static str> = flash.consumed_cookies();
            if stale_session {
                expired.push(SESSION_COOKIE);
            }
            for name in expired {
                if sets_cookie(&res, name) {
                    continue;
                }
                if let Err(e) = res.response_mut().add_cookie(&flash::removal_cookie(name)) {
                    log::error!("Failed to expire cookie {}: {}", name, e);
                }
            }

            Ok(res)
        })
    }
}

/// Whether the handler already set `name` on this response.
fn sets_cookie<B>(res: &ServiceResponse<B>, name: &str) -> bool {
    res.response()
        .cookies()
        .any(|cookie: Cookie<'_>| cookie.name() == name)
}
