//! Shared helpers for the integration tests.
//!
//! Every test drives the full application (session middleware, routes, error boundary)
//! against a fresh in-memory repository. `Browser` plays the part of a cookie-keeping client.

#![allow(dead_code)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    test, web, App,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use todoforge::{auth::SessionMiddleware, db::MemoryRepository, routes, AppState, Config};

pub fn test_config() -> Config {
    Config {
        database_url: None,
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        session_secret: "integration-test-secret".to_string(),
        bcrypt_cost: 4,
    }
}

pub fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::new(
        Arc::new(MemoryRepository::new()),
        &test_config(),
    ))
}

pub async fn init_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(SessionMiddleware)
            .configure(routes::config),
    )
    .await
}

/// What came back from one request.
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl Page {
    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(self.status, StatusCode::FOUND, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(to));
    }
}

/// Keeps cookies between requests the way a browser would.
#[derive(Debug, Default)]
pub struct Browser {
    cookies: HashMap<String, String>,
}

impl Browser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }

    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub async fn get<S, B>(&mut self, app: &S, uri: &str) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = test::TestRequest::get().uri(uri);
        self.send(app, req).await
    }

    pub async fn post<S, B>(&mut self, app: &S, uri: &str, form: &impl Serialize) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = test::TestRequest::post().uri(uri).set_form(form);
        self.send(app, req).await
    }

    async fn send<S, B>(&mut self, app: &S, mut req: test::TestRequest) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        for (name, value) in &self.cookies {
            req = req.cookie(Cookie::new(name.clone(), value.clone()));
        }

        let resp = test::call_service(app, req.to_request()).await;

        for cookie in resp.response().cookies() {
            if cookie.value().is_empty() {
                self.cookies.remove(cookie.name());
            } else {
                self.cookies
                    .insert(cookie.name().to_string(), cookie.value().to_string());
            }
        }

        let status = resp.status();
        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = test::read_body(resp).await;

        Page {
            status,
            location,
            body: String::from_utf8_lossy(&body).into_owned(),
        }
    }

    pub async fn sign_up<S, B>(&mut self, app: &S, username: &str, email: &str, password: &str) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.post(
            app,
            "/signup",
            &[("username", username), ("email", email), ("password", password)],
        )
        .await
    }

    pub async fn sign_in<S, B>(&mut self, app: &S, username: &str, password: &str) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.post(
            app,
            "/signin",
            &[("username", username), ("password", password)],
        )
        .await
    }
}

/// The number rendered in the todo page's total counter.
pub fn total_todos(body: &str) -> Option<u64> {
    let start = body.find("id=\"total-todos\">")? + "id=\"total-todos\">".len();
    let end = body[start..].find('<')? + start;
    body[start..end].trim().parse().ok()
}
