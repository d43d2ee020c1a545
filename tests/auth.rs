mod common;

use actix_web::http::StatusCode;
use common::{init_app, test_state, Browser};
use pretty_assertions::assert_eq;
use todoforge::auth::{flash::RETURN_TO_COOKIE, SESSION_COOKIE};

#[actix_rt::test]
async fn test_register_sign_out_and_sign_in_flow() {
    let app = init_app(test_state()).await;
    let mut browser = Browser::new();

    let page = browser.sign_up(&app, "alice", "a@x.com", "pw123").await;
    page.assert_redirect("/todo");
    assert!(browser.has_cookie(SESSION_COOKIE));

    let page = browser.get(&app, "/todo").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Welcome to TodoList"));
    assert!(page.body.contains("alice"));

    // The welcome notice is shown once.
    let page = browser.get(&app, "/todo").await;
    assert!(!page.body.contains("Welcome to TodoList"));

    let page = browser.get(&app, "/signout").await;
    page.assert_redirect("/");
    assert!(!browser.has_cookie(SESSION_COOKIE));

    let page = browser.get(&app, "/").await;
    assert!(page.body.contains("Logged out"));

    browser.get(&app, "/todo").await.assert_redirect("/signin");

    let page = browser.sign_in(&app, "alice", "pw123").await;
    page.assert_redirect("/todo");
    assert!(browser.has_cookie(SESSION_COOKIE));
    assert_eq!(browser.get(&app, "/todo").await.status, StatusCode::OK);
}

#[actix_rt::test]
async fn test_signed_out_session_cannot_be_replayed() {
    let app = init_app(test_state()).await;
    let mut browser = Browser::new();
    browser.sign_up(&app, "alice", "a@x.com", "pw123").await;
    let token = browser.cookie(SESSION_COOKIE).unwrap();

    // A second login stays open after the first one ends.
    let mut laptop = Browser::new();
    laptop.sign_in(&app, "alice", "pw123").await;

    browser.get(&app, "/signout").await.assert_redirect("/");

    let mut replay = Browser::new();
    replay.set_cookie(SESSION_COOKIE, &token);
    replay.get(&app, "/todo").await.assert_redirect("/signin");
    assert!(!replay.has_cookie(SESSION_COOKIE));

    assert_eq!(laptop.get(&app, "/todo").await.status, StatusCode::OK);
}

#[actix_rt::test]
async fn test_wrong_password_creates_no_session() {
    let app = init_app(test_state()).await;

    let mut registrar = Browser::new();
    registrar.sign_up(&app, "alice", "a@x.com", "pw123").await;

    let mut browser = Browser::new();
    let page = browser.sign_in(&app, "alice", "not-the-password").await;
    page.assert_redirect("/signin");
    assert!(!browser.has_cookie(SESSION_COOKIE));

    let page = browser.get(&app, "/signin").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Password or username is incorrect"));

    browser.get(&app, "/todo").await.assert_redirect("/signin");
}

#[actix_rt::test]
async fn test_duplicate_registration_is_reported() {
    let app = init_app(test_state()).await;

    Browser::new()
        .sign_up(&app, "alice", "a@x.com", "pw123")
        .await
        .assert_redirect("/todo");

    let mut browser = Browser::new();
    let page = browser.sign_up(&app, "alice", "other@x.com", "pw456").await;
    page.assert_redirect("/signin");
    assert!(!browser.has_cookie(SESSION_COOKIE));

    let page = browser.get(&app, "/signin").await;
    assert!(page
        .body
        .contains("A user with the given username is already registered"));
}

#[actix_rt::test]
async fn test_invalid_registration_is_reported() {
    let app = init_app(test_state()).await;
    let mut browser = Browser::new();

    let page = browser.sign_up(&app, "alice", "not-an-email", "pw123").await;
    page.assert_redirect("/signin");

    let page = browser.get(&app, "/signin").await;
    assert!(page.body.contains("Please enter a valid email address"));
}

#[actix_rt::test]
async fn test_protected_paths_redirect_anonymous_users() {
    let state = test_state();
    let app = init_app(state.clone()).await;

    Browser::new().sign_up(&app, "alice", "a@x.com", "pw123").await;
    let task = state.tasks.create("alice", "buy milk").await.unwrap();

    let mut anonymous = Browser::new();
    anonymous.get(&app, "/todo").await.assert_redirect("/signin");
    anonymous.get(&app, "/signout").await.assert_redirect("/signin");
    anonymous
        .get(&app, &format!("/remove/{}", task.id))
        .await
        .assert_redirect("/signin");
    anonymous
        .post(&app, &format!("/edit/{}", task.id), &[("content", "hijacked")])
        .await
        .assert_redirect("/signin");
    anonymous
        .post(&app, "/new", &[("content", "sneaky")])
        .await
        .assert_redirect("/signin");
    anonymous
        .post(&app, "/removeall", &[("confirm", "yes")])
        .await
        .assert_redirect("/signin");

    let tasks = state.tasks.list("alice").await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].content, "buy milk");

    let page = anonymous.get(&app, "/signin").await;
    assert!(page.body.contains("You must be signed in first!"));
}

#[actix_rt::test]
async fn test_sign_in_returns_to_requested_page_once() {
    let app = init_app(test_state()).await;
    Browser::new().sign_up(&app, "alice", "a@x.com", "pw123").await;

    let mut browser = Browser::new();
    browser
        .get(&app, "/todo?view=all")
        .await
        .assert_redirect("/signin");
    assert!(browser.has_cookie(RETURN_TO_COOKIE));

    browser
        .sign_in(&app, "alice", "pw123")
        .await
        .assert_redirect("/todo?view=all");
    assert!(!browser.has_cookie(RETURN_TO_COOKIE));

    browser.get(&app, "/signout").await;
    browser
        .sign_in(&app, "alice", "pw123")
        .await
        .assert_redirect("/todo");
}

#[actix_rt::test]
async fn test_state_changing_links_are_not_replayed_after_sign_in() {
    let state = test_state();
    let app = init_app(state.clone()).await;
    Browser::new().sign_up(&app, "alice", "a@x.com", "pw123").await;
    let task = state.tasks.create("alice", "buy milk").await.unwrap();

    let mut browser = Browser::new();
    browser.get(&app, "/signout").await.assert_redirect("/signin");
    assert!(!browser.has_cookie(RETURN_TO_COOKIE));
    browser
        .sign_in(&app, "alice", "pw123")
        .await
        .assert_redirect("/todo");
    assert_eq!(browser.get(&app, "/todo").await.status, StatusCode::OK);

    let mut browser = Browser::new();
    browser
        .get(&app, &format!("/remove/{}", task.id))
        .await
        .assert_redirect("/signin");
    browser
        .sign_in(&app, "alice", "pw123")
        .await
        .assert_redirect("/todo");
    assert_eq!(state.tasks.count("alice").await, 1);
}

#[actix_rt::test]
async fn test_sign_up_clears_remembered_path() {
    let app = init_app(test_state()).await;
    let mut browser = Browser::new();

    browser.get(&app, "/todo").await.assert_redirect("/signin");
    assert!(browser.has_cookie(RETURN_TO_COOKIE));

    browser
        .sign_up(&app, "alice", "a@x.com", "pw123")
        .await
        .assert_redirect("/todo");
    assert!(!browser.has_cookie(RETURN_TO_COOKIE));
}

#[actix_rt::test]
async fn test_foreign_return_path_is_ignored() {
    let app = init_app(test_state()).await;
    Browser::new().sign_up(&app, "alice", "a@x.com", "pw123").await;

    let mut browser = Browser::new();
    browser.set_cookie(RETURN_TO_COOKIE, "//evil.example.com");
    browser
        .sign_in(&app, "alice", "pw123")
        .await
        .assert_redirect("/todo");
}

#[actix_rt::test]
async fn test_tampered_session_is_discarded() {
    let app = init_app(test_state()).await;
    let mut browser = Browser::new();
    browser.set_cookie(SESSION_COOKIE, "not-a-valid-token");

    browser.get(&app, "/todo").await.assert_redirect("/signin");
    assert!(!browser.has_cookie(SESSION_COOKIE));
}

#[actix_rt::test]
async fn test_unknown_route_renders_not_found_page() {
    let app = init_app(test_state()).await;
    let mut browser = Browser::new();

    let page = browser.get(&app, "/does/not/exist").await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("Page Not Found"));

    let page = browser.post(&app, "/nope", &[("a", "b")]).await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
}
