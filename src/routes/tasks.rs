use crate::{
    auth::{AuthenticatedUser, Flash, FlashKind},
    error::AppError,
    models::TaskInput,
    routes::{redirect, redirect_with_notice},
    state::AppState,
    views,
};
use actix_web::{get, post, web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

const TODO_PAGE: &str = "/todo";

/// Lists the current user's tasks.
///
/// ## Responses:
/// - `200 OK`: the todo page with `todo_tasks`, `total_todos` and `username`.
/// - `302 Found` to `/signin`: when no one is signed in.
/// - `500 Internal Server Error`: if the tasks cannot be loaded.
#[get("/todo")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    flash: Flash,
) -> Result<HttpResponse, AppError> {
    let total_todos = state.tasks.count(&user.username).await;
    let todo_tasks = state.tasks.list(&user.username).await?;

    views::render(
        "todo",
        Some(&user.0),
        &flash,
        json!({
            "todo_tasks": todo_tasks,
            "total_todos": total_todos,
            "username": user.username,
        }),
    )
}

/// Creates a task from the `content` form field.
///
/// Blank content creates nothing and returns to the list with a notice.
#[post("/new")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    form: web::Form<TaskInput>,
) -> Result<HttpResponse, AppError> {
    match state.tasks.create(&user.username, &form.content).await {
        Ok(_) => Ok(redirect(TODO_PAGE)),
        Err(AppError::ValidationError(msg)) => {
            Ok(redirect_with_notice(TODO_PAGE, FlashKind::Error, &msg))
        }
        Err(e) => Err(e),
    }
}

/// Replaces the content of one of the current user's tasks.
///
/// ## Responses:
/// - `302 Found` to `/todo`: on success, or with a notice when the content is blank.
/// - `404 Not Found`: the id is malformed, unknown, or belongs to another user.
#[post("/edit/{id}")]
pub async fn edit_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    form: web::Form<TaskInput>,
) -> Result<HttpResponse, AppError> {
    match state
        .tasks
        .update(task_id.into_inner(), &user.username, &form.content)
        .await
    {
        Ok(_) => Ok(redirect(TODO_PAGE)),
        Err(AppError::ValidationError(msg)) => {
            Ok(redirect_with_notice(TODO_PAGE, FlashKind::Error, &msg))
        }
        Err(e) => Err(e),
    }
}

/// Deletes one of the current user's tasks. Unknown or foreign ids are a 404.
#[get("/remove/{id}")]
pub async fn remove_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state
        .tasks
        .delete(task_id.into_inner(), &user.username)
        .await?;
    Ok(redirect(TODO_PAGE))
}

/// Deletes all of the current user's tasks.
#[post("/removeall")]
pub async fn remove_all_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.tasks.delete_all(&user.username).await?;
    Ok(redirect(TODO_PAGE))
}
