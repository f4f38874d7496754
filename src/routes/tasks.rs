use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{SearchQuery, StatusUpdate, TaskInput, TaskStatus, TaskUpdate},
    services::tasks,
    store::Store,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// Creates a task under one of the caller's projects.
///
/// ## Request Body:
/// - `projectId`: the parent project (required, must be owned by the caller).
/// - `title`: required.
/// - `description` (optional).
/// - `status` (optional): `todo`, `in_progress` or `done`. Defaults to `todo`.
///
/// ## Responses:
/// - `201 Created`: `{ "message": ..., "task": Task }`.
/// - `400 Bad Request`: invalid input or status.
/// - `404 Not Found`: the project is absent or owned by someone else.
#[post("")]
pub async fn create_task(
    store: web::Data<dyn Store>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let new_task = task_data.into_inner().into_new_task()?;
    let task = tasks::create(store.get_ref(), user.0, new_task).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Task created",
        "task": task
    })))
}

/// Lists the caller's tasks of one project, most recently updated first.
#[get("/project/{project_id}")]
pub async fn list_project_tasks(
    store: web::Data<dyn Store>,
    project_id: web::Path<Uuid>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks = tasks::list_by_project(store.get_ref(), user.0, project_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Searches the caller's tasks by title, description, or project title.
///
/// ## Query Parameters:
/// - `query`: required, non-blank, matched case-insensitively.
///
/// ## Responses:
/// - `200 OK`: JSON array of tasks, each with `projectTitle`.
/// - `400 Bad Request`: missing or blank query.
#[get("/search")]
pub async fn search_tasks(
    store: web::Data<dyn Store>,
    query: web::Query<SearchQuery>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let needle = query.query.as_deref().unwrap_or_default();
    let hits = tasks::search(store.get_ref(), user.0, needle).await?;
    Ok(HttpResponse::Ok().json(hits))
}

/// Partially updates title and/or description. Status is not touched.
#[put("/{task_id}")]
pub async fn update_task(
    store: web::Data<dyn Store>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task = tasks::update(
        store.get_ref(),
        user.0,
        task_id.into_inner(),
        task_data.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Sets the task status to any of `todo`, `in_progress`, `done`.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: unknown status (checked before the lookup).
/// - `404 Not Found`: absent or owned by someone else.
#[patch("/{task_id}/status")]
pub async fn update_task_status(
    store: web::Data<dyn Store>,
    task_id: web::Path<Uuid>,
    status_data: web::Json<StatusUpdate>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let status: TaskStatus = status_data.status.parse()?;
    let task = tasks::update_status(store.get_ref(), user.0, task_id.into_inner(), status).await?;
    Ok(HttpResponse::Ok().json(task))
}

#[delete("/{task_id}")]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    tasks::delete(store.get_ref(), user.0, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}
