use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{ProjectInput, ProjectQuery, ProjectStatus, ProjectUpdate},
    services::projects,
    store::Store,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// Lists the caller's projects, newest first.
///
/// ## Query Parameters:
/// - `status` (optional): `active` or `completed`.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Project`.
/// - `400 Bad Request`: unknown status value.
#[get("")]
pub async fn list_projects(
    store: web::Data<dyn Store>,
    query: web::Query<ProjectQuery>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ProjectStatus>)
        .transpose()?;
    let projects = projects::list(store.get_ref(), user.0, status).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// Creates an active project owned by the caller.
///
/// ## Responses:
/// - `201 Created`: the new `Project`.
/// - `400 Bad Request`: missing or blank title.
#[post("")]
pub async fn create_project(
    store: web::Data<dyn Store>,
    project_data: web::Json<ProjectInput>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let project = projects::create(store.get_ref(), user.0, project_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(project))
}

/// Retrieves one of the caller's projects.
///
/// ## Responses:
/// - `200 OK`: the `Project`.
/// - `404 Not Found`: absent or owned by someone else.
#[get("/{id}")]
pub async fn get_project(
    store: web::Data<dyn Store>,
    project_id: web::Path<Uuid>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let project = projects::get(store.get_ref(), user.0, project_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

/// Partially updates title and/or description.
///
/// ## Responses:
/// - `200 OK`: the updated `Project`.
/// - `400 Bad Request`: the project is completed, or the input is invalid.
/// - `404 Not Found`: absent or owned by someone else.
#[put("/{id}")]
pub async fn update_project(
    store: web::Data<dyn Store>,
    project_id: web::Path<Uuid>,
    project_data: web::Json<ProjectUpdate>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let project = projects::update(
        store.get_ref(),
        user.0,
        project_id.into_inner(),
        project_data.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(project))
}

/// Completes the project and marks all its tasks done.
///
/// ## Responses:
/// - `200 OK`: the completed `Project`.
/// - `400 Bad Request`: already completed.
/// - `404 Not Found`: absent or owned by someone else.
#[patch("/{id}/complete")]
pub async fn complete_project(
    store: web::Data<dyn Store>,
    project_id: web::Path<Uuid>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let project = projects::complete(store.get_ref(), user.0, project_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

/// Deletes the project and all its tasks.
#[delete("/{id}")]
pub async fn delete_project(
    store: web::Data<dyn Store>,
    project_id: web::Path<Uuid>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    projects::delete(store.get_ref(), user.0, project_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Project and its tasks deleted"
    })))
}
