pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use crate::error::AppError;
use actix_web::web;

/// Registers every API scope. Extractor failures are folded into `AppError`
/// so all error bodies share the `{"error": ...}` shape.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid request body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid query string: {err}")).into()
    }))
    // a path segment that is not a UUID cannot name an existing resource
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Resource not found".into()).into()),
    )
    .service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::me),
    )
    .service(
        web::scope("/projects")
            .service(projects::list_projects)
            .service(projects::create_project)
            .service(projects::complete_project)
            .service(projects::get_project)
            .service(projects::update_project)
            .service(projects::delete_project),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::search_tasks)
            .service(tasks::list_project_tasks)
            .service(tasks::create_task)
            .service(tasks::update_task_status)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
