//! Project lifecycle: owner-scoped CRUD and the `active -> completed`
//! transition.
//!
//! Both cascades (completion marking tasks done, deletion removing tasks) are
//! two sequential store calls with no transaction around them. If the second
//! call fails the first stays applied and the caller gets `AppError::Internal`.

use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::project::non_blank_title;
use crate::models::{Project, ProjectInput, ProjectStatus, ProjectUpdate, TaskStatus};
use crate::store::Store;

fn not_found() -> AppError {
    AppError::NotFound("Project not found".into())
}

pub async fn create(
    store: &dyn Store,
    user_id: Uuid,
    input: ProjectInput,
) -> Result<Project, AppError> {
    input.validate()?;
    non_blank_title(&input.title)?;
    store.insert_project(&Project::new(input, user_id)).await
}

pub async fn list(
    store: &dyn Store,
    user_id: Uuid,
    status: Option<ProjectStatus>,
) -> Result<Vec<Project>, AppError> {
    store.list_projects(user_id, status).await
}

pub async fn get(store: &dyn Store, user_id: Uuid, project_id: Uuid) -> Result<Project, AppError> {
    store
        .find_project(user_id, project_id)
        .await?
        .ok_or_else(not_found)
}

/// Partial edit of title and description. Completed projects are frozen.
pub async fn update(
    store: &dyn Store,
    user_id: Uuid,
    project_id: Uuid,
    changes: ProjectUpdate,
) -> Result<Project, AppError> {
    changes.validate()?;
    let mut project = get(store, user_id, project_id).await?;
    project.apply(changes)?;
    store.update_project(&project).await
}

/// Marks the project completed, then every task of the project done.
pub async fn complete(
    store: &dyn Store,
    user_id: Uuid,
    project_id: Uuid,
) -> Result<Project, AppError> {
    let mut project = get(store, user_id, project_id).await?;
    project.complete()?;
    let project = store.update_project(&project).await?;

    let touched = store
        .set_project_tasks_status(project.id, TaskStatus::Done)
        .await
        .map_err(|e| {
            AppError::Internal(format!(
                "Project {} completed but its tasks were not updated: {}",
                project.id, e
            ))
        })?;

    log::info!("Completed project {} ({} tasks marked done)", project.id, touched);
    Ok(project)
}

/// Removes the project, then every task that references it.
pub async fn delete(store: &dyn Store, user_id: Uuid, project_id: Uuid) -> Result<(), AppError> {
    if !store.delete_project(user_id, project_id).await? {
        return Err(not_found());
    }

    let removed = store.delete_project_tasks(project_id).await.map_err(|e| {
        AppError::Internal(format!(
            "Project {} deleted but its tasks were not removed: {}",
            project_id, e
        ))
    })?;

    log::info!("Deleted project {} and {} tasks", project_id, removed);
    Ok(())
}
