//! Task lifecycle: owner-scoped CRUD, search, and the free three-state status.

use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::project::non_blank_title;
use crate::models::{NewTask, Task, TaskStatus, TaskUpdate, TaskWithProject};
use crate::store::Store;

fn not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Creates a task under a project owned by `user_id`.
pub async fn create(store: &dyn Store, user_id: Uuid, input: NewTask) -> Result<Task, AppError> {
    non_blank_title(&input.title)?;
    if store.find_project(user_id, input.project_id).await?.is_none() {
        return Err(AppError::NotFound("Project not found".into()));
    }
    store.insert_task(&Task::new(input, user_id)).await
}

/// Tasks of one project, most recently updated first. Unknown projects yield
/// an empty list.
pub async fn list_by_project(
    store: &dyn Store,
    user_id: Uuid,
    project_id: Uuid,
) -> Result<Vec<Task>, AppError> {
    store.list_tasks_by_project(user_id, project_id).await
}

/// Case-insensitive search over task title, task description and parent
/// project title. Each hit carries its project's title.
pub async fn search(
    store: &dyn Store,
    user_id: Uuid,
    query: &str,
) -> Result<Vec<TaskWithProject>, AppError> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(AppError::Validation("Search query is required".into()));
    }

    let titles: HashMap<Uuid, String> = store
        .list_projects(user_id, None)
        .await?
        .into_iter()
        .map(|p| (p.id, p.title))
        .collect();
    let matching_projects: Vec<Uuid> = titles
        .iter()
        .filter(|(_, title)| title.to_lowercase().contains(&needle))
        .map(|(id, _)| *id)
        .collect();

    let tasks = store
        .search_tasks(user_id, &needle, &matching_projects)
        .await?;

    Ok(tasks
        .into_iter()
        .map(|task| TaskWithProject {
            project_title: titles.get(&task.project_id).cloned(),
            task,
        })
        .collect())
}

pub async fn update(
    store: &dyn Store,
    user_id: Uuid,
    task_id: Uuid,
    changes: TaskUpdate,
) -> Result<Task, AppError> {
    changes.validate()?;
    let mut task = store.find_task(user_id, task_id).await?.ok_or_else(not_found)?;
    task.apply(changes)?;
    store.update_task(&task).await
}

/// Overwrites the status. Setting the current status changes nothing.
pub async fn update_status(
    store: &dyn Store,
    user_id: Uuid,
    task_id: Uuid,
    status: TaskStatus,
) -> Result<Task, AppError> {
    let mut task = store.find_task(user_id, task_id).await?.ok_or_else(not_found)?;
    if !task.set_status(status) {
        return Ok(task);
    }
    store.update_task(&task).await
}

pub async fn delete(store: &dyn Store, user_id: Uuid, task_id: Uuid) -> Result<(), AppError> {
    if store.delete_task(user_id, task_id).await? {
        Ok(())
    } else {
        Err(not_found())
    }
}
