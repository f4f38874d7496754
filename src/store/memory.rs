//! In-memory backend.
//!
//! All state lives behind one `tokio::sync::RwLock`. Each call holds the lock
//! for its whole body, so single calls are atomic; sequences of calls are not.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ProjectStore, Store, TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{Project, ProjectStatus, Task, TaskStatus, User};

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_updated_first(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(AppError::BadRequest("Email already registered".into()));
        }
        state.users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn insert_project(&self, project: &Project) -> Result<Project, AppError> {
        let mut state = self.state.write().await;
        state.projects.insert(project.id, project.clone());
        Ok(project.clone())
    }

    async fn find_project(&self, user_id: Uuid, id: Uuid) -> Result<Option<Project>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .get(&id)
            .filter(|p| p.user_id == user_id)
            .cloned())
    }

    async fn list_projects(
        &self,
        user_id: Uuid,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, AppError> {
        let state = self.state.read().await;
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|p| p.user_id == user_id)
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn update_project(&self, project: &Project) -> Result<Project, AppError> {
        let mut state = self.state.write().await;
        match state.projects.get_mut(&project.id) {
            Some(stored) if stored.user_id == project.user_id => {
                stored.title = project.title.clone();
                stored.description = project.description.clone();
                stored.status = project.status;
                stored.updated_at = project.updated_at;
                Ok(stored.clone())
            }
            _ => Err(AppError::NotFound("Project not found".into())),
        }
    }

    async fn delete_project(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let owned = state
            .projects
            .get(&id)
            .map_or(false, |p| p.user_id == user_id);
        if owned {
            state.projects.remove(&id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: &Task) -> Result<Task, AppError> {
        let mut state = self.state.write().await;
        state.tasks.insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn find_task(&self, user_id: Uuid, id: Uuid) -> Result<Option<Task>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .get(&id)
            .filter(|t| t.user_id == user_id)
            .cloned())
    }

    async fn list_tasks_by_project(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Vec<Task>, AppError> {
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| t.user_id == user_id && t.project_id == project_id)
            .cloned()
            .collect();
        newest_updated_first(&mut tasks);
        Ok(tasks)
    }

    async fn search_tasks(
        &self,
        user_id: Uuid,
        needle: &str,
        project_ids: &[Uuid],
    ) -> Result<Vec<Task>, AppError> {
        let needle = needle.to_lowercase();
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .filter(|t| t.matches(&needle) || project_ids.contains(&t.project_id))
            .cloned()
            .collect();
        newest_updated_first(&mut tasks);
        Ok(tasks)
    }

    async fn update_task(&self, task: &Task) -> Result<Task, AppError> {
        let mut state = self.state.write().await;
        match state.tasks.get_mut(&task.id) {
            Some(stored) if stored.user_id == task.user_id => {
                stored.title = task.title.clone();
                stored.description = task.description.clone();
                stored.status = task.status;
                stored.updated_at = task.updated_at;
                Ok(stored.clone())
            }
            _ => Err(AppError::NotFound("Task not found".into())),
        }
    }

    async fn set_project_tasks_status(
        &self,
        project_id: Uuid,
        status: TaskStatus,
    ) -> Result<u64, AppError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut touched = 0;
        for task in state.tasks.values_mut().filter(|t| t.project_id == project_id) {
            task.status = status;
            task.updated_at = now;
            touched += 1;
        }
        Ok(touched)
    }

    async fn delete_task(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let owned = state.tasks.get(&id).map_or(false, |t| t.user_id == user_id);
        if owned {
            state.tasks.remove(&id);
        }
        Ok(owned)
    }

    async fn delete_project_tasks(&self, project_id: Uuid) -> Result<u64, AppError> {
        let mut state = self.state.write().await;
        let before = state.tasks.len();
        state.tasks.retain(|_, t| t.project_id != project_id);
        Ok((before - state.tasks.len()) as u64)
    }
}
