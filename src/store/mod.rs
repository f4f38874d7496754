//! Storage seams for users, projects and tasks.
//!
//! The lifecycle services only talk to these traits. Two backends implement all
//! of them: [`MemoryStore`] for tests and database-less runs, and [`PgStore`]
//! for PostgreSQL. Every owner-scoped method takes the caller's user id and must
//! filter on it; a document owned by someone else is reported as absent.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Project, ProjectStatus, Task, TaskStatus, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// `email` is expected to be normalized already.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with `BadRequest` if the email is taken.
    async fn insert_user(&self, user: &User) -> Result<User, AppError>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn insert_project(&self, project: &Project) -> Result<Project, AppError>;

    async fn find_project(&self, user_id: Uuid, id: Uuid) -> Result<Option<Project>, AppError>;

    /// Newest first.
    async fn list_projects(
        &self,
        user_id: Uuid,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, AppError>;

    /// Persists title, description, status and `updated_at` of an existing
    /// project. Fails with `NotFound` if it vanished in the meantime.
    async fn update_project(&self, project: &Project) -> Result<Project, AppError>;

    /// Returns whether a project was removed.
    async fn delete_project(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: &Task) -> Result<Task, AppError>;

    async fn find_task(&self, user_id: Uuid, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Most recently updated first.
    async fn list_tasks_by_project(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Vec<Task>, AppError>;

    /// Tasks of `user_id` whose title or description contains `needle`
    /// (case-insensitive), or whose project is in `project_ids`.
    /// Most recently updated first.
    async fn search_tasks(
        &self,
        user_id: Uuid,
        needle: &str,
        project_ids: &[Uuid],
    ) -> Result<Vec<Task>, AppError>;

    /// Persists title, description, status and `updated_at` of an existing task.
    async fn update_task(&self, task: &Task) -> Result<Task, AppError>;

    /// Sets the status of every task of the project. Returns the number touched.
    async fn set_project_tasks_status(
        &self,
        project_id: Uuid,
        status: TaskStatus,
    ) -> Result<u64, AppError>;

    async fn delete_task(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;

    /// Removes every task of the project. Returns the number removed.
    async fn delete_project_tasks(&self, project_id: Uuid) -> Result<u64, AppError>;
}

/// Everything the application needs from a backend.
pub trait Store: UserStore + ProjectStore + TaskStore {
    /// Short backend name, reported by the health check.
    fn backend(&self) -> &'static str;
}
