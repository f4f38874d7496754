//! PostgreSQL backend.
//!
//! Queries are checked at runtime (`query_as`) so the crate builds without a
//! live database. The schema lives in `migrations/` and is applied by
//! [`PgStore::migrate`].

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ProjectStore, Store, TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{Project, ProjectStatus, Task, TaskStatus, User};

const PROJECT_COLUMNS: &str = "id, title, description, status, user_id, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, title, description, status, project_id, user_id, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))
    }
}

/// Builds an `ILIKE` pattern matching `needle` anywhere, with wildcards escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, name, email, password_hash, created_at, updated_at",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::BadRequest(_) => AppError::BadRequest("Email already registered".into()),
            other => other,
        })
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn insert_project(&self, project: &Project) -> Result<Project, AppError> {
        let sql = format!(
            "INSERT INTO projects ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {cols}",
            cols = PROJECT_COLUMNS
        );
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(project.id)
            .bind(&project.title)
            .bind(&project.description)
            .bind(project.status)
            .bind(project.user_id)
            .bind(project.created_at)
            .bind(project.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(project)
    }

    async fn find_project(&self, user_id: Uuid, id: Uuid) -> Result<Option<Project>, AppError> {
        let sql = format!(
            "SELECT {} FROM projects WHERE id = $1 AND user_id = $2",
            PROJECT_COLUMNS
        );
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn list_projects(
        &self,
        user_id: Uuid,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, AppError> {
        let mut sql = format!("SELECT {} FROM projects WHERE user_id = $1", PROJECT_COLUMNS);
        if status.is_some() {
            sql.push_str(" AND status = $2");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, Project>(&sql).bind(user_id);
        if let Some(status) = status {
            query = query.bind(status);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn update_project(&self, project: &Project) -> Result<Project, AppError> {
        let sql = format!(
            "UPDATE projects SET title = $1, description = $2, status = $3, updated_at = $4
             WHERE id = $5 AND user_id = $6
             RETURNING {}",
            PROJECT_COLUMNS
        );
        sqlx::query_as::<_, Project>(&sql)
            .bind(&project.title)
            .bind(&project.description)
            .bind(project.status)
            .bind(project.updated_at)
            .bind(project.id)
            .bind(project.user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn delete_project(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, task: &Task) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {cols}",
            cols = TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.project_id)
            .bind(task.user_id)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn find_task(&self, user_id: Uuid, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list_tasks_by_project(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE project_id = $1 AND user_id = $2 ORDER BY updated_at DESC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(project_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn search_tasks(
        &self,
        user_id: Uuid,
        needle: &str,
        project_ids: &[Uuid],
    ) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks
             WHERE user_id = $1
               AND (title ILIKE $2 OR description ILIKE $2 OR project_id = ANY($3))
             ORDER BY updated_at DESC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .bind(contains_pattern(needle))
            .bind(project_ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn update_task(&self, task: &Task) -> Result<Task, AppError> {
        let sql = format!(
            "UPDATE tasks SET title = $1, description = $2, status = $3, updated_at = $4
             WHERE id = $5 AND user_id = $6
             RETURNING {}",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.updated_at)
            .bind(task.id)
            .bind(task.user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    async fn set_project_tasks_status(
        &self,
        project_id: Uuid,
        status: TaskStatus,
    ) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE tasks SET status = $1, updated_at = NOW() WHERE project_id = $2")
                .bind(status)
                .bind(project_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn delete_task(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_project_tasks(&self, project_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("report"), "%report%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
