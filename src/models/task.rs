use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::project::non_blank_title;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
///
/// There is no transition graph: any status may follow any other.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Todo,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Invalid status '{}': expected todo, in_progress or done",
                    s
                ))
            })
    }
}

/// Represents a task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// The project this task belongs to.
    pub project_id: Uuid,
    /// Copy of the owning project's `user_id`, taken at creation.
    /// Project ownership never changes, so the copy cannot drift.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /tasks`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub project_id: Uuid,
    /// Must be between 1 and 200 characters and not blank.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// One of `todo`, `in_progress`, `done`. Defaults to `todo`.
    pub status: Option<String>,
}

/// A task creation request that passed validation.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
}

impl TaskInput {
    /// Validates the raw body into a `NewTask`.
    pub fn into_new_task(self) -> Result<NewTask, AppError> {
        self.validate()?;
        let status = match self.status.as_deref() {
            Some(raw) => raw.parse()?,
            None => TaskStatus::default(),
        };
        Ok(NewTask {
            project_id: self.project_id,
            title: non_blank_title(&self.title)?,
            description: self.description,
            status,
        })
    }
}

/// Body of `PUT /tasks/{taskId}`. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// `null` clears the description.
    #[serde(default, deserialize_with = "super::nullable")]
    #[validate(length(max = 1000))]
    pub description: Option<Option<String>>,
}

/// Body of `PATCH /tasks/{taskId}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Query string of `GET /tasks/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// A search hit, decorated with the title of its parent project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithProject {
    #[serde(flatten)]
    pub task: Task,
    pub project_title: Option<String>,
}

impl Task {
    /// Creates a new `Task` owned by `user_id`.
    pub fn new(input: NewTask, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status,
            project_id: input.project_id,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial edit of title and description. Status is untouched.
    pub fn apply(&mut self, changes: TaskUpdate) -> Result<(), AppError> {
        if let Some(title) = changes.title {
            self.title = non_blank_title(&title)?;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Overwrites the status. Returns `false` when the status was already `status`.
    pub fn set_status(&mut self, status: TaskStatus) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.updated_at = Utc::now();
        true
    }

    /// Case-insensitive substring match on title or description.
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(needle))
                .unwrap_or(false)
    }
}
