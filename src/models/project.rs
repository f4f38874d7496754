use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Lifecycle state of a project.
/// Corresponds to the `project_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Open for edits. Every project starts here.
    #[default]
    Active,
    /// Terminal. Title and description are frozen.
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProjectStatus::Active),
            "completed" => Ok(ProjectStatus::Completed),
            other => Err(AppError::Validation(format!(
                "Invalid project status '{}': expected active or completed",
                other
            ))),
        }
    }
}

/// Represents a project as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    /// Owner of the project.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /projects`.
#[derive(Debug, Deserialize, Validate)]
pub struct ProjectInput {
    /// Must be between 1 and 200 characters and not blank.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Body of `PUT /projects/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProjectUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// `null` clears the description.
    #[serde(default, deserialize_with = "super::nullable")]
    #[validate(length(max = 1000))]
    pub description: Option<Option<String>>,
}

/// Query string of `GET /projects`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub status: Option<String>,
}

impl Project {
    /// Creates an active project owned by `user_id`.
    pub fn new(input: ProjectInput, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title.trim().to_string(),
            description: input.description,
            status: ProjectStatus::Active,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProjectStatus::Completed
    }

    /// Applies a partial edit. Completed projects are immutable.
    pub fn apply(&mut self, changes: ProjectUpdate) -> Result<(), AppError> {
        if self.is_completed() {
            return Err(AppError::InvalidState(
                "A completed project cannot be edited".into(),
            ));
        }
        if let Some(title) = changes.title {
            self.title = non_blank_title(&title)?;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// The one-way `active -> completed` transition.
    pub fn complete(&mut self) -> Result<(), AppError> {
        if self.is_completed() {
            return Err(AppError::AlreadyCompleted(
                "Project is already completed".into(),
            ));
        }
        self.status = ProjectStatus::Completed;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Rejects titles made only of whitespace; returns the trimmed title.
pub(crate) fn non_blank_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    Ok(trimmed.to_string())
}
