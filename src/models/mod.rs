pub mod project;
pub mod task;
pub mod user;

pub use project::{Project, ProjectInput, ProjectQuery, ProjectStatus, ProjectUpdate};
pub use task::{
    NewTask, SearchQuery, StatusUpdate, Task, TaskInput, TaskStatus, TaskUpdate, TaskWithProject,
};
pub use user::User;

use serde::{Deserialize, Deserializer};

/// For `Option<Option<T>>` fields marked `#[serde(default)]`: an absent field
/// stays `None`, an explicit `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
