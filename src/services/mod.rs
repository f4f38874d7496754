//! Lifecycle services. Every function takes the store and, where a resource is
//! involved, the authenticated user id that scopes it.

pub mod accounts;
pub mod projects;
pub mod tasks;
