#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Domain models, the storage seam, the project and task lifecycle services,"]
#![doc = "bearer-token authentication, routing and error handling for the Taskboard API."]
#![doc = "The binary (`main.rs`) wires these together from a `Config`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use crate::config::Config;
pub use crate::error::AppError;
