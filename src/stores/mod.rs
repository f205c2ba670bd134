//! Stores module
//!
//! State containers behind the dashboard screens. Each wraps the shared
//! [`ApiClient`](crate::api::ApiClient) and keeps the last fetched data.

pub mod auth;
pub mod department;
pub mod employee;
pub mod job_position;

pub use auth::AuthStore;
pub use department::DepartmentStore;
pub use employee::{EmployeeStore, PageMeta};
pub use job_position::JobPositionStore;
