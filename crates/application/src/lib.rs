//! Eavesdrop Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the HTTP transport and response checks)
//! - The contract catalog for the projects and meetings resources
//! - `{{variable}}` resolution for values captured between steps
//! - The `RunContract` use case that drives a run

pub mod catalog;
pub mod error;
pub mod ports;
pub mod use_cases;
pub mod variable_resolver;

pub use catalog::{CatalogOptions, all_cases, meeting_cases, project_cases, select_cases};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{HttpClient, HttpClientError, ResponseChecker};
pub use use_cases::{RunContract, RunOptions};
pub use variable_resolver::CaseScope;
