//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait implemented by an adapter in the infrastructure layer.

mod http_client;
mod response_checker;

pub use http_client::{HttpClient, HttpClientError};
pub use response_checker::ResponseChecker;
