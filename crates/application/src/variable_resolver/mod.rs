//! Variable resolution module
//!
//! Provides parsing and resolution of `{{variable}}` syntax in request
//! templates and assertion values. Variables come from the case scope:
//! `base_url` is always present, everything else is captured from earlier
//! responses.
//!
//! # Usage
//!
//! ```
//! use eavesdrop_application::variable_resolver::CaseScope;
//!
//! let mut scope = CaseScope::new("http://localhost:8080/projects/");
//! scope.set("project_id", "7");
//!
//! let url = scope.resolve_strict("{{base_url}}{{project_id}}").unwrap();
//! assert_eq!(url, "http://localhost:8080/projects/7");
//! ```

pub mod engine;
pub mod parser;

pub use engine::{BASE_URL_VARIABLE, CaseScope};
pub use parser::{VariableReference, parse_variables};
