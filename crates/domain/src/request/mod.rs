//! HTTP Request domain types

mod body;
mod header;
mod method;
mod spec;

pub use body::{RequestBody, RequestBodyKind, XML_CONTENT_TYPE};
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use spec::{DEFAULT_TIMEOUT_MS, RequestSpec};
