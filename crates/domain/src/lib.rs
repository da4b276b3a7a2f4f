//! Eavesdrop Domain - Core contract types
//!
//! This crate defines the domain model for the Eavesdrop contract checker:
//! request and response specs, the project/meeting payloads sent to the
//! service under test, assertions, contract cases and run reports.
//! All types here are pure Rust with no I/O dependencies.

pub mod contract;
pub mod error;
pub mod id;
pub mod report;
pub mod request;
pub mod resource;
pub mod response;
pub mod settings;
pub mod testing;

pub use contract::{Capture, ContractCase, ContractStep, Operation, Suite, SuiteSelection};
pub use error::{DomainError, DomainResult};
pub use id::generate_run_id;
pub use report::{CaseOutcome, CaseReport, RunReport, StepPhase, StepReport};
pub use request::{Header, Headers, HttpMethod, RequestBody, RequestBodyKind, RequestSpec};
pub use resource::{Meeting, Project, ResourceId};
pub use response::{ResponseSpec, StatusCode};
pub use settings::{ContractSettings, InvalidIdPutPolicy, ReportFormat};
pub use testing::{Assertion, AssertionResult, StatusExpectation, TestResults};
