//! Contract cases.
//!
//! A [`ContractCase`] is one named check against the service: optional
//! setup steps that create prerequisite resources, followed by the steps
//! whose assertions make up the check itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::request::RequestSpec;
use crate::testing::Assertion;

/// The resource family a case exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    /// `/projects` and `/projects/{id}`.
    Projects,
    /// `/projects/{id}/meetings` and `/projects/{id}/meetings/{id}`.
    Meetings,
}

impl Suite {
    /// Returns the suite name used in case ids and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Meetings => "meetings",
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which suites a run includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuiteSelection {
    /// Every suite.
    #[default]
    All,
    /// Only the projects suite.
    Projects,
    /// Only the meetings suite.
    Meetings,
}

impl SuiteSelection {
    /// Returns true if `suite` is part of this selection.
    #[must_use]
    pub const fn includes(self, suite: Suite) -> bool {
        matches!(
            (self, suite),
            (Self::All, _) | (Self::Projects, Suite::Projects) | (Self::Meetings, Suite::Meetings)
        )
    }
}

impl FromStr for SuiteSelection {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "projects" | "project" => Ok(Self::Projects),
            "meetings" | "meeting" => Ok(Self::Meetings),
            other => Err(DomainError::UnknownSuite(other.to_string())),
        }
    }
}

/// The operation under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Resource creation.
    Post,
    /// Resource update.
    Put,
    /// Resource retrieval.
    Get,
    /// Resource removal.
    Delete,
}

impl Operation {
    /// Returns the lowercase operation name used in case ids.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Put => "put",
            Self::Get => "get",
            Self::Delete => "delete",
        }
    }
}

/// Extracts a value from a response into a case variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Capture {
    /// A header holding a resource URL, stored without trailing slashes
    /// so sub-paths can be appended to it.
    ResourceUrl {
        /// Header name (case-insensitive).
        name: String,
        /// Variable to store the value in.
        variable: String,
    },
    /// The last non-empty path segment of a header value holding a URL.
    LastPathSegment {
        /// Header name (case-insensitive).
        name: String,
        /// Variable to store the segment in.
        variable: String,
    },
}

impl Capture {
    /// Captures the resource URL in the `Location` header.
    #[must_use]
    pub fn location(variable: impl Into<String>) -> Self {
        Self::ResourceUrl {
            name: "Location".to_string(),
            variable: variable.into(),
        }
    }

    /// Captures the trailing id segment of the `Location` header.
    #[must_use]
    pub fn location_id(variable: impl Into<String>) -> Self {
        Self::LastPathSegment {
            name: "Location".to_string(),
            variable: variable.into(),
        }
    }

    /// Returns the name of the variable this capture writes.
    #[must_use]
    pub fn variable(&self) -> &str {
        match self {
            Self::ResourceUrl { variable, .. } | Self::LastPathSegment { variable, .. } => variable,
        }
    }
}

/// Returns `url` without trailing slashes.
#[must_use]
pub fn resource_url(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}

/// Returns the last non-empty path segment of a URL-like string.
#[must_use]
pub fn last_path_segment(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.split('/').rev().find(|segment| !segment.is_empty())
}

/// One request within a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStep {
    /// Short label shown in reports.
    pub name: String,
    /// Request template.
    pub request: RequestSpec,
    /// Checks run against the response.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
    /// Values extracted after the assertions pass.
    #[serde(default)]
    pub captures: Vec<Capture>,
    /// Whether the `Location` this step returns must be deleted after the case.
    #[serde(default)]
    pub cleanup_location: bool,
}

impl ContractStep {
    /// Creates a step with no assertions.
    #[must_use]
    pub fn new(name: impl Into<String>, request: RequestSpec) -> Self {
        Self {
            name: name.into(),
            request,
            assertions: Vec::new(),
            captures: Vec::new(),
            cleanup_location: false,
        }
    }

    /// Adds an assertion (builder pattern).
    #[must_use]
    pub fn expect(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Adds a capture (builder pattern).
    #[must_use]
    pub fn capture(mut self, capture: Capture) -> Self {
        self.captures.push(capture);
        self
    }

    /// Marks the created resource for deletion after the case.
    #[must_use]
    pub const fn cleanup(mut self) -> Self {
        self.cleanup_location = true;
        self
    }
}

/// A named contract check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCase {
    /// Stable identifier, e.g. `projects.post.empty_body`.
    pub id: String,
    /// Suite the case belongs to.
    pub suite: Suite,
    /// Operation under test.
    pub operation: Operation,
    /// One-line description.
    pub description: String,
    /// Prerequisite steps; a failure here means the case could not run.
    #[serde(default)]
    pub setup: Vec<ContractStep>,
    /// Checked steps.
    pub steps: Vec<ContractStep>,
}

impl ContractCase {
    /// Creates a case whose id is `suite.operation.slug`.
    #[must_use]
    pub fn new(
        suite: Suite,
        operation: Operation,
        slug: &str,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("{}.{}.{slug}", suite.as_str(), operation.as_str()),
            suite,
            operation,
            description: description.into(),
            setup: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Adds a setup step (builder pattern).
    #[must_use]
    pub fn given(mut self, step: ContractStep) -> Self {
        self.setup.push(step);
        self
    }

    /// Adds a checked step (builder pattern).
    #[must_use]
    pub fn then(mut self, step: ContractStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Returns true if the case id contains `filter`.
    #[must_use]
    pub fn matches_filter(&self, filter: &str) -> bool {
        self.id.contains(filter)
    }
}
