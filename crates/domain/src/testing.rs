//! Response assertions.
//!
//! This module provides the checks a contract step runs against the
//! response it receives, and the results those checks produce.

use serde::{Deserialize, Serialize};

/// A test assertion to run against a response.
///
/// Every string field may hold `{{variable}}` references; they are resolved
/// with [`Assertion::map_text`] before the assertion is evaluated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code, range, or set.
        expected: StatusExpectation,
    },
    /// Check response time.
    ResponseTime {
        /// Maximum allowed time in milliseconds.
        max_ms: u64,
    },
    /// Check header exists and optionally its value.
    HeaderExists {
        /// Header name (case-insensitive).
        name: String,
        /// Optional expected value.
        value: Option<String>,
    },
    /// Check header value contains a substring.
    HeaderContains {
        /// Header name (case-insensitive).
        name: String,
        /// Text that must appear in the value.
        text: String,
    },
    /// Check body is a well-formed XML document.
    IsXml,
    /// Check the name of the document's root element.
    XmlRoot {
        /// Expected root element name.
        name: String,
    },
    /// Check an attribute on the root element.
    XmlAttribute {
        /// Attribute name (e.g., "id").
        name: String,
        /// Expected attribute value.
        expected: String,
    },
    /// Check the trimmed text of a child element.
    XmlElement {
        /// Slash-separated path below the root (e.g., "meetings/meeting/name").
        path: String,
        /// Expected text content.
        expected: String,
    },
    /// Check a child element exists.
    XmlElementExists {
        /// Slash-separated path below the root.
        path: String,
    },
}

impl Assertion {
    /// Shorthand for an exact status code check.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::Exact(code),
        }
    }

    /// Shorthand for a status check accepting any of `codes`.
    #[must_use]
    pub fn status_one_of(codes: &[u16]) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::OneOf(codes.to_vec()),
        }
    }

    /// Shorthand for a child element text check.
    #[must_use]
    pub fn xml_element(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::XmlElement {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::ResponseTime { max_ms } => format!("Response time < {max_ms}ms"),
            Self::HeaderExists {
                name,
                value: Some(v),
            } => format!("Header '{name}' equals '{v}'"),
            Self::HeaderExists { name, value: None } => format!("Header '{name}' exists"),
            Self::HeaderContains { name, text } => format!("Header '{name}' contains '{text}'"),
            Self::IsXml => "Body is valid XML".to_string(),
            Self::XmlRoot { name } => format!("XML root is <{name}>"),
            Self::XmlAttribute { name, expected } => {
                format!("XML root @{name} equals '{expected}'")
            }
            Self::XmlElement { path, expected } => format!("XML {path} equals '{expected}'"),
            Self::XmlElementExists { path } => format!("XML {path} exists"),
        }
    }

    /// Returns a copy with `f` applied to every templated string field.
    #[must_use]
    pub fn map_text(&self, mut f: impl FnMut(&str) -> String) -> Self {
        match self {
            Self::StatusCode { .. } | Self::ResponseTime { .. } | Self::IsXml => self.clone(),
            Self::HeaderExists { name, value } => Self::HeaderExists {
                name: f(name),
                value: value.as_deref().map(&mut f),
            },
            Self::HeaderContains { name, text } => Self::HeaderContains {
                name: f(name),
                text: f(text),
            },
            Self::XmlRoot { name } => Self::XmlRoot { name: f(name) },
            Self::XmlAttribute { name, expected } => Self::XmlAttribute {
                name: f(name),
                expected: f(expected),
            },
            Self::XmlElement { path, expected } => Self::XmlElement {
                path: f(path),
                expected: f(expected),
            },
            Self::XmlElementExists { path } => Self::XmlElementExists { path: f(path) },
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => status >= *min && status <= *max,
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionResult {
    /// The assertion that was run, with variables resolved.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// Error message if failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            passed: true,
            actual: None,
            error: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, error: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            assertion,
            passed: false,
            actual: Some(actual.into()),
            error: Some(error.into()),
        }
    }
}

/// Results from running the assertions of one step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestResults {
    /// Individual assertion results.
    pub results: Vec<AssertionResult>,
    /// Total number of assertions.
    pub total: usize,
    /// Number of passed assertions.
    pub passed: usize,
    /// Number of failed assertions.
    pub failed: usize,
}

impl TestResults {
    /// Create new test results.
    #[must_use]
    pub fn new(results: Vec<AssertionResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            results,
            total,
            passed,
            failed: total - passed,
        }
    }

    /// Check if all assertions passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Returns the first failed result, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<&AssertionResult> {
        self.results.iter().find(|r| !r.passed)
    }
}
