//! Test runner implementation.
//!
//! Executes assertions against HTTP responses and produces test results.

use std::cell::OnceCell;

use eavesdrop_application::ports::ResponseChecker;
use eavesdrop_domain::response::ResponseSpec;
use eavesdrop_domain::testing::{Assertion, AssertionResult, StatusExpectation, TestResults};

use crate::xml::{XmlDocument, XmlError};

const PREVIEW_LEN: usize = 100;

/// Body parsed at most once per response.
type ParsedBody = OnceCell<Result<XmlDocument, XmlError>>;

/// Test runner that executes assertions against responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestRunner;

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        self.evaluate(assertion, response, &OnceCell::new())
    }

    fn evaluate(
        &self,
        assertion: &Assertion,
        response: &ResponseSpec,
        parsed: &ParsedBody,
    ) -> AssertionResult {
        let document = || parsed.get_or_init(|| XmlDocument::parse(&response.body)).as_ref();

        match assertion {
            Assertion::StatusCode { expected } => check_status_code(assertion, response, expected),
            Assertion::ResponseTime { max_ms } => check_response_time(assertion, response, *max_ms),
            Assertion::HeaderExists { name, value } => {
                check_header_exists(assertion, response, name, value.as_deref())
            }
            Assertion::HeaderContains { name, text } => {
                check_header_contains(assertion, response, name, text)
            }
            Assertion::IsXml => match document() {
                Ok(_) => AssertionResult::pass(assertion.clone()),
                Err(e) => AssertionResult::fail_with_value(
                    assertion.clone(),
                    response.body_preview(PREVIEW_LEN),
                    format!("Body is not valid XML: {e}"),
                ),
            },
            Assertion::XmlRoot { name } => with_document(assertion, response, document(), |doc| {
                let actual = &doc.root().name;
                if actual == name {
                    AssertionResult::pass_with_value(assertion.clone(), actual.clone())
                } else {
                    AssertionResult::fail_with_value(
                        assertion.clone(),
                        actual.clone(),
                        format!("Expected root <{name}>, got <{actual}>"),
                    )
                }
            }),
            Assertion::XmlAttribute { name, expected } => {
                with_document(assertion, response, document(), |doc| {
                    match doc.root().attribute(name) {
                        Some(actual) if actual.trim() == expected.as_str() => {
                            AssertionResult::pass_with_value(assertion.clone(), actual)
                        }
                        Some(actual) => AssertionResult::fail_with_value(
                            assertion.clone(),
                            actual,
                            format!("Attribute '{name}' mismatch: expected '{expected}', got '{actual}'"),
                        ),
                        None => AssertionResult::fail(
                            assertion.clone(),
                            format!("Root <{}> has no '{name}' attribute", doc.root().name),
                        ),
                    }
                })
            }
            Assertion::XmlElement { path, expected } => {
                with_document(assertion, response, document(), |doc| match doc.text_at(path) {
                    Some(actual) if actual == expected.as_str() => {
                        AssertionResult::pass_with_value(assertion.clone(), actual)
                    }
                    Some(actual) => AssertionResult::fail_with_value(
                        assertion.clone(),
                        actual,
                        format!("Element '{path}' mismatch: expected '{expected}', got '{actual}'"),
                    ),
                    None => AssertionResult::fail(
                        assertion.clone(),
                        format!("Element '{path}' not found"),
                    ),
                })
            }
            Assertion::XmlElementExists { path } => {
                with_document(assertion, response, document(), |doc| {
                    if doc.find(path).is_some() {
                        AssertionResult::pass(assertion.clone())
                    } else {
                        AssertionResult::fail(
                            assertion.clone(),
                            format!("Element '{path}' not found"),
                        )
                    }
                })
            }
        }
    }
}

impl ResponseChecker for TestRunner {
    fn check(&self, assertions: &[Assertion], response: &ResponseSpec) -> TestResults {
        let parsed = OnceCell::new();
        TestResults::new(
            assertions
                .iter()
                .map(|assertion| self.evaluate(assertion, response, &parsed))
                .collect(),
        )
    }
}

fn with_document(
    assertion: &Assertion,
    response: &ResponseSpec,
    document: Result<&XmlDocument, &XmlError>,
    check: impl FnOnce(&XmlDocument) -> AssertionResult,
) -> AssertionResult {
    match document {
        Ok(doc) => check(doc),
        Err(e) => AssertionResult::fail_with_value(
            assertion.clone(),
            response.body_preview(PREVIEW_LEN),
            format!("Body is not valid XML: {e}"),
        ),
    }
}

fn check_status_code(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: &StatusExpectation,
) -> AssertionResult {
    let actual = response.status;
    if expected.matches(actual) {
        AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            actual.to_string(),
            format!("Expected status {}, got {actual}", expected.description()),
        )
    }
}

fn check_response_time(
    assertion: &Assertion,
    response: &ResponseSpec,
    max_ms: u64,
) -> AssertionResult {
    let actual_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX);
    if actual_ms <= max_ms {
        AssertionResult::pass_with_value(assertion.clone(), format!("{actual_ms}ms"))
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            format!("{actual_ms}ms"),
            format!("Response took {actual_ms}ms, expected <= {max_ms}ms"),
        )
    }
}

fn check_header_exists(
    assertion: &Assertion,
    response: &ResponseSpec,
    name: &str,
    expected_value: Option<&str>,
) -> AssertionResult {
    match (response.get_header(name), expected_value) {
        (Some(actual), Some(expected)) if actual != expected => AssertionResult::fail_with_value(
            assertion.clone(),
            actual.clone(),
            format!("Header '{name}' value mismatch: expected '{expected}', got '{actual}'"),
        ),
        (Some(actual), _) => AssertionResult::pass_with_value(assertion.clone(), actual.clone()),
        (None, _) => AssertionResult::fail(assertion.clone(), format!("Header '{name}' not found")),
    }
}

fn check_header_contains(
    assertion: &Assertion,
    response: &ResponseSpec,
    name: &str,
    text: &str,
) -> AssertionResult {
    match response.get_header(name) {
        Some(actual) if actual.contains(text) => {
            AssertionResult::pass_with_value(assertion.clone(), actual.clone())
        }
        Some(actual) => AssertionResult::fail_with_value(
            assertion.clone(),
            actual.clone(),
            format!("Header '{name}' value '{actual}' does not contain '{text}'"),
        ),
        None => AssertionResult::fail(assertion.clone(), format!("Header '{name}' not found")),
    }
}
