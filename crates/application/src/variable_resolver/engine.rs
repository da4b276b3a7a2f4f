//! Variable resolution engine
//!
//! Resolves `{{variable}}` references against the variables of one case.

use std::collections::BTreeMap;

use eavesdrop_domain::testing::Assertion;

use super::parser::parse_variables;
use crate::error::{ApplicationError, ApplicationResult};

/// Variable that always holds the projects collection URL.
pub const BASE_URL_VARIABLE: &str = "base_url";

/// Result of variable resolution for a string.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolutionResult {
    /// The resolved string; unresolved references are left as written.
    resolved: String,
    unresolved: Vec<String>,
    is_complete: bool,
}

impl ResolutionResult {
    fn no_variables(input: &str) -> Self {
        Self {
            resolved: input.to_string(),
            unresolved: Vec::new(),
            is_complete: true,
        }
    }
}

/// Variables visible to the steps of one case.
///
/// Each case starts from a fresh scope holding only `base_url`; captures
/// from its own setup and checked steps add to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseScope {
    variables: BTreeMap<String, String>,
}

impl CaseScope {
    /// Creates a scope seeded with the projects collection URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut variables = BTreeMap::new();
        variables.insert(BASE_URL_VARIABLE.to_string(), base_url.into());
        Self { variables }
    }

    /// Sets a variable, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Returns a variable's value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Resolves all variables in the input string.
    fn resolve(&self, input: &str) -> ResolutionResult {
        let references = parse_variables(input);

        if references.is_empty() {
            return ResolutionResult::no_variables(input);
        }

        let mut unresolved = Vec::new();
        let mut result = String::with_capacity(input.len());
        let mut last_end = 0;

        for var_ref in &references {
            result.push_str(&input[last_end..var_ref.span.start]);

            if let Some(value) = self.get(&var_ref.name) {
                result.push_str(value);
            } else {
                result.push_str(&input[var_ref.span.clone()]);
                unresolved.push(var_ref.name.clone());
            }

            last_end = var_ref.span.end;
        }

        result.push_str(&input[last_end..]);

        ResolutionResult {
            resolved: result,
            is_complete: unresolved.is_empty(),
            unresolved,
        }
    }

    /// Resolves the input, failing if any reference has no value.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedVariables` listing the missing names.
    pub fn resolve_strict(&self, input: &str) -> ApplicationResult<String> {
        let result = self.resolve(input);
        if result.is_complete {
            Ok(result.resolved)
        } else {
            Err(ApplicationError::UnresolvedVariables {
                template: input.to_string(),
                names: result.unresolved,
            })
        }
    }

    /// Resolves every templated string of an assertion.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedVariables` for the first field that has a
    /// reference with no value.
    pub fn resolve_assertion(&self, assertion: &Assertion) -> ApplicationResult<Assertion> {
        let mut first_error = None;
        let resolved = assertion.map_text(|text| match self.resolve_strict(text) {
            Ok(value) => value,
            Err(e) => {
                first_error.get_or_insert(e);
                text.to_string()
            }
        });
        first_error.map_or(Ok(resolved), Err)
    }
}
