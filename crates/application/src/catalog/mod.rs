//! The contract catalog.
//!
//! Every check the harness knows about, expressed as data. Cases are
//! grouped by suite; each one is self-contained and creates whatever it
//! needs in its own setup steps.

mod meetings;
mod projects;

use eavesdrop_domain::{
    Assertion, Capture, ContractCase, ContractStep, InvalidIdPutPolicy, Meeting, Project,
    RequestSpec, SuiteSelection,
};

use crate::variable_resolver::BASE_URL_VARIABLE;

pub use meetings::meeting_cases;
pub use projects::project_cases;

/// Variable holding the URL of the project created in setup.
pub const PROJECT_URL: &str = "project_url";
/// Variable holding the id of the project created in setup.
pub const PROJECT_ID: &str = "project_id";
/// Variable holding the URL of a second, unrelated project.
pub const OTHER_PROJECT_URL: &str = "other_project_url";
/// Variable holding the URL of the meeting created in setup.
pub const MEETING_URL: &str = "meeting_url";
/// Variable holding the id of the meeting created in setup.
pub const MEETING_ID: &str = "meeting_id";

/// A negative numeric identifier that never resolves.
pub const NEGATIVE_ID: &str = "-1";
/// A non-numeric identifier that never resolves.
pub const NON_NUMERIC_ID: &str = "asdf";

/// Fixture values and policies the catalog is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Project created by setup steps.
    pub project: Project,
    /// Replacement project sent by update checks.
    pub updated_project: Project,
    /// Meeting created by setup steps.
    pub meeting: Meeting,
    /// Replacement meeting sent by update checks.
    pub updated_meeting: Meeting,
    /// Expected statuses for PUT on malformed identifiers.
    pub invalid_id_put: InvalidIdPutPolicy,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            project: Project::new("solum", "Project representing solum"),
            updated_project: Project::new("solum2", "Updated solum stuff."),
            meeting: Meeting::new("solum-team-meeting", 2014),
            updated_meeting: Meeting::new("solum-team-meeting-2", 2015),
            invalid_id_put: InvalidIdPutPolicy::default(),
        }
    }
}

impl CatalogOptions {
    /// Sets the invalid-id PUT policy (builder pattern).
    #[must_use]
    pub const fn with_invalid_id_put(mut self, policy: InvalidIdPutPolicy) -> Self {
        self.invalid_id_put = policy;
        self
    }
}

/// Returns every case in the catalog, projects first.
#[must_use]
pub fn all_cases(options: &CatalogOptions) -> Vec<ContractCase> {
    let mut cases = project_cases(options);
    cases.extend(meeting_cases(options));
    cases
}

/// Narrows `cases` to the selected suites and, if given, to ids containing
/// `filter`.
#[must_use]
pub fn select_cases(
    cases: Vec<ContractCase>,
    selection: SuiteSelection,
    filter: Option<&str>,
) -> Vec<ContractCase> {
    cases
        .into_iter()
        .filter(|case| selection.includes(case.suite))
        .filter(|case| filter.is_none_or(|f| case.matches_filter(f)))
        .collect()
}

/// Creates a project and captures its URL and id under the given variables.
pub(crate) fn create_project(project: &Project, url_var: &str, id_var: &str) -> ContractStep {
    ContractStep::new(
        "create project",
        RequestSpec::post_xml(var(BASE_URL_VARIABLE), project.to_xml()),
    )
    .expect(Assertion::status(201))
    .expect(Assertion::HeaderExists {
        name: "Location".to_string(),
        value: None,
    })
    .capture(Capture::location(url_var))
    .capture(Capture::location_id(id_var))
    .cleanup()
}

/// Creates a meeting under the setup project.
pub(crate) fn create_meeting(meeting: &Meeting) -> ContractStep {
    ContractStep::new(
        "create meeting",
        RequestSpec::post_xml(var_path(PROJECT_URL, "/meetings/"), meeting.to_xml()),
    )
    .expect(Assertion::status(201))
    .expect(Assertion::HeaderExists {
        name: "Location".to_string(),
        value: None,
    })
    .capture(Capture::location(MEETING_URL))
    .capture(Capture::location_id(MEETING_ID))
    .cleanup()
}

/// Deletes the setup project, leaving its URL pointing at nothing.
pub(crate) fn delete_project() -> ContractStep {
    ContractStep::new("delete project", RequestSpec::delete(var(PROJECT_URL)))
        .expect(Assertion::status(200))
}

/// Returns `{{variable}}`.
pub(crate) fn var(variable: &str) -> String {
    format!("{{{{{variable}}}}}")
}

/// Returns `{{variable}}suffix`.
pub(crate) fn var_path(variable: &str, suffix: &str) -> String {
    format!("{}{suffix}", var(variable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eavesdrop_domain::Suite;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_var_helpers() {
        assert_eq!(var(PROJECT_URL), "{{project_url}}");
        assert_eq!(var_path(PROJECT_URL, "/meetings/"), "{{project_url}}/meetings/");
    }

    #[test]
    fn test_case_ids_are_unique() {
        let cases = all_cases(&CatalogOptions::default());
        let ids: HashSet<_> = cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), cases.len());
    }

    #[test]
    fn test_every_case_has_checked_steps() {
        for case in all_cases(&CatalogOptions::default()) {
            assert!(!case.steps.is_empty(), "{} has no steps", case.id);
            for step in case.setup.iter().chain(&case.steps) {
                assert!(!step.assertions.is_empty(), "{} / {} asserts nothing", case.id, step.name);
            }
        }
    }

    #[test]
    fn test_select_cases_by_suite_and_filter() {
        let cases = all_cases(&CatalogOptions::default());
        let total = cases.len();

        let meetings = select_cases(cases.clone(), SuiteSelection::Meetings, None);
        assert!(!meetings.is_empty());
        assert!(meetings.iter().all(|c| c.suite == Suite::Meetings));

        let posts = select_cases(cases.clone(), SuiteSelection::Projects, Some(".post."));
        assert!(posts.iter().all(|c| c.id.starts_with("projects.post.")));

        assert_eq!(select_cases(cases, SuiteSelection::All, None).len(), total);
    }

    #[test]
    fn test_create_project_step_captures_location() {
        let step = create_project(&Project::new("a", "b"), PROJECT_URL, PROJECT_ID);
        assert_eq!(step.request.url, "{{base_url}}");
        let vars: Vec<_> = step.captures.iter().map(Capture::variable).collect();
        assert_eq!(vars, vec![PROJECT_URL, PROJECT_ID]);
        assert!(step.cleanup_location);
    }
}
