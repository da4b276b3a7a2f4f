//! Contract cases for `/projects/{id}/meetings` and
//! `/projects/{id}/meetings/{id}`.

use eavesdrop_domain::{
    Assertion, Capture, ContractCase, ContractStep, Operation, RequestSpec, Suite,
    resource::MEETING_ROOT,
};

use super::{
    CatalogOptions, MEETING_ID, MEETING_URL, NEGATIVE_ID, NON_NUMERIC_ID, OTHER_PROJECT_URL,
    PROJECT_ID, PROJECT_URL, create_meeting, create_project, delete_project, var, var_path,
};
use crate::variable_resolver::BASE_URL_VARIABLE;

const OTHER_PROJECT_ID: &str = "other_project_id";

/// Returns every meetings-suite case.
#[must_use]
pub fn meeting_cases(options: &CatalogOptions) -> Vec<ContractCase> {
    let mut cases = post_cases(options);
    cases.extend(put_cases(options));
    cases.extend(get_cases(options));
    cases.extend(delete_cases(options));
    cases
}

fn meetings_url() -> String {
    var_path(PROJECT_URL, "/meetings/")
}

/// The setup meeting addressed through the unrelated project.
fn cross_project_url() -> String {
    format!("{}/meetings/{}", var(OTHER_PROJECT_URL), var(MEETING_ID))
}

fn invalid_meeting_url(id: &str) -> String {
    format!("{}{id}", meetings_url())
}

/// A case whose meeting outlived a deleted project, addressed by its old URL.
fn deleted_project_case(
    options: &CatalogOptions,
    operation: Operation,
    description: &str,
) -> ContractCase {
    ContractCase::new(Suite::Meetings, operation, "deleted_project", description)
        .given(create_project(&options.project, PROJECT_URL, PROJECT_ID))
        .given(create_meeting(&options.meeting))
        .given(delete_project())
}

fn meeting_xml(name: &str, year: &str) -> String {
    format!("<meeting><name>{name}</name><year>{year}</year></meeting>")
}

/// A POST under an existing project that must be rejected with 400.
fn rejected_post(options: &CatalogOptions, slug: &str, description: &str, xml: &str) -> ContractCase {
    ContractCase::new(Suite::Meetings, Operation::Post, slug, description)
        .given(create_project(&options.project, PROJECT_URL, PROJECT_ID))
        .then(
            ContractStep::new("post", RequestSpec::post_xml(meetings_url(), xml))
                .expect(Assertion::status(400))
                .cleanup(),
        )
}

fn post_cases(options: &CatalogOptions) -> Vec<ContractCase> {
    let name = &options.meeting.name;
    let year = options.meeting.year.to_string();
    let unknown_project = |slug: &str, description: &str, id: &str| {
        ContractCase::new(Suite::Meetings, Operation::Post, slug, description).then(
            ContractStep::new(
                "post",
                RequestSpec::post_xml(
                    format!("{}{id}/meetings/", var(BASE_URL_VARIABLE)),
                    options.meeting.to_xml(),
                ),
            )
            .expect(Assertion::status(404)),
        )
    };

    vec![
        rejected_post(options, "empty_body", "Empty body is rejected", ""),
        rejected_post(
            options,
            "unterminated_xml",
            "Document missing its closing root tag is rejected",
            &format!("<meeting><name>{name}</name><year>{year}</year>"),
        ),
        rejected_post(
            options,
            "plural_root",
            "Root element <meetings> is rejected",
            &format!("<meetings><name>{name}</name><year>{year}</year></meetings>"),
        ),
        rejected_post(
            options,
            "missing_name",
            "Missing name is rejected",
            &format!("<meeting><year>{year}</year></meeting>"),
        ),
        rejected_post(
            options,
            "missing_year",
            "Missing year is rejected",
            &format!("<meeting><name>{name}</name></meeting>"),
        ),
        rejected_post(
            options,
            "empty_name",
            "Empty name is rejected",
            &meeting_xml("", &year),
        ),
        rejected_post(
            options,
            "empty_year",
            "Empty year is rejected",
            &meeting_xml(name, ""),
        ),
        rejected_post(
            options,
            "blank_name",
            "Whitespace-only name is rejected",
            &meeting_xml("  ", &year),
        ),
        rejected_post(
            options,
            "blank_year",
            "Whitespace-only year is rejected",
            &meeting_xml(name, " \t "),
        ),
        rejected_post(
            options,
            "negative_year",
            "Negative year is rejected",
            &meeting_xml(name, "-1"),
        ),
        rejected_post(
            options,
            "non_numeric_year",
            "Non-numeric year is rejected",
            &meeting_xml(name, "abcd"),
        ),
        unknown_project(
            "negative_project_id",
            "POST under a negative project id is not found",
            NEGATIVE_ID,
        ),
        unknown_project(
            "non_numeric_project_id",
            "POST under a non-numeric project id is not found",
            NON_NUMERIC_ID,
        ),
        ContractCase::new(
            Suite::Meetings,
            Operation::Post,
            "deleted_project",
            "POST under a deleted project is not found",
        )
        .given(create_project(&options.project, PROJECT_URL, PROJECT_ID))
        .given(delete_project())
        .then(
            ContractStep::new(
                "post",
                RequestSpec::post_xml(meetings_url(), options.meeting.to_xml()),
            )
            .expect(Assertion::status(404))
            .cleanup(),
        ),
        ContractCase::new(
            Suite::Meetings,
            Operation::Post,
            "created",
            "Valid meeting is created with a Location under its project",
        )
        .given(create_project(&options.project, PROJECT_URL, PROJECT_ID))
        .then(
            ContractStep::new(
                "post",
                RequestSpec::post_xml(meetings_url(), options.meeting.to_xml()),
            )
            .expect(Assertion::status(201))
            .expect(Assertion::HeaderContains {
                name: "Location".to_string(),
                text: meetings_url(),
            })
            .capture(Capture::location(MEETING_URL))
            .cleanup(),
        ),
    ]
}

fn put_cases(options: &CatalogOptions) -> Vec<ContractCase> {
    let updated = &options.updated_meeting;
    let year = updated.year.to_string();
    let base = || {
        (
            create_project(&options.project, PROJECT_URL, PROJECT_ID),
            create_meeting(&options.meeting),
        )
    };
    let case = |slug: &str, description: &str| {
        let (project, meeting) = base();
        ContractCase::new(Suite::Meetings, Operation::Put, slug, description)
            .given(project)
            .given(meeting)
    };
    let invalid_id_put = |slug: &str, description: &str, id: &str, statuses: &[u16]| {
        ContractCase::new(Suite::Meetings, Operation::Put, slug, description)
            .given(create_project(&options.project, PROJECT_URL, PROJECT_ID))
            .then(
                ContractStep::new(
                    "put",
                    RequestSpec::put_xml(invalid_meeting_url(id), updated.to_xml()),
                )
                .expect(Assertion::status_one_of(statuses)),
            )
    };

    vec![
        case("updated", "Existing meeting is updated and keeps the new values")
            .then(
                ContractStep::new("put", RequestSpec::put_xml(var(MEETING_URL), updated.to_xml()))
                    .expect(Assertion::status_one_of(&[200, 204])),
            )
            .then(
                ContractStep::new("get updated", RequestSpec::get(var(MEETING_URL)))
                    .expect(Assertion::status(200))
                    .expect(Assertion::xml_element("name", updated.name.as_str()))
                    .expect(Assertion::xml_element("year", year.as_str())),
            ),
        invalid_id_put(
            "negative_id",
            "PUT on a negative meeting id is refused",
            NEGATIVE_ID,
            options.invalid_id_put.negative_id(),
        ),
        invalid_id_put(
            "non_numeric_id",
            "PUT on a non-numeric meeting id is refused",
            NON_NUMERIC_ID,
            options.invalid_id_put.non_numeric_id(),
        ),
        case("empty_name", "PUT with an empty name is rejected").then(
            ContractStep::new(
                "put",
                RequestSpec::put_xml(var(MEETING_URL), meeting_xml("", &year)),
            )
            .expect(Assertion::status(400)),
        ),
        case("negative_year", "PUT with a negative year is rejected").then(
            ContractStep::new(
                "put",
                RequestSpec::put_xml(var(MEETING_URL), meeting_xml(&updated.name, "-1")),
            )
            .expect(Assertion::status(400)),
        ),
        case(
            "cross_project",
            "PUT through an unrelated project is not found",
        )
        .given(create_project(
            &options.project,
            OTHER_PROJECT_URL,
            OTHER_PROJECT_ID,
        ))
        .then(
            ContractStep::new(
                "put",
                RequestSpec::put_xml(cross_project_url(), updated.to_xml()),
            )
            .expect(Assertion::status(404)),
        ),
        deleted_project_case(
            options,
            Operation::Put,
            "PUT on a meeting of a deleted project is not found",
        )
        .then(
            ContractStep::new("put", RequestSpec::put_xml(var(MEETING_URL), updated.to_xml()))
                .expect(Assertion::status(404)),
        ),
    ]
}

fn get_cases(options: &CatalogOptions) -> Vec<ContractCase> {
    let meeting = &options.meeting;
    let not_found = |slug: &str, description: &str, id: &str| {
        ContractCase::new(Suite::Meetings, Operation::Get, slug, description)
            .given(create_project(&options.project, PROJECT_URL, PROJECT_ID))
            .then(
                ContractStep::new("get", RequestSpec::get(invalid_meeting_url(id)))
                    .expect(Assertion::status(404)),
            )
    };

    vec![
        ContractCase::new(
            Suite::Meetings,
            Operation::Get,
            "existing",
            "Existing meeting is returned with its id and stored values",
        )
        .given(create_project(&options.project, PROJECT_URL, PROJECT_ID))
        .given(create_meeting(meeting))
        .then(
            ContractStep::new("get", RequestSpec::get(var(MEETING_URL)))
                .expect(Assertion::status(200))
                .expect(Assertion::IsXml)
                .expect(Assertion::XmlRoot {
                    name: MEETING_ROOT.to_string(),
                })
                .expect(Assertion::XmlAttribute {
                    name: "id".to_string(),
                    expected: var(MEETING_ID),
                })
                .expect(Assertion::xml_element("name", meeting.name.as_str()))
                .expect(Assertion::xml_element("year", meeting.year.to_string())),
        ),
        not_found(
            "negative_id",
            "GET on a negative meeting id is not found",
            NEGATIVE_ID,
        ),
        not_found(
            "non_numeric_id",
            "GET on a non-numeric meeting id is not found",
            NON_NUMERIC_ID,
        ),
        ContractCase::new(
            Suite::Meetings,
            Operation::Get,
            "cross_project",
            "GET through an unrelated project is not found",
        )
        .given(create_project(&options.project, PROJECT_URL, PROJECT_ID))
        .given(create_meeting(meeting))
        .given(create_project(
            &options.project,
            OTHER_PROJECT_URL,
            OTHER_PROJECT_ID,
        ))
        .then(
            ContractStep::new("get", RequestSpec::get(cross_project_url()))
                .expect(Assertion::status(404)),
        ),
        deleted_project_case(
            options,
            Operation::Get,
            "GET on a meeting of a deleted project is not found",
        )
        .then(
            ContractStep::new("get", RequestSpec::get(var(MEETING_URL)))
                .expect(Assertion::status(404)),
        ),
    ]
}

fn delete_cases(options: &CatalogOptions) -> Vec<ContractCase> {
    let not_found = |slug: &str, description: &str, id: &str| {
        ContractCase::new(Suite::Meetings, Operation::Delete, slug, description)
            .given(create_project(&options.project, PROJECT_URL, PROJECT_ID))
            .then(
                ContractStep::new("delete", RequestSpec::delete(invalid_meeting_url(id)))
                    .expect(Assertion::status(404)),
            )
    };

    vec![
        ContractCase::new(
            Suite::Meetings,
            Operation::Delete,
            "existing",
            "Existing meeting is deleted and then not found",
        )
        .given(create_project(&options.project, PROJECT_URL, PROJECT_ID))
        .given(create_meeting(&options.meeting))
        .then(
            ContractStep::new("delete", RequestSpec::delete(var(MEETING_URL)))
                .expect(Assertion::status(200)),
        )
        .then(
            ContractStep::new("get after", RequestSpec::get(var(MEETING_URL)))
                .expect(Assertion::status(404)),
        ),
        not_found(
            "negative_id",
            "DELETE on a negative meeting id is not found",
            NEGATIVE_ID,
        ),
        not_found(
            "non_numeric_id",
            "DELETE on a non-numeric meeting id is not found",
            NON_NUMERIC_ID,
        ),
        ContractCase::new(
            Suite::Meetings,
            Operation::Delete,
            "cross_project",
            "DELETE through an unrelated project is not found and leaves the meeting",
        )
        .given(create_project(&options.project, PROJECT_URL, PROJECT_ID))
        .given(create_meeting(&options.meeting))
        .given(create_project(
            &options.project,
            OTHER_PROJECT_URL,
            OTHER_PROJECT_ID,
        ))
        .then(
            ContractStep::new("delete", RequestSpec::delete(cross_project_url()))
                .expect(Assertion::status(404)),
        )
        .then(
            ContractStep::new("get original", RequestSpec::get(var(MEETING_URL)))
                .expect(Assertion::status(200)),
        ),
        deleted_project_case(
            options,
            Operation::Delete,
            "DELETE on a meeting of a deleted project is not found",
        )
        .then(
            ContractStep::new("delete", RequestSpec::delete(var(MEETING_URL)))
                .expect(Assertion::status(404)),
        ),
    ]
}
