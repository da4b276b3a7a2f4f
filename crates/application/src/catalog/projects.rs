//! Contract cases for `/projects` and `/projects/{id}`.

use eavesdrop_domain::{
    Assertion, Capture, ContractCase, ContractStep, Operation, RequestSpec, Suite,
    resource::{MEETINGS_CONTAINER, PROJECT_ROOT},
};

use super::{
    CatalogOptions, MEETING_URL, NEGATIVE_ID, NON_NUMERIC_ID, PROJECT_ID, PROJECT_URL,
    create_meeting, create_project, var, var_path,
};
use crate::variable_resolver::BASE_URL_VARIABLE;

/// Returns every projects-suite case.
#[must_use]
pub fn project_cases(options: &CatalogOptions) -> Vec<ContractCase> {
    let mut cases = post_cases(options);
    cases.extend(put_cases(options));
    cases.extend(get_cases(options));
    cases.extend(delete_cases(options));
    cases
}

/// A POST of `xml` to the collection that must be rejected with 400.
fn rejected_post(slug: &str, description: &str, xml: &str) -> ContractCase {
    ContractCase::new(Suite::Projects, Operation::Post, slug, description).then(
        ContractStep::new(
            "post",
            RequestSpec::post_xml(var(BASE_URL_VARIABLE), xml),
        )
        .expect(Assertion::status(400))
        .cleanup(),
    )
}

fn post_cases(options: &CatalogOptions) -> Vec<ContractCase> {
    let name = &options.project.name;
    let description = &options.project.description;

    vec![
        rejected_post("empty_body", "Empty body is rejected", ""),
        rejected_post(
            "unterminated_xml",
            "Document missing its closing root tag is rejected",
            &format!("<project><name>{name}</name><description>{description}</description>"),
        ),
        rejected_post(
            "plural_root",
            "Root element <projects> is rejected",
            &format!(
                "<projects><name>{name}</name><description>{description}</description></projects>"
            ),
        ),
        rejected_post(
            "missing_description",
            "Missing description is rejected",
            &format!("<project><name>{name}</name></project>"),
        ),
        rejected_post(
            "missing_name",
            "Missing name is rejected",
            &format!("<project><description>{description}</description></project>"),
        ),
        rejected_post(
            "empty_description",
            "Empty description is rejected",
            &format!("<project><name>{name}</name><description></description></project>"),
        ),
        rejected_post(
            "empty_name",
            "Empty name is rejected",
            &format!("<project><name></name><description>{description}</description></project>"),
        ),
        rejected_post(
            "blank_name",
            "Whitespace-only name is rejected",
            &format!("<project><name>   </name><description>{description}</description></project>"),
        ),
        rejected_post(
            "blank_description",
            "Whitespace-only description is rejected",
            &format!("<project><name>{name}</name><description> \t </description></project>"),
        ),
        ContractCase::new(
            Suite::Projects,
            Operation::Post,
            "created",
            "Valid project is created with a Location under the base URL",
        )
        .then(
            ContractStep::new(
                "post",
                RequestSpec::post_xml(var(BASE_URL_VARIABLE), options.project.to_xml()),
            )
            .expect(Assertion::status(201))
            .expect(Assertion::HeaderContains {
                name: "Location".to_string(),
                text: var(BASE_URL_VARIABLE),
            })
            .capture(Capture::location(PROJECT_URL))
            .cleanup(),
        ),
    ]
}

fn put_cases(options: &CatalogOptions) -> Vec<ContractCase> {
    let updated = &options.updated_project;
    let setup = || create_project(&options.project, PROJECT_URL, PROJECT_ID);
    let invalid_id_put = |slug: &str, description: &str, id: &str, statuses: &[u16]| {
        ContractCase::new(Suite::Projects, Operation::Put, slug, description).then(
            ContractStep::new(
                "put",
                RequestSpec::put_xml(var_path(BASE_URL_VARIABLE, id), updated.to_xml()),
            )
            .expect(Assertion::status_one_of(statuses)),
        )
    };

    vec![
        ContractCase::new(
            Suite::Projects,
            Operation::Put,
            "updated",
            "Existing project is updated and keeps the new values",
        )
        .given(setup())
        .then(
            ContractStep::new("put", RequestSpec::put_xml(var(PROJECT_URL), updated.to_xml()))
                .expect(Assertion::status_one_of(&[200, 204])),
        )
        .then(
            ContractStep::new("get updated", RequestSpec::get(var(PROJECT_URL)))
                .expect(Assertion::status(200))
                .expect(Assertion::xml_element("name", updated.name.as_str()))
                .expect(Assertion::xml_element("description", updated.description.as_str())),
        ),
        invalid_id_put(
            "negative_id",
            "PUT on a negative id is refused",
            NEGATIVE_ID,
            options.invalid_id_put.negative_id(),
        ),
        invalid_id_put(
            "non_numeric_id",
            "PUT on a non-numeric id is refused",
            NON_NUMERIC_ID,
            options.invalid_id_put.non_numeric_id(),
        ),
        ContractCase::new(
            Suite::Projects,
            Operation::Put,
            "empty_name",
            "PUT with an empty name is rejected",
        )
        .given(setup())
        .then(
            ContractStep::new(
                "put",
                RequestSpec::put_xml(
                    var(PROJECT_URL),
                    format!(
                        "<project><name></name><description>{}</description></project>",
                        updated.description
                    ),
                ),
            )
            .expect(Assertion::status(400)),
        ),
        ContractCase::new(
            Suite::Projects,
            Operation::Put,
            "blank_description",
            "PUT with a whitespace-only description is rejected",
        )
        .given(setup())
        .then(
            ContractStep::new(
                "put",
                RequestSpec::put_xml(
                    var(PROJECT_URL),
                    format!(
                        "<project><name>{}</name><description>  </description></project>",
                        updated.name
                    ),
                ),
            )
            .expect(Assertion::status(400)),
        ),
    ]
}

fn get_cases(options: &CatalogOptions) -> Vec<ContractCase> {
    let project = &options.project;
    let not_found = |slug: &str, description: &str, id: &str| {
        ContractCase::new(Suite::Projects, Operation::Get, slug, description).then(
            ContractStep::new("get", RequestSpec::get(var_path(BASE_URL_VARIABLE, id)))
                .expect(Assertion::status(404)),
        )
    };

    vec![
        ContractCase::new(
            Suite::Projects,
            Operation::Get,
            "existing",
            "Existing project is returned with its id and stored values",
        )
        .given(create_project(project, PROJECT_URL, PROJECT_ID))
        .then(
            ContractStep::new("get", RequestSpec::get(var(PROJECT_URL)))
                .expect(Assertion::status(200))
                .expect(Assertion::IsXml)
                .expect(Assertion::XmlRoot {
                    name: PROJECT_ROOT.to_string(),
                })
                .expect(Assertion::XmlAttribute {
                    name: "id".to_string(),
                    expected: var(PROJECT_ID),
                })
                .expect(Assertion::xml_element("name", project.name.as_str()))
                .expect(Assertion::xml_element(
                    "description",
                    project.description.as_str(),
                )),
        ),
        not_found("negative_id", "GET on a negative id is not found", NEGATIVE_ID),
        not_found(
            "non_numeric_id",
            "GET on a non-numeric id is not found",
            NON_NUMERIC_ID,
        ),
        ContractCase::new(
            Suite::Projects,
            Operation::Get,
            "with_meetings",
            "Project with a meeting lists it in a <meetings> container",
        )
        .given(create_project(project, PROJECT_URL, PROJECT_ID))
        .given(create_meeting(&options.meeting))
        .then(
            ContractStep::new("get", RequestSpec::get(var(PROJECT_URL)))
                .expect(Assertion::status(200))
                .expect(Assertion::XmlElementExists {
                    path: MEETINGS_CONTAINER.to_string(),
                })
                .expect(Assertion::xml_element(
                    "meetings/meeting/name",
                    options.meeting.name.as_str(),
                )),
        ),
    ]
}

fn delete_cases(options: &CatalogOptions) -> Vec<ContractCase> {
    let not_found = |slug: &str, description: &str, id: &str| {
        ContractCase::new(Suite::Projects, Operation::Delete, slug, description).then(
            ContractStep::new(
                "delete",
                RequestSpec::delete(var_path(BASE_URL_VARIABLE, id)),
            )
            .expect(Assertion::status(404)),
        )
    };

    vec![
        ContractCase::new(
            Suite::Projects,
            Operation::Delete,
            "existing",
            "Existing project is deleted and then not found",
        )
        .given(create_project(&options.project, PROJECT_URL, PROJECT_ID))
        .then(
            ContractStep::new("get before", RequestSpec::get(var(PROJECT_URL)))
                .expect(Assertion::status(200)),
        )
        .then(
            ContractStep::new("delete", RequestSpec::delete(var(PROJECT_URL)))
                .expect(Assertion::status(200)),
        )
        .then(
            ContractStep::new("get after", RequestSpec::get(var(PROJECT_URL)))
                .expect(Assertion::status(404)),
        ),
        not_found(
            "negative_id",
            "DELETE on a negative id is not found",
            NEGATIVE_ID,
        ),
        not_found(
            "non_numeric_id",
            "DELETE on a non-numeric id is not found",
            NON_NUMERIC_ID,
        ),
        ContractCase::new(
            Suite::Projects,
            Operation::Delete,
            "cascades_to_meetings",
            "Deleting a project removes its meetings",
        )
        .given(create_project(&options.project, PROJECT_URL, PROJECT_ID))
        .given(create_meeting(&options.meeting))
        .then(
            ContractStep::new("delete", RequestSpec::delete(var(PROJECT_URL)))
                .expect(Assertion::status(200)),
        )
        .then(
            ContractStep::new("get meeting", RequestSpec::get(var(MEETING_URL)))
                .expect(Assertion::status(404)),
        ),
    ]
}
