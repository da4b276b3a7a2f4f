//! End-to-end runs of the contract catalog against the in-process fake.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use clap::Parser;
use common::{FakeService, Quirks};
use eavesdrop::{Cli, RunStatus};
use eavesdrop_application::{CatalogOptions, RunContract, RunOptions, all_cases, select_cases};
use eavesdrop_domain::{CaseOutcome, InvalidIdPutPolicy, RunReport, SuiteSelection};
use eavesdrop_infrastructure::{ReqwestHttpClient, TestRunner, from_json};
use pretty_assertions::assert_eq;

fn options(fake: &FakeService) -> RunOptions {
    RunOptions {
        base_url: fake.base_url().to_string(),
        timeout_ms: 5_000,
        cleanup: true,
        stop_on_failure: false,
        max_response_ms: None,
    }
}

async fn run_catalog(catalog: &CatalogOptions, run: RunOptions) -> RunReport {
    let runner = RunContract::new(ReqwestHttpClient::new().unwrap(), TestRunner::new(), run);
    runner.execute(&all_cases(catalog)).await
}

fn not_passing(report: &RunReport) -> Vec<String> {
    report.problems().map(|case| case.id.clone()).collect()
}

#[tokio::test]
async fn full_catalog_passes_against_conforming_service() {
    let (_server, fake) = FakeService::start(Quirks::default()).await;
    let catalog = CatalogOptions::default();

    let report = run_catalog(&catalog, options(&fake)).await;

    assert_eq!(not_passing(&report), Vec::<String>::new());
    assert_eq!(report.total, all_cases(&catalog).len());
    assert_eq!(report.passed, report.total);
}

#[tokio::test]
async fn cleanup_removes_everything_a_run_creates() {
    let (_server, fake) = FakeService::start(Quirks::default()).await;

    let report = run_catalog(&CatalogOptions::default(), options(&fake)).await;

    assert!(report.all_passed());
    assert!(report.cases.iter().any(|case| case.cleaned_up > 0));
    assert_eq!(fake.project_count(), 0);
    assert_eq!(fake.meeting_count(), 0);
}

#[tokio::test]
async fn no_cleanup_keeps_created_resources() {
    let (_server, fake) = FakeService::start(Quirks::default()).await;
    let run = RunOptions {
        cleanup: false,
        ..options(&fake)
    };

    let report = run_catalog(&CatalogOptions::default(), run).await;

    assert!(report.all_passed());
    assert!(fake.project_count() > 0);
    assert!(report.cases.iter().all(|case| case.cleaned_up == 0));
}

#[tokio::test]
async fn blank_fields_accepted_by_service_are_reported() {
    let quirks = Quirks {
        accept_blank_fields: true,
        ..Quirks::default()
    };
    let (_server, fake) = FakeService::start(quirks).await;

    let report = run_catalog(&CatalogOptions::default(), options(&fake)).await;
    let problems = not_passing(&report);

    for id in [
        "projects.post.empty_name",
        "projects.post.blank_name",
        "projects.post.blank_description",
        "projects.put.empty_name",
        "meetings.post.empty_name",
        "meetings.put.empty_name",
    ] {
        assert!(problems.iter().any(|p| p == id), "{id} not reported");
    }
    assert!(report.failed >= 6);
    assert_eq!(report.errored, 0);
    // Resources the service should have refused are still cleaned up.
    assert_eq!(fake.project_count(), 0);
}

#[tokio::test]
async fn missing_cascade_is_reported() {
    let quirks = Quirks {
        no_cascade: true,
        ..Quirks::default()
    };
    let (_server, fake) = FakeService::start(quirks).await;

    let report = run_catalog(&CatalogOptions::default(), options(&fake)).await;

    assert_eq!(
        not_passing(&report),
        vec![
            "projects.delete.cascades_to_meetings",
            "meetings.put.deleted_project",
            "meetings.get.deleted_project",
            "meetings.delete.deleted_project",
        ]
    );
    let case = &report.cases[report
        .cases
        .iter()
        .position(|c| c.id == "projects.delete.cascades_to_meetings")
        .unwrap()];
    assert_eq!(case.outcome, CaseOutcome::Failed);
    assert_eq!(case.steps.last().unwrap().status, Some(200));
}

#[tokio::test]
async fn meetings_served_through_any_project_are_reported() {
    let quirks = Quirks {
        ignore_meeting_owner: true,
        ..Quirks::default()
    };
    let (_server, fake) = FakeService::start(quirks).await;

    let report = run_catalog(&CatalogOptions::default(), options(&fake)).await;

    assert_eq!(
        not_passing(&report),
        vec![
            "meetings.put.cross_project",
            "meetings.get.cross_project",
            "meetings.delete.cross_project",
        ]
    );
}

#[tokio::test]
async fn meetings_posted_under_deleted_project_are_reported() {
    let quirks = Quirks {
        unchecked_meeting_owner: true,
        ..Quirks::default()
    };
    let (_server, fake) = FakeService::start(quirks).await;

    let report = run_catalog(&CatalogOptions::default(), options(&fake)).await;

    assert_eq!(not_passing(&report), vec!["meetings.post.deleted_project"]);
    let case = report
        .cases
        .iter()
        .find(|c| c.id == "meetings.post.deleted_project")
        .unwrap();
    assert_eq!(case.outcome, CaseOutcome::Failed);
    assert_eq!(case.steps.last().unwrap().status, Some(201));
    assert_eq!(case.cleaned_up, 1);
    assert_eq!(fake.meeting_count(), 0);
}

#[tokio::test]
async fn invalid_id_put_policy() {
    let quirks = Quirks {
        put_invalid_id_not_found: true,
        ..Quirks::default()
    };
    let (_server, fake) = FakeService::start(quirks).await;

    let lenient = run_catalog(&CatalogOptions::default(), options(&fake)).await;
    assert!(lenient.all_passed());

    let strict_catalog =
        CatalogOptions::default().with_invalid_id_put(InvalidIdPutPolicy::Strict);
    let strict = run_catalog(&strict_catalog, options(&fake)).await;
    assert_eq!(
        not_passing(&strict),
        vec!["projects.put.negative_id", "meetings.put.negative_id"]
    );
}

#[tokio::test]
async fn strict_policy_passes_against_historical_service() {
    let (_server, fake) = FakeService::start(Quirks::default()).await;
    let catalog = CatalogOptions::default().with_invalid_id_put(InvalidIdPutPolicy::Strict);

    let report = run_catalog(&catalog, options(&fake)).await;

    assert!(report.all_passed(), "{:?}", not_passing(&report));
}

#[tokio::test]
async fn unreachable_service_errors_every_case() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let run = RunOptions {
        base_url: format!("http://127.0.0.1:{port}/myeavesdrop/projects/"),
        timeout_ms: 2_000,
        cleanup: true,
        stop_on_failure: false,
        max_response_ms: None,
    };
    let cases = select_cases(
        all_cases(&CatalogOptions::default()),
        SuiteSelection::Projects,
        Some(".get."),
    );
    let runner = RunContract::new(ReqwestHttpClient::new().unwrap(), TestRunner::new(), run);

    let report = runner.execute(&cases).await;

    assert_eq!(report.errored, cases.len());
    assert!(report.cases.iter().all(|c| c.message.is_some()));
}

#[tokio::test]
async fn stop_on_failure_halts_the_run() {
    let quirks = Quirks {
        accept_blank_fields: true,
        ..Quirks::default()
    };
    let (_server, fake) = FakeService::start(quirks).await;
    let run = RunOptions {
        stop_on_failure: true,
        ..options(&fake)
    };

    let report = run_catalog(&CatalogOptions::default(), run).await;

    assert_eq!(report.failed, 1);
    assert_eq!(report.cases.last().unwrap().id, "projects.post.empty_description");
}

#[tokio::test]
async fn cli_writes_json_report() {
    let (_server, fake) = FakeService::start(Quirks::default()).await;
    let cli = Cli::try_parse_from([
        "eavesdrop-check",
        "--base-url",
        fake.base_url(),
        "--suite",
        "meetings",
        "--filter",
        ".get.",
        "--format",
        "json",
    ])
    .unwrap();
    let mut out = Vec::new();

    let status = eavesdrop::run(&cli, &mut out).await.unwrap();

    assert_eq!(status, RunStatus::Passed);
    let report: RunReport = from_json(&String::from_utf8(out).unwrap()).unwrap();
    assert_eq!(report.base_url, fake.base_url());
    assert!(report.total > 0);
    assert!(report.cases.iter().all(|c| c.id.starts_with("meetings.get.")));
}

#[tokio::test]
async fn cli_text_report_and_failure_status() {
    let quirks = Quirks {
        no_cascade: true,
        ..Quirks::default()
    };
    let (_server, fake) = FakeService::start(quirks).await;
    let cli = Cli::try_parse_from([
        "eavesdrop-check",
        "--base-url",
        fake.base_url(),
        "--filter",
        "projects.delete.",
    ])
    .unwrap();
    let mut out = Vec::new();

    let status = eavesdrop::run(&cli, &mut out).await.unwrap();

    assert_eq!(status, RunStatus::Failed);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("FAIL  projects.delete.cascades_to_meetings"));
    assert!(text.contains("PASS  projects.delete.existing"));
}

#[tokio::test]
async fn cli_lists_cases_without_sending_requests() {
    let cli = Cli::try_parse_from([
        "eavesdrop-check",
        "--base-url",
        "http://127.0.0.1:9/myeavesdrop/projects/",
        "--suite",
        "projects",
        "--list",
    ])
    .unwrap();
    let mut out = Vec::new();

    let status = eavesdrop::run(&cli, &mut out).await.unwrap();

    assert_eq!(status, RunStatus::Listed);
    let listing = String::from_utf8(out).unwrap();
    assert!(listing.lines().all(|line| line.starts_with("projects.")));
    assert!(listing.contains("projects.post.empty_body"));
}

#[tokio::test]
async fn cli_rejects_a_selection_with_no_cases() {
    let cli = Cli::try_parse_from([
        "eavesdrop-check",
        "--filter",
        "no-such-case",
        "--list",
    ])
    .unwrap();
    assert!(eavesdrop::run(&cli, &mut Vec::new()).await.is_err());
}

#[tokio::test]
async fn cli_reads_settings_file() {
    let (_server, fake) = FakeService::start(Quirks::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eavesdrop.toml");
    std::fs::write(
        &path,
        format!(
            "base_url = \"{}\"\nformat = \"json\"\ncleanup = false\n",
            fake.base_url()
        ),
    )
    .unwrap();
    let cli = Cli::try_parse_from([
        "eavesdrop-check",
        "--config",
        path.to_str().unwrap(),
        "--filter",
        "projects.post.created",
    ])
    .unwrap();
    let mut out = Vec::new();

    let status = eavesdrop::run(&cli, &mut out).await.unwrap();

    assert_eq!(status, RunStatus::Passed);
    let report: RunReport = from_json(&String::from_utf8(out).unwrap()).unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(fake.project_count(), 1);
}
