//! Plain-text report.

use std::fmt::Write;

use eavesdrop_domain::{CaseOutcome, CaseReport, RunReport, StepReport};

/// Renders one line per case, details for cases that did not pass, and a
/// summary line.
#[must_use]
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "contract run {} against {}",
        report.run_id, report.base_url
    );
    let width = report
        .cases
        .iter()
        .map(|case| case.id.len())
        .max()
        .unwrap_or_default();

    for case in &report.cases {
        let _ = writeln!(
            out,
            "{:<5} {:<width$}  {} ({} ms)",
            case.outcome.label(),
            case.id,
            case.description,
            case.duration_ms
        );
        if case.outcome != CaseOutcome::Passed {
            write_details(&mut out, case);
        }
    }

    let _ = writeln!(
        out,
        "{} cases: {} passed, {} failed, {} errored ({} ms)",
        report.total, report.passed, report.failed, report.errored, report.duration_ms
    );
    out
}

fn write_details(out: &mut String, case: &CaseReport) {
    let Some(step) = case.steps.last() else {
        if let Some(message) = &case.message {
            let _ = writeln!(out, "      {message}");
        }
        return;
    };
    let _ = writeln!(out, "      {}", request_line(step));
    if let Some(error) = &step.error {
        let _ = writeln!(out, "      error: {error}");
    }
    for result in step.results.results.iter().filter(|r| !r.passed) {
        let _ = write!(out, "      x {}", result.assertion.description());
        if let Some(error) = &result.error {
            let _ = write!(out, ": {error}");
        }
        out.push('\n');
    }
}

fn request_line(step: &StepReport) -> String {
    let status = step
        .status
        .map_or_else(|| "no response".to_string(), |s| s.to_string());
    format!(
        "{} [{:?}] {} {} -> {status}",
        step.name, step.phase, step.method, step.url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use eavesdrop_domain::{
        Assertion, AssertionResult, HttpMethod, Operation, StepPhase, Suite, TestResults,
    };
    use pretty_assertions::assert_eq;

    fn case(id: &str, outcome: CaseOutcome, steps: Vec<StepReport>) -> CaseReport {
        CaseReport {
            id: id.to_string(),
            suite: Suite::Projects,
            operation: Operation::Put,
            description: "d".to_string(),
            outcome,
            steps,
            message: None,
            duration_ms: 3,
            cleaned_up: 0,
        }
    }

    #[test]
    fn test_render_text() {
        let failing_step = StepReport {
            name: "put".to_string(),
            phase: StepPhase::Check,
            method: HttpMethod::Put,
            url: "http://h/projects/-1".to_string(),
            status: Some(404),
            duration_ms: 1,
            results: TestResults::new(vec![AssertionResult::fail_with_value(
                Assertion::status(400),
                "404",
                "Expected status = 400, got 404",
            )]),
            error: None,
        };
        let report = RunReport::new(
            "run-1",
            Utc::now(),
            "http://h/projects/",
            vec![
                case("projects.put.updated", CaseOutcome::Passed, Vec::new()),
                case("projects.put.negative_id", CaseOutcome::Failed, vec![failing_step]),
            ],
            7,
        );

        assert_eq!(
            render_text(&report),
            "contract run run-1 against http://h/projects/\n\
             PASS  projects.put.updated      d (3 ms)\n\
             FAIL  projects.put.negative_id  d (3 ms)\n      \
             put [Check] PUT http://h/projects/-1 -> 404\n      \
             x Status code = 400: Expected status = 400, got 404\n\
             2 cases: 1 passed, 1 failed, 0 errored (7 ms)\n"
        );
    }
}
