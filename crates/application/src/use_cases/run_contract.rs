//! Run contract use case

use std::time::Instant;

use chrono::Utc;
use eavesdrop_domain::{
    Assertion, Capture, CaseOutcome, CaseReport, ContractCase, ContractSettings, ContractStep, HttpMethod,
    RequestSpec, ResponseSpec, RunReport, StepPhase, StepReport, TestResults,
    contract::{last_path_segment, resource_url},
    generate_run_id,
};
use tracing::{debug, info, warn};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{HttpClient, ResponseChecker};
use crate::variable_resolver::CaseScope;

/// Run-wide knobs for [`RunContract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Projects collection URL, ending in `/`.
    pub base_url: String,
    /// Timeout applied to every request.
    pub timeout_ms: u64,
    /// Delete resources a case created once it finishes.
    pub cleanup: bool,
    /// Stop after the first case that does not pass.
    pub stop_on_failure: bool,
    /// Response time limit added to every step.
    pub max_response_ms: Option<u64>,
}

impl From<&ContractSettings> for RunOptions {
    fn from(settings: &ContractSettings) -> Self {
        Self {
            base_url: settings.normalized_base_url(),
            timeout_ms: settings.timeout_ms,
            cleanup: settings.cleanup,
            stop_on_failure: settings.stop_on_failure,
            max_response_ms: settings.max_response_ms,
        }
    }
}

/// Runs contract cases one after another against the service.
pub struct RunContract<C, K> {
    client: C,
    checker: K,
    options: RunOptions,
}

impl<C: HttpClient, K: ResponseChecker> RunContract<C, K> {
    /// Creates a new `RunContract` use case.
    pub const fn new(client: C, checker: K, options: RunOptions) -> Self {
        Self {
            client,
            checker,
            options,
        }
    }

    /// Runs every case in order and collects the report.
    pub async fn execute(&self, cases: &[ContractCase]) -> RunReport {
        let run_id = generate_run_id();
        let started_at = Utc::now();
        let started = Instant::now();
        info!(run_id = %run_id, cases = cases.len(), base_url = %self.options.base_url, "starting contract run");

        let mut reports = Vec::with_capacity(cases.len());
        for case in cases {
            let report = self.run_case(case).await;
            let stop = self.options.stop_on_failure && report.outcome != CaseOutcome::Passed;
            reports.push(report);
            if stop {
                info!("stopping after first non-passing case");
                break;
            }
        }

        let report = RunReport::new(
            run_id,
            started_at,
            self.options.base_url.clone(),
            reports,
            elapsed_ms(started),
        );
        info!(
            passed = report.passed,
            failed = report.failed,
            errored = report.errored,
            "contract run finished"
        );
        report
    }

    /// Runs one case with a fresh scope, then cleans up after it.
    pub async fn run_case(&self, case: &ContractCase) -> CaseReport {
        let started = Instant::now();
        let mut scope = CaseScope::new(self.options.base_url.clone());
        let mut created = Vec::new();
        let mut steps = Vec::new();
        let mut outcome = CaseOutcome::Passed;
        let mut message = None;

        let phases = case
            .setup
            .iter()
            .map(|step| (StepPhase::Setup, step))
            .chain(case.steps.iter().map(|step| (StepPhase::Check, step)));

        for (phase, step) in phases {
            let report = self.run_step(step, phase, &mut scope, &mut created).await;
            if !report.passed() {
                outcome = match (phase, &report.error) {
                    (StepPhase::Check, None) => CaseOutcome::Failed,
                    _ => CaseOutcome::Errored,
                };
                message = Some(problem_message(&report));
                steps.push(report);
                break;
            }
            steps.push(report);
        }

        let duration_ms = elapsed_ms(started);
        let cleaned_up = if self.options.cleanup {
            self.cleanup(&case.id, &created).await
        } else {
            0
        };

        match outcome {
            CaseOutcome::Passed => info!(case = %case.id, "PASS"),
            _ => info!(
                case = %case.id,
                outcome = outcome.label(),
                message = message.as_deref().unwrap_or_default(),
                "case did not pass"
            ),
        }

        CaseReport {
            id: case.id.clone(),
            suite: case.suite,
            operation: case.operation,
            description: case.description.clone(),
            outcome,
            steps,
            message,
            duration_ms,
            cleaned_up,
        }
    }

    async fn run_step(
        &self,
        step: &ContractStep,
        phase: StepPhase,
        scope: &mut CaseScope,
        created: &mut Vec<String>,
    ) -> StepReport {
        let mut report = StepReport {
            name: step.name.clone(),
            phase,
            method: step.request.method,
            url: step.request.url.clone(),
            status: None,
            duration_ms: 0,
            results: TestResults::new(Vec::new()),
            error: None,
        };

        let (request, assertions) = match self.resolve_step(step, scope) {
            Ok(resolved) => resolved,
            Err(e) => {
                report.error = Some(e.to_string());
                return report;
            }
        };
        report.url.clone_from(&request.url);

        debug!(method = %request.method, url = %request.url, step = %step.name, "sending request");
        let started = Instant::now();
        let response = match self.client.execute(&request).await {
            Ok(response) => response,
            Err(e) => {
                report.duration_ms = elapsed_ms(started);
                report.error = Some(ApplicationError::from(e).to_string());
                return report;
            }
        };
        report.duration_ms = elapsed_ms(started);
        report.status = Some(response.status);
        debug!(status = response.status, duration_ms = report.duration_ms, "received response");

        // A resource created against expectations still gets deleted.
        if step.cleanup_location
            && response.status_code().is_success()
            && let Some(location) = response.location()
        {
            created.push(location.to_string());
        }

        report.results = self.checker.check(&assertions, &response);
        if report.results.all_passed()
            && let Err(e) = apply_captures(&step.captures, &response, scope)
        {
            report.error = Some(e.to_string());
        }
        report
    }

    fn resolve_step(
        &self,
        step: &ContractStep,
        scope: &CaseScope,
    ) -> ApplicationResult<(RequestSpec, Vec<Assertion>)> {
        let mut request = step.request.clone();
        request.url = scope.resolve_strict(&step.request.url)?;
        request.body.content = scope.resolve_strict(&step.request.body.content)?;
        request.timeout_ms = self.options.timeout_ms;

        let mut assertions = step
            .assertions
            .iter()
            .map(|assertion| scope.resolve_assertion(assertion))
            .collect::<ApplicationResult<Vec<_>>>()?;
        if let Some(max_ms) = self.options.max_response_ms {
            assertions.push(Assertion::ResponseTime { max_ms });
        }
        Ok((request, assertions))
    }

    /// Deletes created resources newest first and returns how many went away.
    async fn cleanup(&self, case_id: &str, created: &[String]) -> usize {
        let mut deleted = 0;
        for url in created.iter().rev() {
            let request =
                RequestSpec::new(HttpMethod::Delete, url).with_timeout_ms(self.options.timeout_ms);
            match self.client.execute(&request).await {
                Ok(response) if response.status_code().is_success() => {
                    debug!(case = case_id, url = %url, "deleted created resource");
                    deleted += 1;
                }
                // Removed by the case itself or by a cascading delete.
                Ok(response) if response.status == 404 => {
                    debug!(case = case_id, url = %url, "created resource already gone");
                }
                Ok(response) => {
                    warn!(case = case_id, url = %url, status = response.status, "cleanup delete was refused");
                }
                Err(e) => warn!(case = case_id, url = %url, error = %e, "cleanup delete failed"),
            }
        }
        deleted
    }
}

/// Stores captured values in the scope.
fn apply_captures(
    captures: &[Capture],
    response: &ResponseSpec,
    scope: &mut CaseScope,
) -> ApplicationResult<()> {
    for capture in captures {
        let missing = |reason: &str| ApplicationError::Capture {
            variable: capture.variable().to_string(),
            reason: reason.to_string(),
        };
        let value = match capture {
            Capture::ResourceUrl { name, .. } => response
                .get_header(name)
                .map(|url| resource_url(url).to_string())
                .ok_or_else(|| missing(&format!("no '{name}' header")))?,
            Capture::LastPathSegment { name, .. } => {
                let header = response
                    .get_header(name)
                    .ok_or_else(|| missing(&format!("no '{name}' header")))?;
                last_path_segment(header)
                    .map(str::to_string)
                    .ok_or_else(|| missing(&format!("'{name}' has no path segment")))?
            }
        };
        scope.set(capture.variable(), value);
    }
    Ok(())
}

fn problem_message(report: &StepReport) -> String {
    if let Some(error) = &report.error {
        return format!("{}: {error}", report.name);
    }
    report.results.first_failure().map_or_else(
        || format!("{}: failed", report.name),
        |failure| {
            let detail = failure.error.as_deref().unwrap_or("assertion failed");
            format!(
                "{}: {} ({detail})",
                report.name,
                failure.assertion.description()
            )
        },
    )
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
