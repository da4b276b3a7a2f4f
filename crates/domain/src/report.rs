//! Run reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::{Operation, Suite};
use crate::request::HttpMethod;
use crate::testing::TestResults;

/// Whether a step belongs to the case setup or to the checked steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPhase {
    /// Prerequisite step.
    Setup,
    /// Checked step.
    Check,
}

/// What happened when one step ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Step label.
    pub name: String,
    /// Setup or check.
    pub phase: StepPhase,
    /// Method sent.
    pub method: HttpMethod,
    /// Resolved URL.
    pub url: String,
    /// Status received, if the request completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Round-trip time in milliseconds.
    pub duration_ms: u64,
    /// Assertion results.
    pub results: TestResults,
    /// Transport or resolution error, if the request never completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepReport {
    /// Returns true if the request completed and every assertion passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.error.is_none() && self.results.all_passed()
    }
}

/// Final state of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseOutcome {
    /// Every checked assertion held.
    Passed,
    /// A checked assertion did not hold.
    Failed,
    /// Setup failed or a request could not be sent.
    Errored,
}

impl CaseOutcome {
    /// Returns the label used in text reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::Errored => "ERROR",
        }
    }
}

/// What happened when one case ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case id.
    pub id: String,
    /// Suite.
    pub suite: Suite,
    /// Operation.
    pub operation: Operation,
    /// Case description.
    pub description: String,
    /// Outcome.
    pub outcome: CaseOutcome,
    /// Steps that ran, in order.
    pub steps: Vec<StepReport>,
    /// Summary of the first problem, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Wall time for the case in milliseconds, cleanup excluded.
    pub duration_ms: u64,
    /// Number of created resources deleted after the case.
    #[serde(default)]
    pub cleaned_up: usize,
}

/// Results of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier.
    pub run_id: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Projects collection URL the run targeted.
    pub base_url: String,
    /// Per-case reports.
    pub cases: Vec<CaseReport>,
    /// Number of cases run.
    pub total: usize,
    /// Number of passed cases.
    pub passed: usize,
    /// Number of failed cases.
    pub failed: usize,
    /// Number of errored cases.
    pub errored: usize,
    /// Wall time for the run in milliseconds.
    pub duration_ms: u64,
}

impl RunReport {
    /// Builds a report and its counters from case reports.
    #[must_use]
    pub fn new(
        run_id: impl Into<String>,
        started_at: DateTime<Utc>,
        base_url: impl Into<String>,
        cases: Vec<CaseReport>,
        duration_ms: u64,
    ) -> Self {
        let count = |outcome| cases.iter().filter(|c| c.outcome == outcome).count();
        let passed = count(CaseOutcome::Passed);
        let failed = count(CaseOutcome::Failed);
        let errored = count(CaseOutcome::Errored);
        Self {
            run_id: run_id.into(),
            started_at,
            base_url: base_url.into(),
            total: cases.len(),
            cases,
            passed,
            failed,
            errored,
            duration_ms,
        }
    }

    /// Returns true if every case passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    /// Returns the cases that did not pass.
    pub fn problems(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases
            .iter()
            .filter(|c| c.outcome != CaseOutcome::Passed)
    }
}
