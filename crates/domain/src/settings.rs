//! Run settings.
//!
//! Defines how a contract run is configured. Loading these from files and
//! the environment is an infrastructure concern.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::request::DEFAULT_TIMEOUT_MS;

/// Projects collection URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/assignment4/myeavesdrop/projects/";

/// Expected status for a PUT addressed to a malformed identifier.
///
/// Historical versions of the service disagree: some answer 400 for `-1`
/// and 404 for `asdf`, others answer 404 for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidIdPutPolicy {
    /// Accept 400 or 404 for any malformed identifier.
    #[default]
    Lenient,
    /// Negative ids must answer 400, non-numeric ids 404.
    Strict,
}

impl InvalidIdPutPolicy {
    /// Statuses accepted for a PUT on a negative numeric id.
    #[must_use]
    pub const fn negative_id(self) -> &'static [u16] {
        match self {
            Self::Lenient => &[400, 404],
            Self::Strict => &[400],
        }
    }

    /// Statuses accepted for a PUT on a non-numeric id.
    #[must_use]
    pub const fn non_numeric_id(self) -> &'static [u16] {
        match self {
            Self::Lenient => &[400, 404],
            Self::Strict => &[404],
        }
    }
}

/// Output format for the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// Settings for a contract run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractSettings {
    /// Projects collection URL; always ends in `/` once normalized.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Expected status for PUT on malformed identifiers.
    pub invalid_id_put: InvalidIdPutPolicy,
    /// Delete resources a case created once it finishes.
    pub cleanup: bool,
    /// Stop the run after the first case that does not pass.
    pub stop_on_failure: bool,
    /// Report format.
    pub format: ReportFormat,
    /// Slowest acceptable response; every step checks it when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_response_ms: Option<u64>,
}

impl Default for ContractSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            invalid_id_put: InvalidIdPutPolicy::default(),
            cleanup: true,
            stop_on_failure: false,
            format: ReportFormat::default(),
            max_response_ms: None,
        }
    }
}

impl ContractSettings {
    /// Returns the base URL with exactly one trailing slash.
    #[must_use]
    pub fn normalized_base_url(&self) -> String {
        format!("{}/", self.base_url.trim().trim_end_matches('/'))
    }
}
