//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use eavesdrop_domain::{ContractSettings, InvalidIdPutPolicy, ReportFormat, SuiteSelection};
use eavesdrop_infrastructure::settings::{SettingsError, validate};

/// Black-box contract checker for the projects and meetings service.
#[derive(Debug, Clone, Parser)]
#[command(name = "eavesdrop-check", version, about)]
pub struct Cli {
    /// Settings file (TOML, YAML or JSON).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Projects collection URL, e.g. http://localhost:8080/assignment4/myeavesdrop/projects/
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Suites to run: projects, meetings or all.
    #[arg(long, default_value = "all")]
    pub suite: SuiteSelection,

    /// Run only cases whose id contains TEXT.
    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Report format: text or json.
    #[arg(long)]
    pub format: Option<ReportFormat>,

    /// Per-request timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Fail any step whose response takes longer than MS milliseconds.
    #[arg(long, value_name = "MS")]
    pub max_response_ms: Option<u64>,

    /// Expect 400 for PUT on `-1` and 404 for PUT on `asdf`.
    #[arg(long)]
    pub strict_put: bool,

    /// Keep the resources created by each case.
    #[arg(long)]
    pub no_cleanup: bool,

    /// Stop after the first case that does not pass.
    #[arg(long)]
    pub stop_on_failure: bool,

    /// Print the selected case ids and exit.
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    /// Applies the flags on top of loaded settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting settings are invalid.
    pub fn apply(&self, mut settings: ContractSettings) -> Result<ContractSettings, SettingsError> {
        if let Some(base_url) = &self.base_url {
            settings.base_url.clone_from(base_url);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            settings.timeout_ms = timeout_ms;
        }
        if self.max_response_ms.is_some() {
            settings.max_response_ms = self.max_response_ms;
        }
        if let Some(format) = self.format {
            settings.format = format;
        }
        if self.strict_put {
            settings.invalid_id_put = InvalidIdPutPolicy::Strict;
        }
        if self.no_cleanup {
            settings.cleanup = false;
        }
        if self.stop_on_failure {
            settings.stop_on_failure = true;
        }
        validate(settings)
    }
}
