//! Eavesdrop - command line front end
//!
//! Wires the reqwest adapter and the assertion runner into the
//! `RunContract` use case, and turns command-line flags into settings.

mod cli;

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, bail};
use eavesdrop_application::{CatalogOptions, RunContract, RunOptions, all_cases, select_cases};
use eavesdrop_domain::ContractSettings;
use eavesdrop_infrastructure::{ReqwestHttpClient, SettingsLoader, TestRunner, render};
use tracing::info;

pub use cli::Cli;

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every selected case passed.
    Passed,
    /// At least one case failed or errored.
    Failed,
    /// Cases were listed, not run.
    Listed,
}

impl RunStatus {
    /// Returns the process exit code.
    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Passed | Self::Listed => ExitCode::SUCCESS,
            Self::Failed => ExitCode::from(1),
        }
    }
}

/// Loads settings from the optional file and the environment, then applies
/// the command-line overrides.
///
/// # Errors
///
/// Returns an error if a source cannot be read or a value is invalid.
pub fn load_settings(cli: &Cli) -> anyhow::Result<ContractSettings> {
    let mut loader = SettingsLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let settings = loader.load().context("failed to load settings")?;
    cli.apply(settings).context("invalid command-line settings")
}

/// Runs the command and writes the report (or case list) to `out`.
///
/// # Errors
///
/// Returns an error if settings are invalid, no case matches the
/// selection, or the report cannot be written.
pub async fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<RunStatus> {
    let settings = load_settings(cli)?;
    let catalog = CatalogOptions::default().with_invalid_id_put(settings.invalid_id_put);
    let cases = select_cases(all_cases(&catalog), cli.suite, cli.filter.as_deref());
    if cases.is_empty() {
        bail!("no contract case matches the selection");
    }

    if cli.list {
        for case in &cases {
            writeln!(out, "{}  {}", case.id, case.description)?;
        }
        return Ok(RunStatus::Listed);
    }

    let client = ReqwestHttpClient::new().context("failed to build the HTTP client")?;
    let runner = RunContract::new(client, TestRunner::new(), RunOptions::from(&settings));
    info!(
        cases = cases.len(),
        invalid_id_put = ?settings.invalid_id_put,
        "running contract"
    );
    let report = runner.execute(&cases).await;

    out.write_all(render(&report, settings.format)?.as_bytes())?;
    out.flush()?;

    Ok(if report.all_passed() {
        RunStatus::Passed
    } else {
        RunStatus::Failed
    })
}
