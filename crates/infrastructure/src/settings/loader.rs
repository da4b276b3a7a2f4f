use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use eavesdrop_domain::ContractSettings;
use thiserror::Error;
use url::Url;

/// Prefix for settings taken from the environment.
pub const DEFAULT_ENV_PREFIX: &str = "EAVESDROP";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file does not exist.
    #[error("settings file not found: {0}")]
    FileNotFound(PathBuf),

    /// A source could not be read or did not match the settings shape.
    #[error("failed to load settings: {0}")]
    Load(String),

    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Another value is out of range.
    #[error("invalid setting: {0}")]
    Invalid(String),
}

impl From<config::ConfigError> for SettingsError {
    fn from(err: config::ConfigError) -> Self {
        Self::Load(err.to_string())
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Load(err.to_string())
    }
}

/// Builds [`ContractSettings`] from layered sources.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Creates a loader reading defaults and `EAVESDROP_*` variables.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Adds a settings file; its format follows the extension.
    #[must_use]
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Reads environment variables with another prefix.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Loads, validates and normalizes the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable, a value has
    /// the wrong type, or the result fails [`validate`].
    pub fn load(&self) -> Result<ContractSettings, SettingsError> {
        let defaults = serde_json::to_string(&ContractSettings::default())?;
        let mut builder =
            Config::builder().add_source(File::from_str(&defaults, FileFormat::Json));

        if let Some(path) = &self.config_path {
            if !path.exists() {
                return Err(SettingsError::FileNotFound(path.clone()));
            }
            builder = builder.add_source(File::from(path.as_path()));
        }

        // EAVESDROP_BASE_URL, EAVESDROP_CLEANUP=false, ...
        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: ContractSettings = builder.build()?.try_deserialize()?;
        validate(settings)
    }
}

/// Checks the settings and normalizes the base URL to end in `/`.
///
/// # Errors
///
/// Returns `InvalidBaseUrl` for anything but an absolute http(s) URL and
/// `Invalid` for a zero timeout or response time limit.
pub fn validate(mut settings: ContractSettings) -> Result<ContractSettings, SettingsError> {
    let normalized = settings.normalized_base_url();
    let invalid = |reason: String| SettingsError::InvalidBaseUrl {
        url: settings.base_url.clone(),
        reason,
    };
    let url = Url::parse(&normalized).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    if settings.timeout_ms == 0 {
        return Err(SettingsError::Invalid(
            "timeout_ms must be greater than zero".to_string(),
        ));
    }
    if settings.max_response_ms == Some(0) {
        return Err(SettingsError::Invalid(
            "max_response_ms must be greater than zero".to_string(),
        ));
    }
    settings.base_url = normalized;
    Ok(settings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use eavesdrop_domain::{InvalidIdPutPolicy, ReportFormat, settings::DEFAULT_BASE_URL};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    // A prefix no test environment sets, so only the file and defaults apply.
    fn loader() -> SettingsLoader {
        SettingsLoader::new().with_env_prefix("EAVESDROP_SETTINGS_TEST_UNSET")
    }

    fn settings_file(extension: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(extension)
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = loader().load().unwrap();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.timeout_ms, 10_000);
        assert!(settings.cleanup);
        assert_eq!(settings.invalid_id_put, InvalidIdPutPolicy::Lenient);
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        let file = settings_file(
            ".toml",
            r#"
base_url = "http://svc:9090/myeavesdrop/projects"
invalid_id_put = "strict"
cleanup = false
format = "json"
"#,
        );
        let settings = loader().with_file(file.path()).load().unwrap();
        assert_eq!(settings.base_url, "http://svc:9090/myeavesdrop/projects/");
        assert_eq!(settings.invalid_id_put, InvalidIdPutPolicy::Strict);
        assert!(!settings.cleanup);
        assert_eq!(settings.format, ReportFormat::Json);
        assert_eq!(settings.timeout_ms, 10_000);
    }

    #[test]
    fn test_yaml_file() {
        let file = settings_file(".yaml", "timeout_ms: 2500\nstop_on_failure: true\n");
        let settings = loader().with_file(file.path()).load().unwrap();
        assert_eq!(settings.timeout_ms, 2500);
        assert!(settings.stop_on_failure);
    }

    #[test]
    fn test_missing_file() {
        let result = loader().with_file("/nonexistent/eavesdrop.toml").load();
        assert!(matches!(result, Err(SettingsError::FileNotFound(_))));
    }

    #[test]
    fn test_wrong_type_is_a_load_error() {
        let file = settings_file(".toml", "cleanup = \"sometimes\"\n");
        let result = loader().with_file(file.path()).load();
        assert!(matches!(result, Err(SettingsError::Load(_))));
    }

    #[test]
    fn test_validate_rejects_bad_base_urls() {
        for url in ["not a url", "ftp://h/projects/", "http://h/projects?x=1"] {
            let settings = ContractSettings {
                base_url: url.to_string(),
                ..ContractSettings::default()
            };
            assert!(
                matches!(validate(settings), Err(SettingsError::InvalidBaseUrl { .. })),
                "{url}"
            );
        }
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let settings = ContractSettings {
            timeout_ms: 0,
            ..ContractSettings::default()
        };
        assert!(matches!(validate(settings), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_zero_response_limit() {
        let settings = ContractSettings {
            max_response_ms: Some(0),
            ..ContractSettings::default()
        };
        assert!(matches!(validate(settings), Err(SettingsError::Invalid(_))));
    }
}
