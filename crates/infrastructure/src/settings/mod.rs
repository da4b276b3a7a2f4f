//! Settings loading.
//!
//! Layers, lowest precedence first: built-in defaults, an optional settings
//! file, then `EAVESDROP_*` environment variables. Command-line flags are
//! applied by the binary on top of the result.

mod loader;

pub use loader::{DEFAULT_ENV_PREFIX, SettingsError, SettingsLoader, validate};
