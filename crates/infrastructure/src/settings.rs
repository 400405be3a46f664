//! Runner settings.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional file (TOML, YAML or JSON by extension), then `ASSAY_*`
//! environment variables. Command-line overrides are applied last by the
//! caller through [`RunnerSettings::with_overrides`].

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Prefix of the environment variables read by [`RunnerSettings::load`].
pub const ENV_PREFIX: &str = "ASSAY";

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or a value has the wrong type.
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

/// Settings of a test run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunnerSettings {
    /// Per-case timeout in milliseconds.
    pub timeout_ms: u64,
    /// Per-request HTTP timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Stop after the first failing case.
    pub bail: bool,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Host merged under every suite fixture.
    #[serde(default)]
    pub host: Option<String>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 2_000,
            request_timeout_ms: 10_000,
            bail: false,
            log_filter: "info".to_string(),
            host: None,
        }
    }
}

impl RunnerSettings {
    /// Loads settings from defaults, `file` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `file` cannot be read or a value has the wrong type.
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(file, None)
    }

    /// Like [`RunnerSettings::load`], reading environment variables from
    /// `env` instead of the process environment when given.
    ///
    /// # Errors
    ///
    /// Returns an error if `file` cannot be read or a value has the wrong type.
    pub fn load_with_env(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("timeout_ms", defaults.timeout_ms)?
            .set_default("request_timeout_ms", defaults.request_timeout_ms)?
            .set_default("bail", defaults.bail)?
            .set_default("log_filter", defaults.log_filter)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Applies command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, timeout_ms: Option<u64>, host: Option<String>, bail: bool) -> Self {
        if let Some(timeout_ms) = timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if host.is_some() {
            self.host = host;
        }
        self.bail |= bail;
        self
    }

    /// Per-case timeout.
    #[must_use]
    pub const fn case_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Values merged under every suite fixture.
    #[must_use]
    pub fn fixture_defaults(&self) -> Map<String, Value> {
        let mut defaults = Map::new();
        if let Some(host) = &self.host {
            defaults.insert("host".to_string(), Value::String(host.clone()));
        }
        defaults
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn no_env() -> Option<config::Map<String, String>> {
        Some(config::Map::new())
    }

    #[test]
    fn test_defaults() {
        let settings = RunnerSettings::load_with_env(None, no_env()).unwrap();

        assert_eq!(settings, RunnerSettings::default());
        assert_eq!(settings.case_timeout(), Duration::from_millis(2_000));
    }

    #[test]
    fn test_file_then_env_then_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "timeout_ms = 500\nhost = \"http://from-file\"\nlog_filter = \"debug\"").unwrap();
        let mut env = config::Map::new();
        env.insert("ASSAY_TIMEOUT_MS".to_string(), "750".to_string());
        env.insert("ASSAY_BAIL".to_string(), "true".to_string());

        let settings = RunnerSettings::load_with_env(Some(file.path()), Some(env)).unwrap();

        assert_eq!(settings.timeout_ms, 750);
        assert!(settings.bail);
        assert_eq!(settings.log_filter, "debug");
        assert_eq!(settings.host.as_deref(), Some("http://from-file"));

        let settings = settings.with_overrides(Some(100), Some("http://cli".to_string()), false);
        assert_eq!(settings.timeout_ms, 100);
        assert_eq!(settings.host.as_deref(), Some("http://cli"));
        assert!(settings.bail);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = RunnerSettings::load_with_env(Some(&dir.path().join("absent.toml")), no_env());

        assert!(result.is_err());
    }

    #[test]
    fn test_fixture_defaults_carry_host() {
        let settings = RunnerSettings {
            host: Some("http://localhost:3000".to_string()),
            ..RunnerSettings::default()
        };

        let defaults = settings.fixture_defaults();

        assert_eq!(
            defaults.get("host"),
            Some(&Value::String("http://localhost:3000".to_string()))
        );
        assert!(RunnerSettings::default().fixture_defaults().is_empty());
    }
}
