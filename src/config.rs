//! Layered configuration.
//!
//! Settings are resolved in order: built-in defaults, an optional config
//! file, then environment variables prefixed with `STATUSWATCH_`. The binary
//! applies command-line overrides on top.
//!
//! ```toml
//! api_url = "https://api.example.com"
//! status_path = "/api/status"
//! ws_url = "wss://api.example.com/ws"
//! environment = "production"
//! poll_interval = "30s"
//! request_timeout = "10s"
//! log_file = "/tmp/statuswatch.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment as EnvSource, File};
use serde::{Deserialize, Serialize};

use crate::data::duration::parse_duration;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "STATUSWATCH";

/// Deployment the panel is pointed at. Display only.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn label(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Resolved panel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the status API.
    pub api_url: String,
    /// Path of the status endpoint, appended to `api_url`.
    pub status_path: String,
    /// Streaming endpoint. Only shown in the debug view.
    pub ws_url: String,
    pub environment: Environment,
    /// Poll period as a duration string ("30s", "500ms").
    pub poll_interval: String,
    /// Per-request timeout as a duration string.
    pub request_timeout: String,
    /// Where to write logs; the terminal belongs to the UI.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            status_path: "/api/status".to_string(),
            ws_url: "ws://localhost:8000/ws".to_string(),
            environment: Environment::Development,
            poll_interval: "30s".to_string(),
            request_timeout: "10s".to_string(),
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file, and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default("status_path", defaults.status_path)?
            .set_default("ws_url", defaults.ws_url)?
            .set_default("environment", defaults.environment.label())?
            .set_default("poll_interval", defaults.poll_interval)?
            .set_default("request_timeout", defaults.request_timeout)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(EnvSource::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to read configuration")?;

        let settings: Settings =
            config.try_deserialize().context("Invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that every field can be used as-is.
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            bail!("api_url must not be empty");
        }
        if self.poll_interval()?.is_zero() {
            bail!("poll_interval must be greater than zero");
        }
        if self.request_timeout()?.is_zero() {
            bail!("request_timeout must be greater than zero");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Result<Duration> {
        parse_duration(&self.poll_interval)
            .with_context(|| format!("Invalid poll_interval '{}'", self.poll_interval))
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        parse_duration(&self.request_timeout)
            .with_context(|| format!("Invalid request_timeout '{}'", self.request_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", body).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.poll_interval().unwrap(), Duration::from_secs(30));
        assert_eq!(settings.request_timeout().unwrap(), Duration::from_secs(10));
        assert_eq!(settings.environment, Environment::Development);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let file = write_config(
            ".toml",
            r#"
            api_url = "https://api.example.com"
            environment = "production"
            poll_interval = "5s"
            log_file = "/tmp/statuswatch.log"
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.api_url, "https://api.example.com");
        assert_eq!(settings.environment, Environment::Production);
        assert_eq!(settings.poll_interval().unwrap(), Duration::from_secs(5));
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/statuswatch.log")));
        // Unset keys fall back to defaults
        assert_eq!(settings.status_path, "/api/status");
    }

    #[test]
    fn test_load_rejects_bad_interval() {
        let file = write_config(".toml", r#"poll_interval = "whenever""#);
        assert!(Settings::load(Some(file.path())).is_err());

        let file = write_config(".toml", r#"poll_interval = "0s""#);
        assert!(Settings::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_env_overrides_file_and_default() {
        // ws_url is read by no other test
        let var = format!("{}_WS_URL", ENV_PREFIX);
        let file = write_config(".toml", r#"ws_url = "ws://from-file/ws""#);

        std::env::set_var(&var, "wss://from-env/ws");
        let from_file = Settings::load(Some(file.path()));
        let from_default = Settings::load(None);
        std::env::remove_var(&var);

        assert_eq!(from_file.unwrap().ws_url, "wss://from-env/ws");
        assert_eq!(from_default.unwrap().ws_url, "wss://from-env/ws");
        assert_eq!(Settings::load(Some(file.path())).unwrap().ws_url, "ws://from-file/ws");
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(Settings::load(Some(Path::new("/nonexistent/statuswatch.toml"))).is_err());
    }

    #[test]
    fn test_environment_labels() {
        assert_eq!(Environment::Development.label(), "development");
        assert_eq!(Environment::Production.label(), "production");
    }
}
