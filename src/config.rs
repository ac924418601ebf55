use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "CONTACTKIT__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value '{value}' for {key}")]
    InvalidEnv { key: String, value: String },
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ContactFormConfig {
    pub debounce_ms: u64,
    pub submit_latency_ms: u64,
    pub notification_ms: u64,
    pub idle_label: String,
    pub busy_label: String,
    pub success_message: String,
}

impl Default for ContactFormConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            submit_latency_ms: 2_000,
            notification_ms: 5_000,
            idle_label: "Send Message".into(),
            busy_label: "Sending...".into(),
            success_message: "Message sent successfully! I'll get back to you soon.".into(),
        }
    }
}

impl ContactFormConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// File values (when `path` exists) layered under `CONTACTKIT__*`
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) if path.exists() => Self::from_path(path)?,
            _ => Self::default(),
        };
        base.apply_env(std::env::vars())
    }

    pub fn apply_env<I>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(field) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match field.to_ascii_lowercase().as_str() {
                "debounce_ms" => self.debounce_ms = parse_millis(&key, &value)?,
                "submit_latency_ms" => self.submit_latency_ms = parse_millis(&key, &value)?,
                "notification_ms" => self.notification_ms = parse_millis(&key, &value)?,
                "idle_label" => self.idle_label = value,
                "busy_label" => self.busy_label = value,
                "success_message" => self.success_message = value,
                _ => tracing::debug!(%key, "ignoring unknown config override"),
            }
        }
        Ok(self)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn submit_latency(&self) -> Duration {
        Duration::from_millis(self.submit_latency_ms)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidEnv {
            key: key.to_string(),
            value: value.to_string(),
        })
}
