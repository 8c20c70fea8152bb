//! Service configuration.
//!
//! Loaded once at startup from a TOML file. Every section is optional:
//!
//! ```toml
//! log_level = "debug"
//!
//! [watcher]
//! poll_interval_ms = 5000
//!
//! [exit_watch]
//! poll_interval_ms = 5000
//!
//! [injection]
//! on_failure = "retry"      # or "optimistic"
//!
//! [keyboard]
//! release_delay_ms = 50
//!
//! [[hooks]]
//! id = "fhw"
//! window_name = "FPSHomework"
//! ingamemenu_key = 27
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::hook::InjectFailurePolicy;
use crate::registry::Hook;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default log filter; `RUST_LOG` still wins.
    pub log_level: Option<String>,
    pub watcher: PollConfig,
    pub exit_watch: PollConfig,
    pub injection: InjectionConfig,
    pub keyboard: KeyboardConfig,
    pub hooks: Vec<Hook>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub poll_interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5000,
        }
    }
}

impl PollConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InjectionConfig {
    pub on_failure: InjectFailurePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Delay between the synthetic key-down and key-up of `send_key`.
    pub release_delay_ms: u64,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            release_delay_ms: 50,
        }
    }
}

impl KeyboardConfig {
    pub fn release_delay(&self) -> Duration {
        Duration::from_millis(self.release_delay_ms)
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watcher.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "watcher.poll_interval_ms must be greater than zero".into(),
            ));
        }
        if self.exit_watch.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "exit_watch.poll_interval_ms must be greater than zero".into(),
            ));
        }

        let mut seen = HashSet::new();
        for hook in &self.hooks {
            if hook.id.trim().is_empty() {
                return Err(ConfigError::Invalid("hook with an empty id".into()));
            }
            if hook.window_name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "hook {} has an empty window_name",
                    hook.id
                )));
            }
            if !seen.insert(hook.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate hook id {}", hook.id)));
            }
        }
        Ok(())
    }
}
