//! Daemon configuration: a TOML file merged with CLI flags and env vars.

use accord_governance::LedgerConfig;
use accord_session::SessionConfig;
use accord_utils::LogFormat;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccordConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AccordConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            ledger: LedgerConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl AccordConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Apply CLI/env overrides on top of file (or default) settings.
    pub fn merge(mut self, log_level: Option<String>, log_format: Option<LogFormat>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        if let Some(format) = log_format {
            self.log_format = format;
        }
        self
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
