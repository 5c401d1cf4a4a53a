//! Retry settings as they appear in retrier.yaml

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{Error, Result};

/// Retry settings for one operation
///
/// `max-attempts` is the total number of attempts, the first one included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RetrySettings {
    /// Total number of attempts (not retries)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Pause once more after the last failed attempt before giving up
    #[serde(default = "default_pause_after_final_attempt")]
    pub pause_after_final_attempt: bool,
}

impl RetrySettings {
    /// Delay between attempts as a `Duration`
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
            pause_after_final_attempt: default_pause_after_final_attempt(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_delay_ms() -> u64 {
    1000
}
fn default_pause_after_final_attempt() -> bool {
    true
}

/// Top-level contents of retrier.yaml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RetryConfig {
    /// Settings used when no named operation matches
    #[serde(default)]
    pub default: RetrySettings,

    /// Per-operation settings
    #[serde(default)]
    pub operations: BTreeMap<String, RetrySettings>,
}

impl RetryConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: RetryConfig = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Settings for a named operation, falling back to the default entry
    pub fn settings_for(&self, operation: Option<&str>) -> &RetrySettings {
        operation
            .and_then(|name| self.operations.get(name))
            .unwrap_or(&self.default)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.operations.keys().find(|name| name.trim().is_empty()) {
            return Err(Error::invalid_config(format!(
                "operation name must not be empty (got {:?})",
                name
            )));
        }
        Ok(())
    }
}
