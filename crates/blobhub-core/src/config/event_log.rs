//! Blob event log configuration.

use serde::{Deserialize, Serialize};

/// Controls the tracing-backed blob event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogConfig {
    /// Whether blob events are written to the log at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maximum length of the serialized event attributes.
    #[serde(default = "default_max_attribute_chars")]
    pub max_attribute_chars: usize,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_attribute_chars: default_max_attribute_chars(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_attribute_chars() -> usize {
    2048
}
