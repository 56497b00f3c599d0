//! Tracing-backed blob event log.

use tracing::debug;

use blobhub_core::config::event_log::EventLogConfig;
use blobhub_core::events::BlobEvent;
use blobhub_core::result::AppResult;
use blobhub_core::traits::events::EventSink;

/// Writes blob events to the `blobhub::events` log target at debug level.
///
/// Each event is rendered as `S3 <type>: <json>`, with the JSON cut to
/// `max_attribute_chars` characters.
#[derive(Debug, Clone)]
pub struct TracingEventSink {
    enabled: bool,
    max_attribute_chars: usize,
}

impl TracingEventSink {
    /// Creates a sink from the event log configuration.
    pub fn from_config(config: &EventLogConfig) -> Self {
        Self {
            enabled: config.enabled,
            max_attribute_chars: config.max_attribute_chars,
        }
    }

    /// Render the log line for an event.
    pub fn format(&self, event: &BlobEvent) -> AppResult<String> {
        let json = serde_json::to_string(event)?;
        let attributes: String = json.chars().take(self.max_attribute_chars).collect();
        Ok(format!("S3 {}: {attributes}", event.event_type()))
    }
}

impl Default for TracingEventSink {
    fn default() -> Self {
        Self::from_config(&EventLogConfig::default())
    }
}

impl EventSink for TracingEventSink {
    fn record(&self, event: &BlobEvent) -> AppResult<()> {
        if !self.enabled {
            return Ok(());
        }
        let line = self.format(event)?;
        debug!(target: "blobhub::events", key = event.key(), "{line}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        let sink = TracingEventSink::default();
        let line = sink
            .format(&BlobEvent::Get {
                key: "7/x".to_string(),
            })
            .unwrap();
        assert_eq!(line, r#"S3 get: {"type":"get","key":"7/x"}"#);
    }

    #[test]
    fn test_format_truncates_attributes() {
        let sink = TracingEventSink::from_config(&EventLogConfig {
            enabled: true,
            max_attribute_chars: 10,
        });
        let line = sink
            .format(&BlobEvent::Put {
                key: "1/".to_string() + &"k".repeat(100),
                size_bytes: 1,
            })
            .unwrap();
        assert_eq!(line, r#"S3 put: {"type":"p"#);
    }

    #[test]
    fn test_disabled_sink_records_nothing() {
        let sink = TracingEventSink::from_config(&EventLogConfig {
            enabled: false,
            max_attribute_chars: 2048,
        });
        assert!(
            sink.record(&BlobEvent::Get {
                key: "1/a".to_string()
            })
            .is_ok()
        );
    }
}
