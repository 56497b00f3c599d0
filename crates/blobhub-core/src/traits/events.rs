//! Event sink trait for fire-and-forget observability.

use crate::events::BlobEvent;
use crate::result::AppResult;

/// Receives blob events.
///
/// Callers discard the returned error; a failing sink must never change
/// the outcome of the operation that produced the event.
pub trait EventSink: Send + Sync + std::fmt::Debug + 'static {
    /// Record a single event.
    fn record(&self, event: &BlobEvent) -> AppResult<()>;
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record(&self, _event: &BlobEvent) -> AppResult<()> {
        Ok(())
    }
}
