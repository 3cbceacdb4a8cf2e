//! Sink for setup progress events.

use crate::events::SetupEvent;

/// Receives progress events from the setup service.
///
/// # Implementations
///
/// - `NoopEventSink` - for tests and callers that only want the report
/// - the CLI's console sink, which prints `[INFO]` lines
pub trait SetupEventSink {
    fn emit(&self, event: SetupEvent);
}

/// A sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl SetupEventSink for NoopEventSink {
    fn emit(&self, _event: SetupEvent) {}
}
