//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the setup service expects from
//! infrastructure. They contain no process or terminal details.

pub mod command_runner;
pub mod event_sink;

pub use command_runner::CommandRunner;
pub use event_sink::{NoopEventSink, SetupEventSink};
