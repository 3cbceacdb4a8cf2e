//! Application services built on the ports.

mod setup;

pub use setup::{SetupReport, SetupService, ToolVersions};
