#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dependencies used by main.rs only
use dotenvy as _;

pub mod error;
pub mod handlers;
pub mod logging;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use error::exit_code;
pub use logging::init_tracing;
pub use parser::Cli;
