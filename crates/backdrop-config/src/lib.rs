//! Configuration for the backdrop tools.
//!
//! Settings persist to disk as RON, support CLI overrides via clap, and
//! detect changes on reload. Every section defaults independently so partial
//! files load.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, PreviewConfig, RunConfig};
pub use error::ConfigError;
