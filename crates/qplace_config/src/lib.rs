//! Parsing and validation of `qplace.toml` placer configuration files.
//!
//! Produces a strongly-typed [`PlacerConfig`]. Every section is optional, so
//! an empty file (or no file at all, via [`PlacerConfig::default`]) yields the
//! standard clique-weighted, net-weight-anchored, auto-selected solve.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
