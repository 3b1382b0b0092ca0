//! belrich-common: Shared error type, configuration and progress reporting
//! used across all belrich crates.

pub mod config;
pub mod error;
pub mod progress;

pub use config::{Config, CurationConfig, IndraConfig};
pub use error::{BelrichError, Result};
