//! Configuration loading and management

mod loader;
mod settings;

pub use loader::{find_config, CONFIG_FILE_NAMES};
pub use settings::{RetryConfig, RetrySettings};
