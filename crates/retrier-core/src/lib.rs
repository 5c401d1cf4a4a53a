//! # retrier-core
//!
//! Core library for retrier providing:
//! - A blocking, fixed-delay retry executor with result validation
//! - Failure observers (tracing, statistics, closures)
//! - Interruptible pauses between attempts
//! - YAML configuration for named retry settings (retrier.yaml)

pub mod config;
pub mod error;
pub mod retry;

pub use config::{RetryConfig, RetrySettings};
pub use error::{Error, Result};
pub use retry::{RetryError, RetryPolicy};
