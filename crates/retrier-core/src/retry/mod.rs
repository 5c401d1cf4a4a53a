//! Fixed-delay retry execution
//!
//! This module provides a small, blocking retry engine. A [`RetryPolicy`]
//! bundles an attempt budget, a fixed pause, a result-validity predicate and an
//! optional failure observer, and is consumed by a single call to
//! [`RetryPolicy::execute_with_retry`].
//!
//! # Features
//!
//! - Bounded attempts (`max_attempts` counts every attempt, including the first)
//! - Fixed delay between attempts, interruptible from another thread
//! - Result validation: a rejected result is retried like an error
//! - Observable failures via the `RetryObserver` trait
//! - Built-in `TracingObserver` for logging and `StatsObserver` for counting
//!
//! # Example
//!
//! ```rust
//! use retrier_core::retry::{RetryError, RetryPolicy};
//! use std::time::Duration;
//!
//! fn example() -> Result<u32, RetryError<std::io::Error>> {
//!     let policy = RetryPolicy::builder()
//!         .max_attempts(3)
//!         .delay(Duration::from_millis(10))
//!         .is_valid(|value: &u32| *value > 0)
//!         .build();
//!
//!     policy.execute_with_retry(|| Ok(42))
//! }
//! # assert_eq!(example().unwrap(), 42);
//! ```

mod error;
mod executor;
mod interrupt;
mod observer;
mod policy;

pub use error::{AttemptFailure, RetryError};
pub use interrupt::{Interrupt, InterruptHandle, Interrupted};
pub use observer::{FnObserver, NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use policy::{RetryPolicy, RetryPolicyBuilder};

use std::time::Duration;

/// Whole milliseconds of `duration` for log fields, saturating at `u64::MAX`
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
