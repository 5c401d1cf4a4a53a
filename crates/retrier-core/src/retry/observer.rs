//! Retry observation and logging
//!
//! This module provides the `RetryObserver` trait for watching a retry session
//! and a `TracingObserver` implementation that logs using the `tracing` crate.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::error::AttemptFailure;

/// Observer trait for retry session events
///
/// Only `on_failure` is required. Observers never influence control flow;
/// they exist for logging, metrics, or debugging.
///
/// # Example
///
/// ```rust
/// use retrier_core::retry::{AttemptFailure, RetryObserver};
///
/// struct MetricsObserver {
///     // Your metrics client here
/// }
///
/// impl<E> RetryObserver<E> for MetricsObserver {
///     fn on_failure(&self, attempt: u32, failure: &AttemptFailure<E>) {
///         // Record failure metric
///     }
/// }
/// ```
pub trait RetryObserver<E> {
    /// Called once for every failed attempt
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number that failed (1-indexed)
    /// * `failure` - The operation's error, or `UnexpectedResult`
    fn on_failure(&self, attempt: u32, failure: &AttemptFailure<E>);

    /// Called when an attempt produced an accepted result
    fn on_success(&self, attempt: u32, total_duration: Duration) {
        let _ = (attempt, total_duration);
    }

    /// Called when the attempt budget ran out
    fn on_exhausted(&self, attempts: u32) {
        let _ = attempts;
    }

    /// Called when a pause was interrupted
    fn on_interrupted(&self, attempts: u32) {
        let _ = attempts;
    }
}

/// A no-op observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl<E> RetryObserver<E> for NoOpObserver {
    fn on_failure(&self, _attempt: u32, _failure: &AttemptFailure<E>) {}
}

/// An observer that forwards each failure to a closure
///
/// This is what [`crate::retry::RetryPolicyBuilder::on_failure`] wraps its
/// argument in.
pub struct FnObserver<F, E> {
    callback: F,
    _phantom: PhantomData<fn(&AttemptFailure<E>)>,
}

impl<F, E> FnObserver<F, E>
where
    F: Fn(&AttemptFailure<E>),
{
    /// Create a new closure-based observer
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            _phantom: PhantomData,
        }
    }
}

impl<F, E> RetryObserver<E> for FnObserver<F, E>
where
    F: Fn(&AttemptFailure<E>),
{
    fn on_failure(&self, _attempt: u32, failure: &AttemptFailure<E>) {
        (self.callback)(failure)
    }
}

/// An observer that logs retry events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_failure`: WARN
/// - `on_success`: INFO (if > 1 attempt) or DEBUG (first attempt)
/// - `on_exhausted`: ERROR
/// - `on_interrupted`: WARN
///
/// # Example
///
/// ```rust
/// use retrier_core::retry::TracingObserver;
///
/// // Create with operation name for better log context
/// let observer = TracingObserver::new("health-check");
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the operation being retried (for log context)
    operation: String,
}

impl TracingObserver {
    /// Create a new tracing observer
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    /// Get the operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("retry")
    }
}

impl<E: fmt::Display> RetryObserver<E> for TracingObserver {
    fn on_failure(&self, attempt: u32, failure: &AttemptFailure<E>) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            unexpected_result = failure.is_unexpected_result(),
            error = %failure,
            "attempt failed"
        );
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt = attempt,
                total_duration_ms = super::millis(total_duration),
                "succeeded after retry"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = super::millis(total_duration),
                "succeeded on first attempt"
            );
        }
    }

    fn on_exhausted(&self, attempts: u32) {
        tracing::error!(
            operation = %self.operation,
            attempts = attempts,
            "all retry attempts exhausted"
        );
    }

    fn on_interrupted(&self, attempts: u32) {
        tracing::warn!(
            operation = %self.operation,
            attempts = attempts,
            "retry interrupted while waiting"
        );
    }
}

/// An observer that collects statistics about a retry session
///
/// Useful for testing and metrics collection. Share it through an `Arc`.
#[derive(Debug, Default)]
pub struct StatsObserver {
    /// Failed attempts, both kinds
    pub failures: AtomicU32,
    /// Failed attempts caused by an operation error
    pub operation_errors: AtomicU32,
    /// Failed attempts caused by a rejected result
    pub unexpected_results: AtomicU32,
    /// Success events
    pub successes: AtomicU32,
    /// Exhaustion events
    pub exhaustions: AtomicU32,
    /// Interruption events
    pub interruptions: AtomicU32,
}

impl StatsObserver {
    /// Create a new stats observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of failed attempts
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    /// Get the number of attempts that failed with an operation error
    pub fn operation_errors(&self) -> u32 {
        self.operation_errors.load(Ordering::SeqCst)
    }

    /// Get the number of attempts whose result was rejected
    pub fn unexpected_results(&self) -> u32 {
        self.unexpected_results.load(Ordering::SeqCst)
    }

    /// Get the number of successes
    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    /// Get the number of exhaustions
    pub fn exhaustions(&self) -> u32 {
        self.exhaustions.load(Ordering::SeqCst)
    }

    /// Get the number of interruptions
    pub fn interruptions(&self) -> u32 {
        self.interruptions.load(Ordering::SeqCst)
    }
}

impl<E> RetryObserver<E> for StatsObserver {
    fn on_failure(&self, _attempt: u32, failure: &AttemptFailure<E>) {
        self.failures.fetch_add(1, Ordering::SeqCst);
        match failure {
            AttemptFailure::Operation(_) => self.operation_errors.fetch_add(1, Ordering::SeqCst),
            AttemptFailure::UnexpectedResult => {
                self.unexpected_results.fetch_add(1, Ordering::SeqCst)
            }
        };
    }

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(&self, _attempts: u32) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }

    fn on_interrupted(&self, _attempts: u32) {
        self.interruptions.fetch_add(1, Ordering::SeqCst);
    }
}

/// Implement RetryObserver for Arc<T> where T: RetryObserver
impl<E, T: RetryObserver<E> + ?Sized> RetryObserver<E> for std::sync::Arc<T> {
    fn on_failure(&self, attempt: u32, failure: &AttemptFailure<E>) {
        (**self).on_failure(attempt, failure)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_exhausted(&self, attempts: u32) {
        (**self).on_exhausted(attempts)
    }

    fn on_interrupted(&self, attempts: u32) {
        (**self).on_interrupted(attempts)
    }
}

/// Implement RetryObserver for Box<T> where T: RetryObserver
impl<E, T: RetryObserver<E> + ?Sized> RetryObserver<E> for Box<T> {
    fn on_failure(&self, attempt: u32, failure: &AttemptFailure<E>) {
        (**self).on_failure(attempt, failure)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_exhausted(&self, attempts: u32) {
        (**self).on_exhausted(attempts)
    }

    fn on_interrupted(&self, attempts: u32) {
        (**self).on_interrupted(attempts)
    }
}
