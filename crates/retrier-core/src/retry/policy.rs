//! Retry policy construction

use std::fmt;
use std::time::Duration;

use crate::config::RetrySettings;

use super::error::AttemptFailure;
use super::interrupt::{Interrupt, InterruptHandle};
use super::observer::{FnObserver, RetryObserver};

pub(super) type Validator<T> = Box<dyn Fn(&T) -> bool + Send>;
pub(super) type BoxedObserver<E> = Box<dyn RetryObserver<E> + Send>;

/// Immutable configuration for one retry session
///
/// A policy is consumed by [`RetryPolicy::execute_with_retry`], so every
/// session gets a fresh instance and nothing leaks between sessions.
///
/// # Example
///
/// ```rust
/// use retrier_core::retry::{RetryPolicy, TracingObserver};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::<String, std::io::Error>::builder()
///     .max_attempts(5)
///     .delay(Duration::from_millis(200))
///     .is_valid(|body: &String| body.contains("ready"))
///     .observer(TracingObserver::new("readiness"))
///     .build();
///
/// assert_eq!(policy.max_attempts(), 5);
/// ```
pub struct RetryPolicy<T, E> {
    pub(super) max_attempts: u32,
    pub(super) delay: Duration,
    pub(super) pause_after_final_attempt: bool,
    pub(super) is_valid: Option<Validator<T>>,
    pub(super) observer: Option<BoxedObserver<E>>,
    pub(super) interrupt: Interrupt,
}

impl<T, E> RetryPolicy<T, E> {
    /// Create a policy without a failure observer
    ///
    /// `max_attempts` is the total number of attempts, not the number of
    /// retries after the first one.
    pub fn new<P>(max_attempts: u32, delay: Duration, is_valid: P) -> Self
    where
        P: Fn(&T) -> bool + Send + 'static,
    {
        RetryPolicyBuilder::new()
            .max_attempts(max_attempts)
            .delay(delay)
            .is_valid(is_valid)
            .build()
    }

    /// Create a policy whose failed attempts are reported to `observer`
    pub fn with_observer<P, O>(max_attempts: u32, delay: Duration, is_valid: P, observer: O) -> Self
    where
        P: Fn(&T) -> bool + Send + 'static,
        O: RetryObserver<E> + Send + 'static,
    {
        RetryPolicyBuilder::new()
            .max_attempts(max_attempts)
            .delay(delay)
            .is_valid(is_valid)
            .observer(observer)
            .build()
    }

    /// Start building a policy from the defaults
    pub fn builder() -> RetryPolicyBuilder<T, E> {
        RetryPolicyBuilder::new()
    }

    /// Get a handle that interrupts this policy's session while it pauses
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.handle()
    }

    /// Total number of attempts allowed
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Pause between attempts
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether the session also pauses after its last failed attempt
    pub fn pauses_after_final_attempt(&self) -> bool {
        self.pause_after_final_attempt
    }

    /// Whether a failure observer is attached
    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    pub(super) fn accepts(&self, result: &T) -> bool {
        self.is_valid.as_ref().is_none_or(|is_valid| is_valid(result))
    }
}

impl<T, E> fmt::Debug for RetryPolicy<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .field("pause_after_final_attempt", &self.pause_after_final_attempt)
            .field("has_validator", &self.is_valid.is_some())
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

/// Builder for configuring a `RetryPolicy`
///
/// Defaults: 3 attempts, 1 second delay, every result accepted, no observer,
/// and a pause after the final failed attempt.
pub struct RetryPolicyBuilder<T, E> {
    max_attempts: u32,
    delay: Duration,
    pause_after_final_attempt: bool,
    is_valid: Option<Validator<T>>,
    observer: Option<BoxedObserver<E>>,
}

impl<T, E> Default for RetryPolicyBuilder<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> RetryPolicyBuilder<T, E> {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::from_settings(&RetrySettings::default())
    }

    /// Create a builder seeded from configuration
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            delay: settings.delay(),
            pause_after_final_attempt: settings.pause_after_final_attempt,
            is_valid: None,
            observer: None,
        }
    }

    /// Set the total number of attempts
    ///
    /// This counts the first attempt: `max_attempts(3)` runs the operation at
    /// most three times. Zero means the operation never runs.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the fixed pause between attempts
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Choose whether to pause after the last failed attempt before giving up
    pub fn pause_after_final_attempt(mut self, pause: bool) -> Self {
        self.pause_after_final_attempt = pause;
        self
    }

    /// Set the result-validity predicate
    ///
    /// A result is accepted iff the predicate returns true.
    pub fn is_valid<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + 'static,
    {
        self.is_valid = Some(Box::new(predicate));
        self
    }

    /// Set the observer
    ///
    /// The observer receives callbacks during retry execution.
    pub fn observer<O>(mut self, observer: O) -> Self
    where
        O: RetryObserver<E> + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Set a closure to call with every failed attempt's failure
    pub fn on_failure<F>(self, callback: F) -> Self
    where
        F: Fn(&AttemptFailure<E>) + Send + 'static,
        E: 'static,
    {
        self.observer(FnObserver::new(callback))
    }

    /// Build the policy
    pub fn build(self) -> RetryPolicy<T, E> {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: self.delay,
            pause_after_final_attempt: self.pause_after_final_attempt,
            is_valid: self.is_valid,
            observer: self.observer,
            interrupt: Interrupt::new(),
        }
    }
}
