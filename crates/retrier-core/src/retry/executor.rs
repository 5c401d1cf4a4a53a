//! Retry execution loop
//!
//! Attempts run strictly one after another on the calling thread. The pause
//! between them is the only point where the session can be interrupted.

use std::time::Instant;

use super::error::{AttemptFailure, RetryError};
use super::policy::RetryPolicy;

impl<T, E> RetryPolicy<T, E> {
    /// Run `operation` until it yields an accepted result
    ///
    /// Each attempt either returns `Err(e)`, reported to the observer as
    /// [`AttemptFailure::Operation`], or a value that is checked with the
    /// validity predicate; a rejected value is reported as
    /// [`AttemptFailure::UnexpectedResult`]. Every failed attempt is followed
    /// by a pause of `delay`, including the last one unless the policy was
    /// built with `pause_after_final_attempt(false)`.
    ///
    /// Panics raised by `operation` are not caught.
    ///
    /// # Returns
    ///
    /// The first accepted result, [`RetryError::Exhausted`] once
    /// `max_attempts` attempts have failed, or [`RetryError::Interrupted`] if
    /// a pause was interrupted.
    pub fn execute_with_retry<F>(self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        let start = Instant::now();
        let mut attempt: u32 = 0;
        let mut last_failure: Option<AttemptFailure<E>> = None;

        tracing::debug!(
            max_attempts = self.max_attempts,
            delay_ms = super::millis(self.delay),
            "starting retry session"
        );

        while attempt < self.max_attempts {
            let failure = match operation() {
                Ok(result) if self.accepts(&result) => {
                    attempt += 1;
                    if let Some(observer) = &self.observer {
                        observer.on_success(attempt, start.elapsed());
                    }
                    return Ok(result);
                }
                Ok(_) => AttemptFailure::UnexpectedResult,
                Err(err) => AttemptFailure::Operation(err),
            };
            attempt += 1;

            if let Some(observer) = &self.observer {
                observer.on_failure(attempt, &failure);
            }
            last_failure = Some(failure);

            let is_final = attempt >= self.max_attempts;
            if (!is_final || self.pause_after_final_attempt)
                && self.interrupt.pause(self.delay).is_err()
            {
                tracing::debug!(attempts = attempt, "retry session interrupted");
                if let Some(observer) = &self.observer {
                    observer.on_interrupted(attempt);
                }
                return Err(RetryError::interrupted(attempt, last_failure));
            }
        }

        tracing::debug!(
            attempts = attempt,
            elapsed_ms = super::millis(start.elapsed()),
            "retry session exhausted"
        );
        if let Some(observer) = &self.observer {
            observer.on_exhausted(attempt);
        }
        Err(RetryError::exhausted(attempt, last_failure, start.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::StatsObserver;
    use std::io;
    use std::sync::Arc;
    use std::time::Duration;

    fn quick_policy(max_attempts: u32) -> RetryPolicy<&'static str, io::Error> {
        RetryPolicy::builder()
            .max_attempts(max_attempts)
            .delay(Duration::from_millis(1))
            .build()
    }

    #[test]
    fn test_immediate_success() {
        let mut calls = 0;
        let result = quick_policy(3).execute_with_retry(|| {
            calls += 1;
            Ok("success")
        });

        assert_eq!(result.unwrap(), "success");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_success_after_retry() {
        let observer = Arc::new(StatsObserver::new());
        let mut calls = 0;

        let result = RetryPolicy::builder()
            .max_attempts(3)
            .delay(Duration::from_millis(1))
            .observer(observer.clone())
            .build()
            .execute_with_retry(|| {
                calls += 1;
                if calls < 2 {
                    Err(io::Error::new(io::ErrorKind::TimedOut, "timeout"))
                } else {
                    Ok("success")
                }
            });

        assert_eq!(result.unwrap(), "success");
        assert_eq!(calls, 2);
        assert_eq!(observer.failures(), 1);
        assert_eq!(observer.successes(), 1);
    }

    #[test]
    fn test_all_attempts_exhausted() {
        let observer = Arc::new(StatsObserver::new());

        let result: Result<&str, _> = RetryPolicy::builder()
            .max_attempts(3)
            .delay(Duration::from_millis(1))
            .observer(observer.clone())
            .build()
            .execute_with_retry(|| Err(io::Error::new(io::ErrorKind::TimedOut, "always fails")));

        let err = result.unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(err.attempts(), 3);
        assert_eq!(observer.failures(), 3);
        assert_eq!(observer.exhaustions(), 1);
        assert!(err
            .last_failure()
            .and_then(|f| f.operation_error())
            .is_some_and(|e| e.kind() == io::ErrorKind::TimedOut));
    }

    #[test]
    fn test_zero_max_attempts() {
        let mut calls = 0;
        let result = quick_policy(0).execute_with_retry(|| {
            calls += 1;
            Ok("never")
        });

        let err = result.unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(err.attempts(), 0);
        assert!(err.last_failure().is_none());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_single_attempt() {
        let result = quick_policy(1)
            .execute_with_retry(|| Err(io::Error::other("error")));

        let err = result.unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(err.attempts(), 1);
    }

    #[test]
    fn test_rejected_result_is_unexpected() {
        let result = RetryPolicy::<u32, io::Error>::builder()
            .max_attempts(2)
            .delay(Duration::ZERO)
            .is_valid(|value: &u32| *value > 10)
            .build()
            .execute_with_retry(|| Ok(1));

        let err = result.unwrap_err();
        assert!(err.last_failure().is_some_and(|f| f.is_unexpected_result()));
    }
}
