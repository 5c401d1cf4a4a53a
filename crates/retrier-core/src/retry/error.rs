//! Error types for the retry executor
//!
//! [`AttemptFailure`] describes why a single attempt failed and is only handed
//! to observers. [`RetryError`] is the terminal outcome a caller sees.

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Why a single attempt failed
#[derive(Debug)]
pub enum AttemptFailure<E> {
    /// The operation itself returned an error
    Operation(E),

    /// The operation returned a value that the validity predicate rejected
    UnexpectedResult,
}

impl<E> AttemptFailure<E> {
    /// Check if the operation returned an error
    pub fn is_operation(&self) -> bool {
        matches!(self, AttemptFailure::Operation(_))
    }

    /// Check if the attempt produced a rejected result
    pub fn is_unexpected_result(&self) -> bool {
        matches!(self, AttemptFailure::UnexpectedResult)
    }

    /// Get a reference to the operation's error, if there was one
    pub fn operation_error(&self) -> Option<&E> {
        match self {
            AttemptFailure::Operation(err) => Some(err),
            AttemptFailure::UnexpectedResult => None,
        }
    }

    /// Get the operation's error, consuming this failure
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            AttemptFailure::Operation(err) => Some(err),
            AttemptFailure::UnexpectedResult => None,
        }
    }

    /// Map the operation error type using a closure
    pub fn map_err<F, E2>(self, f: F) -> AttemptFailure<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            AttemptFailure::Operation(err) => AttemptFailure::Operation(f(err)),
            AttemptFailure::UnexpectedResult => AttemptFailure::UnexpectedResult,
        }
    }
}

impl<E: fmt::Display> fmt::Display for AttemptFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Operation(err) => write!(f, "{}", err),
            AttemptFailure::UnexpectedResult => {
                write!(f, "the execution result is different from the expected result")
            }
        }
    }
}

impl<E: Error + 'static> Error for AttemptFailure<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AttemptFailure::Operation(err) => Some(err),
            AttemptFailure::UnexpectedResult => None,
        }
    }
}

/// Terminal outcome of a failed retry session
///
/// The error type is generic over `E`, the error type of the operation being
/// retried.
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt in the budget failed
    Exhausted {
        /// Number of attempts made (equal to the policy's `max_attempts`)
        attempts: u32,
        /// Failure of the final attempt, `None` when no attempt ran
        last_failure: Option<AttemptFailure<E>>,
        /// Total time spent in the session, pauses included
        total_duration: Duration,
    },

    /// A pause between attempts was interrupted
    Interrupted {
        /// Number of attempts made before the interruption
        attempts: u32,
        /// Failure of the attempt preceding the interrupted pause
        last_failure: Option<AttemptFailure<E>>,
    },
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted {
                attempts,
                last_failure,
                total_duration,
            } => {
                write!(
                    f,
                    "retry exhausted after {} attempts over {:.2}s",
                    attempts,
                    total_duration.as_secs_f64()
                )?;
                if let Some(failure) = last_failure {
                    write!(f, ": {}", failure)?;
                }
                Ok(())
            }
            RetryError::Interrupted {
                attempts,
                last_failure,
            } => {
                write!(f, "retry interrupted after {} attempts", attempts)?;
                if let Some(failure) = last_failure {
                    write!(f, ": {}", failure)?;
                }
                Ok(())
            }
        }
    }
}

impl<E: Error + 'static> Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.last_failure().map(|failure| failure as &(dyn Error + 'static))
    }
}

impl<E> RetryError<E> {
    /// Create a new exhausted error
    pub fn exhausted(
        attempts: u32,
        last_failure: Option<AttemptFailure<E>>,
        total_duration: Duration,
    ) -> Self {
        RetryError::Exhausted {
            attempts,
            last_failure,
            total_duration,
        }
    }

    /// Create a new interrupted error
    pub fn interrupted(attempts: u32, last_failure: Option<AttemptFailure<E>>) -> Self {
        RetryError::Interrupted {
            attempts,
            last_failure,
        }
    }

    /// Get the number of attempts made
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
            RetryError::Interrupted { attempts, .. } => *attempts,
        }
    }

    /// Check if this error indicates all attempts were exhausted
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    /// Check if this error indicates an interrupted pause
    pub fn is_interrupted(&self) -> bool {
        matches!(self, RetryError::Interrupted { .. })
    }

    /// Get a reference to the last attempt's failure
    pub fn last_failure(&self) -> Option<&AttemptFailure<E>> {
        match self {
            RetryError::Exhausted { last_failure, .. } => last_failure.as_ref(),
            RetryError::Interrupted { last_failure, .. } => last_failure.as_ref(),
        }
    }

    /// Get the last attempt's failure, consuming this error
    pub fn into_last_failure(self) -> Option<AttemptFailure<E>> {
        match self {
            RetryError::Exhausted { last_failure, .. } => last_failure,
            RetryError::Interrupted { last_failure, .. } => last_failure,
        }
    }

    /// Map the operation error type using a closure
    pub fn map_err<F, E2>(self, f: F) -> RetryError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            RetryError::Exhausted {
                attempts,
                last_failure,
                total_duration,
            } => RetryError::Exhausted {
                attempts,
                last_failure: last_failure.map(|failure| failure.map_err(f)),
                total_duration,
            },
            RetryError::Interrupted {
                attempts,
                last_failure,
            } => RetryError::Interrupted {
                attempts,
                last_failure: last_failure.map(|failure| failure.map_err(f)),
            },
        }
    }
}
