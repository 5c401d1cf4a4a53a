//! Interruptible pauses between attempts
//!
//! Each [`Interrupt`] owns a single-slot channel. [`InterruptHandle`]s hold the
//! sending half and may be moved to other threads or signal handlers. A pause
//! is a timed receive: timing out means the delay elapsed, receiving a message
//! means somebody asked the session to stop.

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::fmt;
use std::time::Duration;

/// Marker returned when a pause was cut short by an interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interrupted while pausing between attempts")
    }
}

impl std::error::Error for Interrupted {}

/// Receiving side of an interrupt signal, owned by one retry session
pub struct Interrupt {
    // Held so the channel can never disconnect while the session is alive.
    sender: Sender<()>,
    receiver: Receiver<()>,
}

impl Interrupt {
    /// Create a new, un-signalled interrupt
    pub fn new() -> Self {
        let (sender, receiver) = channel::bounded(1);
        Self { sender, receiver }
    }

    /// Get a handle that can interrupt this session from elsewhere
    pub fn handle(&self) -> InterruptHandle {
        InterruptHandle {
            sender: self.sender.clone(),
        }
    }

    /// Block the current thread for `delay`
    ///
    /// Returns `Err(Interrupted)` as soon as an interrupt is raised, or
    /// immediately if one was raised before the pause began. A zero delay
    /// returns `Ok(())` without looking at the channel.
    pub fn pause(&self, delay: Duration) -> Result<(), Interrupted> {
        if delay.is_zero() {
            return Ok(());
        }

        match self.receiver.recv_timeout(delay) {
            Ok(()) => Err(Interrupted),
            Err(RecvTimeoutError::Timeout) => Ok(()),
            // Unreachable while `self.sender` lives.
            Err(RecvTimeoutError::Disconnected) => Err(Interrupted),
        }
    }

    /// Check whether an interrupt is pending, without consuming it
    pub fn is_pending(&self) -> bool {
        !self.receiver.is_empty()
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interrupt")
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Cloneable handle that interrupts a retry session's pause
///
/// # Example
///
/// ```rust
/// use retrier_core::retry::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .max_attempts(5)
///     .delay(Duration::from_secs(60))
///     .build();
/// let handle = policy.interrupt_handle();
///
/// // Raised before the first pause, so the session stops after attempt 1
/// handle.interrupt();
/// let result = policy.execute_with_retry(|| Err::<(), _>(std::io::Error::other("down")));
/// assert!(result.unwrap_err().is_interrupted());
/// ```
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    sender: Sender<()>,
}

impl InterruptHandle {
    /// Raise the interrupt
    ///
    /// Repeated calls before the session observes the signal coalesce into one.
    pub fn interrupt(&self) {
        match self.sender.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => {
                tracing::debug!("interrupt raised after the retry session ended");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_pause_waits_for_delay() {
        let interrupt = Interrupt::new();
        let start = Instant::now();

        assert_eq!(interrupt.pause(Duration::from_millis(30)), Ok(()));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_zero_pause_returns_immediately() {
        let interrupt = Interrupt::new();
        interrupt.handle().interrupt();

        // Zero pauses are not interruption points
        assert_eq!(interrupt.pause(Duration::ZERO), Ok(()));
        assert!(interrupt.is_pending());
    }

    #[test]
    fn test_pending_interrupt_aborts_pause() {
        let interrupt = Interrupt::new();
        interrupt.handle().interrupt();

        let start = Instant::now();
        assert_eq!(interrupt.pause(Duration::from_secs(10)), Err(Interrupted));
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(!interrupt.is_pending());
    }

    #[test]
    fn test_interrupt_from_other_thread() {
        let interrupt = Interrupt::new();
        let handle = interrupt.handle();

        let raiser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.interrupt();
        });

        let start = Instant::now();
        assert_eq!(interrupt.pause(Duration::from_secs(10)), Err(Interrupted));
        assert!(start.elapsed() < Duration::from_secs(5));
        raiser.join().unwrap();
    }

    #[test]
    fn test_repeated_interrupts_coalesce() {
        let interrupt = Interrupt::new();
        let handle = interrupt.handle();
        handle.interrupt();
        handle.clone().interrupt();
        handle.interrupt();

        assert_eq!(interrupt.pause(Duration::from_secs(10)), Err(Interrupted));
        assert_eq!(interrupt.pause(Duration::from_millis(5)), Ok(()));
    }

    #[test]
    fn test_interrupt_after_session_dropped() {
        let handle = Interrupt::new().handle();
        // Receiver is gone; the signal is logged and dropped
        handle.interrupt();
        handle.interrupt();
    }
}
