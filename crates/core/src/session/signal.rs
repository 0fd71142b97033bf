use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::error::SessionError;

/// Result of waiting on a [`StopSignal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// The signal fired; the waiter should stop.
    Stopped,
    /// The timeout elapsed first.
    TimedOut,
}

/// One-shot cross-thread stop request.
///
/// The timed wait is also the poll loop's clock, so no separate timer exists.
#[derive(Debug, Default)]
pub struct StopSignal {
    fired: Mutex<bool>,
    cond: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal and wake every waiter.
    ///
    /// A second call leaves the signal fired and reports
    /// [`SessionError::AlreadySignalled`].
    pub fn signal(&self) -> Result<(), SessionError> {
        let mut fired = self.fired.lock();
        if *fired {
            return Err(SessionError::AlreadySignalled);
        }
        *fired = true;
        self.cond.notify_all();
        Ok(())
    }

    pub fn is_signalled(&self) -> bool {
        *self.fired.lock()
    }

    /// Block for at most `timeout`, returning early once the signal fires.
    pub fn wait_timeout(&self, timeout: Duration) -> Wait {
        let mut fired = self.fired.lock();
        if *fired {
            return Wait::Stopped;
        }
        // Spurious wakeups just end the tick early.
        self.cond.wait_for(&mut fired, timeout);
        if *fired {
            Wait::Stopped
        } else {
            Wait::TimedOut
        }
    }
}
