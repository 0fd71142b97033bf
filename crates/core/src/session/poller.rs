use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::{debug, error, trace};

use crate::{error::SessionError, transport::Transport};

use super::{
    link::Link,
    signal::{StopSignal, Wait},
};

/// Default cadence of the background receive loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

const POLL_THREAD_NAME: &str = "tcplink-poll";

/// Spawns and drives the background receive loop.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Poller {
    interval: Duration,
    stack_size: Option<usize>,
}

impl Poller {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            stack_size: None,
        }
    }

    /// Request a specific worker stack size; an unsatisfiable one makes
    /// `spawn` fail.
    #[cfg(test)]
    pub(crate) fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the worker thread. It runs until `signal` fires or the loop
    /// hits an internal fault.
    pub(crate) fn spawn<T: Transport>(
        &self,
        signal: Arc<StopSignal>,
        link: Arc<Link<T>>,
    ) -> Result<JoinHandle<()>, SessionError> {
        let interval = self.interval;
        let mut builder = thread::Builder::new().name(POLL_THREAD_NAME.to_string());
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }
        builder
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    run(&signal, interval, &link);
                }));
                if outcome.is_err() {
                    error!(endpoint = %link.endpoint, "Poll loop panicked; polling stopped");
                }
            })
            .map_err(SessionError::Spawn)
    }
}

/// Receive every `interval` until `signal` fires.
///
/// Losses do not end the loop; while disconnected the tick is skipped until a
/// reconnect flips the state back.
pub(crate) fn run<T: Transport>(signal: &StopSignal, interval: Duration, link: &Link<T>) {
    debug!(endpoint = %link.endpoint, ?interval, "Poll loop started");
    while signal.wait_timeout(interval) == Wait::TimedOut {
        if link.state.is_connected() {
            link.drain();
        } else {
            trace!(endpoint = %link.endpoint, "Poll skipped; not connected");
        }
    }
    debug!(endpoint = %link.endpoint, "Poll loop stopped");
}
