use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::JoinHandle,
    time::Duration,
};

use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::{
    config::AppConfig,
    error::SessionError,
    events::{EventSink, SessionEvent},
    models::{Endpoint, TransportResult, TransportStatus},
    transport::Transport,
};

use super::{
    link::Link,
    poller::{Poller, DEFAULT_POLL_INTERVAL},
    signal::StopSignal,
};

/// Observable phase of a [`SessionManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Not connected.
    Idle,
    /// An open request is in flight.
    Connecting,
    /// The transport reported a successful open and no loss since.
    Connected,
}

/// Supervises one logical connection: opens it, forwards outbound data,
/// drains inbound data on a background thread and tears everything down.
///
/// `connect` and `shutdown` are serialised against each other, so at most one
/// poll thread exists per manager. Dropping the manager runs `shutdown`.
pub struct SessionManager<T: Transport> {
    link: Arc<Link<T>>,
    signal: Arc<StopSignal>,
    poller: Poller,
    // Held for the whole of connect/shutdown; `worker` only for slot access.
    lifecycle: Mutex<()>,
    worker: Mutex<Option<JoinHandle<()>>>,
    connecting: AtomicBool,
}

impl<T: Transport> SessionManager<T> {
    /// Create an idle manager for `endpoint`.
    pub fn new(endpoint: Endpoint, transport: T, events: impl EventSink) -> Self {
        Self {
            link: Arc::new(Link::new(endpoint, transport, Box::new(events))),
            signal: Arc::new(StopSignal::new()),
            poller: Poller::new(DEFAULT_POLL_INTERVAL),
            lifecycle: Mutex::new(()),
            worker: Mutex::new(None),
            connecting: AtomicBool::new(false),
        }
    }

    /// Create a manager using the endpoint and cadence from `config`.
    pub fn from_config(config: &AppConfig, transport: T, events: impl EventSink) -> Self {
        Self::new(config.endpoint.clone(), transport, events)
            .with_poll_interval(config.poll_interval())
    }

    /// Override the background receive cadence. Takes effect on the next spawn.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poller = Poller::new(interval);
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.link.endpoint
    }

    pub fn poll_interval(&self) -> Duration {
        self.poller.interval()
    }

    pub fn is_connected(&self) -> bool {
        self.link.state.is_connected()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.link.state.is_connected() {
            SessionPhase::Connected
        } else if self.connecting.load(Ordering::Acquire) {
            SessionPhase::Connecting
        } else {
            SessionPhase::Idle
        }
    }

    /// Whether a poll thread is currently owned by this manager.
    pub fn has_worker(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Open the connection and start the poll thread.
    ///
    /// When already connected, or when a poll thread already exists, the
    /// transport is re-opened and `Connected` re-announced, but no second
    /// thread is started. A failed open changes nothing.
    pub fn connect(&self) -> TransportStatus {
        let status = self.open_and_spawn();
        if status.is_success() {
            self.link.emit(SessionEvent::Connected);
        }
        status
    }

    fn open_and_spawn(&self) -> TransportStatus {
        let _lifecycle = self.lifecycle.lock();
        let endpoint = &self.link.endpoint;

        if self.link.state.is_connected() || self.has_worker() {
            info!(%endpoint, "Already connected; re-opening");
            return self.link.open();
        }
        if self.signal.is_signalled() {
            error!(%endpoint, "connect: session already shut down");
            return TransportStatus::NoConnection;
        }

        self.connecting.store(true, Ordering::Release);
        let status = self.link.open();
        self.connecting.store(false, Ordering::Release);

        if status.is_success() {
            match self.poller.spawn(self.signal.clone(), self.link.clone()) {
                Ok(handle) => *self.worker.lock() = Some(handle),
                Err(err) => {
                    error!(%endpoint, %err, "Running without background receive");
                }
            }
        }
        status
    }

    /// Hand `data` to the transport.
    ///
    /// Returns `NoConnection` without touching the transport when the session
    /// is not connected.
    pub fn send(&self, data: &[u8]) -> TransportStatus {
        self.link.send(data)
    }

    /// Receive on demand, outside the poll cadence.
    pub fn receive(&self) -> TransportResult {
        self.link.receive()
    }

    /// Stop and join the poll thread, then close the transport if still
    /// connected. Safe to call repeatedly and without a prior `connect`.
    pub fn shutdown(&self) {
        let _lifecycle = self.lifecycle.lock();
        let endpoint = &self.link.endpoint;

        let worker = self.worker.lock().take();
        if let Some(handle) = worker {
            if let Err(err) = self.signal.signal() {
                warn!(%endpoint, %err, "Stop signal not delivered");
            }
            if handle.join().is_err() {
                error!(%endpoint, err = %SessionError::WorkerPanicked, "Poll thread join failed");
            }
        }

        if self.link.state.mark_disconnected() {
            self.link.transport.close(endpoint);
            info!(%endpoint, "Session closed");
        }
    }
}

impl<T: Transport> Drop for SessionManager<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
