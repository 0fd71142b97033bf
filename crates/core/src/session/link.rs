use tracing::{debug, error, info};

use crate::{
    events::{EventSink, SessionEvent},
    models::{Endpoint, TransportResult, TransportStatus},
    transport::Transport,
};

use super::state::ConnectionState;

/// Everything the caller's thread and the poll thread share.
pub(crate) struct Link<T> {
    pub(crate) endpoint: Endpoint,
    pub(crate) transport: T,
    pub(crate) state: ConnectionState,
    events: Box<dyn EventSink>,
}

impl<T: Transport> Link<T> {
    pub(crate) fn new(endpoint: Endpoint, transport: T, events: Box<dyn EventSink>) -> Self {
        Self {
            endpoint,
            transport,
            state: ConnectionState::new(),
            events,
        }
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        self.events.emit(event);
    }

    /// Open the transport and mark the session connected on success. The
    /// caller announces `Connected` once its own locks are released.
    pub(crate) fn open(&self) -> TransportStatus {
        let status = self.transport.open(&self.endpoint);
        if status.is_success() {
            self.state.mark_connected();
            info!(endpoint = %self.endpoint, "Connected");
        } else {
            info!(endpoint = %self.endpoint, %status, "Open failed");
        }
        status
    }

    pub(crate) fn send(&self, data: &[u8]) -> TransportStatus {
        if !self.state.is_connected() {
            error!(endpoint = %self.endpoint, "send: not connected");
            return TransportStatus::NoConnection;
        }

        let result = self.transport.send(&self.endpoint, data);
        match result.status {
            TransportStatus::Success => {
                self.emit(SessionEvent::BytesWritten(data.len()));
                self.deliver(result.payload);
            }
            TransportStatus::NoConnection => self.connection_lost(),
            TransportStatus::Other(code) => {
                debug!(endpoint = %self.endpoint, code, "send failed");
            }
        }
        result.status
    }

    pub(crate) fn receive(&self) -> TransportResult {
        if !self.state.is_connected() {
            error!(endpoint = %self.endpoint, "receive: not connected");
            return TransportResult::no_connection();
        }
        self.drain()
    }

    /// One receive call with its state transitions and notifications.
    /// Returns the raw result.
    pub(crate) fn drain(&self) -> TransportResult {
        let result = self.transport.receive(&self.endpoint);
        match result.status {
            TransportStatus::Success => self.deliver(result.payload.clone()),
            TransportStatus::NoConnection => self.connection_lost(),
            TransportStatus::Other(_) => {}
        }
        result
    }

    fn deliver(&self, payload: Vec<u8>) {
        if !payload.is_empty() {
            self.emit(SessionEvent::DataReceived(payload));
        }
    }

    pub(crate) fn connection_lost(&self) {
        if self.state.mark_disconnected() {
            info!(endpoint = %self.endpoint, "Connection lost");
            self.emit(SessionEvent::Disconnected);
        }
    }
}
