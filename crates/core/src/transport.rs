//! Contract for the transport client a session drives.

use crate::models::{Endpoint, TransportResult, TransportStatus};

/// Synchronous open/send/receive/close client addressed by endpoint.
///
/// Implementations are shared between the caller's thread and the background
/// poller, so every method takes `&self`. Calls are expected to return in
/// bounded time; the session never retries on its own.
pub trait Transport: Send + Sync + 'static {
    /// Open the connection. Must be safe to call when already open.
    fn open(&self, endpoint: &Endpoint) -> TransportStatus;

    /// Write `data`. The response may carry piggy-backed inbound bytes.
    fn send(&self, endpoint: &Endpoint, data: &[u8]) -> TransportResult;

    /// Drain whatever inbound bytes are available without blocking.
    fn receive(&self, endpoint: &Endpoint) -> TransportResult;

    /// Close the connection.
    fn close(&self, endpoint: &Endpoint);
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn open(&self, endpoint: &Endpoint) -> TransportStatus {
        (**self).open(endpoint)
    }

    fn send(&self, endpoint: &Endpoint, data: &[u8]) -> TransportResult {
        (**self).send(endpoint, data)
    }

    fn receive(&self, endpoint: &Endpoint) -> TransportResult {
        (**self).receive(endpoint)
    }

    fn close(&self, endpoint: &Endpoint) {
        (**self).close(endpoint)
    }
}
