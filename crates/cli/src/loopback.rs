//! In-memory transport that echoes every send back on the next receive.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tcplink_core::{Endpoint, Transport, TransportResult, TransportStatus};
use tracing::debug;

#[derive(Default)]
struct Peer {
    open: bool,
    inbox: VecDeque<Vec<u8>>,
}

/// Loopback stand-in for a real transport client.
#[derive(Default)]
pub struct LoopbackTransport {
    peer: Mutex<Peer>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the remote side going away.
    pub fn drop_peer(&self) {
        let mut peer = self.peer.lock();
        peer.open = false;
        peer.inbox.clear();
    }
}

impl Transport for LoopbackTransport {
    fn open(&self, endpoint: &Endpoint) -> TransportStatus {
        debug!(%endpoint, "loopback open");
        self.peer.lock().open = true;
        TransportStatus::Success
    }

    fn send(&self, _endpoint: &Endpoint, data: &[u8]) -> TransportResult {
        let mut peer = self.peer.lock();
        if !peer.open {
            return TransportResult::no_connection();
        }
        peer.inbox.push_back(data.to_vec());
        TransportResult::success(Vec::new())
    }

    fn receive(&self, _endpoint: &Endpoint) -> TransportResult {
        let mut peer = self.peer.lock();
        if !peer.open {
            return TransportResult::no_connection();
        }
        TransportResult::success(peer.inbox.pop_front().unwrap_or_default())
    }

    fn close(&self, endpoint: &Endpoint) {
        debug!(%endpoint, "loopback close");
        self.drop_peer();
    }
}
