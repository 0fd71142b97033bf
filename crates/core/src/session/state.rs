use std::sync::atomic::{AtomicBool, Ordering};

/// Shared "is the session established" flag.
///
/// Written by the caller's thread on connect/teardown and by the poll thread
/// on loss; readable from anywhere.
#[derive(Debug, Default)]
pub struct ConnectionState {
    connected: AtomicBool,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn mark_connected(&self) {
        self.connected.store(true, Ordering::Release);
    }

    /// Returns `true` only for the call that actually moved the state from
    /// connected to disconnected.
    pub fn mark_disconnected(&self) -> bool {
        self.connected
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
