//! Notifications leaving a session.
//!
//! The core never talks to a UI directly. Frontends hand the session an
//! [`EventSink`] and translate [`SessionEvent`]s into whatever notification
//! mechanism they use.

use tokio::sync::mpsc;

/// Events emitted by a [`crate::session::SessionManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The transport accepted an open request.
    Connected,
    /// The session went from connected to disconnected after a loss.
    Disconnected,
    /// A send went through; carries the number of bytes handed to the transport.
    BytesWritten(usize),
    /// Inbound bytes arrived, either polled or piggy-backed on a send.
    DataReceived(Vec<u8>),
}

/// Receiver of session notifications.
///
/// Called from both the caller's thread and the poll thread, with no session
/// lock held. Queries such as `is_connected` or `has_worker` are fine from a
/// sink; `connect` and `shutdown` are not, because `shutdown` joins the poll
/// thread that may be running the sink.
pub trait EventSink: Send + Sync + 'static {
    /// Deliver one event.
    fn emit(&self, event: SessionEvent);
}

/// Discards every event.
impl EventSink for () {
    fn emit(&self, _event: SessionEvent) {}
}

impl EventSink for mpsc::UnboundedSender<SessionEvent> {
    fn emit(&self, event: SessionEvent) {
        if self.send(event).is_err() {
            tracing::debug!("session event dropped; receiver closed");
        }
    }
}

/// Adapts a closure into an [`EventSink`].
pub struct FnSink<F>(pub F);

impl<F> EventSink for FnSink<F>
where
    F: Fn(SessionEvent) + Send + Sync + 'static,
{
    fn emit(&self, event: SessionEvent) {
        (self.0)(event)
    }
}
