#![warn(clippy::all, missing_docs)]

//! Connection-state management for a single supervised TCP session.
//!
//! The crate drives an externally supplied [`Transport`] client: it opens the
//! connection, forwards outbound bytes, drains inbound bytes on a background
//! poll thread and shuts everything down without racing the poller.
//! Notifications leave through an [`EventSink`] so any frontend can adapt
//! them to its own event system.

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod session;
pub mod transport;

pub use config::AppConfig;
pub use error::SessionError;
pub use events::{EventSink, FnSink, SessionEvent};
pub use models::{Endpoint, TransportResult, TransportStatus};
pub use session::{SessionManager, SessionPhase};
pub use transport::Transport;
