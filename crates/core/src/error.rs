//! Internal faults of the session machinery.
//!
//! Transport outcomes are never errors; they travel as
//! [`crate::models::TransportStatus`] values. The variants here cover the
//! coordination layer only and are logged where they occur.

use std::io;

use thiserror::Error;

/// Failures of the thread and signal plumbing behind a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The stop signal was already fired.
    #[error("stop signal already fired")]
    AlreadySignalled,
    /// The operating system refused to start the poll thread.
    #[error("failed to spawn poll thread: {0}")]
    Spawn(#[source] io::Error),
    /// The poll thread panicked before it could be joined.
    #[error("poll thread panicked")]
    WorkerPanicked,
}
