#![allow(missing_docs)]

//! Connection supervision: state, stop signal, poll loop and the façade
//! tying them together.

mod link;
mod manager;
mod poller;
mod signal;
mod state;
#[cfg(test)]
mod testing;

pub use manager::{SessionManager, SessionPhase};
pub use poller::DEFAULT_POLL_INTERVAL;
pub use signal::{StopSignal, Wait};
pub use state::ConnectionState;
