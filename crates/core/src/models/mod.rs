//! Shared domain models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Remote address of the one logical connection a session supervises.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Hostname or IP literal.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Endpoint {
    /// Build an endpoint from a host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Outcome code attached to every transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportStatus {
    /// The call went through.
    Success,
    /// The transport has no live connection to the endpoint.
    NoConnection,
    /// Any other transport failure, carrying the raw code reported by the client.
    Other(i32),
}

impl TransportStatus {
    /// Returns `true` for [`TransportStatus::Success`].
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for TransportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::NoConnection => f.write_str("no connection"),
            Self::Other(code) => write!(f, "transport error {code}"),
        }
    }
}

/// Payload plus status returned by `send` and `receive`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResult {
    /// Bytes handed back by the transport. May be empty.
    pub payload: Vec<u8>,
    /// Status of the call.
    pub status: TransportStatus,
}

impl TransportResult {
    /// Successful call carrying `payload`.
    pub fn success(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            status: TransportStatus::Success,
        }
    }

    /// Empty result with the given status.
    pub fn empty(status: TransportStatus) -> Self {
        Self {
            payload: Vec::new(),
            status,
        }
    }

    /// Empty result reporting a lost connection.
    pub fn no_connection() -> Self {
        Self::empty(TransportStatus::NoConnection)
    }
}
