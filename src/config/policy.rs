//! Connection policy and consistency settings.
//!
//! This module provides the [`ConnectionPolicy`] that governs request
//! timeouts, and the [`ConsistencyLevel`] enum used both as a client-wide
//! default and as a per-request override.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default timeout for non-media requests (10 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Default timeout for media (attachment content) requests (5 minutes).
pub const DEFAULT_MEDIA_REQUEST_TIMEOUT: Duration = Duration::from_millis(300_000);

/// Consistency levels supported for client operations.
///
/// The requested level must match or be weaker than the one provisioned for
/// the database account. Levels by order of strength are `Strong`,
/// `BoundedStaleness`, `Session` and `Eventual`.
///
/// # Example
///
/// ```rust
/// use documentdb_client::ConsistencyLevel;
///
/// let level: ConsistencyLevel = "Session".parse().unwrap();
/// assert_eq!(level, ConsistencyLevel::Session);
/// assert_eq!(level.to_string(), "Session");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsistencyLevel {
    /// Reads always return the value that was last written.
    Strong,
    /// Reads lag writes by at most a configured prefix or interval.
    BoundedStaleness,
    /// Monotonic reads and writes, read-your-writes, within one session.
    Session,
    /// Reads return a subset of writes; all writes eventually become visible.
    Eventual,
}

impl ConsistencyLevel {
    /// Returns the wire value sent in the `x-ms-consistency-level` header.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::BoundedStaleness => "BoundedStaleness",
            Self::Session => "Session",
            Self::Eventual => "Eventual",
        }
    }
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsistencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Strong" => Ok(Self::Strong),
            "BoundedStaleness" => Ok(Self::BoundedStaleness),
            "Session" => Ok(Self::Session),
            "Eventual" => Ok(Self::Eventual),
            other => Err(format!("unknown consistency level '{other}'")),
        }
    }
}

/// How attachment content (media) is read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MediaReadMode {
    /// Content is buffered at the client.
    #[default]
    Buffered,
    /// Content is streamed from the content store without client buffering.
    Streamed,
}

/// How the client reaches the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Requests go through the HTTPS gateway.
    #[default]
    Gateway,
    /// Requests go directly to the backend replicas.
    Direct,
}

/// Connection policy associated with a client.
///
/// The policy is read-only once the client is constructed. Timeouts are
/// enforced per transport call, not per iteration.
///
/// # Defaults
///
/// - `request_timeout`: 10 seconds
/// - `media_request_timeout`: 300 seconds
/// - `media_read_mode`: [`MediaReadMode::Buffered`]
/// - `connection_mode`: [`ConnectionMode::Gateway`]
/// - `max_connections`: 20
/// - `max_concurrent_calls_per_connection`: 50
///
/// # Example
///
/// ```rust
/// use documentdb_client::ConnectionPolicy;
/// use std::time::Duration;
///
/// let policy = ConnectionPolicy::default().with_request_timeout(Duration::from_secs(30));
/// assert_eq!(policy.request_timeout, Duration::from_secs(30));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionPolicy {
    /// Time to wait for a response to a non-media request.
    pub request_timeout: Duration,
    /// Time to wait for a response to a media request.
    pub media_request_timeout: Duration,
    /// Attachment content download mode.
    pub media_read_mode: MediaReadMode,
    /// Gateway or direct connectivity.
    pub connection_mode: ConnectionMode,
    /// Maximum connections (direct connectivity only).
    pub max_connections: u32,
    /// Maximum concurrent calls per connection (direct connectivity only).
    pub max_concurrent_calls_per_connection: u32,
}

impl Default for ConnectionPolicy {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            media_request_timeout: DEFAULT_MEDIA_REQUEST_TIMEOUT,
            media_read_mode: MediaReadMode::default(),
            connection_mode: ConnectionMode::default(),
            max_connections: 20,
            max_concurrent_calls_per_connection: 50,
        }
    }
}

impl ConnectionPolicy {
    /// Sets the timeout for non-media requests.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the timeout for media requests.
    #[must_use]
    pub const fn with_media_request_timeout(mut self, timeout: Duration) -> Self {
        self.media_request_timeout = timeout;
        self
    }

    /// Returns the timeout that applies to a request.
    #[must_use]
    pub const fn timeout_for(&self, is_media: bool) -> Duration {
        if is_media {
            self.media_request_timeout
        } else {
            self.request_timeout
        }
    }

    /// Checks that both timeouts are non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] naming the zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                field: "request_timeout",
            });
        }
        if self.media_request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                field: "media_request_timeout",
            });
        }
        Ok(())
    }
}
