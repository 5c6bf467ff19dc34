//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated DocumentDB account master key.
///
/// The key is only ever held by the client; this SDK does not sign requests
/// with it (see [`AuthError`](crate::auth::AuthError)).
///
/// # Security
///
/// The `Debug` implementation masks the key, displaying only
/// `MasterKey(*****)`.
///
/// # Example
///
/// ```rust
/// use documentdb_client::MasterKey;
///
/// let key = MasterKey::new("c2VjcmV0").unwrap();
/// assert_eq!(format!("{:?}", key), "MasterKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey(String);

impl MasterKey {
    /// Creates a new validated master key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyMasterKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyMasterKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for MasterKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(*****)")
    }
}

/// A validated service endpoint, e.g. `https://myaccount.documents.azure.com:443`.
///
/// The endpoint must have an alphabetic scheme and a non-empty host. A
/// trailing slash is removed so that resource paths (which always start with
/// `/`) can be appended directly.
///
/// # Example
///
/// ```rust
/// use documentdb_client::ServiceEndpoint;
///
/// let endpoint = ServiceEndpoint::new("https://myaccount.documents.azure.com:443/").unwrap();
/// assert_eq!(endpoint.as_ref(), "https://myaccount.documents.azure.com:443");
/// assert_eq!(endpoint.scheme(), "https");
/// assert_eq!(endpoint.host_name(), "myaccount.documents.azure.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceEndpoint {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl ServiceEndpoint {
    /// Creates a new validated endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidEndpoint { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidEndpoint { url });
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(ConfigError::InvalidEndpoint { url });
        }

        let host_end = url[host_start..]
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(ConfigError::InvalidEndpoint { url });
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }
}

impl AsRef<str> for ServiceEndpoint {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_key_rejects_empty_string() {
        assert!(matches!(MasterKey::new(""), Err(ConfigError::EmptyMasterKey)));
    }

    #[test]
    fn test_master_key_masks_value_in_debug() {
        let key = MasterKey::new("super-secret-key").unwrap();
        let debug_output = format!("{:?}", key);
        assert_eq!(debug_output, "MasterKey(*****)");
        assert!(!debug_output.contains("super-secret-key"));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let endpoint = ServiceEndpoint::new("https://account.documents.azure.com/").unwrap();
        assert_eq!(endpoint.as_ref(), "https://account.documents.azure.com");
    }

    #[test]
    fn test_endpoint_with_port() {
        let endpoint = ServiceEndpoint::new("http://localhost:8081").unwrap();
        assert_eq!(endpoint.scheme(), "http");
        assert_eq!(endpoint.host_name(), "localhost");
        assert_eq!(endpoint.to_string(), "http://localhost:8081");
    }

    #[test]
    fn test_endpoint_rejects_invalid() {
        assert!(ServiceEndpoint::new("account.documents.azure.com").is_err());
        assert!(ServiceEndpoint::new("https://").is_err());
        assert!(ServiceEndpoint::new("://example.com").is_err());
        assert!(ServiceEndpoint::new("https://:443").is_err());
    }
}
