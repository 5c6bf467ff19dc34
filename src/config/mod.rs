//! Configuration types for the DocumentDB client SDK.
//!
//! This module provides the configuration a [`DocumentClient`] is built from.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: Endpoint, credentials and policies of one client
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`ServiceEndpoint`]: A validated service endpoint URL
//! - [`MasterKey`]: A validated master key with masked debug output
//! - [`ConnectionPolicy`]: Request timeouts and connectivity settings
//! - [`ConsistencyLevel`]: The consistency levels of the service
//!
//! # Example
//!
//! ```rust
//! use documentdb_client::{ClientConfig, ServiceEndpoint, ConsistencyLevel};
//! use std::collections::HashMap;
//!
//! let tokens = HashMap::from([("coll1".to_string(), "token".to_string())]);
//!
//! let config = ClientConfig::builder()
//!     .endpoint(ServiceEndpoint::new("https://myaccount.documents.azure.com:443").unwrap())
//!     .resource_tokens(tokens)
//!     .consistency_level(ConsistencyLevel::Session)
//!     .build()
//!     .unwrap();
//! ```
//!
//! [`DocumentClient`]: crate::clients::DocumentClient

mod newtypes;
mod policy;

pub use newtypes::{MasterKey, ServiceEndpoint};
pub use policy::{
    ConnectionMode, ConnectionPolicy, ConsistencyLevel, MediaReadMode,
    DEFAULT_MEDIA_REQUEST_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
};

use std::collections::HashMap;

use crate::auth::{resource_tokens_from_permissions, AuthContext};
use crate::error::ConfigError;
use crate::resources::Permission;

/// Configuration for a DocumentDB client.
///
/// The configuration is read-only once built; every request issued by a
/// client sees the same endpoint, credentials and policy.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    endpoint: ServiceEndpoint,
    auth: AuthContext,
    connection_policy: ConnectionPolicy,
    consistency_level: Option<ConsistencyLevel>,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the service endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// Returns the credentials requests are authorized with.
    #[must_use]
    pub const fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Returns the connection policy.
    #[must_use]
    pub const fn connection_policy(&self) -> &ConnectionPolicy {
        &self.connection_policy
    }

    /// Returns the default consistency level, if configured.
    #[must_use]
    pub const fn consistency_level(&self) -> Option<ConsistencyLevel> {
        self.consistency_level
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// Only `endpoint` is required. Credentials are optional, but a master key
/// cannot be combined with resource tokens or a permission feed.
///
/// # Defaults
///
/// - credentials: none
/// - `connection_policy`: [`ConnectionPolicy::default`]
/// - `consistency_level`: `None` (the account default applies)
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    endpoint: Option<ServiceEndpoint>,
    master_key: Option<MasterKey>,
    resource_tokens: Option<HashMap<String, String>>,
    permission_feed: Vec<Permission>,
    connection_policy: Option<ConnectionPolicy>,
    consistency_level: Option<ConsistencyLevel>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service endpoint (required).
    #[must_use]
    pub fn endpoint(mut self, endpoint: ServiceEndpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the account master key.
    ///
    /// Requests from a client configured this way fail with
    /// [`AuthError::UnsupportedOperation`](crate::auth::AuthError::UnsupportedOperation).
    #[must_use]
    pub fn master_key(mut self, key: MasterKey) -> Self {
        self.master_key = Some(key);
        self
    }

    /// Sets the resource tokens, keyed by resource id.
    #[must_use]
    #[allow(clippy::implicit_hasher)]
    pub fn resource_tokens(mut self, tokens: HashMap<String, String>) -> Self {
        self.resource_tokens = Some(tokens);
        self
    }

    /// Adds the tokens of a permission feed.
    ///
    /// Each permission's token is keyed by the id of the resource it targets.
    /// Feed tokens take precedence over tokens set with
    /// [`resource_tokens`](Self::resource_tokens) for the same id.
    #[must_use]
    pub fn permission_feed(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permission_feed.extend(permissions);
        self
    }

    /// Sets the connection policy.
    #[must_use]
    pub fn connection_policy(mut self, policy: ConnectionPolicy) -> Self {
        self.connection_policy = Some(policy);
        self
    }

    /// Sets the default consistency level sent with every request.
    #[must_use]
    pub const fn consistency_level(mut self, level: ConsistencyLevel) -> Self {
        self.consistency_level = Some(level);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`ConfigError::MissingRequiredField`] if `endpoint` is not set
    /// - [`ConfigError::ConflictingCredentials`] if a master key is combined
    ///   with resource tokens or a permission feed
    /// - [`ConfigError::InvalidTimeout`] if the connection policy has a zero timeout
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let endpoint = self
            .endpoint
            .ok_or(ConfigError::MissingRequiredField { field: "endpoint" })?;

        let has_tokens = self.resource_tokens.is_some() || !self.permission_feed.is_empty();

        let auth = match (self.master_key, has_tokens) {
            (Some(_), true) => return Err(ConfigError::ConflictingCredentials),
            (Some(key), false) => AuthContext::MasterKey(key),
            (None, true) => {
                let mut tokens = self.resource_tokens.unwrap_or_default();
                tokens.extend(resource_tokens_from_permissions(&self.permission_feed));
                AuthContext::ResourceTokens(tokens)
            }
            (None, false) => AuthContext::None,
        };

        let connection_policy = self.connection_policy.unwrap_or_default();
        connection_policy.validate()?;

        Ok(ClientConfig {
            endpoint,
            auth,
            connection_policy,
            consistency_level: self.consistency_level,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::PermissionMode;
    use std::time::Duration;

    fn endpoint() -> ServiceEndpoint {
        ServiceEndpoint::new("https://account.documents.azure.com:443").unwrap()
    }

    #[test]
    fn test_builder_requires_endpoint() {
        let result = ClientConfigBuilder::new().build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "endpoint" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ClientConfig::builder().endpoint(endpoint()).build().unwrap();

        assert!(matches!(config.auth(), AuthContext::None));
        assert_eq!(config.connection_policy(), &ConnectionPolicy::default());
        assert!(config.consistency_level().is_none());
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_master_key_and_tokens_conflict() {
        let result = ClientConfig::builder()
            .endpoint(endpoint())
            .master_key(MasterKey::new("key").unwrap())
            .resource_tokens(HashMap::new())
            .build();
        assert!(matches!(result, Err(ConfigError::ConflictingCredentials)));
    }

    #[test]
    fn test_master_key_only() {
        let config = ClientConfig::builder()
            .endpoint(endpoint())
            .master_key(MasterKey::new("key").unwrap())
            .build()
            .unwrap();
        assert!(config.auth().has_master_key());
    }

    #[test]
    fn test_permission_feed_merges_into_resource_tokens() {
        let permission = Permission {
            id: "p1".to_string(),
            permission_mode: PermissionMode::All,
            resource: "dbs/db1/colls/coll1".to_string(),
            token: Some("FEED".to_string()),
        };
        let config = ClientConfig::builder()
            .endpoint(endpoint())
            .resource_tokens(HashMap::from([
                ("db1".to_string(), "DB".to_string()),
                ("coll1".to_string(), "OLD".to_string()),
            ]))
            .permission_feed(vec![permission])
            .build()
            .unwrap();

        let AuthContext::ResourceTokens(tokens) = config.auth() else {
            panic!("expected resource tokens");
        };
        assert_eq!(tokens.get("db1").map(String::as_str), Some("DB"));
        assert_eq!(tokens.get("coll1").map(String::as_str), Some("FEED"));
    }

    #[test]
    fn test_build_validates_connection_policy() {
        let result = ClientConfig::builder()
            .endpoint(endpoint())
            .connection_policy(ConnectionPolicy::default().with_request_timeout(Duration::ZERO))
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidTimeout { .. })));
    }

    #[test]
    fn test_config_is_clone_and_debug() {
        let config = ClientConfig::builder()
            .endpoint(endpoint())
            .master_key(MasterKey::new("hidden-key").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        let cloned = config.clone();
        assert_eq!(cloned.endpoint(), config.endpoint());
        assert_eq!(cloned.user_agent_prefix(), Some("MyApp/1.0"));

        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("ClientConfig"));
        assert!(!debug_str.contains("hidden-key"));
    }
}
