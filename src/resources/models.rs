//! Typed models for resources the client inspects itself.
//!
//! Most resource bodies are passed through as [`serde_json::Value`]; the
//! types here cover the ones whose fields drive client behavior.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::headers::http_headers;
use crate::clients::ResponseHeaders;
use crate::config::ConsistencyLevel;

/// Access granted by a [`Permission`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionMode {
    /// Permission not valid.
    None,
    /// Read operations only.
    Read,
    /// All operations.
    All,
}

/// When a trigger runs relative to its operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    /// Before the operation.
    Pre,
    /// After the operation.
    Post,
}

/// The operations a trigger fires on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerOperation {
    /// Every operation.
    All,
    /// Creates only.
    Create,
    /// Updates only.
    Update,
    /// Deletes only.
    Delete,
    /// Replaces only.
    Replace,
}

impl fmt::Display for TriggerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::All => "all",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Replace => "replace",
        };
        f.write_str(value)
    }
}

/// A permission granting a user access to one resource.
///
/// Permission feeds are how clients are handed resource tokens: the token in
/// `_token` authorizes requests against the resource named by `resource`.
///
/// # Example
///
/// ```rust
/// use documentdb_client::resources::{Permission, PermissionMode};
///
/// let permission: Permission = serde_json::from_value(serde_json::json!({
///     "id": "p1",
///     "permissionMode": "read",
///     "resource": "dbs/db1/colls/coll1",
///     "_token": "type=resource&sig=abc"
/// }))
/// .unwrap();
///
/// assert_eq!(permission.permission_mode, PermissionMode::Read);
/// assert_eq!(permission.resource_id(), "coll1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Permission id.
    pub id: String,
    /// Access mode.
    #[serde(rename = "permissionMode")]
    pub permission_mode: PermissionMode,
    /// Self-link of the resource the permission applies to.
    pub resource: String,
    /// The issued resource token. Only present on reads.
    #[serde(rename = "_token", default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Permission {
    /// Returns the id of the resource this permission targets.
    ///
    /// This is the last `/`-separated component of `resource`.
    #[must_use]
    pub fn resource_id(&self) -> &str {
        self.resource.rsplit('/').next().unwrap_or_default()
    }
}

/// Consistency settings of a database account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyPolicy {
    /// Account-wide default consistency.
    pub default_consistency_level: ConsistencyLevel,
    /// Maximum staleness in versions under bounded staleness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_staleness_prefix: Option<u64>,
    /// Maximum staleness in seconds under bounded staleness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_staleness_interval_in_seconds: Option<u64>,
}

/// The container for databases, with quota information from the gateway.
///
/// Usage figures come from cached gateway information and are not
/// guaranteed to be real time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatabaseAccount {
    /// Self-link of the databases feed.
    pub databases_link: String,
    /// Self-link of the media feed.
    pub media_link: String,
    /// Attachment content storage quota in MB.
    pub max_media_storage_usage_mb: Option<u64>,
    /// Current attachment content usage in MB.
    pub current_media_storage_usage_mb: Option<u64>,
    /// Capacity units currently consumed.
    pub capacity_units_consumed: Option<u64>,
    /// Capacity units provisioned.
    pub capacity_units_provisioned: Option<u64>,
    /// Sum of current collection sizes in MB.
    pub consumed_document_storage_mb: Option<u64>,
    /// Sum of maximum collection sizes in MB.
    pub reserved_document_storage_mb: Option<u64>,
    /// Provisioned document storage in MB.
    pub provisioned_document_storage_mb: Option<u64>,
    /// The account's consistency settings, when the body carried them.
    pub consistency_policy: Option<ConsistencyPolicy>,
}

impl DatabaseAccount {
    /// Builds the account description from a response to a GET on the account root.
    ///
    /// Unparseable quota headers are treated as absent.
    #[must_use]
    pub fn from_response(headers: &ResponseHeaders, body: Option<&Value>) -> Self {
        let quota = |name: &str| headers.get(name).and_then(|v| v.trim().parse::<u64>().ok());

        let consistency_policy = body
            .and_then(|b| b.get("userConsistencyPolicy"))
            .and_then(|p| serde_json::from_value(p.clone()).ok());

        Self {
            databases_link: "/dbs/".to_string(),
            media_link: "/media/".to_string(),
            max_media_storage_usage_mb: quota(http_headers::MAX_MEDIA_STORAGE_USAGE_MB),
            current_media_storage_usage_mb: quota(http_headers::CURRENT_MEDIA_STORAGE_USAGE_MB),
            capacity_units_consumed: quota(http_headers::CAPACITY_UNITS_CONSUMED),
            capacity_units_provisioned: quota(http_headers::CAPACITY_UNITS_PROVISIONED),
            consumed_document_storage_mb: quota(http_headers::CONSUMED_DOCUMENT_STORAGE_MB),
            reserved_document_storage_mb: quota(http_headers::RESERVED_DOCUMENT_STORAGE_MB),
            provisioned_document_storage_mb: quota(http_headers::PROVISIONED_DOCUMENT_STORAGE_MB),
            consistency_policy,
        }
    }
}
