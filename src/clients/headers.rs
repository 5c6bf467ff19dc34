//! Header vocabulary and per-request header construction.
//!
//! [`build_headers`] turns a client's default headers and a request's
//! [`RequestOptions`] into the final header set of one call. Its rules are
//! applied in a fixed order and a later rule overwrites an earlier one:
//!
//! 1. Copy the initial (default or caller-supplied) headers
//! 2. `x-ms-continuation` from `continuation`
//! 3. Trigger include lists, joined with `;`
//! 4. `x-ms-max-item-count` from `max_item_count`
//! 5. `If-Match` / `If-None-Match` from `access_condition`
//! 6. Indexing directive, consistency level, token expiry and session token
//! 7. `x-ms-date` when the client holds a master key
//! 8. `authorization` (URL-encoded) when the client holds credentials
//! 9. `Content-Type: application/json` for POST and PUT, unless already set
//! 10. `Accept: application/json`, unless already set

use std::collections::HashMap;

use chrono::Utc;

use crate::auth::{AuthContext, AuthError};
use crate::clients::HttpMethod;
use crate::config::ClientConfig;
use crate::resources::{AccessConditionType, RequestOptions, ResourceType};

/// Service API version sent in `x-ms-version`.
pub const API_VERSION: &str = "2014-08-21";

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header names.
pub mod http_headers {
    /// Authorization token.
    pub const AUTHORIZATION: &str = "authorization";
    /// Expected response content type.
    pub const ACCEPT: &str = "Accept";
    /// Request body content type.
    pub const CONTENT_TYPE: &str = "Content-Type";
    /// Cache directive.
    pub const CACHE_CONTROL: &str = "Cache-Control";
    /// Client identification.
    pub const USER_AGENT: &str = "User-Agent";
    /// Attachment name for media uploads.
    pub const SLUG: &str = "Slug";
    /// Optimistic concurrency: proceed if the etag matches.
    pub const IF_MATCH: &str = "If-Match";
    /// Optimistic concurrency: proceed if the etag differs.
    pub const IF_NONE_MATCH: &str = "If-None-Match";
    /// Resource etag.
    pub const ETAG: &str = "etag";

    /// Query text for GET queries.
    pub const QUERY: &str = "x-ms-documentdb-query";
    /// Marks a request as a query.
    pub const IS_QUERY: &str = "x-ms-documentdb-isquery";
    /// Pagination cursor.
    pub const CONTINUATION: &str = "x-ms-continuation";
    /// Page size hint.
    pub const PAGE_SIZE: &str = "x-ms-max-item-count";
    /// Activity id echoed by the service.
    pub const ACTIVITY_ID: &str = "x-ms-activity-id";
    /// Pre-triggers to run.
    pub const PRE_TRIGGER_INCLUDE: &str = "x-ms-documentdb-pre-trigger-include";
    /// Post-triggers to run.
    pub const POST_TRIGGER_INCLUDE: &str = "x-ms-documentdb-post-trigger-include";
    /// Indexing override.
    pub const INDEXING_DIRECTIVE: &str = "x-ms-indexing-directive";
    /// Session token.
    pub const SESSION_TOKEN: &str = "x-ms-session-token";
    /// Consistency override.
    pub const CONSISTENCY_LEVEL: &str = "x-ms-consistency-level";
    /// Request date for master-key authorization.
    pub const X_DATE: &str = "x-ms-date";
    /// Resource token lifetime.
    pub const RESOURCE_TOKEN_EXPIRY: &str = "x-ms-documentdb-expiry-seconds";
    /// Service API version.
    pub const VERSION: &str = "x-ms-version";
    /// Request units consumed.
    pub const REQUEST_CHARGE: &str = "x-ms-request-charge";

    /// Attachment content quota in MB.
    pub const MAX_MEDIA_STORAGE_USAGE_MB: &str = "x-ms-max-media-storage-usage-mb";
    /// Attachment content usage in MB.
    pub const CURRENT_MEDIA_STORAGE_USAGE_MB: &str = "x-ms-media-storage-usage-mb";
    /// Capacity units consumed by the account.
    pub const CAPACITY_UNITS_CONSUMED: &str = "x-ms-database-capacity-units-consumed";
    /// Capacity units provisioned for the account.
    pub const CAPACITY_UNITS_PROVISIONED: &str = "x-ms-database-capacity-units-provisioned";
    /// Document storage consumed by the account in MB.
    pub const CONSUMED_DOCUMENT_STORAGE_MB: &str = "x-ms-databaseaccount-consumed-mb";
    /// Document storage reserved by the account in MB.
    pub const RESERVED_DOCUMENT_STORAGE_MB: &str = "x-ms-databaseaccount-reserved-mb";
    /// Document storage provisioned for the account in MB.
    pub const PROVISIONED_DOCUMENT_STORAGE_MB: &str = "x-ms-databaseaccount-provisioned-mb";
}

/// Media types.
pub mod media_types {
    /// JSON documents.
    pub const JSON: &str = "application/json";
    /// SQL query text.
    pub const SQL: &str = "application/sql";
    /// Arbitrary binary content.
    pub const OCTET_STREAM: &str = "application/octet-stream";
    /// Any content.
    pub const ANY: &str = "*/*";
    /// Plain text.
    pub const TEXT_PLAIN: &str = "text/plain";
    /// PNG images.
    pub const IMAGE_PNG: &str = "image/png";
    /// JPEG images.
    pub const IMAGE_JPEG: &str = "image/jpeg";
}

/// Builds the headers every request from a client starts with.
///
/// These are `Cache-Control`, `x-ms-version` and `User-Agent`, plus
/// `x-ms-consistency-level` when the configuration sets a default.
#[must_use]
pub fn default_headers(config: &ClientConfig) -> HashMap<String, String> {
    let user_agent_prefix = config
        .user_agent_prefix()
        .map_or(String::new(), |prefix| format!("{prefix} | "));
    let user_agent = format!("{user_agent_prefix}documentdb-rust-sdk/{SDK_VERSION}");

    let mut headers = HashMap::new();
    headers.insert(http_headers::CACHE_CONTROL.to_string(), "no-cache".to_string());
    headers.insert(http_headers::VERSION.to_string(), API_VERSION.to_string());
    headers.insert(http_headers::USER_AGENT.to_string(), user_agent);
    if let Some(level) = config.consistency_level() {
        headers.insert(
            http_headers::CONSISTENCY_LEVEL.to_string(),
            level.to_string(),
        );
    }
    headers
}

/// Produces the final header set for one request.
///
/// See the module documentation for the order of rules.
///
/// # Errors
///
/// Returns [`AuthError::UnsupportedOperation`] when `auth` holds a master key.
///
/// # Example
///
/// ```rust
/// use documentdb_client::auth::AuthContext;
/// use documentdb_client::clients::{build_headers, HttpMethod};
/// use documentdb_client::resources::{RequestOptions, ResourceType};
/// use std::collections::HashMap;
///
/// let options = RequestOptions::new().max_item_count(10);
/// let headers = build_headers(
///     &AuthContext::None,
///     &HashMap::new(),
///     HttpMethod::Post,
///     "/dbs/",
///     "",
///     ResourceType::Databases,
///     &options,
/// )
/// .unwrap();
///
/// assert_eq!(headers["x-ms-max-item-count"], "10");
/// assert_eq!(headers["Content-Type"], "application/json");
/// assert_eq!(headers["Accept"], "application/json");
/// ```
#[allow(clippy::implicit_hasher)]
pub fn build_headers(
    auth: &AuthContext,
    initial_headers: &HashMap<String, String>,
    verb: HttpMethod,
    path: &str,
    resource_id: &str,
    resource_type: ResourceType,
    options: &RequestOptions,
) -> Result<HashMap<String, String>, AuthError> {
    let mut headers = initial_headers.clone();
    let mut set = |name: &str, value: String| {
        headers.insert(name.to_string(), value);
    };

    if let Some(continuation) = &options.continuation {
        set(http_headers::CONTINUATION, continuation.clone());
    }
    if let Some(triggers) = &options.pre_trigger_include {
        set(http_headers::PRE_TRIGGER_INCLUDE, triggers.header_value());
    }
    if let Some(triggers) = &options.post_trigger_include {
        set(http_headers::POST_TRIGGER_INCLUDE, triggers.header_value());
    }
    if let Some(count) = options.max_item_count {
        set(http_headers::PAGE_SIZE, count.to_string());
    }
    if let Some(condition) = &options.access_condition {
        let name = match condition.condition_type {
            AccessConditionType::IfMatch => http_headers::IF_MATCH,
            AccessConditionType::IfNoneMatch => http_headers::IF_NONE_MATCH,
        };
        set(name, condition.condition.clone());
    }
    if let Some(directive) = options.indexing_directive {
        set(http_headers::INDEXING_DIRECTIVE, directive.to_string());
    }
    if let Some(level) = options.consistency_level {
        set(http_headers::CONSISTENCY_LEVEL, level.to_string());
    }
    if let Some(seconds) = options.resource_token_expiry_seconds {
        set(http_headers::RESOURCE_TOKEN_EXPIRY, seconds.to_string());
    }
    if let Some(token) = &options.session_token {
        set(http_headers::SESSION_TOKEN, token.clone());
    }

    if auth.has_master_key() {
        set(http_headers::X_DATE, rfc1123_now());
    }

    if auth.has_credentials() {
        let token =
            auth.get_authorization_header(verb, path, resource_id, resource_type.as_str())?;
        if let Some(token) = token {
            set(
                http_headers::AUTHORIZATION,
                urlencoding::encode(&token).into_owned(),
            );
        }
    }

    if verb.has_body() && !headers.contains_key(http_headers::CONTENT_TYPE) {
        headers.insert(
            http_headers::CONTENT_TYPE.to_string(),
            media_types::JSON.to_string(),
        );
    }
    if !headers.contains_key(http_headers::ACCEPT) {
        headers.insert(http_headers::ACCEPT.to_string(), media_types::JSON.to_string());
    }

    Ok(headers)
}

fn rfc1123_now() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
