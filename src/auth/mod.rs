//! Request authorization for the DocumentDB client SDK.
//!
//! A client is authorized by exactly one of:
//!
//! - **Resource tokens**: pre-issued, scoped credentials keyed by resource id,
//!   usually obtained from a user's permission feed
//! - **Master key**: an account-wide key. Request signing with a master key is
//!   not supported by this SDK; requests fail fast with
//!   [`AuthError::UnsupportedOperation`]
//!
//! # Token Resolution
//!
//! A request for a resource is authorized by the token issued for that
//! resource id. When there is none, the request path is walked from the most
//! specific segment outward, skipping resource-type keywords such as `colls`,
//! and the first id that has a token wins. A token for a collection therefore
//! authorizes requests on every document beneath it.
//!
//! # Example
//!
//! ```rust
//! use documentdb_client::auth::AuthContext;
//! use documentdb_client::clients::HttpMethod;
//! use std::collections::HashMap;
//!
//! let tokens = HashMap::from([("coll1".to_string(), "TOKEN_C".to_string())]);
//! let auth = AuthContext::ResourceTokens(tokens);
//!
//! let token = auth
//!     .get_authorization_header(
//!         HttpMethod::Get,
//!         "/dbs/db1/colls/coll1/docs/doc1/",
//!         "doc1",
//!         "docs",
//!     )
//!     .unwrap();
//! assert_eq!(token.as_deref(), Some("TOKEN_C"));
//! ```

use std::collections::HashMap;

use thiserror::Error;

use crate::clients::HttpMethod;
use crate::config::MasterKey;
use crate::resources::{Permission, ResourceType};

/// Errors raised while authorizing a request.
///
/// These are raised before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Master-key request signing was requested.
    #[error("Authentication with a master key is not supported for {verb} on '{resource_type}'; please use resource tokens instead")]
    UnsupportedOperation {
        /// The request verb.
        verb: HttpMethod,
        /// The resource type keyword of the request.
        resource_type: String,
    },
}

/// The credentials a client authorizes its requests with.
#[derive(Clone, Debug, Default)]
pub enum AuthContext {
    /// No credentials; requests carry no authorization header.
    #[default]
    None,
    /// Account master key.
    MasterKey(MasterKey),
    /// Resource tokens keyed by resource id.
    ResourceTokens(HashMap<String, String>),
}

impl AuthContext {
    /// Builds a resource-token context from a permission feed.
    ///
    /// Each permission contributes its token under the id of the resource it
    /// targets. Permissions without a token are skipped.
    #[must_use]
    pub fn from_permissions<'a>(permissions: impl IntoIterator<Item = &'a Permission>) -> Self {
        Self::ResourceTokens(resource_tokens_from_permissions(permissions))
    }

    /// Returns `true` if a master key is configured.
    #[must_use]
    pub const fn has_master_key(&self) -> bool {
        matches!(self, Self::MasterKey(_))
    }

    /// Returns `true` if any credentials are configured.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Computes the raw (not yet URL-encoded) authorization value for a request.
    ///
    /// Returns:
    /// - `Ok(Some(token))` when a resource token covers the request
    /// - `Ok(None)` when resource tokens are configured but none match; the
    ///   request is then sent without an authorization header
    /// - `Ok(Some(""))` when no credentials are configured
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnsupportedOperation`] when the client holds a
    /// master key.
    pub fn get_authorization_header(
        &self,
        verb: HttpMethod,
        path: &str,
        resource_id: &str,
        resource_type: &str,
    ) -> Result<Option<String>, AuthError> {
        match self {
            Self::ResourceTokens(tokens) => Ok(token_for_path(tokens, path, resource_id).cloned()),
            Self::MasterKey(_) => Err(AuthError::UnsupportedOperation {
                verb,
                resource_type: resource_type.to_string(),
            }),
            Self::None => Ok(Some(String::new())),
        }
    }
}

/// Converts a permission feed into a resource-token map.
#[must_use]
pub fn resource_tokens_from_permissions<'a>(
    permissions: impl IntoIterator<Item = &'a Permission>,
) -> HashMap<String, String> {
    permissions
        .into_iter()
        .filter_map(|permission| {
            let token = permission.token.as_ref()?;
            Some((permission.resource_id().to_string(), token.clone()))
        })
        .collect()
}

fn token_for_path<'a>(
    tokens: &'a HashMap<String, String>,
    path: &str,
    resource_id: &str,
) -> Option<&'a String> {
    if let Some(token) = tokens.get(resource_id) {
        return Some(token);
    }

    path.split('/')
        .rev()
        .filter(|segment| !segment.is_empty() && !ResourceType::is_keyword(segment))
        .find_map(|segment| tokens.get(segment))
}
