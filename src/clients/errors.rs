//! Request-time error types for the DocumentDB client SDK.
//!
//! # Error Handling
//!
//! The SDK uses specific error types for different failure scenarios:
//!
//! - [`RequestError`]: Transport failures: timeout, abort, status >= 300,
//!   malformed bodies and network errors
//! - [`InvalidHttpRequestError`]: A request failed validation before sending
//! - [`ClientError`]: Unified error returned by every resource operation and
//!   every feed iterator method
//!
//! No operation retries automatically.
//!
//! # Example
//!
//! ```rust,ignore
//! use documentdb_client::clients::{ClientError, RequestError};
//!
//! match client.read_document("dbs/db1/colls/coll1/docs/doc1", &options).await {
//!     Ok(response) => println!("Document: {}", response.resource),
//!     Err(ClientError::Request(RequestError::Response { code: 404, .. })) => {
//!         println!("Not found");
//!     }
//!     Err(ClientError::Request(RequestError::TimedOut)) => println!("Timed out"),
//!     Err(e) => println!("Failed: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::auth::AuthError;
use crate::error::ConfigError;

/// Errors produced by the transport.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request did not complete within the connection policy's timeout.
    #[error("Request timed out")]
    TimedOut,

    /// The request was aborted through its handle.
    #[error("Request aborted")]
    Aborted,

    /// The service answered with a status of 300 or above.
    #[error("Request failed with status {code}: {body}")]
    Response {
        /// The HTTP status code.
        code: u16,
        /// The raw response body.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("Failed to parse response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl RequestError {
    /// Returns the HTTP status code for [`RequestError::Response`].
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A body was set on a verb that does not carry one.
    #[error("Cannot send a body with {method}.")]
    BodyNotAllowed {
        /// The offending HTTP method.
        method: String,
    },

    /// A document to update carries neither `_self` nor `id`.
    #[error("Document has neither a self link nor an id.")]
    MissingDocumentLink,
}

/// Unified error type for client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport failed or the service returned an error status.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The request could not be authorized.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The request failed validation.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// The client could not be configured.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Returns the HTTP status code if the service returned an error status.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Request(e) => e.status_code(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpMethod;

    #[test]
    fn test_timeout_and_abort_messages() {
        assert_eq!(RequestError::TimedOut.to_string(), "Request timed out");
        assert_eq!(RequestError::Aborted.to_string(), "Request aborted");
    }

    #[test]
    fn test_response_error_carries_code_and_body() {
        let error = RequestError::Response {
            code: 409,
            body: r#"{"code":"Conflict"}"#.to_string(),
        };
        assert_eq!(error.status_code(), Some(409));
        assert!(error.to_string().contains("409"));
        assert!(error.to_string().contains("Conflict"));
    }

    #[test]
    fn test_client_error_is_transparent() {
        let error = ClientError::from(RequestError::TimedOut);
        assert_eq!(error.to_string(), "Request timed out");
        assert_eq!(error.status_code(), None);

        let error = ClientError::from(AuthError::UnsupportedOperation {
            verb: HttpMethod::Get,
            resource_type: "docs".to_string(),
        });
        assert!(error.to_string().contains("master key"));
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ClientError::from(RequestError::from(parse_error));
        assert!(matches!(error, ClientError::Request(RequestError::Parse(_))));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let _: &dyn std::error::Error = &RequestError::Aborted;
        let _: &dyn std::error::Error = &InvalidHttpRequestError::BodyNotAllowed {
            method: "get".to_string(),
        };
        let _: &dyn std::error::Error = &ClientError::from(ConfigError::EmptyMasterKey);
    }
}
