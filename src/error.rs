//! Error types for the DocumentDB client SDK.
//!
//! This module contains error types used throughout the SDK for configuration
//! and validation errors.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Request-time failures are reported through
//! [`ClientError`](crate::clients::ClientError) instead.
//!
//! # Example
//!
//! ```rust
//! use documentdb_client::{MasterKey, ConfigError};
//!
//! let result = MasterKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyMasterKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Master key cannot be empty.
    #[error("Master key cannot be empty. Please provide a valid account master key.")]
    EmptyMasterKey,

    /// Service endpoint is invalid.
    #[error("Invalid service endpoint '{url}'. Please provide a URL with scheme and host (e.g., 'https://myaccount.documents.azure.com:443').")]
    InvalidEndpoint {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Both a master key and resource tokens were supplied.
    #[error("A client is authorized by either a master key or resource tokens, not both.")]
    ConflictingCredentials,

    /// A connection policy timeout is zero.
    #[error("Invalid {field}: timeouts must be greater than zero.")]
    InvalidTimeout {
        /// The name of the offending timeout.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_master_key_error_message() {
        let message = ConfigError::EmptyMasterKey.to_string();
        assert!(message.contains("Master key cannot be empty"));
    }

    #[test]
    fn test_invalid_endpoint_error_message() {
        let error = ConfigError::InvalidEndpoint {
            url: "not a url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("scheme and host"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "endpoint" };
        let message = error.to_string();
        assert!(message.contains("endpoint"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::ConflictingCredentials;
        let _: &dyn std::error::Error = &error;
    }
}
