//! HTTP request types for the DocumentDB client SDK.
//!
//! This module provides the [`HttpRequest`] type and its builder, the unit of
//! work handed to the [`RequestHandler`](crate::clients::RequestHandler).

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Read a resource or feed.
    Get,
    /// Create a resource, run a query or execute a stored procedure.
    Post,
    /// Replace a resource.
    Put,
    /// Delete a resource.
    Delete,
    /// Read headers only.
    Head,
}

impl HttpMethod {
    /// Returns `true` for verbs that carry a request body.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
            Self::Head => write!(f, "head"),
        }
    }
}

/// A request body.
///
/// JSON values are serialized before sending; text and binary bodies are
/// sent as-is.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    /// A JSON document.
    Json(Value),
    /// Raw text, e.g. a SQL query.
    Text(String),
    /// Raw bytes, e.g. attachment content.
    Binary(Vec<u8>),
}

impl RequestBody {
    pub(crate) fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Json(value) => value.to_string().into_bytes(),
            Self::Text(text) => text.into_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// An HTTP request to be sent to the service.
///
/// # Example
///
/// ```rust
/// use documentdb_client::clients::{HttpRequest, HttpMethod, RequestBody};
///
/// let request = HttpRequest::builder(HttpMethod::Post, "/dbs/db1/colls/coll1/docs/")
///     .body(RequestBody::Text("SELECT * FROM root".to_string()))
///     .header("Content-Type", "application/sql")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.url("https://localhost:8081"), "https://localhost:8081/dbs/db1/colls/coll1/docs/");
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The resource path, starting with `/`.
    pub path: String,
    /// The request body, if any.
    pub body: Option<RequestBody>,
    /// Pre-encoded query string appended after `?`.
    pub query_params: Option<String>,
    /// Final request headers.
    pub headers: HashMap<String, String>,
    /// Whether the path addresses attachment content.
    pub is_media: bool,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Returns the full URL: `base + path`, plus `?query` when set.
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        match self.query_params.as_deref() {
            Some(query) if !query.is_empty() => format!("{base_url}{}?{query}", self.path),
            _ => format!("{base_url}{}", self.path),
        }
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::BodyNotAllowed`] if a body is set
    /// on a verb that does not carry one.
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.body.is_some() && !self.http_method.has_body() {
            return Err(InvalidHttpRequestError::BodyNotAllowed {
                method: self.http_method.to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<RequestBody>,
    query_params: Option<String>,
    headers: HashMap<String, String>,
    is_media: Option<bool>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            query_params: None,
            headers: HashMap::new(),
            is_media: None,
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the query string.
    #[must_use]
    pub fn query_params(mut self, query: impl Into<String>) -> Self {
        self.query_params = Some(query.into());
        self
    }

    /// Sets all headers at once.
    #[must_use]
    #[allow(clippy::implicit_hasher)]
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Overrides media detection, which defaults to inspecting the path.
    #[must_use]
    pub const fn media(mut self, is_media: bool) -> Self {
        self.is_media = Some(is_media);
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let is_media = self
            .is_media
            .unwrap_or_else(|| crate::resources::is_media_path(&self.path));
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            query_params: self.query_params,
            headers: self.headers,
            is_media,
        };
        request.verify()?;
        Ok(request)
    }
}
