//! HTTP response types for the DocumentDB client SDK.
//!
//! This module provides the [`HttpResponse`] type and [`ResponseHeaders`],
//! which gives typed access to the service's custom headers.

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::headers::http_headers;

/// Response headers, keyed by lowercase name.
///
/// Repeated headers are joined with `", "`.
///
/// # Example
///
/// ```rust
/// use documentdb_client::clients::ResponseHeaders;
/// use std::collections::HashMap;
///
/// let headers = ResponseHeaders::from(HashMap::from([
///     ("x-ms-continuation".to_string(), "tok1".to_string()),
///     ("x-ms-request-charge".to_string(), "2.5".to_string()),
/// ]));
///
/// assert_eq!(headers.continuation(), Some("tok1"));
/// assert_eq!(headers.request_charge(), Some(2.5));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseHeaders(HashMap<String, String>);

impl ResponseHeaders {
    /// Returns the value of a header, matching the name case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Returns the continuation token for the next page.
    ///
    /// An empty header is treated as absent.
    #[must_use]
    pub fn continuation(&self) -> Option<&str> {
        self.get(http_headers::CONTINUATION).filter(|v| !v.is_empty())
    }

    /// Returns the session token.
    #[must_use]
    pub fn session_token(&self) -> Option<&str> {
        self.get(http_headers::SESSION_TOKEN)
    }

    /// Returns the resource etag.
    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.get(http_headers::ETAG)
    }

    /// Returns the request units the request consumed.
    #[must_use]
    pub fn request_charge(&self) -> Option<f64> {
        self.get(http_headers::REQUEST_CHARGE)
            .and_then(|v| v.trim().parse().ok())
    }

    /// Returns the activity id the service assigned to the request.
    #[must_use]
    pub fn activity_id(&self) -> Option<&str> {
        self.get(http_headers::ACTIVITY_ID)
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn from_header_map(headers: &reqwest::header::HeaderMap) -> Self {
        let mut result: HashMap<String, String> = HashMap::new();
        for (name, value) in headers {
            let value = value.to_str().unwrap_or_default();
            result
                .entry(name.as_str().to_ascii_lowercase())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
        Self(result)
    }
}

impl From<HashMap<String, String>> for ResponseHeaders {
    fn from(headers: HashMap<String, String>) -> Self {
        Self(
            headers
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
        )
    }
}

/// A parsed response body.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    /// A JSON document.
    Json(Value),
    /// Raw attachment content.
    Media(Vec<u8>),
}

/// A successful response from the service.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code, with `1223` normalized to `204`.
    pub code: u16,
    /// Response headers.
    pub headers: ResponseHeaders,
    /// The parsed body, `None` when the response had no content.
    pub body: Option<ResponseBody>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(code: u16, headers: ResponseHeaders, body: Option<ResponseBody>) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the JSON body, if the body is JSON.
    #[must_use]
    pub const fn json(&self) -> Option<&Value> {
        match &self.body {
            Some(ResponseBody::Json(value)) => Some(value),
            _ => None,
        }
    }

    /// Consumes the response, returning the JSON body or `Value::Null`.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self.body {
            Some(ResponseBody::Json(value)) => value,
            _ => Value::Null,
        }
    }

    /// Consumes the response, returning the raw media bytes.
    ///
    /// A JSON body is returned as its serialized text.
    #[must_use]
    pub fn into_media(self) -> Vec<u8> {
        match self.body {
            Some(ResponseBody::Media(bytes)) => bytes,
            Some(ResponseBody::Json(value)) => value.to_string().into_bytes(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(pairs: &[(&str, &str)]) -> ResponseHeaders {
        ResponseHeaders::from(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let headers = headers(&[("ETag", "\"abc\""), ("x-ms-session-token", "0:5")]);
        assert_eq!(headers.etag(), Some("\"abc\""));
        assert_eq!(headers.get("X-MS-SESSION-TOKEN"), Some("0:5"));
        assert_eq!(headers.session_token(), Some("0:5"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_empty_continuation_is_absent() {
        assert_eq!(headers(&[("x-ms-continuation", "")]).continuation(), None);
        assert_eq!(headers(&[]).continuation(), None);
        assert!(headers(&[]).is_empty());
    }

    #[test]
    fn test_request_charge_and_activity_id() {
        let headers = headers(&[
            ("x-ms-request-charge", " 3.75 "),
            ("x-ms-activity-id", "a-1"),
        ]);
        assert_eq!(headers.request_charge(), Some(3.75));
        assert_eq!(headers.activity_id(), Some("a-1"));
        assert_eq!(ResponseHeaders::default().request_charge(), None);
    }

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, ResponseHeaders::default(), None);
            assert!(response.is_ok(), "Expected is_ok() to be true for code {code}");
        }
        assert!(!HttpResponse::new(304, ResponseHeaders::default(), None).is_ok());
    }

    #[test]
    fn test_body_accessors() {
        let response = HttpResponse::new(
            200,
            ResponseHeaders::default(),
            Some(ResponseBody::Json(json!({"id": "x"}))),
        );
        assert_eq!(response.json(), Some(&json!({"id": "x"})));
        assert_eq!(response.into_json(), json!({"id": "x"}));

        let response = HttpResponse::new(
            200,
            ResponseHeaders::default(),
            Some(ResponseBody::Media(vec![1, 2])),
        );
        assert!(response.json().is_none());
        assert_eq!(response.into_media(), vec![1, 2]);

        let response = HttpResponse::new(204, ResponseHeaders::default(), None);
        assert_eq!(response.into_json(), Value::Null);
    }
}
