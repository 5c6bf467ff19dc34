//! HTTP transport with timeout, abort and exactly-once completion.
//!
//! [`RequestHandler::request`] starts a request on the Tokio runtime and
//! returns a [`RequestHandle`] immediately. The request finishes in exactly
//! one of four ways, whichever happens first:
//!
//! - the response arrives and is parsed
//! - the connection policy's timeout elapses ([`RequestError::TimedOut`])
//! - the handle is aborted ([`RequestError::Aborted`])
//! - the network call fails ([`RequestError::Network`])
//!
//! Any completion after the first is dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use documentdb_client::clients::{HttpMethod, HttpRequest, RequestHandler};
//!
//! let handler = RequestHandler::new(&endpoint, policy)?;
//! let request = HttpRequest::builder(HttpMethod::Get, "/dbs/").build()?;
//!
//! let handle = handler.request(request);
//! let response = handle.response().await?;
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::clients::errors::RequestError;
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::{HttpResponse, ResponseBody, ResponseHeaders};
use crate::config::{ConnectionPolicy, ServiceEndpoint};

/// Status some HTTP stacks report in place of `204 No Content`.
const NO_CONTENT_QUIRK_STATUS: u16 = 1223;

type Outcome = Result<HttpResponse, RequestError>;

/// A single-shot completion slot.
///
/// The first call to [`complete`](Self::complete) delivers its value; every
/// later call is a no-op that returns `false`.
#[derive(Debug)]
pub struct Completion<T> {
    sender: Mutex<Option<oneshot::Sender<T>>>,
}

impl<T> Completion<T> {
    /// Creates a completion slot and the receiver its value is delivered to.
    #[must_use]
    pub fn new() -> (Self, oneshot::Receiver<T>) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                sender: Mutex::new(Some(sender)),
            },
            receiver,
        )
    }

    /// Delivers `value` if nothing has been delivered yet.
    ///
    /// Returns `true` if this call completed the slot.
    pub fn complete(&self, value: T) -> bool {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match sender {
            Some(sender) => {
                // The receiver may already be gone; completion still counts.
                let _ = sender.send(value);
                true
            }
            None => {
                tracing::debug!("dropping late completion of an already completed request");
                false
            }
        }
    }

    /// Returns `true` once the slot has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// Handle to an in-flight request.
#[derive(Debug)]
pub struct RequestHandle {
    completion: Arc<Completion<Outcome>>,
    receiver: oneshot::Receiver<Outcome>,
    task: JoinHandle<()>,
}

impl RequestHandle {
    /// Aborts the request.
    ///
    /// If the request has not completed yet it completes with
    /// [`RequestError::Aborted`]; otherwise this is a no-op.
    pub fn abort(&self) {
        if self.completion.complete(Err(RequestError::Aborted)) {
            tracing::warn!("request aborted");
        }
        self.task.abort();
    }

    /// Waits for the outcome of the request.
    ///
    /// # Errors
    ///
    /// Returns the [`RequestError`] the request completed with.
    pub async fn response(self) -> Result<HttpResponse, RequestError> {
        self.receiver.await.unwrap_or(Err(RequestError::Aborted))
    }
}

/// Issues HTTP requests against one service endpoint.
///
/// # Thread Safety
///
/// `RequestHandler` is `Send + Sync`; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    client: reqwest::Client,
    base_url: String,
    policy: ConnectionPolicy,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RequestHandler>();
};

impl RequestHandler {
    /// Creates a handler for `endpoint` governed by `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Network`] if the HTTP client cannot be created
    /// (e.g., TLS initialization failure).
    pub fn new(endpoint: &ServiceEndpoint, policy: ConnectionPolicy) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder().use_rustls_tls().build()?;
        Ok(Self {
            client,
            base_url: endpoint.as_ref().to_string(),
            policy,
        })
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the connection policy.
    #[must_use]
    pub const fn policy(&self) -> &ConnectionPolicy {
        &self.policy
    }

    /// Starts `request` and returns a handle to it.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn request(&self, request: HttpRequest) -> RequestHandle {
        let (completion, receiver) = Completion::new();
        let completion = Arc::new(completion);

        let timeout = self.policy.timeout_for(request.is_media);
        let url = request.url(&self.base_url);
        let client = self.client.clone();
        let task_completion = Arc::clone(&completion);

        tracing::debug!(method = %request.http_method, path = %request.path, "dispatching request");

        let task = tokio::spawn(async move {
            let outcome = match tokio::time::timeout(timeout, execute(client, url, request)).await
            {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(?timeout, "request timed out");
                    Err(RequestError::TimedOut)
                }
            };
            task_completion.complete(outcome);
        });

        RequestHandle {
            completion,
            receiver,
            task,
        }
    }

    /// Sends `request` and waits for its outcome.
    ///
    /// # Errors
    ///
    /// Returns the [`RequestError`] the request completed with.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        self.request(request).response().await
    }
}

async fn execute(client: reqwest::Client, url: String, request: HttpRequest) -> Outcome {
    let mut builder = client.request(request.http_method.as_reqwest(), &url);
    for (key, value) in &request.headers {
        builder = builder.header(key, value);
    }
    if let Some(body) = request.body {
        builder = builder.body(body.into_bytes());
    }

    let response = builder.send().await?;
    let status = response.status().as_u16();
    let headers = ResponseHeaders::from_header_map(response.headers());
    let bytes = response.bytes().await?;

    parse_response(status, headers, &bytes, request.is_media)
}

/// Turns a raw status, headers and body into a response or an error.
///
/// - status `1223` is reported as `204`
/// - a status of 300 or above is a [`RequestError::Response`]
/// - an empty body yields no body
/// - media bodies are passed through raw
/// - anything else must be JSON, or [`RequestError::Parse`] is returned
///
/// # Errors
///
/// See above.
pub fn parse_response(
    status: u16,
    headers: ResponseHeaders,
    bytes: &[u8],
    is_media: bool,
) -> Result<HttpResponse, RequestError> {
    let code = if status == NO_CONTENT_QUIRK_STATUS {
        204
    } else {
        status
    };

    if code >= 300 {
        return Err(RequestError::Response {
            code,
            body: String::from_utf8_lossy(bytes).into_owned(),
        });
    }

    let body = if bytes.is_empty() {
        None
    } else if is_media {
        Some(ResponseBody::Media(bytes.to_vec()))
    } else {
        Some(ResponseBody::Json(serde_json::from_slice(bytes)?))
    };

    Ok(HttpResponse::new(code, headers, body))
}
