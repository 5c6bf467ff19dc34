//! HTTP client types for DocumentDB communication.
//!
//! This module holds the request pipeline from an operation down to the
//! wire: header construction, request and response types, the transport and
//! the [`DocumentClient`] that ties them together.
//!
//! # Overview
//!
//! - [`DocumentClient`]: Every resource operation of a database account
//! - [`build_headers`]: The per-request header builder
//! - [`HttpRequest`]: A request to be sent to the service
//! - [`HttpResponse`]: A parsed response from the service
//! - [`RequestHandler`]: The transport, with timeout and abort
//! - [`ClientError`]: Any failure an operation can report
//!
//! # Example
//!
//! ```rust,ignore
//! use documentdb_client::{ClientConfig, DocumentClient, ServiceEndpoint};
//! use documentdb_client::resources::RequestOptions;
//!
//! let client = DocumentClient::new(config)?;
//! let database = client
//!     .read_database("dbs/db1", &RequestOptions::default())
//!     .await?;
//! println!("etag: {:?}", database.headers.etag());
//! ```
//!
//! # Status Handling
//!
//! - a status of 300 or above is returned as [`RequestError::Response`]
//!   carrying the status and raw body
//! - status `1223` is reported as `204`
//! - no request is retried

mod document_client;
mod errors;
pub mod headers;
mod http_request;
mod http_response;
mod transport;

pub use document_client::{DocumentClient, MediaResponse, ResourceResponse};
pub use errors::{ClientError, InvalidHttpRequestError, RequestError};
pub use headers::{build_headers, default_headers};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, RequestBody};
pub use http_response::{HttpResponse, ResponseBody, ResponseHeaders};
pub use transport::{parse_response, Completion, RequestHandle, RequestHandler};
