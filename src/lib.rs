//! # DocumentDB Rust Client
//!
//! An async Rust client for the DocumentDB REST API: databases, collections,
//! documents, attachments, users, permissions and server-side scripts, with
//! lazily paged feeds that follow the service's continuation tokens.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for the service endpoint and credentials
//! - Resource-token authorization, including tokens from a permission feed
//! - Per-request header construction from [`resources::RequestOptions`]
//! - A transport with per-request timeouts, abort handles and exactly-once completion
//! - Typed create, read, replace, delete and query operations on [`DocumentClient`]
//! - The restartable [`QueryIterator`] over paged list and query feeds
//! - A table-style accessor over the documents of one collection
//!
//! ## Quick Start
//!
//! ```rust
//! use documentdb_client::{ClientConfig, ConsistencyLevel, ServiceEndpoint};
//! use std::collections::HashMap;
//!
//! let mut tokens = HashMap::new();
//! tokens.insert("coll1".to_string(), "type=resource&ver=1&sig=abc".to_string());
//!
//! let config = ClientConfig::builder()
//!     .endpoint(ServiceEndpoint::new("https://myaccount.documents.azure.com:443").unwrap())
//!     .resource_tokens(tokens)
//!     .consistency_level(ConsistencyLevel::Session)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.consistency_level(), Some(ConsistencyLevel::Session));
//! ```
//!
//! ## Resource Operations
//!
//! ```rust,ignore
//! use documentdb_client::DocumentClient;
//! use documentdb_client::resources::RequestOptions;
//! use serde_json::json;
//!
//! let client = DocumentClient::new(config)?;
//! let options = RequestOptions::default();
//!
//! let created = client
//!     .create_document("dbs/db1/colls/coll1", json!({"id": "doc1", "n": 1}), &options)
//!     .await?;
//! let read = client.read_document("dbs/db1/colls/coll1/docs/doc1", &options).await?;
//! println!("request charge: {:?}", read.headers.request_charge());
//! ```
//!
//! ## Paged Feeds
//!
//! ```rust,ignore
//! use documentdb_client::resources::RequestOptions;
//!
//! let mut iterator = client.query_documents(
//!     "dbs/db1/colls/coll1",
//!     "SELECT * FROM root r WHERE r.n > 0",
//!     RequestOptions::new().max_item_count(100),
//! );
//!
//! while let Some(document) = iterator.next_item().await? {
//!     println!("{document}");
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: The client is `Send + Sync`; iterators borrow it
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **No retries**: Every failure is reported to the caller as is

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod query;
pub mod resources;
pub mod table;

// Re-export public types at crate root for convenience
pub use config::{
    ClientConfig, ClientConfigBuilder, ConnectionMode, ConnectionPolicy, ConsistencyLevel,
    MasterKey, MediaReadMode, ServiceEndpoint,
};
pub use error::ConfigError;

pub use auth::{AuthContext, AuthError};

// Re-export client types
pub use clients::{
    ClientError, DocumentClient, HttpMethod, HttpRequest, HttpResponse, MediaResponse,
    RequestError, ResourceResponse, ResponseHeaders,
};

pub use query::{FeedPage, FeedSource, IteratorState, QueryFeed, QueryIterator};
pub use table::{Table, TableQuery};
