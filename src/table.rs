//! Table-style access to the documents of one collection.
//!
//! A [`Table`] is a thin layer over the document operations and the feed
//! iterator, for callers that think in rows and equality filters rather than
//! links and SQL.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::{json, Map};
//!
//! let table = client.table("dbs/db1/colls/people");
//! table.insert(json!({"name": "Ada", "team": "core"})).await?;
//!
//! let mut filter = Map::new();
//! filter.insert("team".into(), json!("core"));
//! let members = table.read(Some(&table.filter(&filter))).await?;
//!
//! let removed = table.del(&filter).await?;
//! assert_eq!(removed, members.len());
//! ```

use serde_json::{Map, Value};

use crate::clients::{ClientError, DocumentClient, InvalidHttpRequestError, ResourceResponse};
use crate::resources::{item_path, RequestOptions, ResourceType};

/// A SQL query over a table, built by [`Table::filter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableQuery {
    sql: String,
}

impl TableQuery {
    /// Returns the SQL text.
    #[must_use]
    pub fn as_sql(&self) -> &str {
        &self.sql
    }
}

/// Documents of one collection, addressed like a table.
#[derive(Clone, Debug)]
pub struct Table<'a> {
    client: &'a DocumentClient,
    collection_link: String,
}

impl<'a> Table<'a> {
    pub(crate) fn new(client: &'a DocumentClient, collection_link: impl Into<String>) -> Self {
        Self {
            client,
            collection_link: collection_link.into(),
        }
    }

    /// Returns the link of the underlying collection.
    #[must_use]
    pub fn collection_link(&self) -> &str {
        &self.collection_link
    }

    /// Builds a query matching documents whose properties equal every entry
    /// of `filter`. Keys are combined in sorted order.
    #[must_use]
    pub fn filter(&self, filter: &Map<String, Value>) -> TableQuery {
        TableQuery {
            sql: select_where(filter),
        }
    }

    /// Reads every matching document, or every document when `query` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any page fails to load.
    pub async fn read(&self, query: Option<&TableQuery>) -> Result<Vec<Value>, ClientError> {
        let mut iterator = match query {
            Some(query) => self.client.query_documents(
                &self.collection_link,
                query.as_sql(),
                RequestOptions::default(),
            ),
            None => self
                .client
                .read_documents(&self.collection_link, RequestOptions::default()),
        };
        iterator.to_array().await
    }

    /// Inserts a document, generating its id when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails.
    pub async fn insert(&self, document: Value) -> Result<ResourceResponse, ClientError> {
        self.client
            .create_document(&self.collection_link, document, &RequestOptions::default())
            .await
    }

    /// Replaces a document, addressed by its `_self` link or else its `id`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::MissingDocumentLink`] when the
    /// document has neither, or [`ClientError`] if the request fails.
    pub async fn update(&self, document: Value) -> Result<ResourceResponse, ClientError> {
        let link = self.document_link(&document)?;
        self.client
            .replace_document(&link, document, &RequestOptions::default())
            .await
    }

    /// Deletes every document matching `filter` and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on the first failed query page or delete.
    pub async fn del(&self, filter: &Map<String, Value>) -> Result<usize, ClientError> {
        let matches = self.read(Some(&self.filter(filter))).await?;
        for document in &matches {
            let link = self.document_link(document)?;
            self.client
                .delete_document(&link, &RequestOptions::default())
                .await?;
        }
        tracing::debug!(count = matches.len(), collection = %self.collection_link, "deleted documents");
        Ok(matches.len())
    }

    fn document_link(&self, document: &Value) -> Result<String, InvalidHttpRequestError> {
        if let Some(self_link) = document.get("_self").and_then(Value::as_str) {
            return Ok(self_link.to_string());
        }
        match document.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => Ok(item_path(&format!(
                "{}/{}/{id}",
                self.collection_link.trim_end_matches('/'),
                ResourceType::Documents
            ))),
            _ => Err(InvalidHttpRequestError::MissingDocumentLink),
        }
    }
}

fn select_where(filter: &Map<String, Value>) -> String {
    let mut keys: Vec<&String> = filter.keys().collect();
    keys.sort();

    let clauses: Vec<String> = keys
        .into_iter()
        .map(|key| format!("r[{}] = {}", Value::String(key.clone()), filter[key]))
        .collect();

    if clauses.is_empty() {
        "SELECT * FROM root r".to_string()
    } else {
        format!("SELECT * FROM root r WHERE {}", clauses.join(" AND "))
    }
}
