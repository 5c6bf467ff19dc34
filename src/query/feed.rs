//! Feed sources backed by a [`DocumentClient`].

use crate::clients::{ClientError, DocumentClient};
use crate::query::{FeedPage, FeedSource};
use crate::resources::{RequestOptions, ResourceType};

/// A list or query feed over one resource collection endpoint.
///
/// Without a query the feed is read with a GET. With a query it is sent as
/// a POST with an `application/sql` body, or, when
/// [`RequestOptions::jpath`] is set, as a GET carrying the query in the
/// `x-ms-documentdb-query` header.
#[derive(Debug, Clone)]
pub struct QueryFeed<'a> {
    client: &'a DocumentClient,
    path: String,
    resource_type: ResourceType,
    resource_id: String,
    query: Option<String>,
}

impl<'a> QueryFeed<'a> {
    /// Creates a feed over `path`, whose items are of `resource_type`.
    ///
    /// `resource_id` is the id of the parent resource, used for authorization.
    #[must_use]
    pub fn new(
        client: &'a DocumentClient,
        path: impl Into<String>,
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        query: Option<String>,
    ) -> Self {
        Self {
            client,
            path: path.into(),
            resource_type,
            resource_id: resource_id.into(),
            query,
        }
    }

    /// Returns the request path of the feed.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

impl FeedSource for QueryFeed<'_> {
    async fn fetch(&mut self, options: &RequestOptions) -> Result<FeedPage, ClientError> {
        self.client
            .query_feed(
                &self.path,
                self.resource_type,
                &self.resource_id,
                self.query.as_deref(),
                options,
            )
            .await
    }
}
