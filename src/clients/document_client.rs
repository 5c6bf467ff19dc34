//! The DocumentDB client.
//!
//! [`DocumentClient`] is the logical representation of a database account.
//! Every operation resolves a request path, resource type and resource id,
//! builds headers through [`build_headers`] and hands the request to the
//! [`RequestHandler`].
//!
//! Links passed to operations are self-links such as `dbs/db1/colls/coll1`;
//! a leading or trailing `/` is accepted.

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::errors::{ClientError, RequestError};
use crate::clients::headers::{build_headers, default_headers, http_headers, media_types};
use crate::clients::http_request::{HttpMethod, HttpRequest, RequestBody};
use crate::clients::http_response::{HttpResponse, ResponseHeaders};
use crate::clients::transport::RequestHandler;
use crate::config::ClientConfig;
use crate::query::{FeedPage, QueryFeed, QueryIterator};
use crate::resources::{
    attachment_id_from_media_id, child_path, generate_guid_id, item_path, normalize_script_body,
    parse_path, DatabaseAccount, MediaOptions, RequestOptions, ResourceType,
};
use crate::table::Table;

/// A resource returned by an operation, with the response headers.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceResponse<T = Value> {
    /// The resource body; `Value::Null` when the response had no content.
    pub resource: T,
    /// The response headers.
    pub headers: ResponseHeaders,
}

impl From<HttpResponse> for ResourceResponse {
    fn from(response: HttpResponse) -> Self {
        let headers = response.headers.clone();
        Self {
            resource: response.into_json(),
            headers,
        }
    }
}

/// Attachment content returned by [`DocumentClient::read_media`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaResponse {
    /// The raw content.
    pub content: Vec<u8>,
    /// The response headers.
    pub headers: ResponseHeaders,
}

/// A client for one DocumentDB database account.
///
/// # Thread Safety
///
/// `DocumentClient` is `Send + Sync`. Feed iterators borrow the client; any
/// number of them may run concurrently.
///
/// # Example
///
/// ```rust,ignore
/// use documentdb_client::{ClientConfig, DocumentClient, ServiceEndpoint};
/// use documentdb_client::resources::RequestOptions;
/// use serde_json::json;
///
/// let config = ClientConfig::builder()
///     .endpoint(ServiceEndpoint::new("https://myaccount.documents.azure.com:443")?)
///     .resource_tokens(tokens)
///     .build()?;
/// let client = DocumentClient::new(config)?;
///
/// let created = client
///     .create_document("dbs/db1/colls/coll1", json!({"name": "Ada"}), &RequestOptions::default())
///     .await?;
/// println!("created {}", created.resource["id"]);
///
/// let mut iterator = client.query_documents(
///     "dbs/db1/colls/coll1",
///     "SELECT * FROM root r WHERE r.name = 'Ada'",
///     RequestOptions::default(),
/// );
/// let matches = iterator.to_array().await?;
/// ```
#[derive(Clone, Debug)]
pub struct DocumentClient {
    config: ClientConfig,
    handler: RequestHandler,
    default_headers: HashMap<String, String>,
    default_url_params: Option<String>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DocumentClient>();
};

impl DocumentClient {
    /// Creates a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Request`] if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let handler = RequestHandler::new(config.endpoint(), config.connection_policy().clone())?;
        let default_headers = default_headers(&config);
        Ok(Self {
            config,
            handler,
            default_headers,
            default_url_params: None,
        })
    }

    /// Sets a query string appended to every request URL.
    #[must_use]
    pub fn with_default_url_params(mut self, params: impl Into<String>) -> Self {
        self.default_url_params = Some(params.into());
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the headers every request starts with.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns a table-style accessor over the documents of a collection.
    #[must_use]
    pub fn table(&self, collection_link: impl Into<String>) -> Table<'_> {
        Table::new(self, collection_link)
    }

    // ---------------------------------------------------------------------
    // Generic operations
    // ---------------------------------------------------------------------

    /// Creates a resource with a POST to `path`.
    ///
    /// `initial_headers` replaces the client's default headers when given.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    #[allow(clippy::implicit_hasher)]
    pub async fn create_resource(
        &self,
        path: &str,
        resource_type: ResourceType,
        resource_id: &str,
        body: impl Into<RequestBody>,
        initial_headers: Option<&HashMap<String, String>>,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        let initial = initial_headers.unwrap_or(&self.default_headers);
        let response = self
            .dispatch(HttpMethod::Post, path, resource_type, resource_id, Some(body.into()), initial, options)
            .await?;
        Ok(response.into())
    }

    /// Replaces a resource with a PUT to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    #[allow(clippy::implicit_hasher)]
    pub async fn replace_resource(
        &self,
        path: &str,
        resource_type: ResourceType,
        resource_id: &str,
        body: impl Into<RequestBody>,
        initial_headers: Option<&HashMap<String, String>>,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        let initial = initial_headers.unwrap_or(&self.default_headers);
        let response = self
            .dispatch(HttpMethod::Put, path, resource_type, resource_id, Some(body.into()), initial, options)
            .await?;
        Ok(response.into())
    }

    /// Reads a resource with a GET to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    #[allow(clippy::implicit_hasher)]
    pub async fn read_resource(
        &self,
        path: &str,
        resource_type: ResourceType,
        resource_id: &str,
        initial_headers: Option<&HashMap<String, String>>,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        let initial = initial_headers.unwrap_or(&self.default_headers);
        let response = self
            .dispatch(HttpMethod::Get, path, resource_type, resource_id, None, initial, options)
            .await?;
        Ok(response.into())
    }

    /// Deletes a resource with a DELETE to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    #[allow(clippy::implicit_hasher)]
    pub async fn delete_resource(
        &self,
        path: &str,
        resource_type: ResourceType,
        resource_id: &str,
        initial_headers: Option<&HashMap<String, String>>,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        let initial = initial_headers.unwrap_or(&self.default_headers);
        let response = self
            .dispatch(HttpMethod::Delete, path, resource_type, resource_id, None, initial, options)
            .await?;
        Ok(response.into())
    }

    #[allow(clippy::too_many_arguments)]
    async fn dispatch(
        &self,
        verb: HttpMethod,
        path: &str,
        resource_type: ResourceType,
        resource_id: &str,
        body: Option<RequestBody>,
        initial_headers: &HashMap<String, String>,
        options: &RequestOptions,
    ) -> Result<HttpResponse, ClientError> {
        let headers = build_headers(
            self.config.auth(),
            initial_headers,
            verb,
            path,
            resource_id,
            resource_type,
            options,
        )?;

        let mut builder = HttpRequest::builder(verb, path).headers(headers);
        if let Some(params) = &self.default_url_params {
            builder = builder.query_params(params.clone());
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let request = builder.build()?;

        Ok(self.handler.send(request).await?)
    }

    /// Fetches one page of the feed at `path`.
    ///
    /// See [`QueryFeed`] for how `query` selects the request shape.
    pub(crate) async fn query_feed(
        &self,
        path: &str,
        resource_type: ResourceType,
        resource_id: &str,
        query: Option<&str>,
        options: &RequestOptions,
    ) -> Result<FeedPage, ClientError> {
        let mut initial = self.default_headers.clone();
        let (verb, body) = match query {
            None => (HttpMethod::Get, None),
            Some(query) => {
                initial.insert(http_headers::IS_QUERY.to_string(), "true".to_string());
                if options.jpath {
                    initial.insert(http_headers::QUERY.to_string(), query.to_string());
                    (HttpMethod::Get, None)
                } else {
                    initial.insert(
                        http_headers::CONTENT_TYPE.to_string(),
                        media_types::SQL.to_string(),
                    );
                    (HttpMethod::Post, Some(RequestBody::Text(query.to_string())))
                }
            }
        };

        let response = self
            .dispatch(verb, path, resource_type, resource_id, body, &initial, options)
            .await?;
        let headers = response.headers.clone();
        let items = match response.into_json() {
            Value::Object(mut body) => match body.remove(resource_type.feed_key()) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        Ok(FeedPage { items, headers })
    }

    fn feed(
        &self,
        parent_link: &str,
        resource_type: ResourceType,
        query: Option<String>,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        let path = child_path(parent_link, resource_type);
        let parent_id = parse_path(parent_link).id_or_empty().to_string();
        QueryIterator::new(
            QueryFeed::new(self, path, resource_type, parent_id, query),
            options,
        )
    }

    async fn create_child(
        &self,
        parent_link: &str,
        resource_type: ResourceType,
        body: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        let path = child_path(parent_link, resource_type);
        let info = parse_path(parent_link);
        self.create_resource(&path, resource_type, info.id_or_empty(), body, None, options)
            .await
    }

    async fn read_item(
        &self,
        link: &str,
        resource_type: ResourceType,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        let info = parse_path(link);
        self.read_resource(&item_path(link), resource_type, info.id_or_empty(), None, options)
            .await
    }

    async fn replace_item(
        &self,
        link: &str,
        resource_type: ResourceType,
        body: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        let info = parse_path(link);
        self.replace_resource(&item_path(link), resource_type, info.id_or_empty(), body, None, options)
            .await
    }

    async fn delete_item(
        &self,
        link: &str,
        resource_type: ResourceType,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        let info = parse_path(link);
        self.delete_resource(&item_path(link), resource_type, info.id_or_empty(), None, options)
            .await
    }

    // ---------------------------------------------------------------------
    // Create
    // ---------------------------------------------------------------------

    /// Creates a database.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn create_database(
        &self,
        body: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.create_child("", ResourceType::Databases, body, options).await
    }

    /// Creates a collection in a database.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn create_collection(
        &self,
        database_link: &str,
        body: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.create_child(database_link, ResourceType::Collections, body, options)
            .await
    }

    /// Creates a document in a collection.
    ///
    /// When the body has no `id` (or an empty one) a random id is generated,
    /// unless [`RequestOptions::disable_automatic_id_generation`] is set.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn create_document(
        &self,
        collection_link: &str,
        mut body: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        if !options.disable_automatic_id_generation {
            ensure_document_id(&mut body);
        }
        self.create_child(collection_link, ResourceType::Documents, body, options)
            .await
    }

    /// Creates attachment metadata on a document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn create_attachment(
        &self,
        document_link: &str,
        body: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.create_child(document_link, ResourceType::Attachments, body, options)
            .await
    }

    /// Creates a user in a database.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn create_user(
        &self,
        database_link: &str,
        body: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.create_child(database_link, ResourceType::Users, body, options)
            .await
    }

    /// Creates a permission for a user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn create_permission(
        &self,
        user_link: &str,
        body: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.create_child(user_link, ResourceType::Permissions, body, options)
            .await
    }

    /// Creates a trigger in a collection.
    ///
    /// The script may be given as `body` or `serverScript`; see
    /// [`normalize_script_body`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn create_trigger(
        &self,
        collection_link: &str,
        mut trigger: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        normalize_script_body(&mut trigger);
        self.create_child(collection_link, ResourceType::Triggers, trigger, options)
            .await
    }

    /// Creates a user defined function in a collection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn create_user_defined_function(
        &self,
        collection_link: &str,
        mut udf: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        normalize_script_body(&mut udf);
        self.create_child(collection_link, ResourceType::UserDefinedFunctions, udf, options)
            .await
    }

    /// Creates a stored procedure in a collection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn create_stored_procedure(
        &self,
        collection_link: &str,
        mut sproc: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        normalize_script_body(&mut sproc);
        self.create_child(collection_link, ResourceType::StoredProcedures, sproc, options)
            .await
    }

    /// Uploads attachment content and creates its attachment in one request.
    ///
    /// The attachment is named by [`MediaOptions::slug`]; the content type
    /// defaults to `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn create_attachment_and_upload_media(
        &self,
        document_link: &str,
        content: Vec<u8>,
        options: &MediaOptions,
    ) -> Result<ResourceResponse, ClientError> {
        let initial = self.media_upload_headers(options);
        let path = child_path(document_link, ResourceType::Attachments);
        let info = parse_path(document_link);
        self.create_resource(
            &path,
            ResourceType::Attachments,
            info.id_or_empty(),
            RequestBody::Binary(content),
            Some(&initial),
            &options.request,
        )
        .await
    }

    fn media_upload_headers(&self, options: &MediaOptions) -> HashMap<String, String> {
        let mut headers = self.default_headers.clone();
        if let Some(slug) = &options.slug {
            headers.insert(http_headers::SLUG.to_string(), slug.clone());
        }
        let content_type = options
            .content_type
            .clone()
            .unwrap_or_else(|| media_types::OCTET_STREAM.to_string());
        headers.insert(http_headers::CONTENT_TYPE.to_string(), content_type);
        headers
    }

    // ---------------------------------------------------------------------
    // Read
    // ---------------------------------------------------------------------

    /// Reads a database.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn read_database(
        &self,
        database_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.read_item(database_link, ResourceType::Databases, options)
            .await
    }

    /// Reads a collection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn read_collection(
        &self,
        collection_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.read_item(collection_link, ResourceType::Collections, options)
            .await
    }

    /// Reads a document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn read_document(
        &self,
        document_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.read_item(document_link, ResourceType::Documents, options)
            .await
    }

    /// Reads attachment metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn read_attachment(
        &self,
        attachment_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.read_item(attachment_link, ResourceType::Attachments, options)
            .await
    }

    /// Reads a user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn read_user(
        &self,
        user_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.read_item(user_link, ResourceType::Users, options).await
    }

    /// Reads a permission, including its resource token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn read_permission(
        &self,
        permission_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.read_item(permission_link, ResourceType::Permissions, options)
            .await
    }

    /// Reads a trigger.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn read_trigger(
        &self,
        trigger_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.read_item(trigger_link, ResourceType::Triggers, options)
            .await
    }

    /// Reads a user defined function.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn read_user_defined_function(
        &self,
        udf_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.read_item(udf_link, ResourceType::UserDefinedFunctions, options)
            .await
    }

    /// Reads a stored procedure.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn read_stored_procedure(
        &self,
        sproc_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.read_item(sproc_link, ResourceType::StoredProcedures, options)
            .await
    }

    /// Reads a conflict.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn read_conflict(
        &self,
        conflict_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.read_item(conflict_link, ResourceType::Conflicts, options)
            .await
    }

    /// Reads attachment content.
    ///
    /// The body is returned raw; the request uses the media timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn read_media(&self, media_link: &str) -> Result<MediaResponse, ClientError> {
        let path = item_path(media_link);
        let attachment_id = attachment_id_from_media_id(parse_path(media_link).id_or_empty());

        let mut initial = self.default_headers.clone();
        initial.insert(http_headers::ACCEPT.to_string(), media_types::ANY.to_string());

        let response = self
            .dispatch(
                HttpMethod::Get,
                &path,
                ResourceType::Media,
                &attachment_id,
                None,
                &initial,
                &RequestOptions::default(),
            )
            .await?;
        let headers = response.headers.clone();
        Ok(MediaResponse {
            content: response.into_media(),
            headers,
        })
    }

    // ---------------------------------------------------------------------
    // Feeds
    // ---------------------------------------------------------------------

    /// Lists all databases.
    #[must_use]
    pub fn read_databases(&self, options: RequestOptions) -> QueryIterator<QueryFeed<'_>> {
        self.feed("", ResourceType::Databases, None, options)
    }

    /// Lists the collections of a database.
    #[must_use]
    pub fn read_collections(
        &self,
        database_link: &str,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(database_link, ResourceType::Collections, None, options)
    }

    /// Lists the documents of a collection.
    #[must_use]
    pub fn read_documents(
        &self,
        collection_link: &str,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(collection_link, ResourceType::Documents, None, options)
    }

    /// Lists the attachments of a document.
    #[must_use]
    pub fn read_attachments(
        &self,
        document_link: &str,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(document_link, ResourceType::Attachments, None, options)
    }

    /// Lists the users of a database.
    #[must_use]
    pub fn read_users(
        &self,
        database_link: &str,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(database_link, ResourceType::Users, None, options)
    }

    /// Lists the permissions of a user.
    #[must_use]
    pub fn read_permissions(
        &self,
        user_link: &str,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(user_link, ResourceType::Permissions, None, options)
    }

    /// Lists the triggers of a collection.
    #[must_use]
    pub fn read_triggers(
        &self,
        collection_link: &str,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(collection_link, ResourceType::Triggers, None, options)
    }

    /// Lists the user defined functions of a collection.
    #[must_use]
    pub fn read_user_defined_functions(
        &self,
        collection_link: &str,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(collection_link, ResourceType::UserDefinedFunctions, None, options)
    }

    /// Lists the stored procedures of a collection.
    #[must_use]
    pub fn read_stored_procedures(
        &self,
        collection_link: &str,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(collection_link, ResourceType::StoredProcedures, None, options)
    }

    /// Lists the conflicts of a collection.
    #[must_use]
    pub fn read_conflicts(
        &self,
        collection_link: &str,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(collection_link, ResourceType::Conflicts, None, options)
    }

    /// Queries databases.
    #[must_use]
    pub fn query_databases(
        &self,
        query: impl Into<String>,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed("", ResourceType::Databases, Some(query.into()), options)
    }

    /// Queries the collections of a database.
    #[must_use]
    pub fn query_collections(
        &self,
        database_link: &str,
        query: impl Into<String>,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(database_link, ResourceType::Collections, Some(query.into()), options)
    }

    /// Queries the documents of a collection.
    #[must_use]
    pub fn query_documents(
        &self,
        collection_link: &str,
        query: impl Into<String>,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(collection_link, ResourceType::Documents, Some(query.into()), options)
    }

    /// Queries the attachments of a document.
    #[must_use]
    pub fn query_attachments(
        &self,
        document_link: &str,
        query: impl Into<String>,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(document_link, ResourceType::Attachments, Some(query.into()), options)
    }

    /// Queries the users of a database.
    #[must_use]
    pub fn query_users(
        &self,
        database_link: &str,
        query: impl Into<String>,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(database_link, ResourceType::Users, Some(query.into()), options)
    }

    /// Queries the permissions of a user.
    #[must_use]
    pub fn query_permissions(
        &self,
        user_link: &str,
        query: impl Into<String>,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(user_link, ResourceType::Permissions, Some(query.into()), options)
    }

    /// Queries the triggers of a collection.
    #[must_use]
    pub fn query_triggers(
        &self,
        collection_link: &str,
        query: impl Into<String>,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(collection_link, ResourceType::Triggers, Some(query.into()), options)
    }

    /// Queries the user defined functions of a collection.
    #[must_use]
    pub fn query_user_defined_functions(
        &self,
        collection_link: &str,
        query: impl Into<String>,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(
            collection_link,
            ResourceType::UserDefinedFunctions,
            Some(query.into()),
            options,
        )
    }

    /// Queries the stored procedures of a collection.
    #[must_use]
    pub fn query_stored_procedures(
        &self,
        collection_link: &str,
        query: impl Into<String>,
        options: RequestOptions,
    ) -> QueryIterator<QueryFeed<'_>> {
        self.feed(
            collection_link,
            ResourceType::StoredProcedures,
            Some(query.into()),
            options,
        )
    }

    // ---------------------------------------------------------------------
    // Replace
    // ---------------------------------------------------------------------

    /// Replaces a database.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn replace_database(
        &self,
        database_link: &str,
        database: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.replace_item(database_link, ResourceType::Databases, database, options)
            .await
    }

    /// Replaces a document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn replace_document(
        &self,
        document_link: &str,
        document: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.replace_item(document_link, ResourceType::Documents, document, options)
            .await
    }

    /// Replaces attachment metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn replace_attachment(
        &self,
        attachment_link: &str,
        attachment: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.replace_item(attachment_link, ResourceType::Attachments, attachment, options)
            .await
    }

    /// Replaces a user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn replace_user(
        &self,
        user_link: &str,
        user: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.replace_item(user_link, ResourceType::Users, user, options)
            .await
    }

    /// Replaces a permission.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn replace_permission(
        &self,
        permission_link: &str,
        permission: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.replace_item(permission_link, ResourceType::Permissions, permission, options)
            .await
    }

    /// Replaces a trigger.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn replace_trigger(
        &self,
        trigger_link: &str,
        mut trigger: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        normalize_script_body(&mut trigger);
        self.replace_item(trigger_link, ResourceType::Triggers, trigger, options)
            .await
    }

    /// Replaces a user defined function.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn replace_user_defined_function(
        &self,
        udf_link: &str,
        mut udf: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        normalize_script_body(&mut udf);
        self.replace_item(udf_link, ResourceType::UserDefinedFunctions, udf, options)
            .await
    }

    /// Replaces a stored procedure.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn replace_stored_procedure(
        &self,
        sproc_link: &str,
        mut sproc: Value,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        normalize_script_body(&mut sproc);
        self.replace_item(sproc_link, ResourceType::StoredProcedures, sproc, options)
            .await
    }

    /// Replaces attachment content.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn update_media(
        &self,
        media_link: &str,
        content: Vec<u8>,
        options: &MediaOptions,
    ) -> Result<ResourceResponse, ClientError> {
        let path = item_path(media_link);
        let attachment_id = attachment_id_from_media_id(parse_path(media_link).id_or_empty());

        let mut initial = self.media_upload_headers(options);
        initial.insert(http_headers::ACCEPT.to_string(), media_types::ANY.to_string());

        let response = self
            .dispatch(
                HttpMethod::Put,
                &path,
                ResourceType::Media,
                &attachment_id,
                Some(RequestBody::Binary(content)),
                &initial,
                &options.request,
            )
            .await?;

        // The media path makes the body raw; surface JSON when it is JSON.
        let headers = response.headers.clone();
        let bytes = response.into_media();
        let resource = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(RequestError::from)?
        };
        Ok(ResourceResponse { resource, headers })
    }

    // ---------------------------------------------------------------------
    // Delete
    // ---------------------------------------------------------------------

    /// Deletes a database.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn delete_database(
        &self,
        database_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.delete_item(database_link, ResourceType::Databases, options)
            .await
    }

    /// Deletes a collection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn delete_collection(
        &self,
        collection_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.delete_item(collection_link, ResourceType::Collections, options)
            .await
    }

    /// Deletes a document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn delete_document(
        &self,
        document_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.delete_item(document_link, ResourceType::Documents, options)
            .await
    }

    /// Deletes an attachment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn delete_attachment(
        &self,
        attachment_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.delete_item(attachment_link, ResourceType::Attachments, options)
            .await
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn delete_user(
        &self,
        user_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.delete_item(user_link, ResourceType::Users, options).await
    }

    /// Deletes a permission.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn delete_permission(
        &self,
        permission_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.delete_item(permission_link, ResourceType::Permissions, options)
            .await
    }

    /// Deletes a trigger.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn delete_trigger(
        &self,
        trigger_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.delete_item(trigger_link, ResourceType::Triggers, options)
            .await
    }

    /// Deletes a user defined function.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn delete_user_defined_function(
        &self,
        udf_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.delete_item(udf_link, ResourceType::UserDefinedFunctions, options)
            .await
    }

    /// Deletes a stored procedure.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn delete_stored_procedure(
        &self,
        sproc_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.delete_item(sproc_link, ResourceType::StoredProcedures, options)
            .await
    }

    /// Deletes a conflict.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn delete_conflict(
        &self,
        conflict_link: &str,
        options: &RequestOptions,
    ) -> Result<ResourceResponse, ClientError> {
        self.delete_item(conflict_link, ResourceType::Conflicts, options)
            .await
    }

    // ---------------------------------------------------------------------
    // Account and scripts
    // ---------------------------------------------------------------------

    /// Executes a stored procedure.
    ///
    /// A single non-array parameter is sent as a one-element array.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn execute_stored_procedure(
        &self,
        sproc_link: &str,
        params: Option<Value>,
    ) -> Result<ResourceResponse, ClientError> {
        let path = item_path(sproc_link);
        let info = parse_path(sproc_link);
        let body = params.map(|params| RequestBody::Json(wrap_params(params)));

        let response = self
            .dispatch(
                HttpMethod::Post,
                &path,
                ResourceType::StoredProcedures,
                info.id_or_empty(),
                body,
                &self.default_headers,
                &RequestOptions::default(),
            )
            .await?;
        Ok(response.into())
    }

    /// Reads the database account and its quota information.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if authorization or the request fails.
    pub async fn get_database_account(
        &self,
    ) -> Result<ResourceResponse<DatabaseAccount>, ClientError> {
        let response = self
            .dispatch(
                HttpMethod::Get,
                "",
                ResourceType::DatabaseAccount,
                "",
                None,
                &self.default_headers,
                &RequestOptions::default(),
            )
            .await?;

        let account = DatabaseAccount::from_response(&response.headers, response.json());
        Ok(ResourceResponse {
            resource: account,
            headers: response.headers,
        })
    }
}

/// Sets a generated id on a document whose `id` is missing or empty.
fn ensure_document_id(body: &mut Value) {
    if let Value::Object(map) = body {
        let needs_id = match map.get("id") {
            None | Some(Value::Null) => true,
            Some(Value::String(id)) => id.is_empty(),
            Some(_) => false,
        };
        if needs_id {
            map.insert("id".to_string(), Value::String(generate_guid_id()));
        }
    }
}

fn wrap_params(params: Value) -> Value {
    match params {
        Value::Array(_) => params,
        other => Value::Array(vec![other]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceEndpoint;
    use serde_json::json;

    fn client() -> DocumentClient {
        let config = ClientConfig::builder()
            .endpoint(ServiceEndpoint::new("https://localhost:8081").unwrap())
            .build()
            .unwrap();
        DocumentClient::new(config).unwrap()
    }

    #[test]
    fn test_ensure_document_id_generates_when_missing_or_empty() {
        let mut doc = json!({"name": "a"});
        ensure_document_id(&mut doc);
        assert_eq!(doc["id"].as_str().map(str::len), Some(36));

        let mut doc = json!({"id": ""});
        ensure_document_id(&mut doc);
        assert_eq!(doc["id"].as_str().map(str::len), Some(36));

        let mut doc = json!({"id": "keep"});
        ensure_document_id(&mut doc);
        assert_eq!(doc["id"], "keep");
    }

    #[test]
    fn test_wrap_params() {
        assert_eq!(wrap_params(json!("x")), json!(["x"]));
        assert_eq!(wrap_params(json!([1, 2])), json!([1, 2]));
        assert_eq!(wrap_params(json!({"a": 1})), json!([{"a": 1}]));
    }

    #[test]
    fn test_feed_paths() {
        let client = client();

        let iterator = client.read_databases(RequestOptions::default());
        assert_eq!(iterator.source().path(), "/dbs/");
        assert_eq!(iterator.source().query(), None);

        let iterator = client.query_documents("dbs/db1/colls/coll1/", "SELECT * FROM r", RequestOptions::default());
        assert_eq!(iterator.source().path(), "/dbs/db1/colls/coll1/docs/");
        assert_eq!(iterator.source().query(), Some("SELECT * FROM r"));

        let iterator = client.read_conflicts("/dbs/db1/colls/coll1", RequestOptions::default());
        assert_eq!(iterator.source().path(), "/dbs/db1/colls/coll1/conflicts/");
    }

    #[test]
    fn test_default_headers_are_installed() {
        let client = client();
        assert_eq!(client.default_headers()["x-ms-version"], "2014-08-21");
        assert_eq!(client.default_headers()["Cache-Control"], "no-cache");
    }

    #[test]
    fn test_media_upload_headers_default_to_octet_stream() {
        let client = client();
        let headers = client.media_upload_headers(&MediaOptions::new().slug("a.png"));
        assert_eq!(headers["Slug"], "a.png");
        assert_eq!(headers["Content-Type"], "application/octet-stream");

        let headers = client.media_upload_headers(&MediaOptions::new().content_type("image/png"));
        assert_eq!(headers["Content-Type"], "image/png");
        assert!(!headers.contains_key("Slug"));
    }

    #[test]
    fn test_resource_response_from_empty_body() {
        let response = HttpResponse::new(204, ResponseHeaders::default(), None);
        let resource = ResourceResponse::from(response);
        assert_eq!(resource.resource, Value::Null);
    }
}
