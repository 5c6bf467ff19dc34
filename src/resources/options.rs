//! Per-request options.
//!
//! [`RequestOptions`] is the configuration bag handed to every resource
//! operation. Only the fields that are set contribute headers; see
//! [`build_headers`](crate::clients::build_headers) for the exact mapping.

use std::fmt;

use crate::config::ConsistencyLevel;

/// Which conditional header an [`AccessCondition`] produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessConditionType {
    /// Proceed only if the resource's etag matches (`If-Match`).
    IfMatch,
    /// Proceed only if the resource's etag differs (`If-None-Match`).
    IfNoneMatch,
}

/// An optimistic-concurrency condition on a resource etag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessCondition {
    /// The header to emit.
    pub condition_type: AccessConditionType,
    /// The etag to compare against.
    pub condition: String,
}

impl AccessCondition {
    /// Creates an `If-Match` condition.
    #[must_use]
    pub fn if_match(etag: impl Into<String>) -> Self {
        Self {
            condition_type: AccessConditionType::IfMatch,
            condition: etag.into(),
        }
    }

    /// Creates an `If-None-Match` condition.
    #[must_use]
    pub fn if_none_match(etag: impl Into<String>) -> Self {
        Self {
            condition_type: AccessConditionType::IfNoneMatch,
            condition: etag.into(),
        }
    }
}

/// Whether a write is included in the collection index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexingDirective {
    /// Use the collection's indexing policy.
    Default,
    /// Index the resource.
    Include,
    /// Do not index the resource.
    Exclude,
}

impl IndexingDirective {
    /// Returns the wire value of the directive.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Include => "Include",
            Self::Exclude => "Exclude",
        }
    }
}

impl fmt::Display for IndexingDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One trigger name or a list of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriggerInclude {
    /// A single trigger, sent verbatim.
    One(String),
    /// Several triggers, joined with `;`.
    Many(Vec<String>),
}

impl TriggerInclude {
    /// Returns the header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::One(name) => name.clone(),
            Self::Many(names) => names.join(";"),
        }
    }
}

impl From<&str> for TriggerInclude {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for TriggerInclude {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for TriggerInclude {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

impl From<Vec<&str>> for TriggerInclude {
    fn from(value: Vec<&str>) -> Self {
        Self::Many(value.into_iter().map(String::from).collect())
    }
}

/// Options recognized by resource operations and feeds.
///
/// # Example
///
/// ```rust
/// use documentdb_client::resources::{AccessCondition, RequestOptions};
/// use documentdb_client::ConsistencyLevel;
///
/// let options = RequestOptions::new()
///     .max_item_count(50)
///     .access_condition(AccessCondition::if_match("\"etag-1\""))
///     .consistency_level(ConsistencyLevel::Session);
/// assert_eq!(options.max_item_count, Some(50));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Opaque pagination cursor from a previous page.
    pub continuation: Option<String>,
    /// Page size hint.
    pub max_item_count: Option<u32>,
    /// Triggers to run before the operation.
    pub pre_trigger_include: Option<TriggerInclude>,
    /// Triggers to run after the operation.
    pub post_trigger_include: Option<TriggerInclude>,
    /// Etag precondition.
    pub access_condition: Option<AccessCondition>,
    /// Indexing override for writes.
    pub indexing_directive: Option<IndexingDirective>,
    /// Per-request consistency override.
    pub consistency_level: Option<ConsistencyLevel>,
    /// Session token for session consistency.
    pub session_token: Option<String>,
    /// Lifetime of resource tokens returned by permission reads.
    pub resource_token_expiry_seconds: Option<u32>,
    /// Send queries as a GET with the query in a header instead of a SQL body.
    pub jpath: bool,
    /// Do not generate an id for documents created without one.
    pub disable_automatic_id_generation: bool,
}

impl RequestOptions {
    /// Creates an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the continuation token.
    #[must_use]
    pub fn continuation(mut self, token: impl Into<String>) -> Self {
        self.continuation = Some(token.into());
        self
    }

    /// Sets the page size hint.
    #[must_use]
    pub const fn max_item_count(mut self, count: u32) -> Self {
        self.max_item_count = Some(count);
        self
    }

    /// Sets the pre-triggers.
    #[must_use]
    pub fn pre_trigger_include(mut self, triggers: impl Into<TriggerInclude>) -> Self {
        self.pre_trigger_include = Some(triggers.into());
        self
    }

    /// Sets the post-triggers.
    #[must_use]
    pub fn post_trigger_include(mut self, triggers: impl Into<TriggerInclude>) -> Self {
        self.post_trigger_include = Some(triggers.into());
        self
    }

    /// Sets the etag precondition.
    #[must_use]
    pub fn access_condition(mut self, condition: AccessCondition) -> Self {
        self.access_condition = Some(condition);
        self
    }

    /// Sets the indexing directive.
    #[must_use]
    pub const fn indexing_directive(mut self, directive: IndexingDirective) -> Self {
        self.indexing_directive = Some(directive);
        self
    }

    /// Sets the consistency level.
    #[must_use]
    pub const fn consistency_level(mut self, level: ConsistencyLevel) -> Self {
        self.consistency_level = Some(level);
        self
    }

    /// Sets the session token.
    #[must_use]
    pub fn session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Sets the resource token expiry.
    #[must_use]
    pub const fn resource_token_expiry_seconds(mut self, seconds: u32) -> Self {
        self.resource_token_expiry_seconds = Some(seconds);
        self
    }

    /// Switches queries to GET with the query text in a header.
    #[must_use]
    pub const fn jpath(mut self, enabled: bool) -> Self {
        self.jpath = enabled;
        self
    }

    /// Disables automatic document id generation.
    #[must_use]
    pub const fn disable_automatic_id_generation(mut self, disabled: bool) -> Self {
        self.disable_automatic_id_generation = disabled;
        self
    }
}

/// Options for uploading attachment content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaOptions {
    /// Name of the attachment (`Slug` header).
    pub slug: Option<String>,
    /// MIME type of the content; defaults to `application/octet-stream`.
    pub content_type: Option<String>,
    /// Options applied to the underlying request.
    pub request: RequestOptions,
}

impl MediaOptions {
    /// Creates empty media options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the slug.
    #[must_use]
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_include_joins_lists_with_semicolon() {
        let single = TriggerInclude::from("audit");
        assert_eq!(single.header_value(), "audit");

        let many = TriggerInclude::from(vec!["audit", "stamp"]);
        assert_eq!(many.header_value(), "audit;stamp");
    }

    #[test]
    fn test_builder_sets_fields() {
        let options = RequestOptions::new()
            .continuation("tok")
            .pre_trigger_include("pre")
            .indexing_directive(IndexingDirective::Exclude)
            .session_token("0:12")
            .resource_token_expiry_seconds(600)
            .jpath(true)
            .disable_automatic_id_generation(true);

        assert_eq!(options.continuation.as_deref(), Some("tok"));
        assert_eq!(options.pre_trigger_include, Some(TriggerInclude::One("pre".into())));
        assert_eq!(options.indexing_directive, Some(IndexingDirective::Exclude));
        assert_eq!(options.session_token.as_deref(), Some("0:12"));
        assert_eq!(options.resource_token_expiry_seconds, Some(600));
        assert!(options.jpath);
        assert!(options.disable_automatic_id_generation);
    }

    #[test]
    fn test_access_condition_constructors() {
        let condition = AccessCondition::if_none_match("e1");
        assert_eq!(condition.condition_type, AccessConditionType::IfNoneMatch);
        assert_eq!(condition.condition, "e1");
        assert_eq!(
            AccessCondition::if_match("e2").condition_type,
            AccessConditionType::IfMatch
        );
    }

    #[test]
    fn test_media_options_default_is_empty() {
        let options = MediaOptions::new().slug("photo.png");
        assert_eq!(options.slug.as_deref(), Some("photo.png"));
        assert!(options.content_type.is_none());
        assert_eq!(options.request, RequestOptions::default());
    }
}
