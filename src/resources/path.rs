//! Resource addressing: self-link parsing and path construction.
//!
//! Every resource is addressed by a slash-delimited chain of `type/id`
//! segment pairs, e.g. `/dbs/db1/colls/coll1/docs/doc1/`. A path that ends
//! in a bare type (`/dbs/db1/colls/`) addresses the collection of that type
//! under its parent.
//!
//! # Example
//!
//! ```rust
//! use documentdb_client::resources::parse_path;
//!
//! let info = parse_path("dbs/db1/colls/coll1");
//! assert_eq!(info.resource_type.as_deref(), Some("colls"));
//! assert_eq!(info.id.as_deref(), Some("coll1"));
//! assert_eq!(info.self_link, "/dbs/db1/colls/coll1/");
//!
//! let info = parse_path("/dbs/db1/colls/");
//! assert_eq!(info.resource_type.as_deref(), Some("colls"));
//! assert_eq!(info.id.as_deref(), Some("db1"));
//! ```

use std::fmt;

use base64::prelude::*;
use rand::Rng;

/// Number of leading bytes of a decoded media id that form the attachment id.
const RESOURCE_ID_LENGTH: usize = 20;

/// The kinds of resources in the account hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// The account root; addressed by the empty path.
    DatabaseAccount,
    /// Databases (`dbs`).
    Databases,
    /// Document collections (`colls`).
    Collections,
    /// Documents (`docs`).
    Documents,
    /// Stored procedures (`sprocs`).
    StoredProcedures,
    /// User defined functions (`udfs`).
    UserDefinedFunctions,
    /// Triggers (`triggers`).
    Triggers,
    /// Users (`users`).
    Users,
    /// Permissions (`permissions`).
    Permissions,
    /// Attachments (`attachments`).
    Attachments,
    /// Attachment content (`media`).
    Media,
    /// Conflicts (`conflicts`).
    Conflicts,
}

impl ResourceType {
    /// Every path keyword that names a resource type.
    pub const KEYWORDS: [&'static str; 11] = [
        "dbs",
        "colls",
        "docs",
        "sprocs",
        "udfs",
        "triggers",
        "users",
        "permissions",
        "attachments",
        "media",
        "conflicts",
    ];

    /// Returns the path keyword for this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DatabaseAccount => "",
            Self::Databases => "dbs",
            Self::Collections => "colls",
            Self::Documents => "docs",
            Self::StoredProcedures => "sprocs",
            Self::UserDefinedFunctions => "udfs",
            Self::Triggers => "triggers",
            Self::Users => "users",
            Self::Permissions => "permissions",
            Self::Attachments => "attachments",
            Self::Media => "media",
            Self::Conflicts => "conflicts",
        }
    }

    /// Returns the body field holding the items of a feed of this type.
    #[must_use]
    pub const fn feed_key(&self) -> &'static str {
        match self {
            Self::DatabaseAccount | Self::Media => "",
            Self::Databases => "Databases",
            Self::Collections => "DocumentCollections",
            Self::Documents => "Documents",
            Self::StoredProcedures => "StoredProcedures",
            Self::UserDefinedFunctions => "UserDefinedFunctions",
            Self::Triggers => "Triggers",
            Self::Users => "Users",
            Self::Permissions => "Permissions",
            Self::Attachments => "Attachments",
            Self::Conflicts => "Conflicts",
        }
    }

    /// Returns `true` if `segment` is a resource-type keyword.
    #[must_use]
    pub fn is_keyword(segment: &str) -> bool {
        Self::KEYWORDS.contains(&segment)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The last addressed resource of a self-link.
///
/// Fields are `None` when the path is too short to contain them; callers are
/// expected to pass well-formed links.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceInfo {
    /// The resource type keyword (e.g. `"colls"`).
    pub resource_type: Option<String>,
    /// The resource id.
    pub id: Option<String>,
    /// The normalized link, starting and ending with `/`.
    pub self_link: String,
}

impl ResourceInfo {
    /// Returns the id, or an empty string when the path carried none.
    #[must_use]
    pub fn id_or_empty(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

/// Parses a self-link into the type and id of the last addressed resource.
///
/// The path is normalized to start and end with `/`. When it ends in a full
/// `type/id` pair, that pair is returned; when it ends in a bare `type/`,
/// the id of the parent pair is returned along with the trailing type.
#[must_use]
pub fn parse_path(resource_path: &str) -> ResourceInfo {
    let mut self_link = String::with_capacity(resource_path.len() + 2);
    if !resource_path.starts_with('/') {
        self_link.push('/');
    }
    self_link.push_str(resource_path);
    if !self_link.ends_with('/') {
        self_link.push('/');
    }

    let parts: Vec<&str> = self_link.split('/').collect();
    let part = |back: usize| {
        parts
            .len()
            .checked_sub(back)
            .and_then(|i| parts.get(i))
            .map(|s| (*s).to_string())
    };

    let (id, resource_type) = if parts.len() % 2 == 0 {
        (part(2), part(3))
    } else {
        (part(3), part(2))
    };

    ResourceInfo {
        resource_type,
        id,
        self_link,
    }
}

/// Builds the request path for an item addressed by `link`.
///
/// `dbs/db1/` and `/dbs/db1/` both become `/dbs/db1/`.
#[must_use]
pub fn item_path(link: &str) -> String {
    format!("/{}", link.trim_start_matches('/'))
}

/// Builds the request path for the `resource_type` feed under `parent_link`.
///
/// ```rust
/// use documentdb_client::resources::{child_path, ResourceType};
///
/// assert_eq!(child_path("dbs/db1", ResourceType::Collections), "/dbs/db1/colls/");
/// ```
#[must_use]
pub fn child_path(parent_link: &str, resource_type: ResourceType) -> String {
    let parent = parent_link.trim_matches('/');
    if parent.is_empty() {
        format!("/{resource_type}/")
    } else {
        format!("/{parent}/{resource_type}/")
    }
}

/// Returns `true` when any segment of `path` is the `media` keyword.
#[must_use]
pub fn is_media_path(path: &str) -> bool {
    path.split('/').any(|segment| segment == ResourceType::Media.as_str())
}

/// Derives the attachment id used to authorize a media request.
///
/// The media id is base64; when it decodes to more than 20 bytes the first 20
/// bytes are re-encoded, otherwise the media id itself is used.
#[must_use]
pub fn attachment_id_from_media_id(media_id: &str) -> String {
    match BASE64_STANDARD.decode(media_id) {
        Ok(bytes) if bytes.len() > RESOURCE_ID_LENGTH => {
            BASE64_STANDARD.encode(&bytes[..RESOURCE_ID_LENGTH])
        }
        _ => media_id.to_string(),
    }
}

/// Generates a random 36 character hyphenated hex id (8-4-4-4-12).
#[must_use]
pub fn generate_guid_id() -> String {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];
    let mut rng = rand::thread_rng();
    let mut id = String::with_capacity(36);

    for (i, len) in GROUPS.iter().enumerate() {
        if i > 0 {
            id.push('-');
        }
        for _ in 0..*len {
            let digit = rng.gen_range(0..16u32);
            id.push(char::from_digit(digit, 16).unwrap_or('0'));
        }
    }

    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_full_pair() {
        let info = parse_path("/dbs/db1/colls/coll1/");
        assert_eq!(info.resource_type.as_deref(), Some("colls"));
        assert_eq!(info.id.as_deref(), Some("coll1"));
    }

    #[test]
    fn test_parse_path_trailing_type() {
        let info = parse_path("/dbs/db1/colls/");
        assert_eq!(info.resource_type.as_deref(), Some("colls"));
        assert_eq!(info.id.as_deref(), Some("db1"));
    }

    #[test]
    fn test_parse_path_normalizes_slashes() {
        let info = parse_path("dbs/db1/colls/coll1/docs/doc1");
        assert_eq!(info.self_link, "/dbs/db1/colls/coll1/docs/doc1/");
        assert_eq!(info.resource_type.as_deref(), Some("docs"));
        assert_eq!(info.id.as_deref(), Some("doc1"));
    }

    #[test]
    fn test_parse_path_short_input_yields_missing_fields() {
        let info = parse_path("");
        assert_eq!(info.self_link, "/");
        assert_eq!(info.resource_type, None);
        assert_eq!(info.id_or_empty(), "");

        let info = parse_path("dbs");
        assert_eq!(info.resource_type.as_deref(), Some("dbs"));
        assert_eq!(info.id.as_deref(), Some(""));
    }

    #[test]
    fn test_item_and_child_paths() {
        assert_eq!(item_path("dbs/db1/"), "/dbs/db1/");
        assert_eq!(item_path("/dbs/db1/"), "/dbs/db1/");
        assert_eq!(child_path("/dbs/db1/", ResourceType::Users), "/dbs/db1/users/");
        assert_eq!(child_path("", ResourceType::Databases), "/dbs/");
    }

    #[test]
    fn test_is_media_path_matches_whole_segments() {
        assert!(is_media_path("/media/abc"));
        assert!(!is_media_path("/dbs/db1/colls/multimedia/docs/"));
        assert!(!is_media_path("/dbs/db1/"));
    }

    #[test]
    fn test_keywords_cover_every_addressable_type() {
        for keyword in ResourceType::KEYWORDS {
            assert!(ResourceType::is_keyword(keyword));
        }
        assert!(!ResourceType::is_keyword("coll1"));
        assert!(!ResourceType::is_keyword(""));
    }

    #[test]
    fn test_attachment_id_from_short_media_id_is_unchanged() {
        let media_id = BASE64_STANDARD.encode([1u8; 8]);
        assert_eq!(attachment_id_from_media_id(&media_id), media_id);
        assert_eq!(attachment_id_from_media_id("not base64!"), "not base64!");
    }

    #[test]
    fn test_attachment_id_from_long_media_id_is_truncated() {
        let bytes: Vec<u8> = (0u8..32).collect();
        let media_id = BASE64_STANDARD.encode(&bytes);
        let expected = BASE64_STANDARD.encode(&bytes[..20]);
        assert_eq!(attachment_id_from_media_id(&media_id), expected);
    }

    #[test]
    fn test_generate_guid_id_shape() {
        let id = generate_guid_id();
        assert_eq!(id.len(), 36);
        let groups: Vec<&str> = id.split('-').collect();
        assert_eq!(
            groups.iter().map(|g| g.len()).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12]
        );
        assert!(id
            .chars()
            .all(|c| c == '-' || (c.is_ascii_hexdigit() && !c.is_ascii_uppercase())));
        assert_ne!(generate_guid_id(), id);
    }
}
