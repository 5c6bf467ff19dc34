//! Resource addressing, request options and typed resource models.
//!
//! This module holds the pieces shared by every resource operation:
//!
//! - [`parse_path`] and the path helpers that turn self-links into request paths
//! - [`RequestOptions`] and [`MediaOptions`], the per-call option bags
//! - [`Permission`], [`DatabaseAccount`] and the typed enums of the service
//! - [`normalize_script_body`] for stored procedure, trigger and UDF bodies

mod models;
mod options;
mod path;
mod script;

pub use models::{
    ConsistencyPolicy, DatabaseAccount, Permission, PermissionMode, TriggerOperation, TriggerType,
};
pub use options::{
    AccessCondition, AccessConditionType, IndexingDirective, MediaOptions, RequestOptions,
    TriggerInclude,
};
pub use path::{
    attachment_id_from_media_id, child_path, generate_guid_id, is_media_path, item_path,
    parse_path, ResourceInfo, ResourceType,
};
pub use script::{normalize_script_body, SERVER_SCRIPT_FIELD};
