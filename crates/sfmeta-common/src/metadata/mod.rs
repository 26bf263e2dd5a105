//! Salesforce metadata model
//!
//! Parsers produce these types; the sync engine and the local cache consume
//! them.

pub mod entity;
pub mod record;
pub mod value;

pub use entity::{ParsedEntity, ParsedFlow, ParsedObject, ParsedProfile};
pub use record::{EntityKind, MetadataRecord, PermissionKind, RecordKind};
pub use value::{DetailValue, Details};
