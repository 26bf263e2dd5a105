//! Parsed entities: one object directory, one profile file, one flow file

use super::record::{EntityKind, MetadataRecord, PermissionKind};
use super::value::DetailValue;
use crate::chunk::Chunked;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A custom or standard object with its child metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedObject {
    pub object: MetadataRecord,
    #[serde(default)]
    pub fields: Vec<MetadataRecord>,
    #[serde(default)]
    pub record_types: Vec<MetadataRecord>,
    #[serde(default)]
    pub business_processes: Vec<MetadataRecord>,
    #[serde(default)]
    pub compact_layouts: Vec<MetadataRecord>,
    #[serde(default)]
    pub validation_rules: Vec<MetadataRecord>,
    #[serde(default)]
    pub list_views: Vec<MetadataRecord>,
}

impl ParsedObject {
    pub fn new(object: MetadataRecord) -> Self {
        Self {
            object,
            fields: Vec::new(),
            record_types: Vec::new(),
            business_processes: Vec::new(),
            compact_layouts: Vec::new(),
            validation_rules: Vec::new(),
            list_views: Vec::new(),
        }
    }

    pub fn api_name(&self) -> &str {
        &self.object.api_name
    }

    pub fn plural_label(&self) -> String {
        self.object.detail_text("pluralLabel")
    }
}

/// A profile with its permission rows kept in chunks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedProfile {
    pub profile: MetadataRecord,
    #[serde(default)]
    pub permissions: BTreeMap<PermissionKind, Chunked<MetadataRecord>>,
}

impl ParsedProfile {
    pub fn new(profile: MetadataRecord) -> Self {
        Self {
            profile,
            permissions: BTreeMap::new(),
        }
    }

    pub fn api_name(&self) -> &str {
        &self.profile.api_name
    }

    pub fn user_license(&self) -> String {
        self.profile.detail_text("userLicense")
    }

    /// All rows of one permission kind, chunks concatenated
    pub fn flattened(&self, kind: PermissionKind) -> Vec<MetadataRecord> {
        self.permissions
            .get(&kind)
            .map(Chunked::flatten)
            .unwrap_or_default()
    }

    pub fn count(&self, kind: PermissionKind) -> usize {
        self.permissions.get(&kind).map_or(0, Chunked::len)
    }
}

/// A flow with its decisions and record updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFlow {
    pub flow: MetadataRecord,
    #[serde(default)]
    pub decisions: Vec<MetadataRecord>,
    #[serde(default)]
    pub record_updates: Vec<MetadataRecord>,
}

impl ParsedFlow {
    pub fn new(flow: MetadataRecord) -> Self {
        Self {
            flow,
            decisions: Vec::new(),
            record_updates: Vec::new(),
        }
    }

    pub fn api_name(&self) -> &str {
        &self.flow.api_name
    }

    pub fn status(&self) -> String {
        self.flow.detail_text("status")
    }

    pub fn process_type(&self) -> String {
        self.flow.detail_text("processType")
    }

    /// Object the flow starts on, from `<start><object>`
    pub fn start_object(&self) -> Option<String> {
        self.flow
            .detail("start")
            .and_then(|start| start.get("object"))
            .map(DetailValue::as_text)
            .filter(|s| !s.is_empty())
    }

    /// Operator of the first start filter
    pub fn start_operator(&self) -> Option<String> {
        self.flow
            .detail("start")
            .and_then(|start| start.get("filters"))
            .and_then(DetailValue::first)
            .and_then(|filter| filter.get("operator"))
            .map(DetailValue::as_text)
            .filter(|s| !s.is_empty())
    }
}

/// Any parsed entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParsedEntity {
    Object(ParsedObject),
    Profile(ParsedProfile),
    Flow(ParsedFlow),
}

impl ParsedEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            ParsedEntity::Object(_) => EntityKind::Object,
            ParsedEntity::Profile(_) => EntityKind::Profile,
            ParsedEntity::Flow(_) => EntityKind::Flow,
        }
    }

    pub fn api_name(&self) -> &str {
        match self {
            ParsedEntity::Object(o) => o.api_name(),
            ParsedEntity::Profile(p) => p.api_name(),
            ParsedEntity::Flow(f) => f.api_name(),
        }
    }
}
