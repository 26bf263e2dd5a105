//! Metadata record model

use super::value::{DetailValue, Details};
use crate::error::SfmetaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level metadata entity that gets its own documentation page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Object,
    Profile,
    Flow,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Object, EntityKind::Profile, EntityKind::Flow];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Object => "object",
            EntityKind::Profile => "profile",
            EntityKind::Flow => "flow",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = SfmetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "object" | "objects" => Ok(EntityKind::Object),
            "profile" | "profiles" => Ok(EntityKind::Profile),
            "flow" | "flows" => Ok(EntityKind::Flow),
            other => Err(SfmetaError::UnknownEntityKind(other.to_string())),
        }
    }
}

/// Profile permission row subtypes, named after their XML elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PermissionKind {
    #[serde(rename = "applicationVisibilities")]
    ApplicationVisibilities,
    #[serde(rename = "classAccesses")]
    ClassAccesses,
    #[serde(rename = "fieldPermissions")]
    FieldPermissions,
    #[serde(rename = "objectPermissions")]
    ObjectPermissions,
    #[serde(rename = "userPermissions")]
    UserPermissions,
    #[serde(rename = "layoutAssignments")]
    LayoutAssignments,
    #[serde(rename = "recordTypeVisibilities")]
    RecordTypeVisibilities,
    #[serde(rename = "tabVisibilities")]
    TabVisibilities,
    #[serde(rename = "pageAccesses")]
    PageAccesses,
    #[serde(rename = "flowAccesses")]
    FlowAccesses,
}

impl PermissionKind {
    pub const ALL: [PermissionKind; 10] = [
        PermissionKind::ApplicationVisibilities,
        PermissionKind::ClassAccesses,
        PermissionKind::FieldPermissions,
        PermissionKind::ObjectPermissions,
        PermissionKind::UserPermissions,
        PermissionKind::LayoutAssignments,
        PermissionKind::RecordTypeVisibilities,
        PermissionKind::TabVisibilities,
        PermissionKind::PageAccesses,
        PermissionKind::FlowAccesses,
    ];

    /// XML element name of this permission kind
    pub fn element(&self) -> &'static str {
        match self {
            PermissionKind::ApplicationVisibilities => "applicationVisibilities",
            PermissionKind::ClassAccesses => "classAccesses",
            PermissionKind::FieldPermissions => "fieldPermissions",
            PermissionKind::ObjectPermissions => "objectPermissions",
            PermissionKind::UserPermissions => "userPermissions",
            PermissionKind::LayoutAssignments => "layoutAssignments",
            PermissionKind::RecordTypeVisibilities => "recordTypeVisibilities",
            PermissionKind::TabVisibilities => "tabVisibilities",
            PermissionKind::PageAccesses => "pageAccesses",
            PermissionKind::FlowAccesses => "flowAccesses",
        }
    }

    /// Child elements whose values identify one permission row.
    ///
    /// Layout assignments are only unique per layout and record type.
    pub fn identity_elements(&self) -> &'static [&'static str] {
        match self {
            PermissionKind::ApplicationVisibilities => &["application"],
            PermissionKind::ClassAccesses => &["apexClass"],
            PermissionKind::FieldPermissions => &["field"],
            PermissionKind::ObjectPermissions => &["object"],
            PermissionKind::UserPermissions => &["name"],
            PermissionKind::LayoutAssignments => &["layout", "recordType"],
            PermissionKind::RecordTypeVisibilities => &["recordType"],
            PermissionKind::TabVisibilities => &["tab"],
            PermissionKind::PageAccesses => &["apexPage"],
            PermissionKind::FlowAccesses => &["flow"],
        }
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element())
    }
}

impl FromStr for PermissionKind {
    type Err = SfmetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionKind::ALL
            .into_iter()
            .find(|kind| kind.element().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SfmetaError::UnknownPermissionKind(s.to_string()))
    }
}

/// Kind of a single metadata record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "permission")]
pub enum RecordKind {
    Object,
    Field,
    RecordType,
    BusinessProcess,
    CompactLayout,
    ValidationRule,
    ListView,
    Profile,
    ProfilePermission(PermissionKind),
    Flow,
    FlowDecision,
    FlowRecordUpdate,
}

/// One parsed metadata item: an object, a field, a permission row, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub kind: RecordKind,
    pub api_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub details: Details,
}

impl MetadataRecord {
    pub fn new(kind: RecordKind, api_name: impl Into<String>) -> Self {
        Self {
            kind,
            api_name: api_name.into(),
            label: None,
            description: None,
            details: Details::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<DetailValue>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Label when present and non-empty, otherwise the API name
    pub fn display_name(&self) -> &str {
        self.label
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(&self.api_name)
    }

    pub fn has_api_name(&self) -> bool {
        !self.api_name.trim().is_empty()
    }

    pub fn detail(&self, key: &str) -> Option<&DetailValue> {
        self.details.get(key)
    }

    /// Display text of a detail entry, empty when absent
    pub fn detail_text(&self, key: &str) -> String {
        self.detail(key).map(DetailValue::as_text).unwrap_or_default()
    }

    /// Boolean flag of a detail entry, false when absent
    pub fn detail_flag(&self, key: &str) -> bool {
        self.detail(key).is_some_and(DetailValue::to_boolean)
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}
