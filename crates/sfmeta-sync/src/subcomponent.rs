//! Table-backed subcomponents of each entity kind

use sfmeta_common::metadata::{EntityKind, PermissionKind};
use std::fmt;

/// One documentation table of an entity.
///
/// Every `(EntityKind, table)` pair the sync engine knows is a variant here,
/// so row rules, key columns and template names are matched exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subcomponent {
    Fields,
    RecordTypes,
    ValidationRules,
    BusinessProcesses,
    CompactLayouts,
    ListViews,
    Permission(PermissionKind),
    Decisions,
    RecordUpdates,
}

impl Subcomponent {
    pub const OBJECT: [Subcomponent; 6] = [
        Subcomponent::Fields,
        Subcomponent::RecordTypes,
        Subcomponent::ValidationRules,
        Subcomponent::BusinessProcesses,
        Subcomponent::CompactLayouts,
        Subcomponent::ListViews,
    ];

    pub const FLOW: [Subcomponent; 2] = [Subcomponent::Decisions, Subcomponent::RecordUpdates];

    /// Tables of an entity kind, in sync order
    pub fn for_kind(kind: EntityKind) -> Vec<Subcomponent> {
        match kind {
            EntityKind::Object => Self::OBJECT.to_vec(),
            EntityKind::Profile => PermissionKind::ALL
                .into_iter()
                .map(Subcomponent::Permission)
                .collect(),
            EntityKind::Flow => Self::FLOW.to_vec(),
        }
    }

    pub fn entity_kind(&self) -> EntityKind {
        match self {
            Subcomponent::Fields
            | Subcomponent::RecordTypes
            | Subcomponent::ValidationRules
            | Subcomponent::BusinessProcesses
            | Subcomponent::CompactLayouts
            | Subcomponent::ListViews => EntityKind::Object,
            Subcomponent::Permission(_) => EntityKind::Profile,
            Subcomponent::Decisions | Subcomponent::RecordUpdates => EntityKind::Flow,
        }
    }

    /// Template name under the entity kind
    pub fn template_name(&self) -> &'static str {
        match self {
            Subcomponent::Fields => "fields",
            Subcomponent::RecordTypes => "recordTypes",
            Subcomponent::ValidationRules => "validationRules",
            Subcomponent::BusinessProcesses => "businessProcesses",
            Subcomponent::CompactLayouts => "compactLayouts",
            Subcomponent::ListViews => "listViews",
            Subcomponent::Permission(kind) => kind.element(),
            Subcomponent::Decisions => "decisions",
            Subcomponent::RecordUpdates => "recordUpdates",
        }
    }

    /// Columns whose display values identify a row remotely
    pub fn key_columns(&self) -> &'static [&'static str] {
        match self {
            Subcomponent::Permission(kind) => match kind {
                PermissionKind::ObjectPermissions => &["Object"],
                PermissionKind::FieldPermissions => &["Field"],
                PermissionKind::RecordTypeVisibilities => &["Record Type"],
                PermissionKind::ApplicationVisibilities => &["Application"],
                PermissionKind::TabVisibilities => &["Tab"],
                PermissionKind::ClassAccesses => &["Apex Class"],
                PermissionKind::FlowAccesses => &["Flow"],
                PermissionKind::UserPermissions => &["Permission"],
                PermissionKind::LayoutAssignments => &["Layout", "RecordType"],
                PermissionKind::PageAccesses => &["Page"],
            },
            _ => &["API Name"],
        }
    }

    pub fn from_name(kind: EntityKind, name: &str) -> Option<Subcomponent> {
        Self::for_kind(kind)
            .into_iter()
            .find(|sub| sub.template_name() == name)
    }
}

impl fmt::Display for Subcomponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity_kind(), self.template_name())
    }
}
