//! Conversion between parsed entities and cache rows

use crate::error::{CliError, Result};
use sfmeta_common::metadata::{
    Details, EntityKind, MetadataRecord, ParsedEntity, ParsedFlow, ParsedObject, ParsedProfile, RecordKind,
};
use sfmeta_common::Chunked;
use sfmeta_sync::orchestrator::unit_records;
use sfmeta_sync::Subcomponent;
use tracing::warn;

/// Row of the `entities` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EntityRow {
    pub id: i64,
    pub kind: String,
    pub api_name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub details_json: String,
    pub last_modified: String,
}

/// Row of the `components` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ComponentRow {
    pub component: String,
    pub api_name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub details_json: String,
}

/// Record kind stored under a subcomponent
pub fn record_kind(sub: Subcomponent) -> RecordKind {
    match sub {
        Subcomponent::Fields => RecordKind::Field,
        Subcomponent::RecordTypes => RecordKind::RecordType,
        Subcomponent::ValidationRules => RecordKind::ValidationRule,
        Subcomponent::BusinessProcesses => RecordKind::BusinessProcess,
        Subcomponent::CompactLayouts => RecordKind::CompactLayout,
        Subcomponent::ListViews => RecordKind::ListView,
        Subcomponent::Permission(kind) => RecordKind::ProfilePermission(kind),
        Subcomponent::Decisions => RecordKind::FlowDecision,
        Subcomponent::RecordUpdates => RecordKind::FlowRecordUpdate,
    }
}

/// The entity's own record
pub fn head(entity: &ParsedEntity) -> &MetadataRecord {
    match entity {
        ParsedEntity::Object(o) => &o.object,
        ParsedEntity::Profile(p) => &p.profile,
        ParsedEntity::Flow(f) => &f.flow,
    }
}

/// Non-empty component lists of an entity, keyed by subcomponent
pub fn components(entity: &ParsedEntity) -> Vec<(Subcomponent, Vec<MetadataRecord>)> {
    Subcomponent::for_kind(entity.kind())
        .into_iter()
        .map(|sub| (sub, unit_records(entity, sub)))
        .filter(|(_, records)| !records.is_empty())
        .collect()
}

fn decode_details(raw: &str) -> Result<Details> {
    if raw.trim().is_empty() {
        return Ok(Details::new());
    }
    Ok(serde_json::from_str(raw)?)
}

fn head_kind(kind: EntityKind) -> RecordKind {
    match kind {
        EntityKind::Object => RecordKind::Object,
        EntityKind::Profile => RecordKind::Profile,
        EntityKind::Flow => RecordKind::Flow,
    }
}

/// Rebuild a parsed entity from its cache rows.
///
/// Profile permissions are re-chunked at `chunk_size`.
pub fn assemble(
    kind: EntityKind,
    entity: EntityRow,
    rows: Vec<ComponentRow>,
    chunk_size: usize,
) -> Result<ParsedEntity> {
    let record = MetadataRecord {
        kind: head_kind(kind),
        api_name: entity.api_name,
        label: entity.label,
        description: entity.description,
        details: decode_details(&entity.details_json)?,
    };

    let mut grouped: Vec<(Subcomponent, Vec<MetadataRecord>)> = Vec::new();
    for row in rows {
        let Some(sub) = Subcomponent::from_name(kind, &row.component) else {
            warn!(kind = %kind, component = %row.component, "Skipping unknown cached component");
            continue;
        };
        let record = MetadataRecord {
            kind: record_kind(sub),
            api_name: row.api_name,
            label: row.label,
            description: row.description,
            details: decode_details(&row.details_json)?,
        };
        match grouped.iter_mut().find(|(s, _)| *s == sub) {
            Some((_, records)) => records.push(record),
            None => grouped.push((sub, vec![record])),
        }
    }

    let entity = match kind {
        EntityKind::Object => {
            let mut object = ParsedObject::new(record);
            for (sub, records) in grouped {
                match sub {
                    Subcomponent::Fields => object.fields = records,
                    Subcomponent::RecordTypes => object.record_types = records,
                    Subcomponent::ValidationRules => object.validation_rules = records,
                    Subcomponent::BusinessProcesses => object.business_processes = records,
                    Subcomponent::CompactLayouts => object.compact_layouts = records,
                    Subcomponent::ListViews => object.list_views = records,
                    _ => {},
                }
            }
            ParsedEntity::Object(object)
        },
        EntityKind::Profile => {
            let mut profile = ParsedProfile::new(record);
            for (sub, records) in grouped {
                if let Subcomponent::Permission(permission) = sub {
                    let chunked =
                        Chunked::new(records, chunk_size).map_err(|e| CliError::cache(e.to_string()))?;
                    profile.permissions.insert(permission, chunked);
                }
            }
            ParsedEntity::Profile(profile)
        },
        EntityKind::Flow => {
            let mut flow = ParsedFlow::new(record);
            for (sub, records) in grouped {
                match sub {
                    Subcomponent::Decisions => flow.decisions = records,
                    Subcomponent::RecordUpdates => flow.record_updates = records,
                    _ => {},
                }
            }
            ParsedEntity::Flow(flow)
        },
    };

    Ok(entity)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sfmeta_common::metadata::PermissionKind;

    fn entity_row(api_name: &str) -> EntityRow {
        EntityRow {
            id: 1,
            kind: "flow".into(),
            api_name: api_name.into(),
            label: Some("Lead Assignment".into()),
            description: None,
            details_json: r#"{"status":"Active"}"#.into(),
            last_modified: "2025-01-01T00:00:00Z".into(),
        }
    }

    fn component(name: &str, api_name: &str) -> ComponentRow {
        ComponentRow {
            component: name.into(),
            api_name: api_name.into(),
            label: None,
            description: None,
            details_json: "{}".into(),
        }
    }

    #[test]
    fn test_assemble_flow() {
        let rows = vec![
            component("decisions", "Is_Hot"),
            component("recordUpdates", "Set_Owner"),
            component("fields", "Stray"),
        ];
        let entity = assemble(EntityKind::Flow, entity_row("Lead_Assignment"), rows, 100).unwrap();

        let ParsedEntity::Flow(flow) = entity else {
            panic!("expected a flow");
        };
        assert_eq!(flow.status(), "Active");
        assert_eq!(flow.decisions[0].kind, RecordKind::FlowDecision);
        assert_eq!(flow.record_updates[0].api_name, "Set_Owner");
    }

    #[test]
    fn test_assemble_profile_rechunks() {
        let rows: Vec<ComponentRow> = (0..7)
            .map(|i| component("userPermissions", &format!("Perm{}", i)))
            .collect();
        let entity = assemble(EntityKind::Profile, entity_row("Admin"), rows, 3).unwrap();

        let ParsedEntity::Profile(profile) = entity else {
            panic!("expected a profile");
        };
        let chunked = &profile.permissions[&PermissionKind::UserPermissions];
        assert_eq!(chunked.chunks().len(), 3);
        assert_eq!(chunked.len(), 7);
    }

    #[test]
    fn test_record_kind_matches_parsers() {
        assert_eq!(record_kind(Subcomponent::Fields), RecordKind::Field);
        assert_eq!(
            record_kind(Subcomponent::Permission(PermissionKind::TabVisibilities)),
            RecordKind::ProfilePermission(PermissionKind::TabVisibilities)
        );
    }
}
