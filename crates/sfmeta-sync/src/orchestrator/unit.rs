//! Per-entity inputs: render context, table records and page layout

use crate::subcomponent::Subcomponent;
use crate::template::{flow_context, object_context, profile_context, Block, RenderContext};
use sfmeta_common::metadata::{EntityKind, MetadataRecord, ParsedEntity};
use tracing::warn;

/// Render context of an entity's overview and table templates
pub fn unit_context(unit: &ParsedEntity) -> RenderContext {
    match unit {
        ParsedEntity::Object(object) => object_context(object),
        ParsedEntity::Profile(profile) => profile_context(profile),
        ParsedEntity::Flow(flow) => flow_context(flow),
    }
}

/// Records of one table, chunks flattened. Empty for a subcomponent of
/// another kind.
pub fn unit_records(unit: &ParsedEntity, sub: Subcomponent) -> Vec<MetadataRecord> {
    match (unit, sub) {
        (ParsedEntity::Object(o), Subcomponent::Fields) => o.fields.clone(),
        (ParsedEntity::Object(o), Subcomponent::RecordTypes) => o.record_types.clone(),
        (ParsedEntity::Object(o), Subcomponent::ValidationRules) => o.validation_rules.clone(),
        (ParsedEntity::Object(o), Subcomponent::BusinessProcesses) => o.business_processes.clone(),
        (ParsedEntity::Object(o), Subcomponent::CompactLayouts) => o.compact_layouts.clone(),
        (ParsedEntity::Object(o), Subcomponent::ListViews) => o.list_views.clone(),
        (ParsedEntity::Profile(p), Subcomponent::Permission(kind)) => p.flattened(kind),
        (ParsedEntity::Flow(f), Subcomponent::Decisions) => f.decisions.clone(),
        (ParsedEntity::Flow(f), Subcomponent::RecordUpdates) => f.record_updates.clone(),
        _ => Vec::new(),
    }
}

/// Overview blocks split at the table positions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    /// Blocks before the first table
    pub lead: Vec<Block>,
    /// Each placed table with the blocks that follow it
    pub sections: Vec<(Subcomponent, Vec<Block>)>,
}

impl PageLayout {
    /// Split rendered overview blocks. Positions naming an unknown table, or a
    /// table already placed, are dropped.
    pub fn split(kind: EntityKind, blocks: Vec<Block>) -> Self {
        let mut layout = Self::default();

        for block in blocks {
            let Some(name) = block.table_name() else {
                match layout.sections.last_mut() {
                    Some((_, trailing)) => trailing.push(block),
                    None => layout.lead.push(block),
                }
                continue;
            };

            match Subcomponent::from_name(kind, name) {
                Some(sub) if !layout.sections.iter().any(|(placed, _)| *placed == sub) => {
                    layout.sections.push((sub, Vec::new()));
                },
                Some(sub) => warn!(table = %sub, "Table placed twice, keeping the first position"),
                None => warn!(kind = %kind, table = %name, "Overview places an unknown table"),
            }
        }
        layout
    }

    /// Every table of `kind` in page order: placed tables first, then the
    /// unplaced ones in their default order with nothing after them
    pub fn table_order(self, kind: EntityKind) -> Vec<(Subcomponent, Vec<Block>)> {
        let mut order = self.sections;
        for sub in Subcomponent::for_kind(kind) {
            if !order.iter().any(|(placed, _)| *placed == sub) {
                order.push((sub, Vec::new()));
            }
        }
        order
    }
}
