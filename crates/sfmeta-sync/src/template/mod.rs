//! Template registry
//!
//! Templates are looked up by entity kind and name. The registry is a plain
//! value: build it with [`TemplateRegistry::builtin`], register extra
//! templates, and hand it to the orchestrator.
//!
//! ```
//! use sfmeta_sync::template::{render, TemplateRegistry, context_from};
//! use sfmeta_common::metadata::EntityKind;
//!
//! let registry = TemplateRegistry::builtin();
//! let fields = registry.get(EntityKind::Object, "fields").unwrap();
//! let rendered = render(fields, &context_from([("OBJECT_NAME", "Account")]));
//! assert_eq!(rendered.table.unwrap().title, "🏷️ Account - All Fields");
//! ```

pub mod builtin;
pub mod context;
pub mod descriptor;
pub mod render;

pub use context::{demo_context, flow_context, object_context, profile_context};
pub use descriptor::{Block, Column, ColumnType, SelectOption, TableSchema, TemplateDescriptor};
pub use render::{context_from, placeholders, render, render_str, RenderContext};

use crate::error::{Result, SyncError};
use crate::subcomponent::Subcomponent;
use sfmeta_common::metadata::EntityKind;
use std::collections::BTreeMap;
use tracing::debug;

/// Templates keyed by entity kind, in registration order within a kind
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<EntityKind, Vec<(String, TemplateDescriptor)>>,
}

impl TemplateRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the object, profile and flow templates
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let sets = [
            (EntityKind::Object, builtin::object_templates()),
            (EntityKind::Profile, builtin::profile_templates()),
            (EntityKind::Flow, builtin::flow_templates()),
        ];
        for (kind, templates) in sets {
            let entries = registry.templates.entry(kind).or_default();
            entries.extend(templates.into_iter().map(|(name, d)| (name.to_string(), d)));
        }
        registry
    }

    /// Add or replace a template.
    ///
    /// A table schema must have exactly one title column, and every table
    /// position in the page structure must name a table of `kind`.
    pub fn register(
        &mut self,
        kind: EntityKind,
        name: impl Into<String>,
        descriptor: TemplateDescriptor,
    ) -> Result<()> {
        let name = name.into();

        if let Some(table) = &descriptor.table {
            table.validate().map_err(|reason| SyncError::InvalidTemplate {
                name: format!("{}/{}", kind, name),
                reason,
            })?;
        }
        if let Some(table) = descriptor
            .blocks
            .iter()
            .filter_map(Block::table_name)
            .find(|table| Subcomponent::from_name(kind, table).is_none())
        {
            return Err(SyncError::InvalidTemplate {
                name: format!("{}/{}", kind, name),
                reason: format!("no {} table named '{}'", kind, table),
            });
        }
        if descriptor.title.is_none() && descriptor.table.is_none() {
            return Err(SyncError::InvalidTemplate {
                name: format!("{}/{}", kind, name),
                reason: "template has neither a page title nor a table".to_string(),
            });
        }

        debug!(kind = %kind, template = %name, "Registering template");

        let entries = self.templates.entry(kind).or_default();
        match entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = descriptor,
            None => entries.push((name, descriptor)),
        }
        Ok(())
    }

    pub fn get(&self, kind: EntityKind, name: &str) -> Result<&TemplateDescriptor> {
        self.templates
            .get(&kind)
            .and_then(|entries| entries.iter().find(|(n, _)| n == name))
            .map(|(_, descriptor)| descriptor)
            .ok_or_else(|| SyncError::template_not_found(kind.as_str(), name))
    }

    /// Lookup with the kind given as text, e.g. from the command line
    pub fn lookup(&self, kind: &str, name: &str) -> Result<&TemplateDescriptor> {
        let parsed: EntityKind = kind
            .parse()
            .map_err(|_| SyncError::template_not_found(kind, name))?;
        self.get(parsed, name)
    }

    pub fn overview(&self, kind: EntityKind) -> Result<&TemplateDescriptor> {
        self.get(kind, builtin::OVERVIEW)
    }

    pub fn table(&self, sub: Subcomponent) -> Result<&TemplateDescriptor> {
        self.get(sub.entity_kind(), sub.template_name())
    }

    /// Entity kinds with at least one template
    pub fn kinds(&self) -> Vec<EntityKind> {
        self.templates
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Template names of one kind, in registration order
    pub fn templates(&self, kind: EntityKind) -> Vec<&str> {
        self.templates
            .get(&kind)
            .map(|entries| entries.iter().map(|(n, _)| n.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Check that every required key is present in `context`
pub fn validate_context(
    template: &str,
    descriptor: &TemplateDescriptor,
    context: &RenderContext,
) -> Result<()> {
    let missing: Vec<String> = descriptor
        .required_context
        .iter()
        .filter(|key| !context.contains_key(key.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SyncError::Validation {
            template: template.to_string(),
            missing,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_listing() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(
            registry.kinds(),
            vec![EntityKind::Object, EntityKind::Profile, EntityKind::Flow]
        );
        assert_eq!(
            registry.templates(EntityKind::Object),
            vec![
                "overview",
                "fields",
                "recordTypes",
                "validationRules",
                "businessProcesses",
                "compactLayouts",
                "listViews"
            ]
        );
        assert_eq!(registry.templates(EntityKind::Profile).len(), 11);
        assert_eq!(registry.templates(EntityKind::Flow), vec!["overview", "decisions", "recordUpdates"]);
    }

    #[test]
    fn test_unknown_template() {
        let registry = TemplateRegistry::builtin();
        let err = registry.get(EntityKind::Flow, "fields").unwrap_err();
        assert!(matches!(
            err,
            SyncError::TemplateNotFound { ref kind, ref name } if kind == "flow" && name == "fields"
        ));

        assert!(matches!(
            registry.lookup("layout", "overview"),
            Err(SyncError::TemplateNotFound { .. })
        ));
        assert!(registry.lookup("objects", "fields").is_ok());
    }

    #[test]
    fn test_register_rejects_bad_schema() {
        let mut registry = TemplateRegistry::new();
        let bad = TemplateDescriptor::table(TableSchema::new(
            "No title",
            vec![Column::text("API Name")],
        ));
        assert!(matches!(
            registry.register(EntityKind::Object, "custom", bad),
            Err(SyncError::InvalidTemplate { .. })
        ));
        assert!(registry.kinds().is_empty());

        assert!(registry
            .register(EntityKind::Object, "empty", TemplateDescriptor::default())
            .is_err());
    }

    #[test]
    fn test_register_rejects_table_position_of_other_kind() {
        let mut registry = TemplateRegistry::new();
        let page = TemplateDescriptor::page(
            "{FLOW_NAME}",
            vec![Block::heading(2, "Fields"), Block::database(Subcomponent::Fields)],
        );
        let err = registry.register(EntityKind::Flow, "overview", page.clone()).unwrap_err();
        assert!(err.to_string().contains("no flow table named 'fields'"));

        assert!(registry.register(EntityKind::Object, "overview", page).is_ok());
    }

    #[test]
    fn test_builtin_overviews_place_every_table_once() {
        let registry = TemplateRegistry::builtin();
        for kind in EntityKind::ALL {
            let placed: Vec<&str> = registry
                .overview(kind)
                .unwrap()
                .blocks
                .iter()
                .filter_map(Block::table_name)
                .collect();
            let expected: Vec<&str> = Subcomponent::for_kind(kind)
                .iter()
                .map(Subcomponent::template_name)
                .collect();

            let mut sorted = placed.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), placed.len(), "{kind} places a table twice");
            for name in expected {
                assert!(placed.contains(&name), "{kind} overview does not place {name}");
            }
        }
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = TemplateRegistry::builtin();
        let custom = TemplateDescriptor::page("Custom {OBJECT_LABEL}", vec![]);
        registry.register(EntityKind::Object, "overview", custom.clone()).unwrap();
        assert_eq!(registry.overview(EntityKind::Object).unwrap(), &custom);
        assert_eq!(registry.templates(EntityKind::Object).len(), 7);
    }

    #[test]
    fn test_validate_context_reports_all_missing() {
        let registry = TemplateRegistry::builtin();
        let overview = registry.overview(EntityKind::Profile).unwrap();

        let err = validate_context("profile/overview", overview, &RenderContext::new()).unwrap_err();
        match err {
            SyncError::Validation { missing, .. } => {
                assert_eq!(missing, vec!["PROFILE_LABEL", "PROFILE_API_NAME"])
            },
            other => panic!("unexpected error: {other}"),
        }

        let ctx = context_from([("PROFILE_LABEL", ""), ("PROFILE_API_NAME", "Admin")]);
        assert!(validate_context("profile/overview", overview, &ctx).is_ok());
    }

    #[test]
    fn test_profile_tables_need_no_context() {
        let registry = TemplateRegistry::builtin();
        for sub in Subcomponent::for_kind(EntityKind::Profile) {
            let descriptor = registry.table(sub).unwrap();
            assert!(validate_context("t", descriptor, &RenderContext::new()).is_ok());
        }
    }
}
