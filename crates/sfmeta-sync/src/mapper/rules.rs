//! Column rules per subcomponent
//!
//! A rule reads first-class attributes and `details` entries of a record and
//! yields the raw value of one column. Columns without a rule go through
//! [`fallback`].

use super::analysis;
use super::coerce::field_type_option;
use crate::subcomponent::Subcomponent;
use sfmeta_common::metadata::{DetailValue, MetadataRecord, PermissionKind};

type Raw = Option<DetailValue>;

/// Raw value of `column` for `record`; `None` when the subcomponent has no
/// dedicated rule for that column
pub fn rule_value(
    sub: Subcomponent,
    column: &str,
    record: &MetadataRecord,
    siblings: &[MetadataRecord],
) -> Option<Raw> {
    match sub {
        Subcomponent::Fields => field_rule(column, record),
        Subcomponent::RecordTypes => record_type_rule(column, record),
        Subcomponent::ValidationRules => validation_rule(column, record, siblings),
        Subcomponent::BusinessProcesses => business_process_rule(column, record),
        Subcomponent::CompactLayouts => compact_layout_rule(column, record),
        Subcomponent::ListViews => list_view_rule(column, record),
        Subcomponent::Permission(kind) => permission_rule(kind, column, record),
        Subcomponent::Decisions => decision_rule(column, record),
        Subcomponent::RecordUpdates => record_update_rule(column, record),
    }
}

/// Column name verbatim, then lowercased, in first-class attributes and then
/// details; empty string when nothing matches
pub fn fallback(record: &MetadataRecord, column: &str) -> Raw {
    let lower = column.to_lowercase();
    let found = [column, lower.as_str()]
        .into_iter()
        .find_map(|key| attribute(record, key).or_else(|| record.detail(key).cloned()));
    found.or_else(|| text(""))
}

fn attribute(record: &MetadataRecord, key: &str) -> Raw {
    match key {
        "api_name" | "apiName" => text(&record.api_name),
        "label" => record.label.as_deref().and_then(text),
        "description" => record.description.as_deref().and_then(text),
        _ => None,
    }
}

fn text(s: impl Into<String>) -> Raw {
    Some(DetailValue::String(s.into()))
}

fn detail(record: &MetadataRecord, key: &str) -> Raw {
    record.detail(key).cloned()
}

/// First detail among `keys` that is present and non-empty
fn first_detail(record: &MetadataRecord, keys: &[&str]) -> Raw {
    keys.iter()
        .filter_map(|key| record.detail(key))
        .find(|value| !value.is_empty())
        .cloned()
}

fn name(record: &MetadataRecord) -> Raw {
    text(record.display_name())
}

fn api_name(record: &MetadataRecord) -> Raw {
    text(&record.api_name)
}

/// Description attribute, else a `description` detail
fn description(record: &MetadataRecord) -> Raw {
    match record.description.as_deref() {
        Some(d) if !d.trim().is_empty() => text(d),
        _ => detail(record, "description"),
    }
}

/// Values of `child` inside each element of a repeated detail
fn child_values(record: &MetadataRecord, key: &str, child: &str) -> Vec<String> {
    record
        .detail(key)
        .map(|value| {
            value
                .as_seq()
                .into_iter()
                .map(|item| match item {
                    DetailValue::Map(_) => item.get(child).map(DetailValue::as_text).unwrap_or_default(),
                    other => other.as_text(),
                })
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn joined(values: Vec<String>) -> Raw {
    text(values.join(", "))
}

fn field_rule(column: &str, record: &MetadataRecord) -> Option<Raw> {
    let raw = match column {
        "Field Name" => name(record),
        "API Name" => api_name(record),
        "Type" => text(field_type_option(&record.detail_text("type"))),
        "Required" => detail(record, "required"),
        "Unique" => detail(record, "unique"),
        "External ID" => detail(record, "externalId"),
        "Description" => description(record),
        "Help Text" => detail(record, "inlineHelpText"),
        "Default Value" => detail(record, "defaultValue"),
        "Formula" => detail(record, "formula"),
        "Reference To" => detail(record, "referenceTo"),
        "Field Level Security" => detail(record, "fieldLevelSecurity"),
        _ => return None,
    };
    Some(raw)
}

fn record_type_rule(column: &str, record: &MetadataRecord) -> Option<Raw> {
    let raw = match column {
        "Record Type Name" => name(record),
        "API Name" => api_name(record),
        "Active" => detail(record, "active"),
        "Description" => description(record),
        "Available Fields" => detail(record, "availableFields"),
        "Required Fields" => detail(record, "requiredFields"),
        "Page Layout" => detail(record, "pageLayout"),
        "Business Process" => detail(record, "businessProcess"),
        "Picklist Values" => picklist_values(record),
        _ => return None,
    };
    Some(raw)
}

/// `Picklist: A, B; Other: C` from `<picklistValues><picklist>` entries
fn picklist_values(record: &MetadataRecord) -> Raw {
    let value = record.detail("picklistValues")?;
    let entries: Vec<String> = value
        .as_seq()
        .into_iter()
        .map(|entry| match entry.get("picklist") {
            Some(picklist) => {
                let values: Vec<String> = entry
                    .get("values")
                    .map(|v| {
                        v.as_seq()
                            .into_iter()
                            .map(|item| item.get("fullName").map_or_else(|| item.as_text(), DetailValue::as_text))
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default();
                format!("{}: {}", picklist.as_text(), values.join(", "))
            },
            None => entry.as_text(),
        })
        .filter(|s| !s.is_empty())
        .collect();
    text(entries.join("; "))
}

fn validation_rule(column: &str, record: &MetadataRecord, siblings: &[MetadataRecord]) -> Option<Raw> {
    let raw = match column {
        "Rule Name" => name(record),
        "API Name" => api_name(record),
        "Error Message" => detail(record, "errorMessage"),
        "Active" => detail(record, "active"),
        "Error Condition" => detail(record, "errorConditionFormula"),
        "Purpose" => text(analysis::purpose(&analysis::error_condition(record))),
        "Logic Breakdown" => text(analysis::logic_breakdown(&analysis::error_condition(record))),
        "Merge Analysis" => text(analysis::merge_analysis(record, siblings)),
        "Impact Analysis" => detail(record, "impactAnalysis"),
        "Testing Scenarios" => detail(record, "testingScenarios"),
        _ => return None,
    };
    Some(raw)
}

fn business_process_rule(column: &str, record: &MetadataRecord) -> Option<Raw> {
    let raw = match column {
        "Process Name" => name(record),
        "API Name" => api_name(record),
        "Active" => first_detail(record, &["active", "isActive"]),
        "Description" => description(record),
        "Stages" => first_detail(record, &["stages"])
            .or_else(|| joined(child_values(record, "values", "fullName"))),
        "Entry Criteria" => detail(record, "entryCriteria"),
        "Exit Criteria" => detail(record, "exitCriteria"),
        "Related Record Types" => detail(record, "relatedRecordTypes"),
        _ => return None,
    };
    Some(raw)
}

fn compact_layout_rule(column: &str, record: &MetadataRecord) -> Option<Raw> {
    let raw = match column {
        "Layout Name" => name(record),
        "API Name" => api_name(record),
        "Active" => detail(record, "active"),
        "Description" => description(record),
        "Fields in Layout" => detail(record, "fields"),
        "Field Order" => first_detail(record, &["fieldOrder", "fields"]),
        "Related Record Types" => detail(record, "relatedRecordTypes"),
        _ => return None,
    };
    Some(raw)
}

fn list_view_rule(column: &str, record: &MetadataRecord) -> Option<Raw> {
    let raw = match column {
        "View Name" => name(record),
        "API Name" => api_name(record),
        "Type" => detail(record, "type"),
        "Visible" => detail(record, "visible"),
        "Description" => description(record),
        "Filter Criteria" => first_detail(record, &["filterCriteria"]).or_else(|| list_view_filters(record)),
        "Columns" => detail(record, "columns"),
        "Sort Order" => detail(record, "sortOrder"),
        "Scope" => first_detail(record, &["scope", "filterScope"]),
        _ => return None,
    };
    Some(raw)
}

/// `Field operation value` per `<filters>` entry
fn list_view_filters(record: &MetadataRecord) -> Raw {
    let filters = record.detail("filters")?;
    let parts: Vec<String> = filters
        .as_seq()
        .into_iter()
        .map(|filter| {
            ["field", "operation", "value"]
                .iter()
                .filter_map(|key| filter.get(key).map(DetailValue::as_text))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|s| !s.is_empty())
        .collect();
    text(parts.join("; "))
}

/// Text before `separator` in a detail, e.g. the object of `Account.Phone`
fn prefix_of(record: &MetadataRecord, key: &str, separator: char) -> Raw {
    let value = record.detail_text(key);
    value
        .split_once(separator)
        .map(|(prefix, _)| prefix.to_string())
        .and_then(text)
}

/// `object` detail, else derived from another detail's prefix
fn object_of(record: &MetadataRecord, key: &str, separator: char) -> Raw {
    first_detail(record, &["object"]).or_else(|| prefix_of(record, key, separator))
}

fn permission_rule(kind: PermissionKind, column: &str, record: &MetadataRecord) -> Option<Raw> {
    let raw = match (kind, column) {
        (PermissionKind::ObjectPermissions, "Object") => detail(record, "object"),
        (PermissionKind::ObjectPermissions, "Read") => detail(record, "allowRead"),
        (PermissionKind::ObjectPermissions, "Create") => detail(record, "allowCreate"),
        (PermissionKind::ObjectPermissions, "Edit") => detail(record, "allowEdit"),
        (PermissionKind::ObjectPermissions, "Delete") => detail(record, "allowDelete"),
        (PermissionKind::ObjectPermissions, "View All") => detail(record, "viewAllRecords"),
        (PermissionKind::ObjectPermissions, "Modify All") => detail(record, "modifyAllRecords"),

        (PermissionKind::FieldPermissions, "Object") => object_of(record, "field", '.'),
        (PermissionKind::FieldPermissions, "Field") => detail(record, "field"),
        (PermissionKind::FieldPermissions, "Readable") => detail(record, "readable"),
        (PermissionKind::FieldPermissions, "Editable") => detail(record, "editable"),

        (PermissionKind::RecordTypeVisibilities, "Object") => object_of(record, "recordType", '.'),
        (PermissionKind::RecordTypeVisibilities, "Record Type") => detail(record, "recordType"),
        (PermissionKind::RecordTypeVisibilities, "Visible") => detail(record, "visible"),
        (PermissionKind::RecordTypeVisibilities, "Default") => detail(record, "default"),

        (PermissionKind::ApplicationVisibilities, "Application") => detail(record, "application"),
        (PermissionKind::ApplicationVisibilities, "Visible") => detail(record, "visible"),
        (PermissionKind::ApplicationVisibilities, "Default") => detail(record, "default"),

        (PermissionKind::TabVisibilities, "Tab") => detail(record, "tab"),
        (PermissionKind::TabVisibilities, "Visibility") => detail(record, "visibility"),

        (PermissionKind::ClassAccesses, "Apex Class") => detail(record, "apexClass"),
        (PermissionKind::FlowAccesses, "Flow") => detail(record, "flow"),
        (PermissionKind::PageAccesses, "Page") => detail(record, "apexPage"),
        (
            PermissionKind::ClassAccesses | PermissionKind::FlowAccesses | PermissionKind::PageAccesses,
            "Enabled",
        ) => first_detail(record, &["enabled", "hasAccess"]),

        (PermissionKind::UserPermissions, "Permission") => detail(record, "name"),
        (PermissionKind::UserPermissions, "Enabled") => first_detail(record, &["enabled", "allowed"]),

        (PermissionKind::LayoutAssignments, "Object") => object_of(record, "layout", '-'),
        (PermissionKind::LayoutAssignments, "Layout") => detail(record, "layout"),
        (PermissionKind::LayoutAssignments, "RecordType") => detail(record, "recordType"),

        _ => return None,
    };
    Some(raw)
}

fn decision_rule(column: &str, record: &MetadataRecord) -> Option<Raw> {
    let raw = match column {
        "Decision Name" => name(record),
        "API Name" => api_name(record),
        "Default Outcome" => detail(record, "defaultConnectorLabel"),
        "Outcomes" => joined(child_values(record, "rules", "label"))
            .filter(|v| !v.is_empty())
            .or_else(|| joined(child_values(record, "rules", "name"))),
        "Condition Logic" => joined(child_values(record, "rules", "conditionLogic")),
        _ => return None,
    };
    Some(raw)
}

fn record_update_rule(column: &str, record: &MetadataRecord) -> Option<Raw> {
    let raw = match column {
        "Update Name" => name(record),
        "API Name" => api_name(record),
        "Object" => detail(record, "object"),
        "Filter Logic" => detail(record, "filterLogic"),
        "Fields Updated" => joined(child_values(record, "inputAssignments", "field")),
        "Description" => description(record),
        _ => return None,
    };
    Some(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sfmeta_common::metadata::{Details, RecordKind};

    fn text_of(raw: Option<Raw>) -> String {
        raw.flatten().map(|v| v.as_text()).unwrap_or_default()
    }

    #[test]
    fn test_field_rules() {
        let field = MetadataRecord::new(RecordKind::Field, "Rating__c")
            .with_label("Rating")
            .with_detail("type", "Picklist")
            .with_detail("required", "true")
            .with_detail("referenceTo", vec!["Account", "Contact"]);

        assert_eq!(text_of(field_rule("Field Name", &field)), "Rating");
        assert_eq!(text_of(field_rule("Type", &field)), "Picklist");
        assert_eq!(text_of(field_rule("Reference To", &field)), "Account, Contact");
        assert!(field_rule("Required", &field).flatten().unwrap().to_boolean());
        assert!(field_rule("Unknown Column", &field).is_none());

        let untyped = MetadataRecord::new(RecordKind::Field, "Name");
        assert_eq!(text_of(field_rule("Type", &untyped)), "Other");
        assert_eq!(text_of(field_rule("Field Name", &untyped)), "Name");
    }

    #[test]
    fn test_fallback_lookup_order() {
        let record = MetadataRecord::new(RecordKind::Field, "X")
            .with_description("described")
            .with_detail("Owner", "Verbatim")
            .with_detail("notes", "lower");

        assert_eq!(fallback(&record, "Description").unwrap().as_text(), "described");
        assert_eq!(fallback(&record, "Owner").unwrap().as_text(), "Verbatim");
        assert_eq!(fallback(&record, "Notes").unwrap().as_text(), "lower");
        assert_eq!(fallback(&record, "Missing").unwrap().as_text(), "");
    }

    #[test]
    fn test_permission_object_derivation() {
        let fls = MetadataRecord::new(
            RecordKind::ProfilePermission(PermissionKind::FieldPermissions),
            "Account.Phone",
        )
        .with_detail("field", "Account.Phone")
        .with_detail("readable", "true");
        let sub = Subcomponent::Permission(PermissionKind::FieldPermissions);
        assert_eq!(text_of(rule_value(sub, "Object", &fls, &[])), "Account");
        assert_eq!(text_of(rule_value(sub, "Field", &fls, &[])), "Account.Phone");

        let layout = MetadataRecord::new(
            RecordKind::ProfilePermission(PermissionKind::LayoutAssignments),
            "Account-Account Layout",
        )
        .with_detail("layout", "Account-Account Layout");
        let sub = Subcomponent::Permission(PermissionKind::LayoutAssignments);
        assert_eq!(text_of(rule_value(sub, "Object", &layout, &[])), "Account");
        assert_eq!(text_of(rule_value(sub, "RecordType", &layout, &[])), "");
    }

    #[test]
    fn test_access_enabled_fallbacks() {
        let class = MetadataRecord::new(
            RecordKind::ProfilePermission(PermissionKind::ClassAccesses),
            "MyController",
        )
        .with_detail("apexClass", "MyController")
        .with_detail("hasAccess", "true");
        let sub = Subcomponent::Permission(PermissionKind::ClassAccesses);
        assert!(rule_value(sub, "Enabled", &class, &[]).flatten().unwrap().to_boolean());

        let user = MetadataRecord::new(
            RecordKind::ProfilePermission(PermissionKind::UserPermissions),
            "ApiEnabled",
        )
        .with_detail("name", "ApiEnabled")
        .with_detail("allowed", "true");
        let sub = Subcomponent::Permission(PermissionKind::UserPermissions);
        assert!(rule_value(sub, "Enabled", &user, &[]).flatten().unwrap().to_boolean());
    }

    #[test]
    fn test_record_type_picklist_values() {
        let mut entry = Details::new();
        entry.insert("picklist".into(), "StageName".into());
        let mut value_a = Details::new();
        value_a.insert("fullName".into(), "Prospecting".into());
        let mut value_b = Details::new();
        value_b.insert("fullName".into(), "Closed Won".into());
        entry.insert(
            "values".into(),
            DetailValue::Seq(vec![DetailValue::Map(value_a), DetailValue::Map(value_b)]),
        );

        let record = MetadataRecord::new(RecordKind::RecordType, "Enterprise")
            .with_detail("picklistValues", DetailValue::Map(entry));
        assert_eq!(
            text_of(record_type_rule("Picklist Values", &record)),
            "StageName: Prospecting, Closed Won"
        );
    }

    #[test]
    fn test_list_view_filters() {
        let mut filter = Details::new();
        filter.insert("field".into(), "OPPORTUNITY.STAGE_NAME".into());
        filter.insert("operation".into(), "equals".into());
        filter.insert("value".into(), "Closed Won".into());
        let view = MetadataRecord::new(RecordKind::ListView, "Won")
            .with_detail("filters", DetailValue::Map(filter))
            .with_detail("filterScope", "Everything");

        assert_eq!(
            text_of(list_view_rule("Filter Criteria", &view)),
            "OPPORTUNITY.STAGE_NAME equals Closed Won"
        );
        assert_eq!(text_of(list_view_rule("Scope", &view)), "Everything");
    }

    #[test]
    fn test_flow_rules() {
        let mut rule = Details::new();
        rule.insert("name".into(), "Hot".into());
        rule.insert("conditionLogic".into(), "and".into());
        let decision = MetadataRecord::new(RecordKind::FlowDecision, "Is_Hot")
            .with_detail("rules", DetailValue::Map(rule))
            .with_detail("defaultConnectorLabel", "Default Outcome");

        assert_eq!(text_of(decision_rule("Outcomes", &decision)), "Hot");
        assert_eq!(text_of(decision_rule("Condition Logic", &decision)), "and");
        assert_eq!(text_of(decision_rule("Default Outcome", &decision)), "Default Outcome");

        let mut assignment = Details::new();
        assignment.insert("field".into(), "OwnerId".into());
        let update = MetadataRecord::new(RecordKind::FlowRecordUpdate, "Set_Owner")
            .with_detail("inputAssignments", DetailValue::Map(assignment))
            .with_detail("object", "Lead");
        assert_eq!(text_of(record_update_rule("Fields Updated", &update)), "OwnerId");
        assert_eq!(text_of(record_update_rule("Object", &update)), "Lead");
    }
}
