//! Summary contexts for parsed entities

use super::render::{context_from, RenderContext};
use sfmeta_common::metadata::{EntityKind, ParsedFlow, ParsedObject, ParsedProfile, PermissionKind};

pub fn object_context(object: &ParsedObject) -> RenderContext {
    let record = &object.object;
    let label = record.display_name().to_string();

    context_from([
        ("OBJECT_NAME", label.clone()),
        ("OBJECT_LABEL", label),
        ("OBJECT_API_NAME", record.api_name.clone()),
        ("OBJECT_DESCRIPTION", record.description_text().to_string()),
        ("OBJECT_PLURAL_LABEL", object.plural_label()),
        ("SHARING_MODEL", record.detail_text("sharingModel")),
        ("DEPLOYMENT_STATUS", record.detail_text("deploymentStatus")),
        ("FIELD_COUNT", object.fields.len().to_string()),
        ("RECORD_TYPE_COUNT", object.record_types.len().to_string()),
        ("VALIDATION_RULE_COUNT", object.validation_rules.len().to_string()),
        ("BUSINESS_PROCESS_COUNT", object.business_processes.len().to_string()),
        ("COMPACT_LAYOUT_COUNT", object.compact_layouts.len().to_string()),
        ("LIST_VIEW_COUNT", object.list_views.len().to_string()),
    ])
}

pub fn profile_context(profile: &ParsedProfile) -> RenderContext {
    let record = &profile.profile;
    let mut context = context_from([
        ("PROFILE_LABEL", record.display_name().to_string()),
        ("PROFILE_API_NAME", record.api_name.clone()),
        ("USER_LICENSE", profile.user_license()),
        ("PROFILE_DESCRIPTION", record.description_text().to_string()),
        ("PROFILE_CUSTOM", record.detail_flag("custom").to_string()),
    ]);

    for kind in PermissionKind::ALL {
        context.insert(count_key(kind), profile.count(kind).to_string());
    }
    context
}

pub fn flow_context(flow: &ParsedFlow) -> RenderContext {
    let record = &flow.flow;
    context_from([
        ("FLOW_NAME", record.display_name().to_string()),
        ("FLOW_API_NAME", record.api_name.clone()),
        ("FLOW_DESCRIPTION", record.description_text().to_string()),
        ("FLOW_STATUS", flow.status()),
        ("FLOW_PROCESS_TYPE", flow.process_type()),
        ("OBJECT", flow.start_object().unwrap_or_default()),
        ("OPERATOR", flow.start_operator().unwrap_or_default()),
        ("DECISION_COUNT", flow.decisions.len().to_string()),
        ("RECORD_UPDATE_COUNT", flow.record_updates.len().to_string()),
    ])
}

/// `objectPermissions` -> `OBJECT_PERMISSION_COUNT`
fn count_key(kind: PermissionKind) -> String {
    let element = kind.element();
    let singular = element.strip_suffix("ies").map(|s| format!("{}y", s));
    let singular = singular
        .or_else(|| element.strip_suffix("es").filter(|s| s.ends_with("ss")).map(str::to_string))
        .or_else(|| element.strip_suffix('s').map(str::to_string))
        .unwrap_or_else(|| element.to_string());

    let mut key = String::with_capacity(singular.len() + 8);
    for ch in singular.chars() {
        if ch.is_ascii_uppercase() {
            key.push('_');
        }
        key.push(ch.to_ascii_uppercase());
    }
    key.push_str("_COUNT");
    key
}

/// Sample context used by `templates render`
pub fn demo_context(kind: EntityKind) -> RenderContext {
    match kind {
        EntityKind::Object => context_from([
            ("OBJECT_NAME", "Opportunity"),
            ("OBJECT_LABEL", "Opportunity"),
            ("OBJECT_API_NAME", "Opportunity"),
            ("OBJECT_PLURAL_LABEL", "Opportunities"),
            ("OBJECT_DESCRIPTION", "Represents a sales opportunity in the CRM system"),
            ("DEPLOYMENT_STATUS", "Deployed"),
            ("SHARING_MODEL", "Read/Write"),
            ("FIELD_COUNT", "156"),
            ("RECORD_TYPE_COUNT", "5"),
            ("BUSINESS_PROCESS_COUNT", "4"),
            ("COMPACT_LAYOUT_COUNT", "3"),
            ("VALIDATION_RULE_COUNT", "19"),
            ("LIST_VIEW_COUNT", "18"),
        ]),
        EntityKind::Profile => {
            let mut context = context_from([
                ("PROFILE_LABEL", "Sales User"),
                ("PROFILE_API_NAME", "Sales_User"),
                ("USER_LICENSE", "Salesforce"),
                ("PROFILE_DESCRIPTION", "Standard profile for the sales team"),
                ("PROFILE_CUSTOM", "true"),
            ]);
            for kind in PermissionKind::ALL {
                context.insert(count_key(kind), "12".to_string());
            }
            context
        },
        EntityKind::Flow => context_from([
            ("FLOW_NAME", "Lead Assignment"),
            ("FLOW_API_NAME", "Lead_Assignment"),
            ("FLOW_DESCRIPTION", "Assigns new leads to the right queue"),
            ("FLOW_STATUS", "Active"),
            ("FLOW_PROCESS_TYPE", "AutoLaunchedFlow"),
            ("OBJECT", "Lead"),
            ("OPERATOR", "EqualTo"),
            ("DECISION_COUNT", "2"),
            ("RECORD_UPDATE_COUNT", "3"),
        ]),
    }
}
