//! Built-in object, profile and flow templates

use super::descriptor::{Block, Column, TableSchema, TemplateDescriptor};
use crate::subcomponent::Subcomponent;
use sfmeta_common::metadata::{EntityKind, PermissionKind};

pub const OVERVIEW: &str = "overview";

/// `(template name, descriptor)` pairs for objects
pub fn object_templates() -> Vec<(&'static str, TemplateDescriptor)> {
    let mut templates = vec![(OVERVIEW, object_overview())];
    templates.extend(
        Subcomponent::OBJECT
            .into_iter()
            .map(|sub| (sub.template_name(), table_template(sub))),
    );
    templates
}

pub fn profile_templates() -> Vec<(&'static str, TemplateDescriptor)> {
    let mut templates = vec![(OVERVIEW, profile_overview())];
    templates.extend(
        PermissionKind::ALL
            .into_iter()
            .map(Subcomponent::Permission)
            .map(|sub| (sub.template_name(), table_template(sub))),
    );
    templates
}

pub fn flow_templates() -> Vec<(&'static str, TemplateDescriptor)> {
    let mut templates = vec![(OVERVIEW, flow_overview())];
    templates.extend(
        Subcomponent::FLOW
            .into_iter()
            .map(|sub| (sub.template_name(), table_template(sub))),
    );
    templates
}

fn object_overview() -> TemplateDescriptor {
    TemplateDescriptor::page(
        "📋 {OBJECT_LABEL} ({OBJECT_API_NAME})",
        vec![
            Block::heading(1, "🗂️ {OBJECT_LABEL} (`{OBJECT_API_NAME}`)"),
            Block::heading(2, "🔍 Overview Page"),
            Block::bullets(&[
                "**Label**: {OBJECT_LABEL}",
                "**Plural Label**: {OBJECT_PLURAL_LABEL}",
                "**API Name**: `{OBJECT_API_NAME}`",
                "**Description**: {OBJECT_DESCRIPTION}",
                "**Sharing Model**: {SHARING_MODEL}",
                "**Deployment Status**: {DEPLOYMENT_STATUS}",
                "**Record Type Count**: {RECORD_TYPE_COUNT}",
                "**Field Count**: {FIELD_COUNT}",
                "**Validation Rule Count**: {VALIDATION_RULE_COUNT}",
            ]),
            Block::heading(2, "🧱 Fields Database"),
            Block::paragraph(
                "See the full fields database below. Special logic in formulas or lookup filters is summarized in the Formula column.",
            ),
            Block::database(Subcomponent::Fields),
            Block::heading(2, "🧩 Record Types Database"),
            Block::paragraph(
                "See the full record types database below. Include business logic if record type drives layouts, processes, or flows.",
            ),
            Block::database(Subcomponent::RecordTypes),
            Block::heading(2, "📐 Compact Layouts"),
            Block::paragraph(
                "See the full compact layouts database below ({COMPACT_LAYOUT_COUNT} layouts).",
            ),
            Block::database(Subcomponent::CompactLayouts),
            Block::heading(2, "🧪 Validation Rules"),
            Block::paragraph(
                "See the full validation rules database below. Each rule lists its purpose, error message, logic breakdown and merge candidates.",
            ),
            Block::database(Subcomponent::ValidationRules),
            Block::heading(2, "🔄 Business Processes"),
            Block::paragraph("{BUSINESS_PROCESS_COUNT} business processes are documented below."),
            Block::database(Subcomponent::BusinessProcesses),
            Block::heading(2, "👁️ List Views"),
            Block::paragraph("{LIST_VIEW_COUNT} list views are documented below."),
            Block::database(Subcomponent::ListViews),
            Block::divider(),
            Block::heading(2, "📝 Page Layouts"),
            Block::paragraph("Page Layout Structure"),
            Block::code(
                "mermaid",
                "graph TD;\n    A[\"{OBJECT_LABEL} Layout\"] --> B[\"Section 1\"];\n    A --> C[\"Section 2\"];\n    B --> D[\"Field Group 1\"];\n    B --> E[\"Field Group 2\"];\n    C --> F[\"Related Lists\"];",
            ),
            Block::divider(),
        ],
    )
    .requires(&["OBJECT_LABEL", "OBJECT_API_NAME"])
}

fn profile_overview() -> TemplateDescriptor {
    TemplateDescriptor::page(
        "👤 {PROFILE_LABEL} ({PROFILE_API_NAME})",
        vec![
            Block::heading(1, "👤 {PROFILE_LABEL} (`{PROFILE_API_NAME}`)"),
            Block::heading(2, "🔍 Overview"),
            Block::bullets(&[
                "**API Name**: `{PROFILE_API_NAME}`",
                "**User License**: `{USER_LICENSE}`",
                "**Custom**: {PROFILE_CUSTOM}",
                "**Description**: {PROFILE_DESCRIPTION}",
            ]),
            Block::divider(),
            Block::heading(2, "🔐 Object Permissions"),
            Block::paragraph("{OBJECT_PERMISSION_COUNT} objects are listed in the Object Permissions table."),
            Block::database(permission(PermissionKind::ObjectPermissions)),
            Block::heading(2, "🔑 Field-Level Security (FLS)"),
            Block::callout("🔑", "{FIELD_PERMISSION_COUNT} field-level security entries are shown below."),
            Block::database(permission(PermissionKind::FieldPermissions)),
            Block::heading(2, "📄 Page Layout Assignments"),
            Block::paragraph("{LAYOUT_ASSIGNMENT_COUNT} layout assignments, one row per layout and record type."),
            Block::database(permission(PermissionKind::LayoutAssignments)),
            Block::heading(2, "🧱 App and Tab Visibility"),
            Block::paragraph(
                "{APPLICATION_VISIBILITY_COUNT} applications and {TAB_VISIBILITY_COUNT} tabs are documented below.",
            ),
            Block::database(permission(PermissionKind::ApplicationVisibilities)),
            Block::database(permission(PermissionKind::TabVisibilities)),
            Block::heading(2, "⚙️ Administrative Permissions"),
            Block::paragraph("{USER_PERMISSION_COUNT} system permissions are documented below."),
            Block::database(permission(PermissionKind::UserPermissions)),
            Block::heading(2, "🧩 Record Types, Classes, Flows and Pages"),
            Block::database(permission(PermissionKind::RecordTypeVisibilities)),
            Block::database(permission(PermissionKind::ClassAccesses)),
            Block::database(permission(PermissionKind::FlowAccesses)),
            Block::database(permission(PermissionKind::PageAccesses)),
            Block::divider(),
            Block::heading(2, "📝 Notes"),
            Block::bullets(&[
                "Existing rows are only filled in on later syncs, never overwritten.",
                "Remove rows manually in the workspace if a permission is revoked.",
            ]),
        ],
    )
    .requires(&["PROFILE_LABEL", "PROFILE_API_NAME"])
}

fn flow_overview() -> TemplateDescriptor {
    TemplateDescriptor::page(
        "🔁 {FLOW_NAME}",
        vec![
            Block::heading(1, "🔁 Flow - {FLOW_NAME}"),
            Block::heading(2, "📝 Overview"),
            Block::paragraph("{FLOW_DESCRIPTION}"),
            Block::heading(2, "⚡ Trigger Details"),
            Block::bullets(&[
                "**API Name**: `{FLOW_API_NAME}`",
                "**Status**: {FLOW_STATUS}",
                "**Process Type**: {FLOW_PROCESS_TYPE}",
                "**Object**: {OBJECT}",
                "**Operator**: {OPERATOR}",
            ]),
            Block::heading(2, "🧭 Logic"),
            Block::paragraph(
                "{DECISION_COUNT} decisions and {RECORD_UPDATE_COUNT} record updates are documented below.",
            ),
            Block::database(Subcomponent::Decisions),
            Block::database(Subcomponent::RecordUpdates),
            Block::divider(),
        ],
    )
    .requires(&["FLOW_NAME", "FLOW_API_NAME"])
}

fn permission(kind: PermissionKind) -> Subcomponent {
    Subcomponent::Permission(kind)
}

/// Table template of a subcomponent
pub fn table_template(sub: Subcomponent) -> TemplateDescriptor {
    let descriptor = TemplateDescriptor::table(table_schema(sub));
    match sub.entity_kind() {
        EntityKind::Object => descriptor.requires(&["OBJECT_NAME"]),
        EntityKind::Flow => descriptor.requires(&["FLOW_NAME"]),
        EntityKind::Profile => descriptor,
    }
}

fn table_schema(sub: Subcomponent) -> TableSchema {
    match sub {
        Subcomponent::Fields => TableSchema::new(
            "🏷️ {OBJECT_NAME} - All Fields",
            vec![
                Column::title("Field Name"),
                Column::text("API Name"),
                Column::select(
                    "Type",
                    &[
                        ("Text", "blue"),
                        ("Number", "green"),
                        ("Date", "orange"),
                        ("DateTime", "orange"),
                        ("Boolean", "purple"),
                        ("Picklist", "pink"),
                        ("Multi-Select Picklist", "pink"),
                        ("Reference", "yellow"),
                        ("Currency", "brown"),
                        ("Percent", "green"),
                        ("Email", "blue"),
                        ("Phone", "blue"),
                        ("URL", "blue"),
                        ("Long Text Area", "gray"),
                        ("Rich Text Area", "gray"),
                        ("Location", "yellow"),
                        ("Other", "gray"),
                    ],
                ),
                Column::checkbox("Required"),
                Column::checkbox("Unique"),
                Column::checkbox("External ID"),
                Column::text("Description"),
                Column::text("Help Text"),
                Column::text("Default Value"),
                Column::text("Formula"),
                Column::text("Reference To"),
                Column::text("Field Level Security"),
            ],
        ),
        Subcomponent::RecordTypes => TableSchema::new(
            "📝 {OBJECT_NAME} - Record Types",
            vec![
                Column::title("Record Type Name"),
                Column::text("API Name"),
                Column::checkbox("Active"),
                Column::text("Description"),
                Column::text("Available Fields"),
                Column::text("Required Fields"),
                Column::text("Page Layout"),
                Column::text("Business Process"),
                Column::text("Picklist Values"),
            ],
        ),
        Subcomponent::ValidationRules => TableSchema::new(
            "✅ {OBJECT_NAME} - Validation Rules",
            vec![
                Column::title("Rule Name"),
                Column::text("API Name"),
                Column::text("Error Message"),
                Column::checkbox("Active"),
                Column::text("Error Condition"),
                Column::text("Purpose"),
                Column::text("Logic Breakdown"),
                Column::text("Merge Analysis"),
                Column::text("Impact Analysis"),
                Column::text("Testing Scenarios"),
            ],
        ),
        Subcomponent::BusinessProcesses => TableSchema::new(
            "🔄 {OBJECT_NAME} - Business Processes",
            vec![
                Column::title("Process Name"),
                Column::text("API Name"),
                Column::checkbox("Active"),
                Column::text("Description"),
                Column::text("Stages"),
                Column::text("Entry Criteria"),
                Column::text("Exit Criteria"),
                Column::text("Related Record Types"),
            ],
        ),
        Subcomponent::CompactLayouts => TableSchema::new(
            "📱 {OBJECT_NAME} - Compact Layouts",
            vec![
                Column::title("Layout Name"),
                Column::text("API Name"),
                Column::checkbox("Active"),
                Column::text("Description"),
                Column::text("Fields in Layout"),
                Column::text("Field Order"),
                Column::text("Related Record Types"),
            ],
        ),
        Subcomponent::ListViews => TableSchema::new(
            "👁️ {OBJECT_NAME} - List Views",
            vec![
                Column::title("View Name"),
                Column::text("API Name"),
                Column::select(
                    "Type",
                    &[("Standard", "blue"), ("Custom", "green"), ("Recent", "orange")],
                ),
                Column::checkbox("Visible"),
                Column::text("Description"),
                Column::text("Filter Criteria"),
                Column::text("Columns"),
                Column::text("Sort Order"),
                Column::text("Scope"),
            ],
        ),
        Subcomponent::Permission(kind) => permission_schema(kind),
        Subcomponent::Decisions => TableSchema::new(
            "🔀 {FLOW_NAME} - Decisions",
            vec![
                Column::title("Decision Name"),
                Column::text("API Name"),
                Column::text("Default Outcome"),
                Column::text("Outcomes"),
                Column::text("Condition Logic"),
            ],
        ),
        Subcomponent::RecordUpdates => TableSchema::new(
            "✏️ {FLOW_NAME} - Record Updates",
            vec![
                Column::title("Update Name"),
                Column::text("API Name"),
                Column::text("Object"),
                Column::text("Filter Logic"),
                Column::text("Fields Updated"),
                Column::text("Description"),
            ],
        ),
    }
}

fn permission_schema(kind: PermissionKind) -> TableSchema {
    match kind {
        PermissionKind::ObjectPermissions => TableSchema::new(
            "🔐 Object Permissions",
            vec![
                Column::title("Object"),
                Column::checkbox("Read"),
                Column::checkbox("Create"),
                Column::checkbox("Edit"),
                Column::checkbox("Delete"),
                Column::checkbox("View All"),
                Column::checkbox("Modify All"),
            ],
        ),
        PermissionKind::FieldPermissions => TableSchema::new(
            "🔑 Field-Level Security (FLS)",
            vec![
                Column::text("Object"),
                Column::title("Field"),
                Column::checkbox("Readable"),
                Column::checkbox("Editable"),
            ],
        ),
        PermissionKind::RecordTypeVisibilities => TableSchema::new(
            "🔗 Record Type Visibility",
            vec![
                Column::text("Object"),
                Column::title("Record Type"),
                Column::checkbox("Visible"),
                Column::checkbox("Default"),
            ],
        ),
        PermissionKind::ApplicationVisibilities => TableSchema::new(
            "🧱 App Visibility",
            vec![
                Column::title("Application"),
                Column::checkbox("Visible"),
                Column::checkbox("Default"),
            ],
        ),
        PermissionKind::TabVisibilities => TableSchema::new(
            "🧱 Tab Visibility",
            vec![Column::title("Tab"), Column::text("Visibility")],
        ),
        PermissionKind::ClassAccesses => TableSchema::new(
            "🔁 Apex Class Access",
            vec![Column::title("Apex Class"), Column::checkbox("Enabled")],
        ),
        PermissionKind::FlowAccesses => TableSchema::new(
            "🔁 Flow Access",
            vec![Column::title("Flow"), Column::checkbox("Enabled")],
        ),
        PermissionKind::UserPermissions => TableSchema::new(
            "⚙️ Administrative Permissions",
            vec![Column::title("Permission"), Column::checkbox("Enabled")],
        ),
        PermissionKind::LayoutAssignments => TableSchema::new(
            "📄 Page Layout Assignments",
            vec![
                Column::text("Object"),
                Column::title("Layout"),
                Column::text("RecordType"),
            ],
        ),
        PermissionKind::PageAccesses => TableSchema::new(
            "🔐 Login Access & Restrictions",
            vec![Column::title("Page"), Column::checkbox("Enabled")],
        ),
    }
}
