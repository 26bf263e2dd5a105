//! `sfmeta templates` command implementation

use crate::error::{CliError, Result};
use colored::Colorize;
use sfmeta_common::metadata::EntityKind;
use sfmeta_sync::template::{demo_context, render, Block, ColumnType, TemplateDescriptor};
use sfmeta_sync::TemplateRegistry;

/// List every kind with its template names
pub async fn list() -> Result<()> {
    let registry = TemplateRegistry::builtin();

    for kind in registry.kinds() {
        println!("{}", kind.to_string().cyan().bold());
        for name in registry.templates(kind) {
            println!("  {}", name);
        }
    }
    Ok(())
}

/// Render a template with the sample context of its kind
pub async fn render_template(kind: EntityKind, name: &str) -> Result<()> {
    let registry = TemplateRegistry::builtin();
    let descriptor = registry
        .get(kind, name)
        .map_err(|e| CliError::usage(e.to_string()))?;
    let rendered = render(descriptor, &demo_context(kind));

    print!("{}", format_rendered(&rendered));
    Ok(())
}

/// Plain-text view of a rendered descriptor
pub fn format_rendered(rendered: &TemplateDescriptor) -> String {
    let mut out = String::new();

    if let Some(title) = &rendered.title {
        out.push_str(&format!("# {}\n\n", title));
    }

    for block in &rendered.blocks {
        match block {
            Block::Heading { level, text } => {
                out.push_str(&format!("{} {}\n", "#".repeat(usize::from(*level) + 1), text));
            },
            Block::Paragraph { text } => out.push_str(&format!("{}\n", text)),
            Block::BulletedList { items } => {
                for item in items {
                    out.push_str(&format!("- {}\n", item));
                }
            },
            Block::NumberedList { items } => {
                for (i, item) in items.iter().enumerate() {
                    out.push_str(&format!("{}. {}\n", i + 1, item));
                }
            },
            Block::Code { language, text } => out.push_str(&format!("```{}\n{}\n```\n", language, text)),
            Block::Quote { text } => out.push_str(&format!("> {}\n", text)),
            Block::Callout { icon, text } => out.push_str(&format!("{} {}\n", icon, text)),
            Block::Divider => out.push_str("---\n"),
            Block::Database { table } => out.push_str(&format!("[table: {}]\n", table)),
        }
    }

    if let Some(table) = &rendered.table {
        out.push_str(&format!("Table: {}\n", table.title));
        for column in &table.columns {
            let kind = match &column.column_type {
                ColumnType::Title => "title".to_string(),
                ColumnType::Text => "text".to_string(),
                ColumnType::Checkbox => "checkbox".to_string(),
                ColumnType::Number => "number".to_string(),
                ColumnType::Select(options) => {
                    let names: Vec<&str> = options.iter().map(|o| o.name.as_str()).collect();
                    format!("select [{}]", names.join(", "))
                },
            };
            out.push_str(&format!("  {:<28} {}\n", column.name, kind));
        }
    }

    out
}
