//! Template descriptors: page structure and table schemas

use crate::subcomponent::Subcomponent;
use serde::{Deserialize, Serialize};

/// A single-select option with its display color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Column type of a documentation table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum ColumnType {
    Title,
    Text,
    Checkbox,
    Select(Vec<SelectOption>),
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    pub fn title(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Title)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Text)
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Checkbox)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Number)
    }

    /// Single-select column from `(name, color)` pairs
    pub fn select(name: impl Into<String>, options: &[(&str, &str)]) -> Self {
        let options = options
            .iter()
            .map(|(option, color)| SelectOption {
                name: option.to_string(),
                color: Some(color.to_string()),
            })
            .collect();
        Self::new(name, ColumnType::Select(options))
    }

    fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    pub fn is_title(&self) -> bool {
        self.column_type == ColumnType::Title
    }
}

/// Title pattern plus ordered columns of a documentation table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub title: String,
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(title: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            title: title.into(),
            columns,
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn title_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_title())
    }

    /// Exactly one title column, no duplicate column names
    pub fn validate(&self) -> Result<(), String> {
        let titles = self.columns.iter().filter(|c| c.is_title()).count();
        if titles != 1 {
            return Err(format!("table '{}' has {} title columns, expected 1", self.title, titles));
        }

        for (i, column) in self.columns.iter().enumerate() {
            if column.name.trim().is_empty() {
                return Err(format!("table '{}' has an unnamed column", self.title));
            }
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(format!("table '{}' repeats column '{}'", self.title, column.name));
            }
        }

        Ok(())
    }
}

/// A content block of a documentation page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    BulletedList { items: Vec<String> },
    NumberedList { items: Vec<String> },
    Code { language: String, text: String },
    Quote { text: String },
    Callout { icon: String, text: String },
    Divider,
    /// Position of an inline table, named by its template under the same kind
    Database { table: String },
}

impl Block {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level: level.clamp(1, 3),
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    pub fn bullets(items: &[&str]) -> Self {
        Block::BulletedList {
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn numbered(items: &[&str]) -> Self {
        Block::NumberedList {
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn code(language: impl Into<String>, text: impl Into<String>) -> Self {
        Block::Code {
            language: language.into(),
            text: text.into(),
        }
    }

    pub fn callout(icon: impl Into<String>, text: impl Into<String>) -> Self {
        Block::Callout {
            icon: icon.into(),
            text: text.into(),
        }
    }

    pub fn divider() -> Self {
        Block::Divider
    }

    pub fn database(sub: Subcomponent) -> Self {
        Block::Database {
            table: sub.template_name().to_string(),
        }
    }

    /// Template name of the table placed here, if this is a table position
    pub fn table_name(&self) -> Option<&str> {
        match self {
            Block::Database { table } => Some(table),
            _ => None,
        }
    }

    /// Apply `f` to every string the block displays
    pub fn map_text(&self, f: impl Fn(&str) -> String) -> Block {
        match self {
            Block::Heading { level, text } => Block::Heading {
                level: *level,
                text: f(text),
            },
            Block::Paragraph { text } => Block::Paragraph { text: f(text) },
            Block::BulletedList { items } => Block::BulletedList {
                items: items.iter().map(|i| f(i)).collect(),
            },
            Block::NumberedList { items } => Block::NumberedList {
                items: items.iter().map(|i| f(i)).collect(),
            },
            Block::Code { language, text } => Block::Code {
                language: language.clone(),
                text: f(text),
            },
            Block::Quote { text } => Block::Quote { text: f(text) },
            Block::Callout { icon, text } => Block::Callout {
                icon: icon.clone(),
                text: f(text),
            },
            Block::Divider => Block::Divider,
            Block::Database { table } => Block::Database { table: table.clone() },
        }
    }

    /// Strings the block displays, in order
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Block::Heading { text, .. }
            | Block::Paragraph { text }
            | Block::Code { text, .. }
            | Block::Quote { text }
            | Block::Callout { text, .. } => vec![text.as_str()],
            Block::BulletedList { items } | Block::NumberedList { items } => {
                items.iter().map(String::as_str).collect()
            },
            Block::Divider | Block::Database { .. } => Vec::new(),
        }
    }
}

/// A page and/or table template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    /// Page title pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableSchema>,
    /// Context keys that must be present before rendering
    #[serde(default)]
    pub required_context: Vec<String>,
}

impl TemplateDescriptor {
    pub fn page(title: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            title: Some(title.into()),
            blocks,
            ..Self::default()
        }
    }

    pub fn table(schema: TableSchema) -> Self {
        Self {
            table: Some(schema),
            ..Self::default()
        }
    }

    pub fn requires(mut self, keys: &[&str]) -> Self {
        self.required_context = keys.iter().map(|k| k.to_string()).collect();
        self
    }
}
