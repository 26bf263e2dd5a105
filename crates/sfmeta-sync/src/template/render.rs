//! Placeholder substitution

use super::descriptor::{TableSchema, TemplateDescriptor};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Values substituted into `{PLACEHOLDER}` tokens
pub type RenderContext = BTreeMap<String, String>;

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

/// Substitute every placeholder present in `context`.
///
/// A key present in the context is substituted even when its value is empty;
/// unknown placeholders are left verbatim.
pub fn render_str(pattern: &str, context: &RenderContext) -> String {
    PLACEHOLDER
        .replace_all(pattern, |caps: &Captures<'_>| match context.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Placeholder names used by a pattern, in order of appearance
pub fn placeholders(pattern: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(pattern)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Render every string of a descriptor; never fails
pub fn render(descriptor: &TemplateDescriptor, context: &RenderContext) -> TemplateDescriptor {
    TemplateDescriptor {
        title: descriptor.title.as_deref().map(|t| render_str(t, context)),
        blocks: descriptor
            .blocks
            .iter()
            .map(|block| block.map_text(|s| render_str(s, context)))
            .collect(),
        table: descriptor.table.as_ref().map(|table| TableSchema {
            title: render_str(&table.title, context),
            columns: table.columns.clone(),
        }),
        required_context: descriptor.required_context.clone(),
    }
}

/// Convenience for building contexts in tests and demos
pub fn context_from<I, K, V>(pairs: I) -> RenderContext
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
