//! Validation rule analysis columns
//!
//! Heuristics over the error condition formula: a one-line purpose, a
//! breakdown of operators, functions and referenced fields, and candidate
//! rules that could be merged with this one.

use regex::Regex;
use sfmeta_common::metadata::MetadataRecord;
use std::collections::BTreeSet;
use std::fmt::Write;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*__c\b|\b[A-Za-z_][A-Za-z0-9_]*\b")
        .expect("identifier pattern is valid")
});

/// Formula words that are not field references
const KEYWORDS: [&str; 14] = [
    "true", "false", "null", "and", "or", "not", "isblank", "isnull", "len", "today", "now",
    "text", "value", "regex",
];

const FUNCTIONS: [&str; 8] = ["isblank", "isnull", "len", "today", "now", "text", "value", "regex"];

/// Merge candidates need at least this score
const MERGE_THRESHOLD: u32 = 30;

/// Candidates listed in the merge analysis
const MAX_MERGE_CANDIDATES: usize = 3;

pub fn error_condition(rule: &MetadataRecord) -> String {
    rule.detail_text("errorConditionFormula")
}

pub fn error_message(rule: &MetadataRecord) -> String {
    rule.detail_text("errorMessage")
}

/// Classify what the rule is for from its condition
pub fn purpose(condition: &str) -> String {
    let condition = condition.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| condition.contains(n));

    let summary = if has(&["isblank", "isnull"]) {
        "Ensures required fields are populated and not empty."
    } else if has(&["len(", "length"]) {
        "Validates field length constraints (minimum/maximum characters)."
    } else if has(&["regex", "contains"]) {
        "Validates data format and content patterns."
    } else if has(&["date", "datetime"]) {
        "Ensures date/time fields meet chronological requirements."
    } else if has(&["amount", "currency"]) {
        "Validates monetary values and financial constraints."
    } else if has(&["stage", "status"]) {
        "Ensures proper workflow progression and state management."
    } else if has(&["owner", "assigned"]) {
        "Validates ownership and assignment requirements."
    } else if has(&["probability", "close"]) {
        "Ensures opportunity probability and close date logic."
    } else {
        "Validates business logic and data integrity requirements."
    };

    format!("🧠 **Purpose:** {}", summary)
}

/// Identifiers in a formula minus formula keywords, first occurrence order
pub fn referenced_fields(condition: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    IDENTIFIER
        .find_iter(condition)
        .map(|m| m.as_str())
        .filter(|word| !KEYWORDS.contains(&word.to_lowercase().as_str()))
        .filter(|word| seen.insert(word.to_string()))
        .map(str::to_string)
        .collect()
}

pub fn logic_breakdown(condition: &str) -> String {
    let mut out = String::from("⚙️ **Logic Breakdown:**\n\n");

    if condition.trim().is_empty() {
        out.push_str("No error condition formula available.");
        return out;
    }

    let _ = write!(out, "**Formula Structure:**\n`{}`\n\n**Components:**\n", condition);

    if condition.contains("||") {
        out.push_str("• Uses OR logic (||) - triggers if ANY condition is true\n");
    }
    if condition.contains("&&") {
        out.push_str("• Uses AND logic (&&) - triggers if ALL conditions are true\n");
    }

    let functions = [
        ("ISBLANK(", "• ISBLANK() - checks if field is empty or null\n"),
        ("ISNULL(", "• ISNULL() - checks if field is null\n"),
        ("LEN(", "• LEN() - gets the length of a text field\n"),
        ("TODAY()", "• TODAY() - gets current date\n"),
        ("NOW()", "• NOW() - gets current date and time\n"),
        ("TEXT(", "• TEXT() - converts value to text format\n"),
        ("VALUE(", "• VALUE() - converts text to number\n"),
        ("REGEX(", "• REGEX() - validates against regular expression pattern\n"),
    ];
    for (needle, line) in functions {
        if condition.contains(needle) {
            out.push_str(line);
        }
    }

    let fields = referenced_fields(condition);
    if !fields.is_empty() {
        out.push_str("\n**Fields Referenced:**\n");
        for field in fields {
            let _ = writeln!(out, "• {}", field);
        }
    }

    out
}

struct MergeCandidate<'a> {
    rule: &'a MetadataRecord,
    score: u32,
    reasons: String,
}

fn score_against<'a>(current: &MetadataRecord, other: &'a MetadataRecord) -> MergeCandidate<'a> {
    let condition = error_condition(current).to_lowercase();
    let other_condition = error_condition(other).to_lowercase();
    let message = error_message(current).to_lowercase();
    let other_message = error_message(other).to_lowercase();

    let mut score = 0;
    let mut reasons = String::new();

    let other_fields = referenced_fields(&other_condition);
    let shared: Vec<String> = referenced_fields(&condition)
        .into_iter()
        .filter(|f| other_fields.contains(f))
        .collect();
    if !shared.is_empty() {
        score += 30;
        let _ = writeln!(reasons, "• Both reference fields: {}", shared.join(", "));
    }

    let shared_functions: Vec<&str> = FUNCTIONS
        .iter()
        .copied()
        .filter(|f| condition.contains(f) && other_condition.contains(f))
        .collect();
    if !shared_functions.is_empty() {
        score += 20;
        let _ = writeln!(reasons, "• Both use functions: {}", shared_functions.join(", "));
    }

    if !message.is_empty()
        && !other_message.is_empty()
        && (message.contains(prefix(&other_message, 20)) || other_message.contains(prefix(&message, 20)))
    {
        score += 25;
        reasons.push_str("• Similar error messages\n");
    }

    if (condition.contains("||") && other_condition.contains("||"))
        || (condition.contains("&&") && other_condition.contains("&&"))
    {
        score += 15;
        reasons.push_str("• Similar logical operators\n");
    }

    MergeCandidate {
        rule: other,
        score,
        reasons,
    }
}

fn prefix(s: &str, chars: usize) -> &str {
    match s.char_indices().nth(chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Compare `current` with its sibling rules and list the best merge candidates
pub fn merge_analysis(current: &MetadataRecord, siblings: &[MetadataRecord]) -> String {
    let mut out = String::from("🔄 **Merge Analysis:**\n\n");

    if siblings.len() <= 1 {
        out.push_str("No other rules available for merge analysis.");
        return out;
    }

    let mut candidates: Vec<MergeCandidate<'_>> = siblings
        .iter()
        .filter(|other| other.api_name != current.api_name)
        .map(|other| score_against(current, other))
        .filter(|c| c.score >= MERGE_THRESHOLD)
        .collect();
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    if candidates.is_empty() {
        out.push_str("**No potential merges found.** This rule appears to be unique.\n\n");
        out.push_str(
            "**Reason:** No other rules share similar field references, functions, or logical patterns.",
        );
        return out;
    }

    let _ = write!(out, "**Found {} potential merge candidates:**\n\n", candidates.len());
    for (i, candidate) in candidates.iter().take(MAX_MERGE_CANDIDATES).enumerate() {
        let _ = writeln!(
            out,
            "**{}. {}** (Score: {}%)",
            i + 1,
            candidate.rule.display_name(),
            candidate.score
        );
        let _ = writeln!(out, "**API Name:** {}", candidate.rule.api_name);
        let _ = write!(out, "**Merge Reasons:**\n{}", candidate.reasons);
        out.push_str(
            "**How to Merge:** Combine conditions using OR (||) or AND (&&) operators, and create a unified error message.\n\n",
        );
    }

    out
}
