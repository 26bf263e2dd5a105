//! Object directory parser
//!
//! Reads one object directory in source format:
//!
//! ```text
//! Account/
//!   Account.object-meta.xml
//!   fields/Industry__c.field-meta.xml
//!   recordTypes/Business.recordType-meta.xml
//!   businessProcesses/...
//!   compactLayouts/...
//!   validationRules/...
//!   listViews/...
//! ```
//!
//! The object's API name is the directory name. Children take theirs from
//! `<fullName>`, falling back to the file name.

use crate::error::{ParseError, Result};
use crate::xml::{read_metadata_file, take_text, text_of};
use sfmeta_common::metadata::{MetadataRecord, ParsedObject, RecordKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// One child metadata directory of an object
struct ChildKind {
    dir: &'static str,
    suffix: &'static str,
    root: &'static str,
    kind: RecordKind,
}

const CHILD_KINDS: [ChildKind; 6] = [
    ChildKind {
        dir: "fields",
        suffix: ".field-meta.xml",
        root: "CustomField",
        kind: RecordKind::Field,
    },
    ChildKind {
        dir: "recordTypes",
        suffix: ".recordType-meta.xml",
        root: "RecordType",
        kind: RecordKind::RecordType,
    },
    ChildKind {
        dir: "businessProcesses",
        suffix: ".businessProcess-meta.xml",
        root: "BusinessProcess",
        kind: RecordKind::BusinessProcess,
    },
    ChildKind {
        dir: "compactLayouts",
        suffix: ".compactLayout-meta.xml",
        root: "CompactLayout",
        kind: RecordKind::CompactLayout,
    },
    ChildKind {
        dir: "validationRules",
        suffix: ".validationRule-meta.xml",
        root: "ValidationRule",
        kind: RecordKind::ValidationRule,
    },
    ChildKind {
        dir: "listViews",
        suffix: ".listView-meta.xml",
        root: "ListView",
        kind: RecordKind::ListView,
    },
];

/// Parse an object directory
pub fn parse_object(dir: impl AsRef<Path>) -> Result<ParsedObject> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(ParseError::NotFound(dir.to_path_buf()));
    }

    let api_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let meta_path = dir.join(format!("{}.object-meta.xml", api_name));
    let mut details = match read_metadata_file(&meta_path, "CustomObject") {
        Ok(details) => details,
        Err(ParseError::NotFound(_)) => {
            warn!(path = %meta_path.display(), "Object metadata file missing, using directory name only");
            Default::default()
        },
        Err(e) => return Err(e),
    };

    let mut object = MetadataRecord::new(RecordKind::Object, api_name.clone());
    object.label = take_text(&mut details, "label");
    object.description = take_text(&mut details, "description");
    object.details = details;

    let mut parsed = ParsedObject::new(object);

    for child in &CHILD_KINDS {
        let records = parse_children(dir, child)?;
        debug!(object = %api_name, kind = child.dir, count = records.len(), "Parsed child metadata");

        match child.kind {
            RecordKind::Field => parsed.fields = records,
            RecordKind::RecordType => parsed.record_types = records,
            RecordKind::BusinessProcess => parsed.business_processes = records,
            RecordKind::CompactLayout => parsed.compact_layouts = records,
            RecordKind::ValidationRule => parsed.validation_rules = records,
            RecordKind::ListView => parsed.list_views = records,
            _ => {},
        }
    }

    info!(
        object = %api_name,
        fields = parsed.fields.len(),
        record_types = parsed.record_types.len(),
        validation_rules = parsed.validation_rules.len(),
        list_views = parsed.list_views.len(),
        "Parsed object"
    );

    Ok(parsed)
}

fn parse_children(object_dir: &Path, child: &ChildKind) -> Result<Vec<MetadataRecord>> {
    let dir = object_dir.join(child.dir);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .map_err(|e| ParseError::io(&dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .is_some_and(|n| n.to_string_lossy().ends_with(child.suffix))
        })
        .collect();
    files.sort();

    let mut records = Vec::with_capacity(files.len());
    for path in files {
        let mut details = read_metadata_file(&path, child.root)?;

        let stem = path
            .file_name()
            .map(|n| n.to_string_lossy().trim_end_matches(child.suffix).to_string())
            .unwrap_or_default();

        let api_name = text_of(&details, "fullName").unwrap_or(stem);

        let mut record = MetadataRecord::new(child.kind, api_name);
        record.label = take_text(&mut details, "label");
        record.description = take_text(&mut details, "description");
        record.details = details;
        records.push(record);
    }

    Ok(records)
}

/// Immediate sub-directories of an objects root, sorted by name
pub fn discover_object_dirs(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(ParseError::NotFound(root.to_path_buf()));
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory loop"));
            ParseError::io(root, source)
        })?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }

    Ok(dirs)
}
