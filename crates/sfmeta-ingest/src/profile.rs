//! Profile parser
//!
//! Profiles list every object, field, class, page and permission the profile
//! touches, often thousands of entries. Each permission kind is returned in
//! fixed-size chunks.

use crate::error::{ParseError, Result};
use crate::xml::{read_metadata_file, take_text, text_of};
use sfmeta_common::metadata::{
    DetailValue, Details, MetadataRecord, ParsedProfile, PermissionKind, RecordKind,
};
use sfmeta_common::Chunked;
use std::path::Path;
use tracing::{debug, info};

const PROFILE_SUFFIX: &str = ".profile-meta.xml";

/// Parse a profile file, chunking each permission list by `chunk_size`
pub fn parse_profile(path: impl AsRef<Path>, chunk_size: usize) -> Result<ParsedProfile> {
    parse_profile_with(path, chunk_size, |_, _| {})
}

/// Like [`parse_profile`], invoking `on_chunk` for every chunk produced
pub fn parse_profile_with<F>(
    path: impl AsRef<Path>,
    chunk_size: usize,
    mut on_chunk: F,
) -> Result<ParsedProfile>
where
    F: FnMut(PermissionKind, &[MetadataRecord]),
{
    let path = path.as_ref();
    let mut details = read_metadata_file(path, "Profile")?;

    let stem = path
        .file_name()
        .map(|n| n.to_string_lossy().trim_end_matches(PROFILE_SUFFIX).to_string())
        .unwrap_or_default();
    let api_name = text_of(&details, "fullName").unwrap_or(stem);

    let mut permissions = Vec::with_capacity(PermissionKind::ALL.len());
    for kind in PermissionKind::ALL {
        let rows = details
            .remove(kind.element())
            .map(|value| permission_rows(kind, &value))
            .unwrap_or_default();
        permissions.push((kind, rows));
    }

    let mut profile = MetadataRecord::new(RecordKind::Profile, api_name.clone());
    profile.label = take_text(&mut details, "label");
    profile.description = take_text(&mut details, "description");
    profile.details = details;

    let mut parsed = ParsedProfile::new(profile);

    for (kind, rows) in permissions {
        if rows.is_empty() {
            continue;
        }

        let chunked = Chunked::new(rows, chunk_size).map_err(|e| ParseError::Chunking {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        for chunk in chunked.chunks() {
            debug!(profile = %api_name, kind = %kind, items = chunk.len(), "Profile chunk");
            on_chunk(kind, chunk);
        }

        parsed.permissions.insert(kind, chunked);
    }

    info!(
        profile = %api_name,
        kinds = parsed.permissions.len(),
        rows = parsed.permissions.values().map(Chunked::len).sum::<usize>(),
        "Parsed profile"
    );

    Ok(parsed)
}

fn permission_rows(kind: PermissionKind, value: &DetailValue) -> Vec<MetadataRecord> {
    value
        .as_seq()
        .into_iter()
        .map(|item| {
            let details = item.as_map().cloned().unwrap_or_else(Details::new);
            let api_name = identity(kind, &details);
            let mut record = MetadataRecord::new(RecordKind::ProfilePermission(kind), api_name);
            record.details = details;
            record
        })
        .collect()
}

/// Identifying value of a permission row; composite identities are joined with `" / "`
fn identity(kind: PermissionKind, details: &Details) -> String {
    kind.identity_elements()
        .iter()
        .filter_map(|element| text_of(details, element))
        .collect::<Vec<_>>()
        .join(" / ")
}
