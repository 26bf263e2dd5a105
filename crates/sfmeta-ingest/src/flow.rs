//! Flow parser

use crate::error::Result;
use crate::xml::{read_metadata_file, take_text, text_of};
use sfmeta_common::metadata::{DetailValue, MetadataRecord, ParsedFlow, RecordKind};
use std::path::Path;
use tracing::info;

const FLOW_SUFFIX: &str = ".flow-meta.xml";

/// Parse a flow file.
///
/// The API name is always the file name without `.flow-meta.xml`; flows do
/// not carry `<fullName>` in source format.
pub fn parse_flow(path: impl AsRef<Path>) -> Result<ParsedFlow> {
    let path = path.as_ref();
    let mut details = read_metadata_file(path, "Flow")?;

    let api_name = path
        .file_name()
        .map(|n| n.to_string_lossy().trim_end_matches(FLOW_SUFFIX).to_string())
        .unwrap_or_default();

    let decisions = details
        .remove("decisions")
        .map(|v| elements(&v, RecordKind::FlowDecision))
        .unwrap_or_default();
    let record_updates = details
        .remove("recordUpdates")
        .map(|v| elements(&v, RecordKind::FlowRecordUpdate))
        .unwrap_or_default();

    let mut flow = MetadataRecord::new(RecordKind::Flow, api_name);
    flow.label = take_text(&mut details, "label");
    flow.description = take_text(&mut details, "description");
    flow.details = details;

    let parsed = ParsedFlow {
        flow,
        decisions,
        record_updates,
    };

    info!(
        flow = %parsed.api_name(),
        status = %parsed.status(),
        decisions = parsed.decisions.len(),
        record_updates = parsed.record_updates.len(),
        "Parsed flow"
    );

    Ok(parsed)
}

fn elements(value: &DetailValue, kind: RecordKind) -> Vec<MetadataRecord> {
    value
        .as_seq()
        .into_iter()
        .filter_map(DetailValue::as_map)
        .map(|map| {
            let mut details = map.clone();
            let api_name = text_of(&details, "name").unwrap_or_default();
            let mut record = MetadataRecord::new(kind, api_name);
            record.label = take_text(&mut details, "label");
            record.description = take_text(&mut details, "description");
            record.details = details;
            record
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    const FLOW: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Flow xmlns="http://soap.sforce.com/2006/04/metadata">
    <label>Lead Assignment</label>
    <description>Routes new leads</description>
    <processType>AutoLaunchedFlow</processType>
    <status>Active</status>
    <decisions>
        <name>Is_Hot</name>
        <label>Is Hot?</label>
        <defaultConnectorLabel>Default Outcome</defaultConnectorLabel>
        <rules>
            <name>Hot</name>
            <conditionLogic>and</conditionLogic>
        </rules>
    </decisions>
    <recordUpdates>
        <name>Set_Owner</name>
        <object>Lead</object>
        <inputAssignments><field>OwnerId</field></inputAssignments>
    </recordUpdates>
    <recordUpdates>
        <name>Set_Status</name>
        <object>Lead</object>
    </recordUpdates>
    <start>
        <object>Lead</object>
        <filters><field>Rating</field><operator>EqualTo</operator></filters>
    </start>
</Flow>"#;

    #[test]
    fn test_parse_flow() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("Lead_Assignment.flow-meta.xml");
        std::fs::write(&path, FLOW).unwrap();

        let flow = parse_flow(&path).unwrap();
        assert_eq!(flow.api_name(), "Lead_Assignment");
        assert_eq!(flow.flow.label.as_deref(), Some("Lead Assignment"));
        assert_eq!(flow.status(), "Active");
        assert_eq!(flow.process_type(), "AutoLaunchedFlow");
        assert_eq!(flow.start_object().as_deref(), Some("Lead"));
        assert_eq!(flow.start_operator().as_deref(), Some("EqualTo"));

        assert_eq!(flow.decisions.len(), 1);
        assert_eq!(flow.decisions[0].api_name, "Is_Hot");
        assert_eq!(flow.decisions[0].label.as_deref(), Some("Is Hot?"));

        assert_eq!(flow.record_updates.len(), 2);
        assert_eq!(flow.record_updates[1].api_name, "Set_Status");
        assert!(flow.flow.detail("decisions").is_none());
    }

    #[test]
    fn test_wrong_root() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("Admin.flow-meta.xml");
        std::fs::write(&path, "<Profile/>").unwrap();

        assert!(matches!(parse_flow(&path), Err(ParseError::UnexpectedRoot { .. })));
    }
}
