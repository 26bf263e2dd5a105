//! End-to-end tests for the sfmeta binary
//!
//! These tests validate:
//! - Calling conventions and exit codes
//! - Template listing and rendering
//! - Parsing and caching of metadata files
//! - A full sync against a mock workspace API

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

const FLOW_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Flow xmlns="http://soap.sforce.com/2006/04/metadata">
    <label>Lead Assignment</label>
    <processType>AutoLaunchedFlow</processType>
    <status>Active</status>
    <decisions>
        <name>Is_Hot</name>
        <label>Is Hot</label>
    </decisions>
</Flow>
"#;

const OBJECT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CustomObject xmlns="http://soap.sforce.com/2006/04/metadata">
    <label>Invoice</label>
    <pluralLabel>Invoices</pluralLabel>
    <sharingModel>ReadWrite</sharingModel>
</CustomObject>
"#;

const FIELD_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CustomField xmlns="http://soap.sforce.com/2006/04/metadata">
    <fullName>Amount__c</fullName>
    <label>Amount</label>
    <type>Currency</type>
    <required>true</required>
</CustomField>
"#;

/// Command isolated from the caller's environment and `.env`
fn sfmeta(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sfmeta").unwrap();
    cmd.current_dir(workdir)
        .env("SFMETA_CACHE_DB", workdir.join("cache.db"))
        .env("NO_COLOR", "1")
        .env_remove("NOTION_API_URL")
        .env_remove("MCP_API_URL")
        .env_remove("NOTION_TOKEN")
        .env_remove("NOTION_DATABASE_ID")
        .env_remove("NOTION_ROOT_PAGE_ID")
        .env_remove("SFMETA_CHUNK_SIZE")
        .env_remove("SFMETA_OBJECTS_PATH")
        .env_remove("LOG_LEVEL");
    cmd
}

fn write_flow(dir: &Path) -> PathBuf {
    let path = dir.join("Lead_Assignment.flow-meta.xml");
    fs::write(&path, FLOW_XML).unwrap();
    path
}

fn write_object(dir: &Path) -> PathBuf {
    let object_dir = dir.join("objects").join("Invoice__c");
    fs::create_dir_all(object_dir.join("fields")).unwrap();
    fs::write(object_dir.join("Invoice__c.object-meta.xml"), OBJECT_XML).unwrap();
    fs::write(object_dir.join("fields").join("Amount__c.field-meta.xml"), FIELD_XML).unwrap();
    object_dir
}

fn empty_list() -> serde_json::Value {
    json!({"object": "list", "results": [], "has_more": false, "next_cursor": null})
}

// ============================================================================
// Calling Conventions
// ============================================================================

#[test]
fn test_missing_subcommand_exits_with_usage_code() {
    let temp = TempDir::new().unwrap();
    sfmeta(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("A subcommand is required"));
}

#[test]
fn test_markdown_help() {
    let temp = TempDir::new().unwrap();
    sfmeta(temp.path())
        .arg("--markdown-help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sfmeta templates"));
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn test_templates_list() {
    let temp = TempDir::new().unwrap();
    sfmeta(temp.path())
        .args(["templates", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("object"))
        .stdout(predicate::str::contains("fieldPermissions"))
        .stdout(predicate::str::contains("recordUpdates"));
}

#[test]
fn test_templates_render_fields_table() {
    let temp = TempDir::new().unwrap();
    sfmeta(temp.path())
        .args(["templates", "render", "object", "fields"])
        .assert()
        .success()
        .stdout(predicate::str::contains("🏷️ Opportunity - All Fields"))
        .stdout(predicate::str::contains("{OBJECT_NAME}").not());
}

#[test]
fn test_templates_render_unknown_name_fails() {
    let temp = TempDir::new().unwrap();
    sfmeta(temp.path())
        .args(["templates", "render", "flow", "fields"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Template not found: flow/fields"));
}

// ============================================================================
// Parse and Cache
// ============================================================================

#[test]
fn test_parse_flow_prints_json() {
    let temp = TempDir::new().unwrap();
    let flow = write_flow(temp.path());

    sfmeta(temp.path())
        .args(["parse", "flow"])
        .arg(&flow)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""kind": "flow""#))
        .stdout(predicate::str::contains("Lead_Assignment"))
        .stdout(predicate::str::contains("Is_Hot"));
}

#[test]
fn test_parse_object_directory() {
    let temp = TempDir::new().unwrap();
    let object = write_object(temp.path());

    sfmeta(temp.path())
        .args(["parse", "object"])
        .arg(&object)
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice__c"))
        .stdout(predicate::str::contains("Amount__c"));
}

#[test]
fn test_parse_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    sfmeta(temp.path())
        .args(["parse", "flow", "Nope.flow-meta.xml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Parse error"));
}

#[test]
fn test_cache_then_status() {
    let temp = TempDir::new().unwrap();
    let object = write_object(temp.path());

    sfmeta(temp.path())
        .args(["cache", "object"])
        .arg(&object)
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice__c"));

    sfmeta(temp.path())
        .args(["status", "--kind", "object"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice__c"))
        .stdout(predicate::str::contains("Components: 1"));
}

#[test]
fn test_status_on_empty_cache() {
    let temp = TempDir::new().unwrap();
    sfmeta(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No cached entities found."));
}

#[test]
fn test_push_uncached_entity_fails() {
    let temp = TempDir::new().unwrap();
    sfmeta(temp.path())
        .args(["push", "profile", "Admin"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("'profile/Admin' is not in the cache"));
}

// ============================================================================
// Sync
// ============================================================================

#[tokio::test]
async fn test_sync_flow_against_mock_workspace() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let flow = write_flow(temp.path());
    mount_flow_workspace(&server).await;

    sfmeta(temp.path())
        .env("NOTION_API_URL", server.uri())
        .env("NOTION_ROOT_PAGE_ID", "root")
        .args(["sync", "--no-cache", "flow"])
        .arg(&flow)
        .assert()
        .success()
        .stdout(predicate::str::contains("Lead_Assignment"))
        .stdout(predicate::str::contains("Synced:  1"))
        .stdout(predicate::str::contains("Failed:  0"));

    assert!(!temp.path().join("cache.db").exists());
}

#[tokio::test]
async fn test_sync_continues_when_cache_cannot_open() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let flow = write_flow(temp.path());
    mount_flow_workspace(&server).await;

    // A regular file where the cache directory should be
    let blocker = temp.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();

    sfmeta(temp.path())
        .env("NOTION_API_URL", server.uri())
        .env("NOTION_ROOT_PAGE_ID", "root")
        .env("SFMETA_CACHE_DB", blocker.join("cache.db"))
        .env("LOG_LEVEL", "warn")
        .args(["sync", "flow"])
        .arg(&flow)
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced:  1"))
        .stderr(predicate::str::contains("Cache unavailable"));
}

/// Workspace with an empty root page, accepting one flow with one decision
async fn mount_flow_workspace(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/blocks/root/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_list()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blocks/main-page/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_list()))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/pages"))
        .and(body_partial_json(json!({"parent": {"page_id": "root"}})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "main-page", "url": "https://notion.so/main-page"})),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/databases"))
        .and(body_partial_json(json!({"parent": {"page_id": "main-page"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "db-1"})))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/databases/db-1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_list()))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/pages"))
        .and(body_partial_json(json!({"parent": {"database_id": "db-1"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "row-1"})))
        .expect(1)
        .mount(server)
        .await;

    // The divider placed after the flow tables
    Mock::given(method("PATCH"))
        .and(path("/blocks/main-page/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sync_fails_when_every_source_fails() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    sfmeta(temp.path())
        .env("NOTION_API_URL", server.uri())
        .env("NOTION_ROOT_PAGE_ID", "root")
        .args(["sync", "flow", "Missing.flow-meta.xml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Missing"))
        .stderr(predicate::str::contains("All 1 entities failed"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[test]
fn test_sync_rejects_invalid_configuration() {
    let temp = TempDir::new().unwrap();
    let flow = write_flow(temp.path());

    sfmeta(temp.path())
        .env("NOTION_API_URL", "ftp://example.test")
        .args(["sync", "flow"])
        .arg(&flow)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API URL must be http(s)"));
}
