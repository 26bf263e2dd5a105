//! sfmeta Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the sfmeta workspace.
//!
//! # Overview
//!
//! This crate provides functionality used across all sfmeta workspace members:
//!
//! - **Metadata model**: parsed Salesforce records and their detail bags
//! - **Chunking**: fixed-size batches for very large permission lists
//! - **Error Handling**: shared error and result types
//! - **Logging**: tracing subscriber setup for the binaries
//!
//! # Example
//!
//! ```
//! use sfmeta_common::metadata::{DetailValue, MetadataRecord, RecordKind};
//!
//! let mut field = MetadataRecord::new(RecordKind::Field, "Industry__c");
//! field.details.insert("required".into(), DetailValue::from("true"));
//! assert!(field.detail_flag("required"));
//! ```

pub mod chunk;
pub mod error;
pub mod logging;
pub mod metadata;

// Re-export commonly used types
pub use chunk::Chunked;
pub use error::{Result, SfmetaError};
