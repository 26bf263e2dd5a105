//! sfmeta Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Parsers for Salesforce metadata exported in source format.
//!
//! # Supported Metadata
//!
//! - **Objects**: `<Name>/<Name>.object-meta.xml` plus the `fields/`,
//!   `recordTypes/`, `businessProcesses/`, `compactLayouts/`,
//!   `validationRules/` and `listViews/` sub-directories
//! - **Profiles**: `<Name>.profile-meta.xml`, permission rows chunked
//! - **Flows**: `<Name>.flow-meta.xml`
//!
//! # Example
//!
//! ```no_run
//! use sfmeta_ingest::{object, profile};
//!
//! fn main() -> anyhow::Result<()> {
//!     let account = object::parse_object("force-app/main/default/objects/Account")?;
//!     println!("{} fields", account.fields.len());
//!
//!     let admin = profile::parse_profile("profiles/Admin.profile-meta.xml", 100)?;
//!     println!("{}", admin.api_name());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod flow;
pub mod object;
pub mod profile;
pub mod xml;

pub use error::{ParseError, Result};
pub use flow::parse_flow;
pub use object::{discover_object_dirs, parse_object};
pub use profile::parse_profile;
