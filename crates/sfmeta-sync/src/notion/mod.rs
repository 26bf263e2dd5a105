//! Notion API adapter
//!
//! Request encoding, response decoding and the [`NotionClient`]
//! implementation of [`crate::store::DocumentStore`].

pub mod blocks;
pub mod client;
pub mod endpoints;
pub mod pagination;
pub mod properties;
pub mod types;

pub use client::NotionClient;
