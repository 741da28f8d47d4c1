//! Composes mappings from the MCP names to the Yarn names.
//!
//! The MCP side is made of an SRG file, mapping the official names to the intermediate SRG names, and the MCP name
//! tables, mapping those to the community names. The Yarn side is a tiny file mapping the official names to the Yarn
//! names, after the missing field names have been filled in by a [`FieldNameProposer`][proposer::FieldNameProposer].
//! The [`RemappingTask`][task::RemappingTask] loads both into a [`MappingSet`][quill::tree::mappings::MappingSet]
//! each, reverses the first one and merges it with the second one.

pub mod bridge;
pub mod config;
pub mod download;
pub mod error;
pub mod launch;
pub mod mcp;
pub mod project;
pub mod proposer;
pub mod task;
