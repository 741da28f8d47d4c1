//! Mapping files for minecraft: reading them, writing SRG, and reversing and merging mapping sets.
//!
//! The in-memory model is the [`MappingSet`][tree::mappings::MappingSet] in the [`tree`] module. It can be reversed
//! and merged with another mapping set, see [`MappingSet::reverse`][tree::mappings::MappingSet::reverse] and
//! [`MappingSet::merge`][tree::mappings::MappingSet::merge].
//!
//! Currently this crate supports reading Tiny v1 and Tiny v2 (`.tiny`) files into a [`TinyTree`][tiny::TinyTree],
//! reading the SRG family of formats (SRG, CSRG, TSRG and TSRG2) and writing SRG files, as well as reading the
//! MCP name tables. See the documentation of the [`tiny`], [`srg`] and [`mcp`] modules for more.

mod lines;

pub mod descriptor;

pub mod tiny;
pub mod tiny_v1;
pub mod tiny_v2;

pub mod srg;
pub mod mcp;

pub mod tree;
mod action;
