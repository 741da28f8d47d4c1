//! The in-memory mapping model.
//!
//! A [`MappingSet`][mappings::MappingSet] maps obfuscated names to deobfuscated names. It contains top-level class
//! mappings, which in turn contain field, method and inner class mappings.

pub mod mappings;

/// Common accessors of class, field and method mappings.
pub trait Mapping {
	/// The name this mapping is keyed by.
	fn obfuscated_name(&self) -> &str;

	/// The name this mapping maps to. If none is set, this is the obfuscated name.
	fn deobfuscated_name(&self) -> &str;

	fn set_deobfuscated_name(&mut self, name: &str) -> &mut Self;

	fn comment(&self) -> Option<&str>;

	fn set_comment(&mut self, comment: Option<String>) -> &mut Self;
}
