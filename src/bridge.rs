//! Copying the entries of the different mapping sources into a [`MappingSet`].
//!
//! All functions here only add entries or overwrite deobfuscated names. Running them twice gives the same result as
//! running them once.

use anyhow::{anyhow, Context, Result};
use log::trace;
use quill::mcp::McpNames;
use quill::srg::MappingFile;
use quill::tiny::TinyTree;
use quill::tree::Mapping;
use quill::tree::mappings::{ClassMapping, FieldSignature, MappingSet, MethodSignature};

/// Loads the names of the namespace `from` mapped to the names of the namespace `to` from a tiny tree.
///
/// Every class, field and method gets keyed by its name (and descriptor) in `from`, with the name in `to` as the
/// deobfuscated name. Comments are copied if there are any.
pub fn load_tiny<'a>(target: &'a mut MappingSet, tree: &TinyTree, from: &str, to: &str) -> Result<&'a mut MappingSet> {
	let from = tree.get_namespace(from)?;
	let to = tree.get_namespace(to)?;

	for class in tree.classes() {
		let class_mapping = target.get_or_create_class_mapping(class.name(from));
		class_mapping.set_deobfuscated_name(class.name(to));
		copy_comment(class_mapping, class.comment());

		for field in class.fields() {
			let desc = tree.map_descriptor(field.descriptor(), from)?;
			let field_mapping = class_mapping.get_or_create_field_mapping(FieldSignature::new(field.name(from), Some(desc)));
			field_mapping.set_deobfuscated_name(field.name(to));
			copy_comment(field_mapping, field.comment());
		}

		for method in class.methods() {
			let desc = tree.map_descriptor(method.descriptor(), from)?;
			let signature = MethodSignature::new(method.name(from), desc)
				.with_context(|| anyhow!("in class {:?}", class.name(from)))?;
			let method_mapping = class_mapping.get_or_create_method_mapping(signature);
			method_mapping.set_deobfuscated_name(method.name(to));
			copy_comment(method_mapping, method.comment());
		}
	}

	Ok(target)
}

fn copy_comment(mapping: &mut impl Mapping, comment: Option<&str>) {
	if let Some(comment) = comment {
		mapping.set_comment(Some(comment.to_owned()));
	}
}

/// Loads the mappings of a file of the SRG family.
///
/// Fields are keyed by name only, methods by name and original descriptor.
pub fn load_mapping_file<'a>(target: &'a mut MappingSet, file: &MappingFile) -> Result<&'a mut MappingSet> {
	for class in file.classes() {
		let class_mapping = target.get_or_create_class_mapping(class.original());
		class_mapping.set_deobfuscated_name(class.mapped());

		for field in class.fields() {
			class_mapping.get_or_create_field_mapping(FieldSignature::new(field.original(), None))
				.set_deobfuscated_name(field.mapped());
		}

		for method in class.methods() {
			class_mapping.get_or_create_method_mapping(method.signature().clone())
				.set_deobfuscated_name(method.mapped());
		}
	}

	Ok(target)
}

/// Replaces the deobfuscated names of all fields and methods with the names from the table.
///
/// This goes through all inner classes as well. Class names are not touched. Names the table doesn't know stay as
/// they are.
pub fn merge_mcp_names<'a>(target: &'a mut MappingSet, names: &McpNames) -> &'a mut MappingSet {
	for class in target.classes_mut() {
		merge_mcp_names_class(class, names);
	}
	target
}

fn merge_mcp_names_class(class: &mut ClassMapping, names: &McpNames) {
	for field in class.fields_mut() {
		rename(field, names);
	}
	for method in class.methods_mut() {
		rename(method, names);
	}
	for inner in class.inner_classes_mut() {
		merge_mcp_names_class(inner, names);
	}
}

fn rename(mapping: &mut impl Mapping, names: &McpNames) {
	match names.get(mapping.deobfuscated_name()) {
		Some(name) => {
			mapping.set_deobfuscated_name(name);
		},
		None => trace!("no mcp name for {:?}, keeping it", mapping.deobfuscated_name()),
	}
}
