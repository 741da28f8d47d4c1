//! A namespaced table of class, field and method names, as read from the tiny formats.
//!
//! Both the "Tiny v1" format (see [`tiny_v1`][crate::tiny_v1]) and the "Tiny v2" format
//! (see [`tiny_v2`][crate::tiny_v2]) read into a [`TinyTree`]. If you don't know which one a file is in, use
//! [`read_file_with_detection`] or [`read_with_detection`].
//!
//! All descriptors stored in the tree are in the first namespace. Use [`TinyTree::map_descriptor`] to get them in
//! another one.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use indexmap::map::Entry;
use crate::descriptor;

/// Describes a given namespace of a [`TinyTree`].
///
/// Obtained via [`TinyTree::get_namespace`], so no range checking is necessary when using it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Namespace(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct TinyTree {
	namespaces: Vec<String>,
	pub(crate) classes: IndexMap<String, TinyClass>,
}

impl TinyTree {
	pub(crate) fn new(namespaces: Vec<String>) -> Result<TinyTree> {
		if namespaces.len() < 2 {
			bail!("must have at least two namespaces, got {namespaces:?}");
		}
		for (i, namespace) in namespaces.iter().enumerate() {
			if namespaces[..i].contains(namespace) {
				bail!("duplicate namespace {namespace:?} in {namespaces:?}");
			}
		}
		Ok(TinyTree { namespaces, classes: IndexMap::new() })
	}

	pub fn namespaces(&self) -> &[String] {
		&self.namespaces
	}

	pub fn get_namespace(&self, name: &str) -> Result<Namespace> {
		self.namespaces.iter()
			.position(|namespace| namespace == name)
			.map(Namespace)
			.with_context(|| anyhow!("cannot find namespace {name:?}, only have {:?}", self.namespaces))
	}

	pub fn classes(&self) -> impl Iterator<Item=&TinyClass> {
		self.classes.values()
	}

	/// Looks up a class by its name in the first namespace.
	pub fn get_class(&self, name: &str) -> Option<&TinyClass> {
		self.classes.get(name)
	}

	pub(crate) fn add_class(&mut self, class: TinyClass) -> Result<&mut TinyClass> {
		match self.classes.entry(class.names[0].clone()) {
			Entry::Occupied(e) => {
				bail!("cannot add class {class:?} for key {:?}, as there's already one: {:?}", e.key(), e.get());
			},
			Entry::Vacant(e) => Ok(e.insert(class)),
		}
	}

	pub(crate) fn get_or_create_class(&mut self, name: &str) -> &mut TinyClass {
		let count = self.namespaces.len();
		self.classes.entry(name.to_owned())
			.or_insert_with(|| TinyClass::new(vec![name.to_owned(); count]))
	}

	fn class_name<'a>(&'a self, class: &'a str, namespace: Namespace) -> &'a str {
		self.classes.get(class).map_or(class, |class| class.name(namespace))
	}

	/// Remaps a descriptor from the first namespace into the given one.
	///
	/// Classes not part of this tree keep their names.
	pub fn map_descriptor(&self, desc: &str, namespace: Namespace) -> Result<String> {
		if namespace.0 == 0 {
			Ok(desc.to_owned())
		} else {
			descriptor::map_descriptor(desc, |class| self.class_name(class, namespace).to_owned())
		}
	}
}

/// The names of an entry, one per namespace. Missing names are filled with the name of the first namespace.
fn fill_names(names: Vec<Option<String>>) -> Result<Vec<String>> {
	let first = names.first()
		.and_then(|first| first.clone())
		.context("no name in the first namespace")?;

	Ok(names.into_iter()
		.map(|name| name.unwrap_or_else(|| first.clone()))
		.collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TinyClass {
	names: Vec<String>,
	comment: Option<String>,
	fields: Vec<TinyField>,
	methods: Vec<TinyMethod>,
}

impl TinyClass {
	fn new(names: Vec<String>) -> TinyClass {
		TinyClass { names, comment: None, fields: Vec::new(), methods: Vec::new() }
	}

	pub(crate) fn from_names(names: Vec<Option<String>>) -> Result<TinyClass> {
		Ok(TinyClass::new(fill_names(names)?))
	}

	pub(crate) fn set_names(&mut self, names: Vec<Option<String>>) -> Result<()> {
		self.names = fill_names(names)?;
		Ok(())
	}

	pub fn name(&self, namespace: Namespace) -> &str {
		&self.names[namespace.0]
	}

	pub fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	pub(crate) fn comment_mut(&mut self) -> &mut Option<String> {
		&mut self.comment
	}

	pub fn fields(&self) -> &[TinyField] {
		&self.fields
	}

	pub fn methods(&self) -> &[TinyMethod] {
		&self.methods
	}

	pub(crate) fn add_field(&mut self, field: TinyField) -> &mut TinyField {
		self.fields.push(field);
		let last = self.fields.len() - 1;
		&mut self.fields[last]
	}

	pub(crate) fn add_method(&mut self, method: TinyMethod) -> &mut TinyMethod {
		self.methods.push(method);
		let last = self.methods.len() - 1;
		&mut self.methods[last]
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct TinyField {
	desc: String,
	names: Vec<String>,
	comment: Option<String>,
}

impl TinyField {
	pub(crate) fn new(desc: String, names: Vec<Option<String>>) -> Result<TinyField> {
		descriptor::check_field_descriptor(&desc)?;
		Ok(TinyField { desc, names: fill_names(names)?, comment: None })
	}

	pub fn name(&self, namespace: Namespace) -> &str {
		&self.names[namespace.0]
	}

	/// The descriptor, in the first namespace.
	pub fn descriptor(&self) -> &str {
		&self.desc
	}

	pub fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	pub(crate) fn comment_mut(&mut self) -> &mut Option<String> {
		&mut self.comment
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct TinyMethod {
	desc: String,
	names: Vec<String>,
	comment: Option<String>,
}

impl TinyMethod {
	pub(crate) fn new(desc: String, names: Vec<Option<String>>) -> Result<TinyMethod> {
		descriptor::check_method_descriptor(&desc)?;
		Ok(TinyMethod { desc, names: fill_names(names)?, comment: None })
	}

	pub fn name(&self, namespace: Namespace) -> &str {
		&self.names[namespace.0]
	}

	/// The descriptor, in the first namespace.
	pub fn descriptor(&self) -> &str {
		&self.desc
	}

	pub fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	pub(crate) fn comment_mut(&mut self) -> &mut Option<String> {
		&mut self.comment
	}
}

pub(crate) fn set_comment(target: &mut Option<String>, comment: String) -> Result<()> {
	if let Some(existing) = target {
		bail!("only one comment is allowed, got {existing:?} and {comment:?}")
	}
	*target = Some(comment);
	Ok(())
}

/// Reads a tiny file, by opening the file given by the path, detecting whether it's tiny v1 or tiny v2.
pub fn read_file_with_detection(path: impl AsRef<Path>) -> Result<TinyTree> {
	read_with_detection(File::open(&path)?)
		.with_context(|| anyhow!("failed to read mappings file {:?} as tiny file", path.as_ref()))
}

#[allow(clippy::tabs_in_doc_comments)]
/// Reads a tiny file from the given reader, detecting whether it's tiny v1 or tiny v2 from the header.
///
/// ```
/// let v1 = "v1	official	named\nCLASS	a	Foo\n";
/// let v2 = "tiny	2	0	official	named\nc	a	Foo\n";
///
/// for string in [v1, v2] {
///     let tree = quill::tiny::read_with_detection(string.as_bytes()).unwrap();
///     let named = tree.get_namespace("named").unwrap();
///     assert_eq!(tree.get_class("a").unwrap().name(named), "Foo");
/// }
/// ```
pub fn read_with_detection(mut reader: impl Read) -> Result<TinyTree> {
	let mut string = String::new();
	reader.read_to_string(&mut string)?;

	let header = string.lines().next().context("no header line")?;

	if header.starts_with("v1\t") {
		crate::tiny_v1::read(string.as_bytes())
	} else if header.starts_with("tiny\t2\t") {
		crate::tiny_v2::read(string.as_bytes())
	} else {
		bail!("unknown tiny header {header:?}, expected either tiny v1 or tiny v2")
	}
}
