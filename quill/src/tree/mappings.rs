use std::fmt::{Display, Formatter};
use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use indexmap::map::Entry;
use crate::descriptor;
use crate::tree::Mapping;

/// The separator between an outer class name and an inner class name.
pub const INNER_CLASS_SEPARATOR: char = '$';

/// A set of class mappings, keyed by the full obfuscated name of the top-level classes.
///
/// Inner classes are stored inside their outer classes. All the lookup methods taking a class name take the full
/// name, like `a$b$c`, and walk the nesting chain.
///
/// A top-level class may also be keyed by a name containing `$`, like the reverse of a class mapped to `Foo$Bar`.
/// Lookups start at the longest top-level key the name starts with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingSet {
	pub(crate) classes: IndexMap<String, ClassMapping>,
}

impl MappingSet {
	pub fn new() -> MappingSet {
		MappingSet::default()
	}

	/// The top-level classes, in insertion order.
	pub fn classes(&self) -> impl Iterator<Item=&ClassMapping> {
		self.classes.values()
	}

	pub fn classes_mut(&mut self) -> impl Iterator<Item=&mut ClassMapping> {
		self.classes.values_mut()
	}

	/// The number of top-level classes.
	pub fn len(&self) -> usize {
		self.classes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}

	/// Looks up a class by its full obfuscated name.
	///
	/// ```
	/// use quill::tree::Mapping;
	/// use quill::tree::mappings::MappingSet;
	///
	/// let mut set = MappingSet::new();
	/// set.get_or_create_class_mapping("a$b").set_deobfuscated_name("Foo$Bar");
	///
	/// assert_eq!(set.get_class_mapping("a$b").map(|class| class.deobfuscated_name()), Some("Bar"));
	/// assert!(set.get_class_mapping("a$c").is_none());
	/// ```
	pub fn get_class_mapping(&self, name: &str) -> Option<&ClassMapping> {
		let (top_level, inner) = self.split_class_name(name);
		let mut class = self.classes.get(top_level)?;
		for part in inner_parts(inner) {
			class = class.inner_classes.get(part)?;
		}
		Some(class)
	}

	/// Looks up a class by its full obfuscated name, creating it and all its outer classes if needed.
	///
	/// Classes created here have no deobfuscated name.
	pub fn get_or_create_class_mapping(&mut self, name: &str) -> &mut ClassMapping {
		let (top_level, inner) = self.split_class_name(name);

		let mut class = self.classes.entry(top_level.to_owned())
			.or_insert_with(|| ClassMapping::new(top_level, false));
		for part in inner_parts(inner) {
			class = class.get_or_create_inner_class_mapping(part);
		}
		class
	}

	/// Computes the full deobfuscated name of a class given by its full obfuscated name.
	///
	/// Parts of the name that have no mapping stay as they are.
	///
	/// ```
	/// use quill::tree::Mapping;
	/// use quill::tree::mappings::MappingSet;
	///
	/// let mut set = MappingSet::new();
	/// set.get_or_create_class_mapping("a").set_deobfuscated_name("Foo");
	/// set.get_or_create_class_mapping("a$b").set_deobfuscated_name("Foo$Bar");
	///
	/// assert_eq!(set.deobfuscate_class("a$b"), "Foo$Bar");
	/// assert_eq!(set.deobfuscate_class("a$c$d"), "Foo$c$d");
	/// assert_eq!(set.deobfuscate_class("java/lang/Object"), "java/lang/Object");
	/// ```
	pub fn deobfuscate_class(&self, name: &str) -> String {
		let (top_level, inner) = self.split_class_name(name);

		let mut class = self.classes.get(top_level);
		let mut result = class.map_or(top_level, |class| class.deobfuscated_name()).to_owned();

		for part in inner_parts(inner) {
			class = class.and_then(|class| class.inner_classes.get(part));

			result.push(INNER_CLASS_SEPARATOR);
			result.push_str(class.map_or(part, |class| class.deobfuscated_name()));
		}

		result
	}

	/// Splits a full class name into the key of its top-level class and the names of the inner classes, if any.
	fn split_class_name<'a>(&self, name: &'a str) -> (&'a str, Option<&'a str>) {
		let mut top_level = name;
		while !self.classes.contains_key(top_level) {
			match top_level.rsplit_once(INNER_CLASS_SEPARATOR) {
				Some((outer, _)) => top_level = outer,
				None => break,
			}
		}
		(top_level, name.get(top_level.len() + 1..))
	}

	/// Remaps all class names of a field descriptor from the obfuscated into the deobfuscated names.
	pub fn deobfuscate_field_descriptor(&self, desc: &str) -> Result<String> {
		descriptor::map_descriptor(desc, |class| self.deobfuscate_class(class))
	}

	/// Remaps all class names of a method descriptor from the obfuscated into the deobfuscated names.
	pub fn deobfuscate_method_descriptor(&self, desc: &str) -> Result<String> {
		descriptor::map_descriptor(desc, |class| self.deobfuscate_class(class))
	}
}

fn inner_parts(inner: Option<&str>) -> impl Iterator<Item=&str> {
	inner.into_iter().flat_map(|inner| inner.split(INNER_CLASS_SEPARATOR))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMapping {
	obfuscated: String,
	deobfuscated: Option<String>,
	comment: Option<String>,
	inner: bool,
	pub(crate) fields: IndexMap<FieldSignature, FieldMapping>,
	pub(crate) methods: IndexMap<MethodSignature, MethodMapping>,
	pub(crate) inner_classes: IndexMap<String, ClassMapping>,
}

impl ClassMapping {
	pub(crate) fn new(obfuscated: &str, inner: bool) -> ClassMapping {
		ClassMapping {
			obfuscated: obfuscated.to_owned(),
			deobfuscated: None,
			comment: None,
			inner,
			fields: IndexMap::new(),
			methods: IndexMap::new(),
			inner_classes: IndexMap::new(),
		}
	}

	/// Whether this class is the inner class of another one.
	///
	/// Inner classes only store their simple names, both obfuscated and deobfuscated.
	pub fn is_inner(&self) -> bool {
		self.inner
	}

	pub fn has_deobfuscated_name(&self) -> bool {
		self.deobfuscated.is_some()
	}

	pub fn fields(&self) -> impl Iterator<Item=&FieldMapping> {
		self.fields.values()
	}

	pub fn fields_mut(&mut self) -> impl Iterator<Item=&mut FieldMapping> {
		self.fields.values_mut()
	}

	pub fn methods(&self) -> impl Iterator<Item=&MethodMapping> {
		self.methods.values()
	}

	pub fn methods_mut(&mut self) -> impl Iterator<Item=&mut MethodMapping> {
		self.methods.values_mut()
	}

	pub fn inner_classes(&self) -> impl Iterator<Item=&ClassMapping> {
		self.inner_classes.values()
	}

	pub fn inner_classes_mut(&mut self) -> impl Iterator<Item=&mut ClassMapping> {
		self.inner_classes.values_mut()
	}

	/// Looks up a field mapping.
	///
	/// If there's no mapping with exactly the given signature, a mapping with the same name is searched for, for
	/// which either the given or the stored signature has no descriptor.
	pub fn get_field_mapping(&self, signature: &FieldSignature) -> Option<&FieldMapping> {
		find_field(&self.fields, signature)
	}

	/// Looks up a field mapping with exactly the given signature, creating it if needed.
	///
	/// A new field mapping maps to its own name.
	pub fn get_or_create_field_mapping(&mut self, signature: FieldSignature) -> &mut FieldMapping {
		match self.fields.entry(signature) {
			Entry::Occupied(e) => e.into_mut(),
			Entry::Vacant(e) => {
				let field = FieldMapping::new(e.key().clone());
				e.insert(field)
			},
		}
	}

	pub fn get_method_mapping(&self, signature: &MethodSignature) -> Option<&MethodMapping> {
		self.methods.get(signature)
	}

	/// Looks up a method mapping, creating it if needed.
	///
	/// A new method mapping maps to its own name.
	pub fn get_or_create_method_mapping(&mut self, signature: MethodSignature) -> &mut MethodMapping {
		match self.methods.entry(signature) {
			Entry::Occupied(e) => e.into_mut(),
			Entry::Vacant(e) => {
				let method = MethodMapping::new(e.key().clone());
				e.insert(method)
			},
		}
	}

	/// Looks up an inner class by its simple obfuscated name.
	pub fn get_inner_class_mapping(&self, name: &str) -> Option<&ClassMapping> {
		self.inner_classes.get(name)
	}

	pub fn get_or_create_inner_class_mapping(&mut self, name: &str) -> &mut ClassMapping {
		self.inner_classes.entry(name.to_owned())
			.or_insert_with(|| ClassMapping::new(name, true))
	}
}

impl Mapping for ClassMapping {
	fn obfuscated_name(&self) -> &str {
		&self.obfuscated
	}

	fn deobfuscated_name(&self) -> &str {
		self.deobfuscated.as_deref().unwrap_or(&self.obfuscated)
	}

	/// Sets the deobfuscated name.
	///
	/// For inner classes, only the part after the last `$` is kept, so that both `Foo$Bar` and `Bar` set the name
	/// `Bar`.
	fn set_deobfuscated_name(&mut self, name: &str) -> &mut Self {
		let name = if self.inner {
			name.rsplit_once(INNER_CLASS_SEPARATOR).map_or(name, |(_, simple)| simple)
		} else {
			name
		};
		self.deobfuscated = Some(name.to_owned());
		self
	}

	fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	fn set_comment(&mut self, comment: Option<String>) -> &mut Self {
		self.comment = comment;
		self
	}
}

pub(crate) fn find_field<'a>(fields: &'a IndexMap<FieldSignature, FieldMapping>, signature: &FieldSignature) -> Option<&'a FieldMapping> {
	fields.get(signature).or_else(|| {
		fields.values().find(|field| {
			field.signature.name == signature.name && (signature.desc.is_none() || field.signature.desc.is_none())
		})
	})
}

pub(crate) fn find_method<'a>(methods: &'a IndexMap<MethodSignature, MethodMapping>, signature: &MethodSignature) -> Option<&'a MethodMapping> {
	methods.get(signature)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
	signature: FieldSignature,
	deobfuscated: String,
	comment: Option<String>,
}

impl FieldMapping {
	fn new(signature: FieldSignature) -> FieldMapping {
		FieldMapping {
			deobfuscated: signature.name.clone(),
			signature,
			comment: None,
		}
	}

	pub fn signature(&self) -> &FieldSignature {
		&self.signature
	}
}

impl Mapping for FieldMapping {
	fn obfuscated_name(&self) -> &str {
		&self.signature.name
	}

	fn deobfuscated_name(&self) -> &str {
		&self.deobfuscated
	}

	fn set_deobfuscated_name(&mut self, name: &str) -> &mut Self {
		name.clone_into(&mut self.deobfuscated);
		self
	}

	fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	fn set_comment(&mut self, comment: Option<String>) -> &mut Self {
		self.comment = comment;
		self
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodMapping {
	signature: MethodSignature,
	deobfuscated: String,
	comment: Option<String>,
}

impl MethodMapping {
	fn new(signature: MethodSignature) -> MethodMapping {
		MethodMapping {
			deobfuscated: signature.name.clone(),
			signature,
			comment: None,
		}
	}

	pub fn signature(&self) -> &MethodSignature {
		&self.signature
	}
}

impl Mapping for MethodMapping {
	fn obfuscated_name(&self) -> &str {
		&self.signature.name
	}

	fn deobfuscated_name(&self) -> &str {
		&self.deobfuscated
	}

	fn set_deobfuscated_name(&mut self, name: &str) -> &mut Self {
		name.clone_into(&mut self.deobfuscated);
		self
	}

	fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	fn set_comment(&mut self, comment: Option<String>) -> &mut Self {
		self.comment = comment;
		self
	}
}

/// The key of a field mapping: the obfuscated name and, if known, the obfuscated descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldSignature {
	pub name: String,
	pub desc: Option<String>,
}

impl FieldSignature {
	pub fn new(name: impl Into<String>, desc: Option<String>) -> FieldSignature {
		FieldSignature { name: name.into(), desc }
	}

	/// Creates a signature with a descriptor, checking the descriptor.
	pub fn with_descriptor(name: impl Into<String>, desc: impl Into<String>) -> Result<FieldSignature> {
		let desc = desc.into();
		descriptor::check_field_descriptor(&desc)?;
		Ok(FieldSignature::new(name, Some(desc)))
	}
}

impl Display for FieldSignature {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match &self.desc {
			Some(desc) => write!(f, "{}:{desc}", self.name),
			None => write!(f, "{}", self.name),
		}
	}
}

/// The key of a method mapping: the obfuscated name and the obfuscated descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodSignature {
	pub name: String,
	pub desc: String,
}

impl MethodSignature {
	/// Creates a signature, checking the descriptor.
	pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Result<MethodSignature> {
		let name = name.into();
		let desc = desc.into();
		descriptor::check_method_descriptor(&desc)
			.with_context(|| anyhow!("for method {name:?}"))?;
		Ok(MethodSignature { name, desc })
	}
}

impl Display for MethodSignature {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}{}", self.name, self.desc)
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::tree::Mapping;
	use crate::tree::mappings::{ClassMapping, FieldSignature, MappingSet, MethodSignature};

	#[test]
	fn nesting() {
		let mut set = MappingSet::new();
		set.get_or_create_class_mapping("a$b$c").set_deobfuscated_name("net/minecraft/Foo$Bar$Baz");

		assert_eq!(set.len(), 1);
		let a = set.get_class_mapping("a").unwrap();
		assert!(!a.is_inner());
		assert!(!a.has_deobfuscated_name());
		assert_eq!(a.deobfuscated_name(), "a");

		let c = set.get_class_mapping("a$b$c").unwrap();
		assert!(c.is_inner());
		assert_eq!(c.obfuscated_name(), "c");
		assert_eq!(c.deobfuscated_name(), "Baz");
		assert_eq!(set.deobfuscate_class("a$b$c"), "a$b$Baz");
	}

	#[test]
	fn top_level_keeps_dollar() {
		let mut set = MappingSet::new();
		set.get_or_create_class_mapping("a").set_deobfuscated_name("Foo$Bar");
		assert_eq!(set.deobfuscate_class("a"), "Foo$Bar");
	}

	#[test]
	fn top_level_key_with_dollar() {
		let mut set = MappingSet::new();
		set.classes.insert("Foo$Bar".to_owned(), ClassMapping::new("Foo$Bar", false));
		assert!(set.get_class_mapping("Foo$Bar").is_some());

		set.get_or_create_class_mapping("Foo$Bar").set_deobfuscated_name("a");
		set.get_or_create_class_mapping("Foo$Bar$Baz").set_deobfuscated_name("a$b");
		set.get_or_create_class_mapping("Foo").set_deobfuscated_name("c");

		assert_eq!(set.len(), 2);
		assert_eq!(set.deobfuscate_class("Foo$Bar"), "a");
		assert_eq!(set.deobfuscate_class("Foo$Bar$Baz"), "a$b");
		assert_eq!(set.deobfuscate_class("Foo$Other"), "c$Other");
		assert!(set.get_class_mapping("Foo$Bar$Baz").unwrap().is_inner());
	}

	#[test]
	fn field_lookup_falls_back_to_name() {
		let mut set = MappingSet::new();
		let class = set.get_or_create_class_mapping("a");
		class.get_or_create_field_mapping(FieldSignature::new("b", None)).set_deobfuscated_name("foo");
		class.get_or_create_field_mapping(FieldSignature::new("c", Some("I".to_owned()))).set_deobfuscated_name("bar");

		let lookup = |name: &str, desc: Option<&str>| class.get_field_mapping(&FieldSignature::new(name, desc.map(str::to_owned)))
			.map(|field| field.deobfuscated_name().to_owned());

		assert_eq!(lookup("b", None), Some("foo".to_owned()));
		assert_eq!(lookup("b", Some("J")), Some("foo".to_owned()));
		assert_eq!(lookup("c", Some("I")), Some("bar".to_owned()));
		assert_eq!(lookup("c", None), Some("bar".to_owned()));
		assert_eq!(lookup("c", Some("J")), None);
		assert_eq!(lookup("d", None), None);
	}

	#[test]
	fn new_members_map_to_themselves() {
		let mut set = MappingSet::new();
		let class = set.get_or_create_class_mapping("a");
		let method = class.get_or_create_method_mapping(MethodSignature::new("b", "(La;)V").unwrap());
		assert_eq!(method.deobfuscated_name(), "b");
		assert_eq!(method.comment(), None);

		method.set_deobfuscated_name("run").set_comment(Some("Runs.".to_owned()));
		let method = class.get_or_create_method_mapping(MethodSignature::new("b", "(La;)V").unwrap());
		assert_eq!(method.deobfuscated_name(), "run");
		assert_eq!(method.comment(), Some("Runs."));
	}

	#[test]
	fn descriptors() {
		let mut set = MappingSet::new();
		set.get_or_create_class_mapping("a").set_deobfuscated_name("net/minecraft/Foo");
		set.get_or_create_class_mapping("a$b").set_deobfuscated_name("Bar");

		assert_eq!(set.deobfuscate_method_descriptor("(La$b;I)[La;").unwrap(), "(Lnet/minecraft/Foo$Bar;I)[Lnet/minecraft/Foo;");
		assert_eq!(set.deobfuscate_field_descriptor("Lc;").unwrap(), "Lc;");
		assert!(MethodSignature::new("a", "(").is_err());
		assert!(FieldSignature::with_descriptor("a", "V").is_err());
	}
}
