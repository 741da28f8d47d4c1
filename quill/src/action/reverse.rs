use anyhow::{anyhow, Context, Result};
use crate::tree::Mapping;
use crate::tree::mappings::{ClassMapping, FieldSignature, MappingSet, MethodSignature};

impl MappingSet {
	/// Creates the reverse of this mapping set, mapping the deobfuscated names back to the obfuscated ones.
	///
	/// Member descriptors are remapped into the deobfuscated names. Comments are carried over. If two classes map to
	/// the same deobfuscated name, they end up merged into one class, the later one winning on conflicts.
	///
	/// ```
	/// use quill::tree::Mapping;
	/// use quill::tree::mappings::{MappingSet, MethodSignature};
	///
	/// let mut set = MappingSet::new();
	/// let class = set.get_or_create_class_mapping("a");
	/// class.set_deobfuscated_name("Foo");
	/// class.get_or_create_method_mapping(MethodSignature::new("b", "(La;)V").unwrap())
	///     .set_deobfuscated_name("bar");
	///
	/// let reversed = set.reverse().unwrap();
	///
	/// let class = reversed.get_class_mapping("Foo").unwrap();
	/// assert_eq!(class.deobfuscated_name(), "a");
	/// let method = class.get_method_mapping(&MethodSignature::new("bar", "(LFoo;)V").unwrap()).unwrap();
	/// assert_eq!(method.deobfuscated_name(), "b");
	/// ```
	pub fn reverse(&self) -> Result<MappingSet> {
		let mut reversed = MappingSet::new();

		for class in self.classes.values() {
			let name = class.deobfuscated_name();
			let target = reversed.classes.entry(name.to_owned())
				.or_insert_with(|| ClassMapping::new(name, false));

			self.reverse_class(class, target)
				.with_context(|| anyhow!("failed to reverse class {:?}", class.obfuscated_name()))?;
		}

		Ok(reversed)
	}

	fn reverse_class(&self, class: &ClassMapping, target: &mut ClassMapping) -> Result<()> {
		target.set_deobfuscated_name(class.obfuscated_name())
			.set_comment(class.comment().map(str::to_owned));

		for field in class.fields() {
			let desc = field.signature().desc.as_deref()
				.map(|desc| self.deobfuscate_field_descriptor(desc))
				.transpose()
				.with_context(|| anyhow!("for field {}", field.signature()))?;

			target.get_or_create_field_mapping(FieldSignature::new(field.deobfuscated_name(), desc))
				.set_deobfuscated_name(field.obfuscated_name())
				.set_comment(field.comment().map(str::to_owned));
		}

		for method in class.methods() {
			let desc = self.deobfuscate_method_descriptor(&method.signature().desc)
				.with_context(|| anyhow!("for method {}", method.signature()))?;

			let signature = MethodSignature { name: method.deobfuscated_name().to_owned(), desc };
			target.get_or_create_method_mapping(signature)
				.set_deobfuscated_name(method.obfuscated_name())
				.set_comment(method.comment().map(str::to_owned));
		}

		for inner in class.inner_classes() {
			let inner_target = target.get_or_create_inner_class_mapping(inner.deobfuscated_name());

			self.reverse_class(inner, inner_target)
				.with_context(|| anyhow!("in inner class {:?}", inner.obfuscated_name()))?;
		}

		Ok(())
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::tree::Mapping;
	use crate::tree::mappings::{FieldSignature, MappingSet, MethodSignature};

	#[test]
	fn reverse_twice() {
		let mut set = MappingSet::new();
		let a = set.get_or_create_class_mapping("a");
		a.set_deobfuscated_name("net/minecraft/Foo").set_comment(Some("A foo.".to_owned()));
		a.get_or_create_field_mapping(FieldSignature::new("b", Some("La$c;".to_owned())))
			.set_deobfuscated_name("bar");
		a.get_or_create_method_mapping(MethodSignature::new("d", "(La;)La$c;").unwrap())
			.set_deobfuscated_name("baz")
			.set_comment(Some("Bazzes.".to_owned()));
		set.get_or_create_class_mapping("a$c").set_deobfuscated_name("net/minecraft/Foo$Inner");

		let reversed = set.reverse().unwrap();

		let foo = reversed.get_class_mapping("net/minecraft/Foo").unwrap();
		assert_eq!(foo.deobfuscated_name(), "a");
		assert_eq!(foo.comment(), Some("A foo."));
		let bar = foo.get_field_mapping(&FieldSignature::new("bar", Some("Lnet/minecraft/Foo$Inner;".to_owned()))).unwrap();
		assert_eq!(bar.deobfuscated_name(), "b");
		let baz = foo.get_method_mapping(&MethodSignature::new("baz", "(Lnet/minecraft/Foo;)Lnet/minecraft/Foo$Inner;").unwrap()).unwrap();
		assert_eq!(baz.deobfuscated_name(), "d");
		assert_eq!(baz.comment(), Some("Bazzes."));
		assert_eq!(reversed.deobfuscate_class("net/minecraft/Foo$Inner"), "a$c");

		assert_eq!(reversed.reverse().unwrap(), set);
	}

	#[test]
	fn chain_through_a_class_renamed_to_an_inner_name() {
		let mut mcp = MappingSet::new();
		mcp.get_or_create_class_mapping("a").set_deobfuscated_name("net/minecraft/Foo$Bar");
		mcp.get_or_create_class_mapping("b")
			.set_deobfuscated_name("net/minecraft/Baz")
			.get_or_create_method_mapping(MethodSignature::new("c", "(La;)V").unwrap())
			.set_deobfuscated_name("accept");

		let mut yarn = MappingSet::new();
		yarn.get_or_create_class_mapping("b")
			.get_or_create_method_mapping(MethodSignature::new("c", "(La;)V").unwrap())
			.set_deobfuscated_name("yarnAccept");

		let reversed = mcp.reverse().unwrap();
		assert_eq!(reversed.get_class_mapping("net/minecraft/Foo$Bar").map(|class| class.deobfuscated_name()), Some("a"));
		assert_eq!(reversed.deobfuscate_class("net/minecraft/Foo$Bar"), "a");

		let merged = reversed.merge(&yarn).unwrap();

		let baz = merged.get_class_mapping("net/minecraft/Baz").unwrap();
		let accept = baz.get_method_mapping(&MethodSignature::new("accept", "(Lnet/minecraft/Foo$Bar;)V").unwrap()).unwrap();
		assert_eq!(accept.deobfuscated_name(), "yarnAccept");
		assert_eq!(baz.methods().count(), 1);
		assert!(merged.get_class_mapping("b").is_none());
	}
}
