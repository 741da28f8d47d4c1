use std::hash::Hash;
use anyhow::{anyhow, Context, Result};
use indexmap::{IndexMap, IndexSet};
use crate::tree::Mapping;
use crate::tree::mappings::{find_field, find_method, ClassMapping, FieldMapping, FieldSignature, MappingSet, MethodMapping, MethodSignature};

trait Member: Mapping + Clone {
	type Key: Hash + Eq + Clone;

	fn key(&self) -> &Self::Key;
}

impl Member for FieldMapping {
	type Key = FieldSignature;

	fn key(&self) -> &FieldSignature {
		self.signature()
	}
}

impl Member for MethodMapping {
	type Key = MethodSignature;

	fn key(&self) -> &MethodSignature {
		self.signature()
	}
}

impl MappingSet {
	/// Merges another mapping set into this one, chaining them.
	///
	/// For a class `o -> d` of this set, the class of the other set keyed by `d` continues the chain, and the class
	/// keyed by `o` is a duplicate of it. The merged class keeps the key `o` and maps to the name of the continuation,
	/// or else to the one of the duplicate, or else to `d`. So on conflicts, the other set wins. Members and inner
	/// classes are merged the same way, and comments follow the same precedence.
	///
	/// Everything from the other set that's neither a continuation nor a duplicate is copied over as is.
	///
	/// ```
	/// use quill::tree::Mapping;
	/// use quill::tree::mappings::MappingSet;
	///
	/// let mut a = MappingSet::new();
	/// a.get_or_create_class_mapping("a").set_deobfuscated_name("b");
	/// let mut b = MappingSet::new();
	/// b.get_or_create_class_mapping("b").set_deobfuscated_name("c");
	/// b.get_or_create_class_mapping("x").set_deobfuscated_name("y");
	///
	/// let merged = a.merge(&b).unwrap();
	///
	/// assert_eq!(merged.deobfuscate_class("a"), "c");
	/// assert_eq!(merged.deobfuscate_class("x"), "y");
	/// assert!(merged.get_class_mapping("b").is_none());
	/// ```
	pub fn merge(&self, other: &MappingSet) -> Result<MappingSet> {
		let mut merged = MappingSet::new();
		let mut consumed: IndexSet<&str> = IndexSet::new();

		for class in self.classes.values() {
			let continuation = other.classes.get(class.deobfuscated_name());
			let duplicate = other.classes.get(class.obfuscated_name());

			if let Some(continuation) = continuation {
				consumed.insert(continuation.obfuscated_name());
			}
			if let Some(duplicate) = duplicate {
				consumed.insert(duplicate.obfuscated_name());
			}

			let class = self.merge_class(class, continuation, duplicate)
				.with_context(|| anyhow!("failed to merge class {:?}", class.obfuscated_name()))?;

			merged.classes.insert(class.obfuscated_name().to_owned(), class);
		}

		for class in other.classes.values() {
			if !consumed.contains(class.obfuscated_name()) {
				merged.classes.entry(class.obfuscated_name().to_owned())
					.or_insert_with(|| class.clone());
			}
		}

		Ok(merged)
	}

	fn merge_class(&self, class: &ClassMapping, continuation: Option<&ClassMapping>, duplicate: Option<&ClassMapping>) -> Result<ClassMapping> {
		let mut merged = ClassMapping::new(class.obfuscated_name(), class.is_inner());

		if let Some(other) = continuation.or(duplicate) {
			merged.set_deobfuscated_name(other.deobfuscated_name());
		} else if class.has_deobfuscated_name() {
			merged.set_deobfuscated_name(class.deobfuscated_name());
		}
		merged.set_comment(merge_comment(class, continuation, duplicate));

		merged.fields = merge_members(
			&class.fields,
			continuation.map(|class| &class.fields),
			duplicate.map(|class| &class.fields),
			|field| {
				let desc = field.signature().desc.as_deref()
					.map(|desc| self.deobfuscate_field_descriptor(desc))
					.transpose()?;
				Ok(FieldSignature::new(field.deobfuscated_name(), desc))
			},
			find_field,
		).context("merging fields")?;

		merged.methods = merge_members(
			&class.methods,
			continuation.map(|class| &class.methods),
			duplicate.map(|class| &class.methods),
			|method| {
				let desc = self.deobfuscate_method_descriptor(&method.signature().desc)?;
				Ok(MethodSignature { name: method.deobfuscated_name().to_owned(), desc })
			},
			find_method,
		).context("merging methods")?;

		let mut consumed_continuation: IndexSet<&str> = IndexSet::new();
		let mut consumed_duplicate: IndexSet<&str> = IndexSet::new();

		for inner in class.inner_classes.values() {
			let inner_continuation = continuation.and_then(|class| class.get_inner_class_mapping(inner.deobfuscated_name()));
			let inner_duplicate = duplicate.and_then(|class| class.get_inner_class_mapping(inner.obfuscated_name()));

			if let Some(inner_continuation) = inner_continuation {
				consumed_continuation.insert(inner_continuation.obfuscated_name());
			}
			if let Some(inner_duplicate) = inner_duplicate {
				consumed_duplicate.insert(inner_duplicate.obfuscated_name());
			}

			let inner = self.merge_class(inner, inner_continuation, inner_duplicate)
				.with_context(|| anyhow!("in inner class {:?}", inner.obfuscated_name()))?;
			merged.inner_classes.insert(inner.obfuscated_name().to_owned(), inner);
		}

		for (other, consumed) in [(continuation, &consumed_continuation), (duplicate, &consumed_duplicate)] {
			for inner in other.into_iter().flat_map(|class| class.inner_classes.values()) {
				if !consumed.contains(inner.obfuscated_name()) {
					merged.inner_classes.entry(inner.obfuscated_name().to_owned())
						.or_insert_with(|| inner.clone());
				}
			}
		}

		Ok(merged)
	}
}

fn merge_comment<M: Mapping>(own: &M, continuation: Option<&M>, duplicate: Option<&M>) -> Option<String> {
	continuation.and_then(|m| m.comment())
		.or_else(|| duplicate.and_then(|m| m.comment()))
		.or_else(|| own.comment())
		.map(str::to_owned)
}

fn merge_members<'a, M: Member>(
	members: &'a IndexMap<M::Key, M>,
	continuation: Option<&'a IndexMap<M::Key, M>>,
	duplicate: Option<&'a IndexMap<M::Key, M>>,
	continuation_key: impl Fn(&M) -> Result<M::Key>,
	find: impl Fn(&'a IndexMap<M::Key, M>, &M::Key) -> Option<&'a M>,
) -> Result<IndexMap<M::Key, M>> {
	let mut merged = IndexMap::new();
	let mut consumed_continuation: IndexSet<&M::Key> = IndexSet::new();
	let mut consumed_duplicate: IndexSet<&M::Key> = IndexSet::new();

	for member in members.values() {
		let key = continuation_key(member)
			.with_context(|| anyhow!("for {:?}", member.obfuscated_name()))?;

		let next = continuation.and_then(|members| find(members, &key));
		let same = duplicate.and_then(|members| find(members, member.key()));

		if let Some(next) = next {
			consumed_continuation.insert(next.key());
		}
		if let Some(same) = same {
			consumed_duplicate.insert(same.key());
		}

		let mut result = member.clone();
		if let Some(other) = next.or(same) {
			result.set_deobfuscated_name(other.deobfuscated_name());
		}
		result.set_comment(merge_comment(member, next, same));

		merged.insert(member.key().clone(), result);
	}

	for (other, consumed) in [(continuation, &consumed_continuation), (duplicate, &consumed_duplicate)] {
		for member in other.into_iter().flat_map(|members| members.values()) {
			if !consumed.contains(member.key()) {
				merged.entry(member.key().clone())
					.or_insert_with(|| member.clone());
			}
		}
	}

	Ok(merged)
}
