use anyhow::Result;
use pretty_assertions::assert_eq;
use quill::tree::Mapping;
use quill::tree::mappings::{FieldSignature, MappingSet, MethodSignature};

fn obfuscated_to_intermediate() -> Result<MappingSet> {
	let mut set = MappingSet::new();

	let foo = set.get_or_create_class_mapping("a");
	foo.set_deobfuscated_name("net/minecraft/Foo");
	foo.get_or_create_field_mapping(FieldSignature::new("d", None))
		.set_deobfuscated_name("field_1_d");
	foo.get_or_create_method_mapping(MethodSignature::new("f", "(La$b;)Lc;")?)
		.set_deobfuscated_name("func_3_f");
	set.get_or_create_class_mapping("a$b").set_deobfuscated_name("net/minecraft/Foo$Bar");

	let baz = set.get_or_create_class_mapping("c");
	baz.set_deobfuscated_name("net/minecraft/Baz");
	baz.get_or_create_method_mapping(MethodSignature::new("g", "()V")?)
		.set_deobfuscated_name("func_4_g");

	Ok(set)
}

fn obfuscated_to_named() -> Result<MappingSet> {
	let mut set = MappingSet::new();

	let entity = set.get_or_create_class_mapping("a");
	entity.set_deobfuscated_name("net/minecraft/entity/Entity");
	entity.get_or_create_field_mapping(FieldSignature::with_descriptor("d", "I")?)
		.set_deobfuscated_name("health");
	entity.get_or_create_method_mapping(MethodSignature::new("f", "(La$b;)Lc;")?)
		.set_deobfuscated_name("tick")
		.set_comment(Some("Ticks.".to_owned()));
	set.get_or_create_class_mapping("a$b").set_deobfuscated_name("net/minecraft/entity/Entity$Part");
	set.get_or_create_class_mapping("c").set_deobfuscated_name("net/minecraft/world/World");
	set.get_or_create_class_mapping("e").set_deobfuscated_name("net/minecraft/Extra");

	Ok(set)
}

#[test]
fn reverse_then_merge() -> Result<()> {
	let expected = include_str!("merge_output.srg");

	let intermediate_to_obfuscated = obfuscated_to_intermediate()?.reverse()?;
	let output = intermediate_to_obfuscated.merge(&obfuscated_to_named()?)?;

	let actual = quill::srg::write_string(&output)?;

	assert_eq!(actual, expected, "left: actual, right: expected");

	let tick = output.get_class_mapping("net/minecraft/Foo")
		.and_then(|class| class.get_method_mapping(&MethodSignature::new("func_3_f", "(Lnet/minecraft/Foo$Bar;)Lnet/minecraft/Baz;").ok()?))
		.map(|method| method.comment());
	assert_eq!(tick, Some(Some("Ticks.")));

	Ok(())
}

#[test]
fn merge_is_chained_not_unioned_by_key() -> Result<()> {
	let set = obfuscated_to_intermediate()?;
	let merged = set.merge(&set.reverse()?)?;

	// a -> net/minecraft/Foo -> a
	assert_eq!(merged.deobfuscate_class("a"), "a");
	assert_eq!(merged.deobfuscate_class("a$b"), "a$b");
	assert_eq!(merged.len(), 2);

	Ok(())
}
