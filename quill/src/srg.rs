//! Functions to read the "SRG" family of formats, and to write the "SRG" format.
//!
//! # Reading
//! The formats SRG (`CL:`/`FD:`/`MD:` lines), CSRG (space separated, one line per entry), TSRG (like CSRG, but with
//! members indented below their class) and TSRG2 (like TSRG, with a header and any number of namespaces) are read into
//! a [`MappingFile`]. Use [`read_file`] or [`read`] to detect the format from the content, or [`read_format`] if the
//! format is known.
//!
//! Only the first two namespaces of a TSRG2 file are read. Parameter mappings and `static` markers are skipped.
//!
//! # Writing
//! A [`MappingSet`] can be written in the SRG format using [`write`][fn@write], [`write_file`] or [`write_string`].
//! The output is sorted.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use crate::descriptor;
use crate::lines::Section;
use crate::lines::tsrg_line::TsrgLine;
use crate::tree::Mapping;
use crate::tree::mappings::{ClassMapping, MappingSet, MethodSignature};

/// The known formats of the SRG family.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
	Srg,
	Csrg,
	Tsrg,
	Tsrg2,
}

impl Format {
	/// Detects the format of the given file content.
	///
	/// A `tsrg2` header means TSRG2, any `CL:`, `FD:`, `MD:` or `PK:` line means SRG, and any line indented with a tab
	/// means TSRG.
	/// Everything else is CSRG.
	pub fn detect(content: &str) -> Format {
		let lines = content.lines().filter(|line| !line.trim().is_empty());

		if lines.clone().next().is_some_and(|line| line.starts_with("tsrg2 ")) {
			return Format::Tsrg2;
		}

		let mut format = Format::Csrg;
		for line in lines {
			if ["PK: ", "CL: ", "FD: ", "MD: "].iter().any(|prefix| line.starts_with(prefix)) {
				return Format::Srg;
			}
			if line.starts_with('\t') {
				format = Format::Tsrg;
			}
		}
		format
	}
}

/// A mapping file of the SRG family, mapping original names to mapped names.
///
/// Fields are keyed by their name only, as not all formats give field descriptors. Methods are keyed by name and
/// original descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingFile {
	classes: IndexMap<String, MappingClass>,
}

impl MappingFile {
	pub fn classes(&self) -> impl Iterator<Item=&MappingClass> {
		self.classes.values()
	}

	/// Looks up a class by its full original name.
	pub fn get_class(&self, original: &str) -> Option<&MappingClass> {
		self.classes.get(original)
	}

	fn get_or_create_class(&mut self, original: &str) -> &mut MappingClass {
		self.classes.entry(original.to_owned())
			.or_insert_with(|| MappingClass {
				original: original.to_owned(),
				mapped: original.to_owned(),
				fields: IndexMap::new(),
				methods: IndexMap::new(),
			})
	}

	fn add_class(&mut self, original: &str, mapped: &str) -> &mut MappingClass {
		let class = self.get_or_create_class(original);
		mapped.clone_into(&mut class.mapped);
		class
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingClass {
	original: String,
	mapped: String,
	fields: IndexMap<String, MappingField>,
	methods: IndexMap<MethodSignature, MappingMethod>,
}

impl MappingClass {
	/// The full original name.
	pub fn original(&self) -> &str {
		&self.original
	}

	/// The full mapped name.
	pub fn mapped(&self) -> &str {
		&self.mapped
	}

	pub fn fields(&self) -> impl Iterator<Item=&MappingField> {
		self.fields.values()
	}

	pub fn methods(&self) -> impl Iterator<Item=&MappingMethod> {
		self.methods.values()
	}

	pub fn get_field(&self, original: &str) -> Option<&MappingField> {
		self.fields.get(original)
	}

	pub fn get_method(&self, signature: &MethodSignature) -> Option<&MappingMethod> {
		self.methods.get(signature)
	}

	fn add_field(&mut self, original: &str, desc: Option<&str>, mapped: &str) -> Result<()> {
		let desc = desc.map(|desc| -> Result<String> {
				descriptor::check_field_descriptor(desc)?;
				Ok(desc.to_owned())
			})
			.transpose()?;

		self.fields.insert(original.to_owned(), MappingField {
			original: original.to_owned(),
			desc,
			mapped: mapped.to_owned(),
		});
		Ok(())
	}

	fn add_method(&mut self, original: &str, desc: &str, mapped: &str) -> Result<()> {
		let signature = MethodSignature::new(original, desc)?;
		self.methods.insert(signature.clone(), MappingMethod {
			signature,
			mapped: mapped.to_owned(),
		});
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingField {
	original: String,
	desc: Option<String>,
	mapped: String,
}

impl MappingField {
	pub fn original(&self) -> &str {
		&self.original
	}

	/// The original descriptor, if the format gives one.
	pub fn descriptor(&self) -> Option<&str> {
		self.desc.as_deref()
	}

	pub fn mapped(&self) -> &str {
		&self.mapped
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingMethod {
	signature: MethodSignature,
	mapped: String,
}

impl MappingMethod {
	pub fn original(&self) -> &str {
		&self.signature.name
	}

	/// The original descriptor.
	pub fn descriptor(&self) -> &str {
		&self.signature.desc
	}

	pub fn signature(&self) -> &MethodSignature {
		&self.signature
	}

	pub fn mapped(&self) -> &str {
		&self.mapped
	}
}

/// Reads a mapping file of the SRG family, detecting the format.
pub fn read_file(path: impl AsRef<Path>) -> Result<MappingFile> {
	read(File::open(&path)?)
		.with_context(|| anyhow!("failed to read mappings file {:?} as srg file", path.as_ref()))
}

/// Reads a mapping file of the SRG family from the given reader, detecting the format.
///
/// ```
/// use quill::tree::mappings::MethodSignature;
///
/// let string = "\
/// CL: a net/minecraft/Foo
/// FD: a/b net/minecraft/Foo/field_1_b
/// MD: a/c (La;)V net/minecraft/Foo/func_2_c (Lnet/minecraft/Foo;)V
/// ";
///
/// let file = quill::srg::read(string.as_bytes()).unwrap();
/// let class = file.get_class("a").unwrap();
///
/// assert_eq!(class.mapped(), "net/minecraft/Foo");
/// assert_eq!(class.get_field("b").unwrap().mapped(), "field_1_b");
/// let signature = MethodSignature::new("c", "(La;)V").unwrap();
/// assert_eq!(class.get_method(&signature).unwrap().mapped(), "func_2_c");
/// ```
pub fn read(mut reader: impl Read) -> Result<MappingFile> {
	let mut content = String::new();
	reader.read_to_string(&mut content)?;

	read_format(&content, Format::detect(&content))
}

/// Reads a mapping file of the SRG family in the given format.
pub fn read_format(content: &str, format: Format) -> Result<MappingFile> {
	match format {
		Format::Srg => read_srg(content),
		Format::Csrg => read_csrg(content),
		Format::Tsrg | Format::Tsrg2 => read_tsrg(content, format == Format::Tsrg2),
	}.with_context(|| anyhow!("failed to read {format:?} mappings"))
}

/// Splits `a/b/c` into `a/b` and `c`.
fn split_member(string: &str) -> Result<(&str, &str)> {
	string.rsplit_once('/')
		.with_context(|| anyhow!("expected `<class>/<member>`, got {string:?}"))
}

fn content_lines(content: &str) -> impl Iterator<Item=(usize, &str)> {
	content.lines()
		.enumerate()
		.map(|(line_number, line)| (line_number + 1, line.split_once('#').map_or(line, |(line, _)| line)))
		.filter(|(_, line)| !line.trim().is_empty())
}

fn read_srg(content: &str) -> Result<MappingFile> {
	let mut file = MappingFile::default();

	for (line_number, line) in content_lines(content) {
		let fields: Vec<&str> = line.split_whitespace().collect();

		read_srg_line(&mut file, &fields)
			.with_context(|| anyhow!("in line {line_number}"))?;
	}

	Ok(file)
}

fn read_srg_line(file: &mut MappingFile, fields: &[&str]) -> Result<()> {
	match fields {
		["PK:", _, _] => {},
		["CL:", original, mapped] => {
			file.add_class(original, mapped);
		},
		["FD:", original, mapped] => {
			let (class, field) = split_member(original)?;
			let (_, mapped) = split_member(mapped)?;
			file.get_or_create_class(class).add_field(field, None, mapped)?;
		},
		["FD:", original, desc, mapped, _mapped_desc] => {
			let (class, field) = split_member(original)?;
			let (_, mapped) = split_member(mapped)?;
			file.get_or_create_class(class).add_field(field, Some(*desc), mapped)?;
		},
		["MD:", original, desc, mapped, _mapped_desc] => {
			let (class, method) = split_member(original)?;
			let (_, mapped) = split_member(mapped)?;
			file.get_or_create_class(class).add_method(method, desc, mapped)?;
		},
		slice => bail!("illegal srg line {slice:?}"),
	}
	Ok(())
}

fn read_csrg(content: &str) -> Result<MappingFile> {
	let mut file = MappingFile::default();

	for (line_number, line) in content_lines(content) {
		let fields: Vec<&str> = line.split_whitespace().collect();

		read_csrg_line(&mut file, &fields)
			.with_context(|| anyhow!("in line {line_number}"))?;
	}

	Ok(file)
}

fn read_csrg_line(file: &mut MappingFile, fields: &[&str]) -> Result<()> {
	match fields {
		[package, _] if package.ends_with('/') => {},
		[original, mapped] => {
			file.add_class(original, mapped);
		},
		[class, original, mapped] => {
			file.get_or_create_class(class).add_field(original, None, mapped)?;
		},
		[class, original, desc, mapped] => {
			file.get_or_create_class(class).add_method(original, desc, mapped)?;
		},
		slice => bail!("illegal number of fields ({}) for a csrg line, expected 2-4, got {slice:?}", slice.len()),
	}
	Ok(())
}

fn read_tsrg(content: &str, tsrg2: bool) -> Result<MappingFile> {
	let mut lines = content_lines(content)
		.map(|(line_number, line)| -> Result<TsrgLine> {
			Ok(TsrgLine::new(line_number, line))
		})
		.peekable();

	let count = if tsrg2 {
		let header = lines.next().context("no header line")??;
		match header.words.as_slice() {
			[tsrg2, namespaces @ ..] if tsrg2 == "tsrg2" && namespaces.len() >= 2 => namespaces.len(),
			slice => bail!("expected a tsrg2 header with at least two namespaces, got {slice:?}"),
		}
	} else {
		2
	};

	let mut file = MappingFile::default();

	Section::top_level(&mut lines).each(|iter, line| {
		match line.words.as_slice() {
			[package, ..] if package.ends_with('/') => iter.skip_children(),
			[original, mapped, ..] if line.words.len() == count => {
				let class = file.add_class(original, mapped);

				iter.children().each(|iter, line| {
					let fields = line.words.as_slice();
					if fields.len() == count {
						class.add_field(&fields[0], None, &fields[1])?;
					} else if fields.len() == count + 1 && fields[1].starts_with('(') {
						class.add_method(&fields[0], &fields[1], &fields[2])?;
					} else if fields.len() == count + 1 {
						class.add_field(&fields[0], Some(fields[1].as_str()), &fields[2])?;
					} else {
						bail!("illegal member line {fields:?}, expected {count} names and an optional descriptor");
					}
					// parameters and `static` markers
					iter.skip_children()
				})
			},
			slice => bail!("illegal class line {slice:?}, expected {count} names"),
		}
	})?;

	Ok(file)
}

/// Writes the given mappings into a `String`, in the SRG format.
///
/// Mostly useful for comparing against expected output in tests.
pub fn write_string(mappings: &MappingSet) -> Result<String> {
	let mut vec = Vec::new();
	write(mappings, &mut vec)?;
	String::from_utf8(vec).context("written srg is not valid utf8")
}

/// Writes the given mappings into the file at the path, in the SRG format.
pub fn write_file(mappings: &MappingSet, path: impl AsRef<Path>) -> Result<()> {
	write(mappings, &mut File::create(&path)?)
		.with_context(|| anyhow!("failed to write mappings to {:?}", path.as_ref()))
}

/// Writes the given mappings in the SRG format.
///
/// Every class gets a `CL:` line, followed by the `FD:` lines of its fields, the `MD:` lines of its methods and then
/// the lines of its inner classes. Everything is sorted by the obfuscated names.
pub fn write(mappings: &MappingSet, writer: &mut impl Write) -> Result<()> {
	let mut w = BufWriter::new(writer);

	let mut classes: Vec<_> = mappings.classes().collect();
	classes.sort_by(|a, b| a.obfuscated_name().cmp(b.obfuscated_name()));

	for class in classes {
		write_class(mappings, &mut w, class, class.obfuscated_name(), class.deobfuscated_name())?;
	}

	w.flush()?;
	Ok(())
}

fn write_class(mappings: &MappingSet, w: &mut impl Write, class: &ClassMapping, obfuscated: &str, deobfuscated: &str) -> Result<()> {
	writeln!(w, "CL: {obfuscated} {deobfuscated}")?;

	let mut fields: Vec<_> = class.fields().collect();
	fields.sort_by(|a, b| a.signature().cmp(b.signature()));
	for field in fields {
		writeln!(w, "FD: {obfuscated}/{} {deobfuscated}/{}", field.obfuscated_name(), field.deobfuscated_name())?;
	}

	let mut methods: Vec<_> = class.methods().collect();
	methods.sort_by(|a, b| a.signature().cmp(b.signature()));
	for method in methods {
		let signature = method.signature();
		let desc = mappings.deobfuscate_method_descriptor(&signature.desc)?;
		writeln!(w, "MD: {obfuscated}/{} {} {deobfuscated}/{} {desc}", signature.name, signature.desc, method.deobfuscated_name())?;
	}

	let mut inner_classes: Vec<_> = class.inner_classes().collect();
	inner_classes.sort_by(|a, b| a.obfuscated_name().cmp(b.obfuscated_name()));
	for inner in inner_classes {
		let inner_obfuscated = format!("{obfuscated}${}", inner.obfuscated_name());
		let inner_deobfuscated = format!("{deobfuscated}${}", inner.deobfuscated_name());
		write_class(mappings, w, inner, &inner_obfuscated, &inner_deobfuscated)?;
	}

	Ok(())
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::srg::Format;

	#[test]
	fn detect() {
		assert_eq!(Format::detect("tsrg2 obf srg id\na b 1\n"), Format::Tsrg2);
		assert_eq!(Format::detect("PK: ./ net/minecraft\nCL: a b\n"), Format::Srg);
		assert_eq!(Format::detect("a b\n\tc d\n"), Format::Tsrg);
		assert_eq!(Format::detect("a b\na c d\n"), Format::Csrg);
		assert_eq!(Format::detect(""), Format::Csrg);
	}
}
