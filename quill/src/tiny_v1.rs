//! Functions to read mappings in the "Tiny v1" format.
//!
//! A tiny v1 file starts with a header `v1` followed by the namespaces, and then has one line per class, field or
//! method. Fields and methods name their owner class in the first namespace, and carry a descriptor in the first
//! namespace. Lines starting with `#` carry metadata and are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use crate::lines::Line;
use crate::lines::tiny_line::TinyLine;
use crate::tiny::{TinyField, TinyMethod, TinyTree};

/// Reads a tiny v1 file, by opening the file given by the path.
pub fn read_file(path: impl AsRef<Path>) -> Result<TinyTree> {
	read(File::open(&path)?)
		.with_context(|| anyhow!("failed to read mappings file {:?} as tiny v1 file", path.as_ref()))
}

#[allow(clippy::tabs_in_doc_comments)]
/// Reads the tiny v1 format, from the given reader.
///
/// ```
/// let string = "\
/// v1	official	named
/// CLASS	a	Foo
/// FIELD	a	La;	b	self
/// METHOD	a	(I)V	c	run
/// ";
///
/// let tree = quill::tiny_v1::read(string.as_bytes()).unwrap();
/// let named = tree.get_namespace("named").unwrap();
///
/// let class = tree.get_class("a").unwrap();
/// assert_eq!(class.name(named), "Foo");
/// assert_eq!(class.fields()[0].name(named), "self");
/// assert_eq!(tree.map_descriptor(class.fields()[0].descriptor(), named).unwrap(), "LFoo;");
/// ```
pub fn read(reader: impl Read) -> Result<TinyTree> {
	let mut lines = BufReader::new(reader)
		.lines()
		.enumerate()
		.map(|(line_number, line)| -> Result<TinyLine> {
			Ok(TinyLine::new(line_number + 1, &line?))
		});

	let header = lines.next().context("no header line")??;
	if header.kind != "v1" {
		bail!("header version isn't tiny v1, in line {header:?}");
	}

	let namespaces = header.into_fields();
	let count = namespaces.len();
	let mut tree = TinyTree::new(namespaces)?;

	for line in lines {
		let mut line = line?;
		let line_number = line.number();

		if line.indent() != 0 {
			bail!("tiny v1 lines must not be indented, in line {line_number}: {line:?}");
		}

		match line.kind.as_str() {
			"CLASS" => {
				let names = line.names(count)?;
				let name = names.first()
					.and_then(|name| name.as_deref())
					.with_context(|| anyhow!("no class name in the first namespace, in line {line_number}"))?
					.to_owned();

				tree.get_or_create_class(&name)
					.set_names(names)
					.with_context(|| anyhow!("in line {line_number}"))?;
			},
			"FIELD" => {
				let owner = line.field()?;
				let desc = line.field()?;
				let field = TinyField::new(desc, line.names(count)?)
					.with_context(|| anyhow!("in line {line_number}"))?;

				tree.get_or_create_class(&owner).add_field(field);
			},
			"METHOD" => {
				let owner = line.field()?;
				let desc = line.field()?;
				let method = TinyMethod::new(desc, line.names(count)?)
					.with_context(|| anyhow!("in line {line_number}"))?;

				tree.get_or_create_class(&owner).add_method(method);
			},
			first if first.is_empty() || first.starts_with('#') => {},
			first => bail!("unknown line type {first:?} in line {line_number}"),
		}
	}

	Ok(tree)
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;

	#[test]
	fn empty_names_fall_back() {
		let string = "v1\tofficial\tintermediary\tnamed\n\
			# INTERMEDIARY-COUNTER class 2\n\
			CLASS\ta\tclass_1\t\n\
			FIELD\ta\tI\tb\tfield_1\t\n\
			\n";

		let tree = crate::tiny_v1::read(string.as_bytes()).unwrap();
		let named = tree.get_namespace("named").unwrap();

		let class = tree.get_class("a").unwrap();
		assert_eq!(class.name(named), "a");
		assert_eq!(class.fields()[0].name(named), "b");
	}

	#[test]
	fn members_before_class() {
		let string = "v1\tofficial\tnamed\n\
			METHOD\ta\t()V\tb\trun\n\
			CLASS\ta\tFoo\n";

		let tree = crate::tiny_v1::read(string.as_bytes()).unwrap();
		let named = tree.get_namespace("named").unwrap();

		let class = tree.get_class("a").unwrap();
		assert_eq!(class.name(named), "Foo");
		assert_eq!(class.methods()[0].name(named), "run");
	}

	#[test]
	fn errors() {
		assert!(crate::tiny_v1::read("".as_bytes()).is_err());
		assert!(crate::tiny_v1::read("v2\ta\tb\n".as_bytes()).is_err());
		assert!(crate::tiny_v1::read("v1\ta\n".as_bytes()).is_err());
		assert!(crate::tiny_v1::read("v1\ta\tb\nCLASS\ta\n".as_bytes()).is_err());
		assert!(crate::tiny_v1::read("v1\ta\tb\nFIELD\ta\tV\tb\tc\n".as_bytes()).is_err());
		assert!(crate::tiny_v1::read("v1\ta\tb\nPACKAGE\ta\tb\n".as_bytes()).is_err());
	}
}
