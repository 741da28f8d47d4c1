//! Reading of the tiny v2 format.
//!
//! A tiny v2 file starts with the header `tiny 2 0 <namespaces...>`, optionally followed by properties indented by
//! one tab. Classes are top level `c` lines, with their `f`ields, `m`ethods and `c`omments nested below them.
//! Parameters, local variables and sections not listed here are skipped together with everything nested in them.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use crate::lines::tiny_line::TinyLine;
use crate::lines::{Line, Section};
use crate::tiny::{self, TinyClass, TinyField, TinyMethod, TinyTree};

/// Opens and reads a tiny v2 file.
pub fn read_file(path: impl AsRef<Path>) -> Result<TinyTree> {
	read(File::open(&path)?)
		.with_context(|| anyhow!("failed to read {:?} as tiny v2 file", path.as_ref()))
}

#[allow(clippy::tabs_in_doc_comments)]
/// Reads a tiny v2 file.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// let string = "\
/// tiny	2	0	official	intermediary	named
/// c	a	class_1	Foo
/// 	c	A class.
/// 	f	La;	b	field_1	self
/// 	m	(La;)V	c	method_1	run
/// 		p	1		other
/// ";
///
/// let tree = quill::tiny_v2::read(string.as_bytes()).unwrap();
///
/// let named = tree.get_namespace("named").unwrap();
/// let class = tree.get_class("a").unwrap();
/// assert_eq!(class.name(named), "Foo");
/// assert_eq!(class.comment(), Some("A class."));
/// assert_eq!(class.fields()[0].name(named), "self");
/// assert_eq!(class.methods()[0].name(named), "run");
/// ```
pub fn read(reader: impl Read) -> Result<TinyTree> {
	let mut lines = BufReader::new(reader)
		.lines()
		.enumerate()
		.map(|(index, line)| -> Result<TinyLine> {
			Ok(TinyLine::new(index + 1, &line?))
		})
		.peekable();

	let mut header = lines.next().context("empty tiny v2 file")??;
	let major = header.field()?;
	let minor = header.field()?;
	if header.kind != "tiny" || (major.as_str(), minor.as_str()) != ("2", "0") {
		bail!("expected a `tiny 2 0` header, got {header:?}");
	}

	let mut tree = TinyTree::new(header.into_fields())
		.context("in the header")?;
	let count = tree.namespaces().len();

	let mut escaped_names = false;
	while let Some(property) = lines.next_if(|line| line.as_ref().is_ok_and(|line| line.indent() == 1)) {
		escaped_names |= property?.kind == "escaped-names";
	}

	let names = |line: TinyLine| -> Result<Vec<Option<String>>> {
		let names = line.names(count)?;
		if !escaped_names {
			return Ok(names);
		}
		names.into_iter()
			.map(|name| name.as_deref().map(unescape).transpose())
			.collect()
	};

	Section::top_level(&mut lines).each(|section, line| {
		if line.kind != "c" {
			return section.skip_children();
		}

		let class = tree.add_class(TinyClass::from_names(names(line)?)?)?;

		section.children().each(|section, mut line| match line.kind.as_str() {
			"c" => add_comment(class.comment_mut(), line),
			"f" => {
				let desc = line.field()?;
				let field = class.add_field(TinyField::new(desc, names(line)?)?);
				member_comment(section, field.comment_mut())
			},
			"m" => {
				let desc = line.field()?;
				let method = class.add_method(TinyMethod::new(desc, names(line)?)?);
				member_comment(section, method.comment_mut())
			},
			_ => section.skip_children(),
		})
	})?;

	if let Some(line) = lines.next() {
		bail!("unexpected line after the mappings: {line:?}");
	}

	Ok(tree)
}

/// Reads the lines nested in a field or method, keeping only the comment.
fn member_comment<I: Iterator<Item=Result<TinyLine>>>(section: &mut Section<'_, I>, comment: &mut Option<String>) -> Result<()> {
	section.children().each(|section, line| {
		if line.kind == "c" {
			add_comment(comment, line)
		} else {
			section.skip_children()
		}
	})
}

fn add_comment(target: &mut Option<String>, line: TinyLine) -> Result<()> {
	let comment = unescape(&line.last_field()?)?;
	tiny::set_comment(target, comment)
}

/// Resolves the escape sequences `\\`, `\n`, `\r`, `\t` and `\0`.
fn unescape(string: &str) -> Result<String> {
	if !string.contains('\\') {
		return Ok(string.to_owned());
	}

	let mut result = String::with_capacity(string.len());
	let mut chars = string.chars();
	while let Some(c) = chars.next() {
		if c == '\\' {
			result.push(match chars.next() {
				Some('\\') => '\\',
				Some('n') => '\n',
				Some('r') => '\r',
				Some('t') => '\t',
				Some('0') => '\0',
				Some(c) => bail!("unknown escape sequence `\\{c}` in {string:?}"),
				None => bail!("unfinished escape sequence at the end of {string:?}"),
			});
		} else {
			result.push(c);
		}
	}
	Ok(result)
}
