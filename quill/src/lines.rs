use std::collections::VecDeque;
use std::fmt::Debug;
use std::iter::Peekable;
use anyhow::{anyhow, bail, Context, Result};

/// A line of a format where nesting is given by leading tabs.
pub(crate) trait Line: Debug {
	fn indent(&self) -> usize;
	fn number(&self) -> usize;
}

/// The lines of one nesting level.
///
/// Iterating ends at the first line indented less than this level. A line indented deeper is an error, unless
/// [`Section::children`] or [`Section::skip_children`] consumed it before.
pub(crate) struct Section<'a, I: Iterator> {
	indent: usize,
	lines: &'a mut Peekable<I>,
}

impl<'a, I, L> Section<'a, I>
where
	I: Iterator<Item=Result<L>>,
	L: Line,
{
	pub(crate) fn top_level(lines: &'a mut Peekable<I>) -> Section<'a, I> {
		Section { indent: 0, lines }
	}

	/// The lines nested directly below the line last given out.
	pub(crate) fn children(&mut self) -> Section<'_, I> {
		Section { indent: self.indent + 1, lines: self.lines }
	}

	pub(crate) fn skip_children(&mut self) -> Result<()> {
		self.children().each(|children, _| children.skip_children())
	}

	/// Calls `f` with every line of this level. `f` is responsible for the children of the line.
	pub(crate) fn each(mut self, mut f: impl FnMut(&mut Self, L) -> Result<()>) -> Result<()> {
		while let Some(line) = self.next().transpose()? {
			let number = line.number();
			f(&mut self, line)
				.with_context(|| anyhow!("in line {number}"))?;
		}
		Ok(())
	}
}

impl<I, L> Iterator for Section<'_, I>
where
	I: Iterator<Item=Result<L>>,
	L: Line,
{
	type Item = Result<L>;

	fn next(&mut self) -> Option<Self::Item> {
		let indent = match self.lines.peek()? {
			Ok(line) => line.indent(),
			Err(_) => return self.lines.next(),
		};
		if indent < self.indent {
			return None;
		}

		let line = self.lines.next()?;
		if indent > self.indent {
			return Some(line.and_then(|line| {
				Err(anyhow!("line {} is nested {indent} levels deep, expected {} levels: {line:?}", line.number(), self.indent))
			}));
		}
		Some(line)
	}
}

fn split_indent(line: &str) -> (usize, &str) {
	let rest = line.trim_start_matches('\t');
	(line.len() - rest.len(), rest)
}

pub(crate) mod tiny_line {
	use super::*;

	/// A line of the tiny formats, with tab separated fields.
	///
	/// The first field says what the line is about, like `c` for a class.
	#[derive(Debug)]
	pub(crate) struct TinyLine {
		number: usize,
		indent: usize,
		pub(crate) kind: String,
		fields: VecDeque<String>,
	}

	impl TinyLine {
		pub(crate) fn new(number: usize, line: &str) -> TinyLine {
			let (indent, rest) = split_indent(line);
			let mut fields: VecDeque<String> = rest.split('\t').map(str::to_owned).collect();
			let kind = fields.pop_front().unwrap_or_default();

			TinyLine { number, indent, kind, fields }
		}

		/// Takes the next field.
		pub(crate) fn field(&mut self) -> Result<String> {
			self.fields.pop_front()
				.with_context(|| anyhow!("missing a field in line {}: {:?}", self.number, self.kind))
		}

		/// Takes the next field, which must be the last one.
		pub(crate) fn last_field(mut self) -> Result<String> {
			let field = self.field()?;
			if !self.fields.is_empty() {
				bail!("too many fields in line {}: {:?}", self.number, self.fields);
			}
			Ok(field)
		}

		/// Takes the remaining `count` fields, an empty one is `None`.
		pub(crate) fn names(self, count: usize) -> Result<Vec<Option<String>>> {
			if self.fields.len() != count {
				bail!("expected {count} names in line {}, got {}: {:?}", self.number, self.fields.len(), self.fields);
			}
			Ok(self.fields.into_iter()
				.map(|name| Some(name).filter(|name| !name.is_empty()))
				.collect())
		}

		pub(crate) fn into_fields(self) -> Vec<String> {
			self.fields.into()
		}
	}

	impl Line for TinyLine {
		fn indent(&self) -> usize {
			self.indent
		}
		fn number(&self) -> usize {
			self.number
		}
	}
}

pub(crate) mod tsrg_line {
	use super::*;

	/// A line of the tsrg formats: tab indented, with space separated words.
	#[derive(Debug)]
	pub(crate) struct TsrgLine {
		number: usize,
		indent: usize,
		pub(crate) words: Vec<String>,
	}

	impl TsrgLine {
		pub(crate) fn new(number: usize, line: &str) -> TsrgLine {
			let (indent, rest) = split_indent(line);
			let words = rest.split_whitespace().map(str::to_owned).collect();
			TsrgLine { number, indent, words }
		}
	}

	impl Line for TsrgLine {
		fn indent(&self) -> usize {
			self.indent
		}
		fn number(&self) -> usize {
			self.number
		}
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use anyhow::Result;
	use crate::lines::Section;
	use crate::lines::tiny_line::TinyLine;

	fn lines(string: &str) -> Vec<Result<TinyLine>> {
		string.lines().enumerate().map(|(i, line)| Ok(TinyLine::new(i + 1, line))).collect()
	}

	#[test]
	fn nesting() -> Result<()> {
		let mut lines = lines("a\n\tb\n\t\tc\n\td\ne").into_iter().peekable();

		let mut seen = Vec::new();
		Section::top_level(&mut lines).each(|section, line| {
			seen.push(line.kind);
			section.children().each(|section, line| {
				seen.push(line.kind);
				section.skip_children()
			})
		})?;

		assert_eq!(seen, ["a", "b", "d", "e"]);
		Ok(())
	}

	#[test]
	fn unexpected_nesting() {
		let mut lines = lines("a\n\t\tb").into_iter().peekable();

		let result = Section::top_level(&mut lines).each(|section, _| section.children().each(|_, _| Ok(())));
		assert!(result.is_err());
	}

	#[test]
	fn fields() -> Result<()> {
		let mut line = TinyLine::new(3, "\t\tf\tI\ta\t\tc");
		assert_eq!(line.kind, "f");
		assert_eq!(line.field()?, "I");
		assert_eq!(line.names(3)?, [Some("a".to_owned()), None, Some("c".to_owned())]);

		assert!(TinyLine::new(1, "c\tone\ttwo").last_field().is_err());
		assert!(TinyLine::new(1, "c\ta\tb").names(3).is_err());
		Ok(())
	}
}
