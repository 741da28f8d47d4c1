//! Checking and remapping of java type descriptors.
//!
//! A field descriptor is a single field type, like `I`, `[J` or `Ljava/lang/Object;`. A method descriptor is a list
//! of field types in parentheses, followed by a field type or `V`, like `(ILjava/lang/String;)V`.
//!
//! Remapping only ever touches the class names inside `L...;`, everything else is copied over.

use std::iter::Peekable;
use std::str::Chars;
use anyhow::{anyhow, bail, Context, Result};

/// Checks that the given string is a valid field descriptor.
///
/// ```
/// assert!(quill::descriptor::check_field_descriptor("[[Ljava/lang/Object;").is_ok());
/// assert!(quill::descriptor::check_field_descriptor("V").is_err());
/// assert!(quill::descriptor::check_field_descriptor("L;").is_err());
/// ```
pub fn check_field_descriptor(desc: &str) -> Result<()> {
	let mut chars = desc.chars().peekable();
	read_field_type(&mut chars)
		.and_then(|()| expect_end(&mut chars))
		.with_context(|| anyhow!("invalid field descriptor {desc:?}"))
}

/// Checks that the given string is a valid method descriptor.
///
/// ```
/// assert!(quill::descriptor::check_method_descriptor("(I[JLa;)V").is_ok());
/// assert!(quill::descriptor::check_method_descriptor("()La;").is_ok());
/// assert!(quill::descriptor::check_method_descriptor("(V)V").is_err());
/// assert!(quill::descriptor::check_method_descriptor("I").is_err());
/// ```
pub fn check_method_descriptor(desc: &str) -> Result<()> {
	let mut chars = desc.chars().peekable();
	read_method(&mut chars)
		.and_then(|()| expect_end(&mut chars))
		.with_context(|| anyhow!("invalid method descriptor {desc:?}"))
}

fn read_method(chars: &mut Peekable<Chars>) -> Result<()> {
	if chars.next() != Some('(') {
		bail!("method descriptor must start with `(`");
	}
	while chars.next_if_eq(&')').is_none() {
		read_field_type(chars)?;
	}
	if chars.next_if_eq(&'V').is_some() {
		Ok(())
	} else {
		read_field_type(chars)
	}
}

fn read_field_type(chars: &mut Peekable<Chars>) -> Result<()> {
	let mut dimensions = 0usize;
	while chars.next_if_eq(&'[').is_some() {
		dimensions += 1;
	}
	if dimensions > 255 {
		bail!("array type with more than 255 dimensions");
	}

	match chars.next() {
		Some('B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z') => Ok(()),
		Some('L') => {
			let mut empty = true;
			loop {
				match chars.next() {
					Some(';') => break,
					Some(c @ ('.' | '[')) => bail!("illegal character {c:?} in class name"),
					Some(_) => empty = false,
					None => bail!("unexpected end of descriptor inside a class name"),
				}
			}
			if empty {
				bail!("empty class name");
			}
			Ok(())
		},
		Some(c) => bail!("unexpected character {c:?}"),
		None => bail!("unexpected end of descriptor"),
	}
}

fn expect_end(chars: &mut Peekable<Chars>) -> Result<()> {
	match chars.next() {
		None => Ok(()),
		Some(c) => bail!("unexpected trailing character {c:?}"),
	}
}

/// Rewrites every class name of a descriptor using the given function.
///
/// This works for both field and method descriptors. The descriptor isn't checked, use
/// [`check_field_descriptor`] or [`check_method_descriptor`] for that. Only an unterminated class name is an error.
///
/// ```
/// let desc = quill::descriptor::map_descriptor("(La;I[Lb;)Lc;", |class| class.to_uppercase()).unwrap();
/// assert_eq!(desc, "(LA;I[LB;)LC;");
/// ```
pub fn map_descriptor(desc: &str, mut map_class: impl FnMut(&str) -> String) -> Result<String> {
	let mut result = String::with_capacity(desc.len());
	let mut rest = desc;

	while let Some(start) = rest.find('L') {
		let (before, class_start) = rest.split_at(start + 1);
		result.push_str(before);

		let end = class_start.find(';')
			.with_context(|| anyhow!("unterminated class name in descriptor {desc:?}"))?;

		result.push_str(&map_class(&class_start[..end]));
		result.push(';');

		rest = &class_start[end + 1..];
	}
	result.push_str(rest);

	Ok(result)
}
