use std::borrow::Cow;
use anyhow::{anyhow, Context, Result};
use log::trace;

/// A remote maven repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolver<'a> {
	/// Used in log and error messages.
	pub name: Cow<'a, str>,
	/// The root url, with or without a trailing `/`.
	pub maven: Cow<'a, str>,
}

impl<'a> Resolver<'a> {
	pub const fn new(name: &'a str, maven: &'a str) -> Resolver<'a> {
		Resolver { name: Cow::Borrowed(name), maven: Cow::Borrowed(maven) }
	}
}

/// Asks the repositories in order, giving back the first hit together with the repository that had it.
///
/// A failing download ends the search.
pub(crate) fn try_resolvers<'a, 'b, T>(
	resolvers: &'a [Resolver<'b>],
	url_of: impl Fn(&Resolver) -> String,
	download: impl Fn(&str) -> Result<Option<T>>,
) -> Result<(&'a Resolver<'b>, T)> {
	for resolver in resolvers {
		let url = url_of(resolver);
		trace!("looking for {url:?} in {}", resolver.name);

		let found = download(&url)
			.with_context(|| anyhow!("failed to download {url:?} from {}", resolver.name))?;
		if let Some(found) = found {
			return Ok((resolver, found));
		}
	}
	Err(anyhow!("not found in any of the {} repositories", resolvers.len()))
}

#[cfg(test)]
mod testing {
	use anyhow::bail;
	use pretty_assertions::assert_eq;
	use crate::resolver::{try_resolvers, Resolver};

	static RESOLVERS: [Resolver<'static>; 3] = [
		Resolver::new("first", "https://first.example.org"),
		Resolver::new("second", "https://second.example.org/"),
		Resolver::new("third", "https://third.example.org"),
	];

	#[test]
	fn first_hit_wins() {
		let (resolver, value) = try_resolvers(
			&RESOLVERS,
			|resolver| resolver.maven.to_string(),
			|url| Ok(url.contains("first").then_some(1).or(url.contains("second").then_some(2))),
		).unwrap();

		assert_eq!(resolver.name, "first");
		assert_eq!(value, 1);

		let (resolver, value) = try_resolvers(
			&RESOLVERS,
			|resolver| resolver.maven.to_string(),
			|url| Ok(url.contains("second").then_some(2).or(url.contains("third").then_some(3))),
		).unwrap();

		assert_eq!(resolver.name, "second");
		assert_eq!(value, 2);
	}

	#[test]
	fn errors_and_misses() {
		let result = try_resolvers(&RESOLVERS, |resolver| resolver.maven.to_string(), |_| Ok(None::<()>));
		assert!(result.is_err());

		let result = try_resolvers(&RESOLVERS, |resolver| resolver.maven.to_string(), |url| -> anyhow::Result<Option<()>> {
			if url.contains("first") {
				bail!("connection refused")
			}
			Ok(Some(()))
		});
		assert!(result.is_err());
	}
}
