use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use anyhow::{bail, Error};
use crate::resolver::Resolver;

const DEFAULT_EXTENSION: &str = "jar";

/// Identifies one file in a maven repository.
///
/// Parsed from and printed as gradle dependency notation, `group:artifact:version[:classifier][@extension]`.
/// A missing extension means `jar`, and `jar` is never printed:
/// ```
/// use std::str::FromStr;
/// # use pretty_assertions::assert_eq;
/// use maven_dependency_resolver::coord::MavenCoord;
///
/// let mcp = MavenCoord::from_str("de.oceanlabs.mcp:mcp_snapshot:20210309-1.16.5@zip").unwrap();
/// assert_eq!(mcp.artifact, "mcp_snapshot");
/// assert_eq!(mcp.classifier, None);
/// assert_eq!(mcp.extension, "zip");
/// assert_eq!(mcp.to_string(), "de.oceanlabs.mcp:mcp_snapshot:20210309-1.16.5@zip");
///
/// let yarn = MavenCoord::from_str("net.fabricmc:yarn:1.16.5+build.5:v2@jar").unwrap();
/// assert_eq!(yarn.classifier.as_deref(), Some("v2"));
/// assert_eq!(yarn.to_string(), "net.fabricmc:yarn:1.16.5+build.5:v2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MavenCoord {
	pub group: String,
	pub artifact: String,
	pub version: String,
	pub classifier: Option<String>,
	pub extension: String,
}

impl MavenCoord {
	/// A plain `jar` artifact without a classifier.
	pub fn new(group: impl Into<String>, artifact: impl Into<String>, version: impl Into<String>) -> MavenCoord {
		MavenCoord {
			group: group.into(),
			artifact: artifact.into(),
			version: version.into(),
			classifier: None,
			extension: DEFAULT_EXTENSION.to_owned(),
		}
	}

	/// The file name of this artifact, like `yarn-1.16.5+build.5-v2.jar`.
	pub fn file_name(&self) -> String {
		match &self.classifier {
			Some(classifier) => format!("{}-{}-{classifier}.{}", self.artifact, self.version, self.extension),
			None => format!("{}-{}.{}", self.artifact, self.version, self.extension),
		}
	}

	fn segments(&self) -> impl Iterator<Item = Cow<str>> + '_ {
		self.group.split('.')
			.chain([self.artifact.as_str()])
			.map(Cow::Borrowed)
			.chain([self.directory_version(), Cow::Owned(self.file_name())])
	}

	/// The url of this artifact in the repository of `resolver`.
	pub fn make_url(&self, resolver: &Resolver) -> String {
		let mut url = resolver.maven.trim_end_matches('/').to_owned();
		for segment in self.segments() {
			url.push('/');
			url.push_str(&segment);
		}
		url
	}

	/// The path of this artifact relative to the root of a local repository.
	pub fn make_path(&self) -> PathBuf {
		self.segments().map(|segment| segment.into_owned()).collect()
	}

	/// The version used for the directory name. Timestamped snapshots live in the `-SNAPSHOT` directory.
	pub(crate) fn directory_version(&self) -> Cow<str> {
		match snapshot_base(&self.version) {
			Some(base) => Cow::Owned(format!("{base}-SNAPSHOT")),
			None => Cow::Borrowed(&self.version),
		}
	}
}

impl Display for MavenCoord {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}:{}", self.group, self.artifact, self.version)?;
		if let Some(classifier) = &self.classifier {
			write!(f, ":{classifier}")?;
		}
		if self.extension != DEFAULT_EXTENSION {
			write!(f, "@{}", self.extension)?;
		}
		Ok(())
	}
}

impl FromStr for MavenCoord {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (notation, extension) = s.split_once('@').unwrap_or((s, DEFAULT_EXTENSION));
		if extension.is_empty() {
			bail!("empty extension in {s:?}");
		}

		let parts: Vec<&str> = notation.split(':').collect();
		if parts.iter().any(|part| part.is_empty()) {
			bail!("empty part in dependency notation {s:?}");
		}

		let (group, artifact, version, classifier) = match parts[..] {
			[group, artifact, version] => (group, artifact, version, None),
			[group, artifact, version, classifier] => (group, artifact, version, Some(classifier)),
			_ => bail!("expected `group:artifact:version[:classifier][@extension]`, got {s:?}"),
		};

		Ok(MavenCoord {
			group: group.to_owned(),
			artifact: artifact.to_owned(),
			version: version.to_owned(),
			classifier: classifier.map(str::to_owned),
			extension: extension.to_owned(),
		})
	}
}

/// For a timestamped snapshot version `<base>-<yyyyMMdd>.<HHmmss>-<build number>`, returns `<base>`.
fn snapshot_base(version: &str) -> Option<&str> {
	fn digits(s: &str, len: Option<usize>) -> bool {
		!s.is_empty() && len.map_or(true, |len| s.len() == len) && s.bytes().all(|b| b.is_ascii_digit())
	}

	let (rest, build) = version.rsplit_once('-')?;
	let (base, timestamp) = rest.rsplit_once('-')?;
	let (date, time) = timestamp.split_once('.')?;

	(digits(build, None) && digits(date, Some(8)) && digits(time, Some(6))).then_some(base)
}

#[cfg(test)]
mod testing {
	use std::path::PathBuf;
	use std::str::FromStr;
	use pretty_assertions::assert_eq;
	use crate::coord::{snapshot_base, MavenCoord};
	use crate::resolver::Resolver;

	#[test]
	fn timestamped_snapshots() {
		assert_eq!(snapshot_base("0.5.1-20230713.025619-1"), Some("0.5.1"));
		assert_eq!(snapshot_base("1.16.5-pre-20240102.101112-345"), Some("1.16.5-pre"));

		for version in [
			"0.5.1",
			"0.5.1+build.77",
			"20210309-1.16.5",
			"0.5.1-20230713.025619-",
			"0.5.1-20230713.025619-b",
			"0.5.1-2023071.3025619-1",
			"0.5.1-20230713-025619-1",
			"0.5.1-20230713.02561x-1",
			"20230713.025619-1",
		] {
			assert_eq!(snapshot_base(version), None, "{version:?}");
		}
	}

	#[test]
	fn parse_failures() {
		for s in ["", "a", "a:b", "a:b:", ":b:c", "a::c", "a:b:c:d:e", "a:b:c:", "a:b:c@"] {
			assert!(MavenCoord::from_str(s).is_err(), "{s:?}");
		}
	}

	#[test]
	fn urls_and_paths() {
		let coord = MavenCoord::from_str("net.fabricmc:stitch:0.5.1+build.77:all").unwrap();
		let resolver = Resolver::new("Fabric", "https://maven.fabricmc.net");

		assert_eq!(coord.make_url(&resolver), "https://maven.fabricmc.net/net/fabricmc/stitch/0.5.1+build.77/stitch-0.5.1+build.77-all.jar");
		assert_eq!(coord.make_path(), ["net", "fabricmc", "stitch", "0.5.1+build.77", "stitch-0.5.1+build.77-all.jar"].iter().collect::<PathBuf>());

		let coord = MavenCoord::from_str("org.example:lib:1.0-20230713.025619-1@zip").unwrap();
		let resolver = Resolver::new("Example", "https://maven.example.org/");
		assert_eq!(coord.make_url(&resolver), "https://maven.example.org/org/example/lib/1.0-SNAPSHOT/lib-1.0-20230713.025619-1.zip");

		let client = MavenCoord::new("net.minecraft", "client", "1.16.5");
		assert_eq!(client.to_string(), "net.minecraft:client:1.16.5");
		assert_eq!(client.make_path(), ["net", "minecraft", "client", "1.16.5", "client-1.16.5.jar"].iter().collect::<PathBuf>());
	}
}
