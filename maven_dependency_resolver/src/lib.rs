//! Resolution of maven artifacts into a local repository.
//!
//! An artifact is given by a [`MavenCoord`], and looked up first in the local repository directory, and then in the
//! given repositories, in order. The first repository that has the artifact wins, and the downloaded artifact is
//! stored in the local repository, so that the next resolution doesn't need any network access.

pub mod coord;
pub mod resolver;

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use log::{debug, trace};
use crate::coord::MavenCoord;
use crate::resolver::Resolver;

/// Something that can fetch the content behind a url.
pub trait Downloader {
	/// Fetches the content behind the url. Gives back `Ok(None)` if there's nothing there.
	fn download(&self, url: &str) -> Result<Option<Vec<u8>>>;
}

impl<D: Downloader + ?Sized> Downloader for &D {
	fn download(&self, url: &str) -> Result<Option<Vec<u8>>> {
		(**self).download(url)
	}
}

/// Resolves the given artifact to a file in the local repository, downloading it if needed.
///
/// The returned path is `local_repository` joined with [`MavenCoord::make_path`].
pub fn resolve(downloader: &impl Downloader, resolvers: &[Resolver<'_>], local_repository: &Path, coord: &MavenCoord) -> Result<PathBuf> {
	let path = local_repository.join(coord.make_path());

	if path.is_file() {
		trace!("found {coord} in the local repository at {path:?}");
		return Ok(path);
	}

	let (resolver, bytes) = resolver::try_resolvers(
		resolvers,
		|resolver| coord.make_url(resolver),
		|url| downloader.download(url),
	).with_context(|| anyhow!("failed to resolve {coord}"))?;

	debug!("downloaded {coord} from {:?}", resolver.name);

	store(&path, &bytes)?;
	Ok(path)
}

/// Writes the content to `<path>.part` and then renames that to `path`. Missing parent directories are created.
pub fn store(path: &Path, content: &[u8]) -> Result<()> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)
			.with_context(|| anyhow!("failed to create directory {parent:?}"))?;
	}

	let mut partial = path.as_os_str().to_owned();
	partial.push(".part");
	let partial = PathBuf::from(partial);

	fs::write(&partial, content)
		.with_context(|| anyhow!("failed to write {partial:?}"))?;
	fs::rename(&partial, path)
		.with_context(|| anyhow!("failed to move {partial:?} to {path:?}"))?;

	Ok(())
}

#[cfg(test)]
mod testing {
	use std::cell::RefCell;
	use std::fs;
	use std::str::FromStr;
	use anyhow::Result;
	use fake::FakeDownloader;
	use pretty_assertions::assert_eq;
	use crate::coord::MavenCoord;
	use crate::resolver::Resolver;

	mod fake {
		use std::cell::RefCell;
		use std::collections::HashMap;
		use anyhow::Result;
		use crate::Downloader;

		pub(super) struct FakeDownloader {
			pub(super) files: HashMap<String, Vec<u8>>,
			pub(super) requests: RefCell<Vec<String>>,
		}

		impl Downloader for FakeDownloader {
			fn download(&self, url: &str) -> Result<Option<Vec<u8>>> {
				self.requests.borrow_mut().push(url.to_owned());
				Ok(self.files.get(url).cloned())
			}
		}
	}

	static RESOLVERS: [Resolver<'static>; 2] = [
		Resolver::new("Forge", "https://maven.minecraftforge.net/"),
		Resolver::new("Fabric", "https://maven.fabricmc.net/"),
	];

	#[test]
	fn download_then_local() -> Result<()> {
		let coord = MavenCoord::from_str("net.fabricmc:yarn:1.16.5+build.5:v2")?;
		let url = "https://maven.fabricmc.net/net/fabricmc/yarn/1.16.5+build.5/yarn-1.16.5+build.5-v2.jar";

		let downloader = FakeDownloader {
			files: [(url.to_owned(), b"content".to_vec())].into_iter().collect(),
			requests: RefCell::new(Vec::new()),
		};
		let local = tempfile::tempdir()?;

		let path = crate::resolve(&downloader, &RESOLVERS, local.path(), &coord)?;
		assert_eq!(path, local.path().join(coord.make_path()));
		assert_eq!(fs::read(&path)?, b"content");
		assert_eq!(downloader.requests.borrow().len(), 2);

		let again = crate::resolve(&downloader, &RESOLVERS, local.path(), &coord)?;
		assert_eq!(again, path);
		assert_eq!(downloader.requests.borrow().len(), 2);

		// no partial file stays around
		let entries = fs::read_dir(path.parent().unwrap())?.count();
		assert_eq!(entries, 1);

		Ok(())
	}

	#[test]
	fn missing_everywhere() -> Result<()> {
		let coord = MavenCoord::from_str("de.oceanlabs.mcp:mcp_snapshot:20210309-1.16.5@zip")?;
		let downloader = FakeDownloader {
			files: Default::default(),
			requests: RefCell::new(Vec::new()),
		};
		let local = tempfile::tempdir()?;

		let error = crate::resolve(&downloader, &RESOLVERS, local.path(), &coord).unwrap_err();
		assert!(error.to_string().contains("de.oceanlabs.mcp:mcp_snapshot:20210309-1.16.5@zip"), "{error:?}");
		assert!(!local.path().join(coord.make_path()).exists());

		Ok(())
	}
}
