use std::path::PathBuf;
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};
use maven_dependency_resolver::coord::MavenCoord;
use maven_dependency_resolver::Downloader;
use serde::de::DeserializeOwned;
use crate::config::Config;
use crate::download::version_manifest::{VersionDetails, VersionManifest};
use crate::task::BuildContext;

/// A configured project, resolving artifacts with a [`Downloader`].
#[derive(Debug)]
pub struct Project<D> {
	config: Config,
	downloader: D,
}

impl<D: Downloader> Project<D> {
	pub fn new(config: Config, downloader: D) -> Project<D> {
		Project { config, downloader }
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	fn download_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
		let bytes = self.downloader.download(url)?
			.with_context(|| anyhow!("nothing found at {url:?}"))?;
		serde_json::from_slice(&bytes)
			.with_context(|| anyhow!("failed to parse json from {url:?}"))
	}

	fn client_path(&self, version: &str) -> PathBuf {
		let coord = MavenCoord::new("net.minecraft", "client", version);
		self.config.local_repository.join(coord.make_path())
	}
}

impl<D: Downloader> BuildContext for Project<D> {
	fn mcp_mappings(&self) -> Result<String> {
		Ok(self.config.mcp_mappings()?.to_owned())
	}

	fn resolve(&self, coord: &MavenCoord) -> Result<PathBuf> {
		maven_dependency_resolver::resolve(&self.downloader, &self.config.resolvers(), &self.config.local_repository, coord)
	}

	/// Downloads the client jar using the version manifest, storing it in the local repository as
	/// `net.minecraft:client:<version>`.
	fn minecraft_client(&self, version: &str) -> Result<PathBuf> {
		let path = self.client_path(version);
		if path.is_file() {
			debug!("found the client jar of {version} at {path:?}");
			return Ok(path);
		}

		let manifest: VersionManifest = self.download_json(&self.config.version_manifest)?;
		debug!("the latest release is {}", manifest.latest.release);

		let version_info = manifest.versions.iter()
			.find(|version_info| version_info.id == version)
			.with_context(|| anyhow!("no minecraft version {version:?} in the version manifest"))?;

		let details: VersionDetails = self.download_json(&version_info.url)?;
		let client = &details.downloads.client;

		info!("downloading the client jar of {version}");
		let bytes = self.downloader.download(&client.url)?
			.with_context(|| anyhow!("no client jar found at {:?}", client.url))?;
		if bytes.len() != client.size {
			bail!("expected the client jar from {:?} to be {} bytes, got {} bytes", client.url, client.size, bytes.len());
		}

		maven_dependency_resolver::store(&path, &bytes)?;
		Ok(path)
	}
}

#[cfg(test)]
mod testing {
	use std::cell::RefCell;
	use std::collections::HashMap;
	use anyhow::Result;
	use maven_dependency_resolver::Downloader;
	use pretty_assertions::assert_eq;
	use crate::config::Config;
	use crate::project::Project;
	use crate::task::BuildContext;

	struct FakeDownloader {
		files: HashMap<&'static str, Vec<u8>>,
		requests: RefCell<usize>,
	}

	impl Downloader for FakeDownloader {
		fn download(&self, url: &str) -> Result<Option<Vec<u8>>> {
			*self.requests.borrow_mut() += 1;
			Ok(self.files.get(url).cloned())
		}
	}

	const MANIFEST: &str = r#"{
		"latest": { "release": "1.16.5" },
		"versions": [ { "id": "1.16.5", "url": "https://meta.example.org/1.16.5.json" } ]
	}"#;
	const DETAILS: &str = r#"{
		"downloads": { "client": { "size": 6, "url": "https://data.example.org/client.jar" } }
	}"#;

	fn project(files: HashMap<&'static str, Vec<u8>>, local: &std::path::Path) -> Project<FakeDownloader> {
		let config = Config {
			local_repository: local.to_owned(),
			version_manifest: "https://meta.example.org/manifest.json".to_owned(),
			..Config::default()
		};
		Project::new(config, FakeDownloader { files, requests: RefCell::new(0) })
	}

	#[test]
	fn minecraft_client() -> Result<()> {
		let local = tempfile::tempdir()?;
		let project = project([
			("https://meta.example.org/manifest.json", MANIFEST.as_bytes().to_vec()),
			("https://meta.example.org/1.16.5.json", DETAILS.as_bytes().to_vec()),
			("https://data.example.org/client.jar", b"client".to_vec()),
		].into_iter().collect(), local.path());

		let path = project.minecraft_client("1.16.5")?;
		assert_eq!(path, local.path().join("net/minecraft/client/1.16.5/client-1.16.5.jar"));
		assert_eq!(std::fs::read(&path)?, b"client");
		assert_eq!(*project.downloader.requests.borrow(), 3);

		// now it's in the local repository
		assert_eq!(project.minecraft_client("1.16.5")?, path);
		assert_eq!(*project.downloader.requests.borrow(), 3);

		assert!(project.minecraft_client("1.2.5").is_err());

		Ok(())
	}

	#[test]
	fn size_mismatch() -> Result<()> {
		let local = tempfile::tempdir()?;
		let project = project([
			("https://meta.example.org/manifest.json", MANIFEST.as_bytes().to_vec()),
			("https://meta.example.org/1.16.5.json", DETAILS.as_bytes().to_vec()),
			("https://data.example.org/client.jar", b"broken client".to_vec()),
		].into_iter().collect(), local.path());

		assert!(project.minecraft_client("1.16.5").is_err());
		assert!(!local.path().join("net/minecraft/client/1.16.5/client-1.16.5.jar").exists());

		Ok(())
	}

	#[test]
	fn mcp_mappings_from_config() {
		let local = std::path::Path::new("unused");
		let project = project(HashMap::new(), local);

		let error = project.mcp_mappings().unwrap_err();
		assert!(error.downcast_ref::<crate::error::BridgeError>().is_some(), "{error:?}");
	}
}
