//! The configuration file, `yarnforge.json`.
//!
//! All keys are optional. A minimal file only configures the MCP mappings:
//! ```json
//! { "minecraft": { "mappings": "snapshot_20210309-1.16.5" } }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use log::debug;
use maven_dependency_resolver::resolver::Resolver;
use serde::Deserialize;
use crate::download::version_manifest::VERSION_MANIFEST;
use crate::error::BridgeError;

pub const DEFAULT_CONFIG_FILE: &str = "yarnforge.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Where artifacts are stored, in the maven repository layout.
	pub local_repository: PathBuf,
	/// Where the scratch files go. If unset, the temporary directory of the system is used.
	pub scratch_directory: Option<PathBuf>,
	/// The maven repositories to try, in order.
	pub repositories: Vec<Repository>,
	pub version_manifest: String,
	/// The dependency notation of the stitch jar.
	pub stitch: String,
	/// The java command to use. If unset, `JAVA_HOME` is tried, and then just `java`.
	pub java: Option<PathBuf>,
	pub minecraft: Option<MinecraftExtension>,
	/// The configuration of the `clean` project, which is used if `minecraft` isn't set.
	pub clean: Option<ProjectConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Repository {
	pub name: String,
	pub url: String,
}

impl Repository {
	fn new(name: &str, url: &str) -> Repository {
		Repository { name: name.to_owned(), url: url.to_owned() }
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MinecraftExtension {
	/// The MCP mappings identifier, like `snapshot_20210309-1.16.5`.
	pub mappings: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
	pub minecraft: Option<MinecraftExtension>,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			local_repository: PathBuf::from(".yarnforge").join("repository"),
			scratch_directory: None,
			repositories: vec![
				Repository::new("Forge", "https://maven.minecraftforge.net/"),
				Repository::new("Fabric", "https://maven.fabricmc.net/"),
				Repository::new("Maven Central", "https://repo.maven.apache.org/maven2/"),
			],
			version_manifest: VERSION_MANIFEST.to_owned(),
			stitch: "net.fabricmc:stitch:0.5.1+build.77:all".to_owned(),
			java: None,
			minecraft: None,
			clean: None,
		}
	}
}

impl Config {
	/// Reads the configuration from the given file.
	///
	/// Without a file given, [`DEFAULT_CONFIG_FILE`] is read if it exists, and the default configuration is used
	/// otherwise.
	pub fn load(path: Option<&Path>) -> Result<Config> {
		match path {
			Some(path) => Config::read_file(path),
			None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Config::read_file(Path::new(DEFAULT_CONFIG_FILE)),
			None => {
				debug!("no {DEFAULT_CONFIG_FILE:?} found, using the default configuration");
				Ok(Config::default())
			},
		}
	}

	fn read_file(path: &Path) -> Result<Config> {
		debug!("reading configuration from {path:?}");
		let file = File::open(path)
			.with_context(|| anyhow!("failed to open configuration file {path:?}"))?;
		serde_json::from_reader(BufReader::new(file))
			.with_context(|| anyhow!("failed to parse configuration file {path:?}"))
	}

	/// The MCP mappings identifier of the project, falling back to the one of the `clean` project.
	pub fn mcp_mappings(&self) -> Result<&str, BridgeError> {
		self.minecraft.as_ref()
			.or_else(|| self.clean.as_ref().and_then(|clean| clean.minecraft.as_ref()))
			.map(|minecraft| minecraft.mappings.as_str())
			.ok_or(BridgeError::MissingExtension)
	}

	pub fn resolvers(&self) -> Vec<Resolver<'_>> {
		self.repositories.iter()
			.map(|repository| Resolver::new(&repository.name, &repository.url))
			.collect()
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::config::{Config, MinecraftExtension, ProjectConfig};
	use crate::error::BridgeError;

	#[test]
	fn defaults_for_missing_keys() -> Result<()> {
		let config: Config = serde_json::from_str(r#"{ "minecraft": { "mappings": "snapshot_20210309-1.16.5" } }"#)?;

		assert_eq!(config.mcp_mappings()?, "snapshot_20210309-1.16.5");
		assert_eq!(config.resolvers().len(), 3);
		assert_eq!(config.stitch, Config::default().stitch);
		assert_eq!(config.local_repository, Config::default().local_repository);

		Ok(())
	}

	#[test]
	fn clean_project_fallback() -> Result<()> {
		let config: Config = serde_json::from_str(r#"{
			"repositories": [ { "name": "Local", "url": "http://localhost:8080/" } ],
			"clean": { "minecraft": { "mappings": "stable_65-1.16.5" } }
		}"#)?;

		assert_eq!(config.mcp_mappings()?, "stable_65-1.16.5");
		assert_eq!(config.resolvers().len(), 1);
		assert_eq!(config.resolvers()[0].name, "Local");

		let config = Config {
			minecraft: Some(MinecraftExtension { mappings: "snapshot_20210309".to_owned() }),
			clean: Some(ProjectConfig { minecraft: Some(MinecraftExtension { mappings: "stable_65".to_owned() }) }),
			..Config::default()
		};
		assert_eq!(config.mcp_mappings()?, "snapshot_20210309");

		Ok(())
	}

	#[test]
	fn missing_extension() {
		let config = Config {
			clean: Some(ProjectConfig::default()),
			..Config::default()
		};
		assert!(matches!(config.mcp_mappings(), Err(BridgeError::MissingExtension)));
	}

	#[test]
	fn load_file() -> Result<()> {
		let dir = tempfile::tempdir()?;
		let path = dir.path().join("config.json");
		std::fs::write(&path, r#"{ "java": "/opt/jdk/bin/java", "scratch_directory": "scratch" }"#)?;

		let config = Config::load(Some(&path))?;
		assert_eq!(config.java, Some("/opt/jdk/bin/java".into()));
		assert_eq!(config.scratch_directory, Some("scratch".into()));
		assert!(matches!(config.mcp_mappings(), Err(BridgeError::MissingExtension)));

		std::fs::write(&path, "{ not json")?;
		assert!(Config::load(Some(&path)).is_err());

		Ok(())
	}
}
