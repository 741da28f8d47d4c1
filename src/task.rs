//! The task composing the MCP and Yarn mappings into one mapping set.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use maven_dependency_resolver::coord::MavenCoord;
use quill::mcp::McpNames;
use quill::tiny::TinyTree;
use quill::tree::mappings::MappingSet;
use tempfile::{Builder, TempPath};
use zip::ZipArchive;
use crate::bridge;
use crate::error::BridgeError;
use crate::mcp::McpMappingsVersion;
use crate::proposer::FieldNameProposer;

/// The namespace of the Yarn mappings holding the official names.
pub const OFFICIAL: &str = "official";
/// The namespace of the Yarn mappings holding the community names.
pub const NAMED: &str = "named";

const MAPPINGS_ENTRY: &str = "mappings/mappings.tiny";

/// What the task needs from the surrounding build.
pub trait BuildContext {
	/// The MCP mappings identifier configured for the project, like `snapshot_20210309-1.16.5`.
	fn mcp_mappings(&self) -> Result<String>;

	/// Resolves an artifact to a local file.
	fn resolve(&self, coord: &MavenCoord) -> Result<PathBuf>;

	/// Gives the client jar of the given minecraft version.
	fn minecraft_client(&self, version: &str) -> Result<PathBuf>;
}

impl<C: BuildContext + ?Sized> BuildContext for &C {
	fn mcp_mappings(&self) -> Result<String> {
		(**self).mcp_mappings()
	}

	fn resolve(&self, coord: &MavenCoord) -> Result<PathBuf> {
		(**self).resolve(coord)
	}

	fn minecraft_client(&self, version: &str) -> Result<PathBuf> {
		(**self).minecraft_client(version)
	}
}

/// Composes the mappings from MCP names to Yarn names for one minecraft version.
///
/// The SRG file is only located when the task runs, by calling `srg`.
pub struct RemappingTask<S> {
	version: String,
	mappings: MavenCoord,
	srg: S,
	scratch_directory: PathBuf,
}

impl<S: Fn() -> Result<PathBuf>> RemappingTask<S> {
	/// Creates a new task for the minecraft version, using the Yarn mappings artifact given.
	///
	/// Scratch files are put into the temporary directory of the system, unless
	/// [`RemappingTask::with_scratch_directory`] is used.
	pub fn new(version: impl Into<String>, mappings: MavenCoord, srg: S) -> RemappingTask<S> {
		RemappingTask {
			version: version.into(),
			mappings,
			srg,
			scratch_directory: std::env::temp_dir(),
		}
	}

	pub fn with_scratch_directory(mut self, scratch_directory: impl Into<PathBuf>) -> RemappingTask<S> {
		self.scratch_directory = scratch_directory.into();
		self
	}

	pub fn version(&self) -> &str {
		&self.version
	}

	pub fn mappings(&self) -> &MavenCoord {
		&self.mappings
	}

	/// Creates the mappings from the MCP names to the Yarn names.
	///
	/// The returned set is keyed by the MCP names. This loads the official to SRG mappings and the MCP names, as well
	/// as the Yarn mappings, after running the field name proposer on them. The first set is then reversed, and merged
	/// with the second one.
	pub fn create_mcp_to_yarn(&self, context: &impl BuildContext, proposer: &impl FieldNameProposer) -> Result<MappingSet> {
		let official_to_mcp = self.official_to_mcp(context)
			.context("failed to load the mcp mappings")?;
		let official_to_yarn = self.official_to_yarn(context, proposer)
			.context("failed to load the yarn mappings")?;

		let mcp_to_official = official_to_mcp.reverse()?;
		let mcp_to_yarn = mcp_to_official.merge(&official_to_yarn)?;

		info!("composed mcp to yarn mappings for {} with {} classes", self.version, mcp_to_yarn.len());
		Ok(mcp_to_yarn)
	}

	fn official_to_mcp(&self, context: &impl BuildContext) -> Result<MappingSet> {
		let names = find_names(context)?;

		let srg = (self.srg)()
			.context("failed to locate the srg file")?;
		debug!("reading srg mappings from {srg:?}");
		let file = quill::srg::read_file(&srg)?;

		let mut set = MappingSet::new();
		bridge::load_mapping_file(&mut set, &file)?;
		bridge::merge_mcp_names(&mut set, &names);
		Ok(set)
	}

	fn official_to_yarn(&self, context: &impl BuildContext, proposer: &impl FieldNameProposer) -> Result<MappingSet> {
		let tree = self.load_tree(context, proposer)?;

		let mut set = MappingSet::new();
		bridge::load_tiny(&mut set, &tree, OFFICIAL, NAMED)?;
		Ok(set)
	}

	/// Reads the Yarn mappings, after letting the proposer add field names to them.
	///
	/// Both scratch files are removed again before this returns.
	fn load_tree(&self, context: &impl BuildContext, proposer: &impl FieldNameProposer) -> Result<TinyTree> {
		let archive = context.resolve(&self.mappings)?;
		let client = context.minecraft_client(&self.version)?;

		let input = self.scratch_file()?;
		if let Err(e) = extract_mappings(&archive, &input) {
			discard([input]);
			return Err(e).with_context(|| anyhow!("failed to extract {MAPPINGS_ENTRY:?} from {archive:?}"));
		}
		let output = self.scratch_file()?;

		debug!("proposing field names for {} into {:?}", self.mappings, &*output);
		if let Err(e) = proposer.propose_field_names(&client, &input, &output) {
			discard([input, output]);
			return Err(BridgeError::tool("the field name proposer", e).into());
		}

		let tree = match quill::tiny::read_file_with_detection(&output) {
			Ok(tree) => tree,
			Err(e) => {
				discard([input, output]);
				return Err(e);
			},
		};

		input.close()
			.and(output.close())
			.context("failed to remove scratch files")?;
		Ok(tree)
	}

	fn scratch_file(&self) -> Result<TempPath> {
		let file = Builder::new()
			.prefix("mappings")
			.suffix(".tiny")
			.tempfile_in(&self.scratch_directory)
			.with_context(|| anyhow!("failed to create a scratch file in {:?}", self.scratch_directory))?;
		Ok(file.into_temp_path())
	}
}

/// Finds and reads the MCP names configured for the project.
fn find_names(context: &impl BuildContext) -> Result<McpNames> {
	let identifier = context.mcp_mappings()?;
	let version: McpMappingsVersion = identifier.parse()?;

	let coord = version.to_coord();
	let path = context.resolve(&coord)?;
	debug!("reading mcp names {version} from {path:?}");

	McpNames::read_file(&path)
		.with_context(|| anyhow!("failed to read mcp names {coord}"))
}

/// Removes scratch files after a failure. A file that cannot be removed is only logged.
fn discard<const N: usize>(files: [TempPath; N]) {
	for file in files {
		let path = file.to_path_buf();
		if let Err(e) = file.close() {
			warn!("failed to remove scratch file {path:?}: {e}");
		}
	}
}

fn extract_mappings(archive: &Path, target: &Path) -> Result<()> {
	let mut archive = ZipArchive::new(File::open(archive)?)?;
	let mut entry = archive.by_name(MAPPINGS_ENTRY)?;

	let mut file = File::create(target)?;
	std::io::copy(&mut entry, &mut file)?;
	file.flush()?;
	Ok(())
}
