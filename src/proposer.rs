use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use log::debug;
use maven_dependency_resolver::coord::MavenCoord;
use crate::launch::{JavaLauncher, JavaRunConfig};
use crate::task::BuildContext;

/// A tool that fills in names for fields that only have official names, using the client jar.
pub trait FieldNameProposer {
	/// Reads the tiny file `input`, and writes it together with the proposed field names to `output`.
	fn propose_field_names(&self, client_jar: &Path, input: &Path, output: &Path) -> Result<()>;
}

impl<F: Fn(&Path, &Path, &Path) -> Result<()>> FieldNameProposer for F {
	fn propose_field_names(&self, client_jar: &Path, input: &Path, output: &Path) -> Result<()> {
		self(client_jar, input, output)
	}
}

/// Runs the `proposeFieldNames` command of stitch.
#[derive(Debug)]
pub struct StitchProposer {
	jar: PathBuf,
	launcher: JavaLauncher,
}

impl StitchProposer {
	const MAIN_CLASS: &'static str = "net.fabricmc.stitch.Main";
	const MIN_JAVA_VERSION: u16 = 8;

	pub fn new(jar: PathBuf, launcher: JavaLauncher) -> StitchProposer {
		StitchProposer { jar, launcher }
	}

	/// Resolves the stitch jar given by the coordinate, usually `net.fabricmc:stitch:<version>:all`.
	pub fn resolve(context: &impl BuildContext, stitch: &MavenCoord, launcher: JavaLauncher) -> Result<StitchProposer> {
		let jar = context.resolve(stitch)
			.with_context(|| anyhow!("failed to resolve stitch as {stitch}"))?;
		Ok(StitchProposer::new(jar, launcher))
	}
}

impl FieldNameProposer for StitchProposer {
	fn propose_field_names(&self, client_jar: &Path, input: &Path, output: &Path) -> Result<()> {
		self.launcher.check_java_version(Self::MIN_JAVA_VERSION)?;

		debug!("running stitch from {:?}", self.jar);
		self.launcher.launch(&JavaRunConfig {
			main_class: Self::MAIN_CLASS,
			classpath: vec![self.jar.as_os_str()],
			args: vec![
				OsStr::new("proposeFieldNames"),
				client_jar.as_os_str(),
				input.as_os_str(),
				output.as_os_str(),
			],
		})
	}
}

#[cfg(test)]
mod testing {
	use std::cell::RefCell;
	use std::path::{Path, PathBuf};
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::proposer::FieldNameProposer;

	#[test]
	fn closures_are_proposers() -> Result<()> {
		let calls = RefCell::new(Vec::new());
		let proposer = |client: &Path, input: &Path, output: &Path| -> Result<()> {
			calls.borrow_mut().push([client, input, output].map(Path::to_path_buf));
			Ok(())
		};

		proposer.propose_field_names(Path::new("client.jar"), Path::new("in.tiny"), Path::new("out.tiny"))?;

		assert_eq!(calls.into_inner(), vec![[PathBuf::from("client.jar"), PathBuf::from("in.tiny"), PathBuf::from("out.tiny")]]);
		Ok(())
	}
}
