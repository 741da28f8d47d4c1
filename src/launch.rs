use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, trace};

/// What to run on a java virtual machine.
#[derive(Debug)]
pub struct JavaRunConfig<'a> {
	pub main_class: &'a str,
	pub classpath: Vec<&'a OsStr>,
	pub args: Vec<&'a OsStr>,
}

/// A `java` executable.
#[derive(Debug, Clone, PartialEq)]
pub struct JavaLauncher {
	java: PathBuf,
}

impl Default for JavaLauncher {
	fn default() -> Self {
		JavaLauncher::new("java")
	}
}

impl JavaLauncher {
	pub fn new(java: impl Into<PathBuf>) -> JavaLauncher {
		JavaLauncher { java: java.into() }
	}

	/// The `bin/java` of the `JAVA_HOME` environment variable, if set.
	pub fn from_env_var() -> Option<JavaLauncher> {
		let java_home = std::env::var_os("JAVA_HOME")?;
		let java = Path::new(&java_home).join("bin").join("java");
		trace!("JAVA_HOME points to {java:?}");
		Some(JavaLauncher { java })
	}

	/// Picks the configured java, then the one of `JAVA_HOME`, then `java` from the `PATH`.
	pub fn find(configured: Option<&Path>) -> JavaLauncher {
		match configured {
			Some(java) => JavaLauncher::new(java),
			None => JavaLauncher::from_env_var().unwrap_or_default(),
		}
	}

	fn command(&self) -> Command {
		Command::new(&self.java)
	}

	/// Fails unless `java -version` reports at least the major version `minimum`.
	pub fn check_java_version(&self, minimum: u16) -> Result<()> {
		let mut command = self.command();
		command.arg("-version");

		let output = command.output()
			.with_context(|| anyhow!("failed to run {command:?}"))?;
		// java prints its version to stderr
		let printed = String::from_utf8_lossy(&output.stderr);

		let major = major_version(&printed)
			.with_context(|| anyhow!("failed to find out the version of {:?}", self.java))?;
		debug!("{:?} is java {major}", self.java);

		if major < minimum {
			bail!("{:?} is java {major}, but at least java {minimum} is needed", self.java);
		}
		Ok(())
	}

	/// Runs the main class and waits for java to exit. Any exit status but success is an error.
	pub fn launch(&self, config: &JavaRunConfig) -> Result<()> {
		let classpath = std::env::join_paths(&config.classpath)
			.with_context(|| anyhow!("cannot join the classpath {:?}", config.classpath))?;

		let mut command = self.command();
		command.arg("-classpath")
			.arg(classpath)
			.arg(config.main_class)
			.args(&config.args);

		trace!("running {command:?}");
		let status = command.status()
			.with_context(|| anyhow!("failed to start {:?}", self.java))?;

		if !status.success() {
			bail!("{} failed with {status}", config.main_class);
		}
		Ok(())
	}
}

/// Finds the major version in the first line of the output of `java -version`.
///
/// That line contains the quoted version as third word, like `openjdk version "17.0.11" 2024-04-16`. Up to java 8,
/// versions start with `1.`, so `"1.8.0_412"` is major version `8`.
fn major_version(output: &str) -> Result<u16> {
	let word = output.lines().next()
		.and_then(|line| line.split_whitespace().nth(2))
		.with_context(|| anyhow!("no version in {output:?}"))?;

	let version = word.strip_prefix('"')
		.and_then(|x| x.strip_suffix('"'))
		.with_context(|| anyhow!("expected a quoted version, got {word:?}"))?;

	let mut numbers = version.split(&['.', '_', '-', '+'][..]);
	let major = match [numbers.next(), numbers.next()] {
		[Some("1"), Some(legacy)] => legacy,
		[Some(major), _] => major,
		_ => bail!("empty version in {output:?}"),
	};

	major.parse()
		.with_context(|| anyhow!("invalid major version {major:?} in {version:?}"))
}

#[cfg(test)]
mod testing {
	use std::path::Path;
	use pretty_assertions::assert_eq;
	use crate::launch::{major_version, JavaLauncher};

	#[test]
	fn major_versions() {
		let cases = [
			("java version \"1.6.0_45\"\nJava(TM) SE Runtime Environment (build 1.6.0_45-b06)", 6),
			("openjdk version \"1.8.0_412\"\nOpenJDK Runtime Environment (build 1.8.0_412-b08)", 8),
			("openjdk version \"11.0.2\" 2019-01-15\nOpenJDK Runtime Environment 18.9 (build 11.0.2+9)", 11),
			("openjdk version \"17.0.11\" 2024-04-16 LTS", 17),
			("openjdk version \"21-ea\" 2023-09-19", 21),
			("openjdk version \"22\" 2024-03-19\n", 22),
		];
		for (output, expected) in cases {
			assert_eq!(major_version(output).unwrap(), expected, "{output:?}");
		}
	}

	#[test]
	fn not_a_version() {
		for output in ["", "openjdk version", "openjdk version 17.0.11", "openjdk version \"x.y\"", "openjdk version \"\""] {
			assert!(major_version(output).is_err(), "{output:?}");
		}
	}

	#[test]
	fn configured_java_wins() {
		let launcher = JavaLauncher::find(Some(Path::new("/opt/jdk/bin/java")));
		assert_eq!(launcher, JavaLauncher::new("/opt/jdk/bin/java"));
	}
}
