use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use maven_dependency_resolver::coord::MavenCoord;
use yarnforge::config::{Config, MinecraftExtension};
use yarnforge::download::HttpDownloader;
use yarnforge::launch::JavaLauncher;
use yarnforge::project::Project;
use yarnforge::proposer::StitchProposer;
use yarnforge::task::RemappingTask;

#[derive(Debug, Parser)]
struct Cli {
	/// Be verbose.
	#[arg(short = 'v', long = "verbose")]
	verbose: bool,

	/// The configuration file to use, instead of `yarnforge.json`.
	#[arg(long = "config")]
	config: Option<PathBuf>,

	/// The minecraft version, like `1.16.5`.
	#[arg(long = "version")]
	minecraft_version: String,

	/// The dependency notation of the Yarn mappings, like `net.fabricmc:yarn:1.16.5+build.5:v2`.
	#[arg(long = "mappings")]
	mappings: String,

	/// The SRG file mapping the official names to the SRG names.
	#[arg(long = "srg")]
	srg: PathBuf,

	/// The MCP mappings identifier, like `snapshot_20210309-1.16.5`. Overrides the configuration file.
	#[arg(long = "mcp")]
	mcp: Option<String>,

	/// Write the composed mappings to this file, in the SRG format.
	#[arg(short = 'o', long = "output")]
	output: Option<PathBuf>,
}

fn setup_logger(verbose: bool) -> Result<()> {
	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(if verbose { LevelFilter::Trace } else { LevelFilter::Info })
		.chain(std::io::stderr())
		.apply()
		.context("failed to set up logging")
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_logger(cli.verbose)?;

	let mut config = Config::load(cli.config.as_deref())?;
	if let Some(mappings) = cli.mcp {
		config.minecraft = Some(MinecraftExtension { mappings });
	}

	let mappings = MavenCoord::from_str(&cli.mappings)?;
	let stitch = MavenCoord::from_str(&config.stitch)
		.context("invalid stitch dependency notation in the configuration")?;
	let launcher = JavaLauncher::find(config.java.as_deref());
	let scratch_directory = config.scratch_directory.clone();

	let project = Project::new(config, HttpDownloader::new());
	let proposer = StitchProposer::resolve(&project, &stitch, launcher)?;

	let srg = cli.srg;
	let mut task = RemappingTask::new(cli.minecraft_version, mappings, move || {
		if !srg.is_file() {
			bail!("srg file {srg:?} doesn't exist");
		}
		Ok(srg.clone())
	});
	if let Some(scratch_directory) = scratch_directory {
		task = task.with_scratch_directory(scratch_directory);
	}

	let start = Instant::now();

	let mcp_to_yarn = task.create_mcp_to_yarn(&project, &proposer)?;

	info!("composing {} with {} took {:?}", task.version(), task.mappings(), start.elapsed());

	if let Some(output) = cli.output {
		quill::srg::write_file(&mcp_to_yarn, &output)?;
		info!("wrote {} classes to {output:?}", mcp_to_yarn.len());
	}

	Ok(())
}
