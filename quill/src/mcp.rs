//! Reading of the MCP name tables.
//!
//! An MCP names archive contains the tables `fields.csv` and `methods.csv` (with the columns `searge,name,side,desc`)
//! and `params.csv` (with the columns `param,name,side`). Together they map the intermediate names to the community
//! names. As intermediate names are unique, one flat lookup is enough.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use log::trace;
use serde::Deserialize;
use zip::ZipArchive;

const TABLES: [&str; 3] = ["fields.csv", "methods.csv", "params.csv"];

#[derive(Debug, Deserialize)]
struct NameEntry {
	#[serde(alias = "param")]
	searge: String,
	name: String,
}

/// A flat lookup from intermediate names to community names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct McpNames {
	names: IndexMap<String, String>,
}

impl McpNames {
	/// Reads the name tables from a path, which is either a zip archive, a directory or a single `.csv` file.
	pub fn read_file(path: impl AsRef<Path>) -> Result<McpNames> {
		let path = path.as_ref();

		let names = if path.is_dir() {
			let mut names = McpNames::default();
			for table in TABLES {
				let file = path.join(table);
				if file.is_file() {
					names.read_csv(File::open(&file)?)
						.with_context(|| anyhow!("failed to read mcp names table {file:?}"))?;
				}
			}
			names
		} else if path.extension().is_some_and(|extension| extension == "csv") {
			let mut names = McpNames::default();
			names.read_csv(File::open(path)?)?;
			names
		} else {
			McpNames::read_zip(File::open(path)?)?
		};

		trace!("read {} mcp names from {path:?}", names.len());
		Ok(names)
	}

	/// Reads the name tables contained in a zip archive. The tables may be located in any directory of the archive.
	pub fn read_zip(reader: impl Read + Seek) -> Result<McpNames> {
		let mut archive = ZipArchive::new(reader)?;
		let mut names = McpNames::default();

		for index in 0..archive.len() {
			let file = archive.by_index(index)?;
			if file.is_dir() {
				continue;
			}

			let name = file.name().to_owned();
			let file_name = name.rsplit_once('/').map_or(name.as_str(), |(_, file_name)| file_name);
			if TABLES.contains(&file_name) {
				names.read_csv(file)
					.with_context(|| anyhow!("failed to read mcp names table {name:?} from archive"))?;
			}
		}

		Ok(names)
	}

	/// Reads one name table, adding its entries. Later entries replace earlier ones.
	///
	/// ```
	/// use quill::mcp::McpNames;
	///
	/// let csv = "searge,name,side,desc\nfield_1_a,count,2,The count.\nfunc_2_b,run,0,\n";
	///
	/// let mut names = McpNames::default();
	/// names.read_csv(csv.as_bytes()).unwrap();
	///
	/// assert_eq!(names.get("field_1_a"), Some("count"));
	/// assert_eq!(names.get("func_3_c"), None);
	/// ```
	pub fn read_csv(&mut self, reader: impl Read) -> Result<()> {
		let mut reader = csv::Reader::from_reader(reader);

		for entry in reader.deserialize::<NameEntry>() {
			let entry = entry?;
			self.names.insert(entry.searge, entry.name);
		}

		Ok(())
	}

	/// The community name for an intermediate name.
	pub fn get(&self, intermediate: &str) -> Option<&str> {
		self.names.get(intermediate).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}

impl FromIterator<(String, String)> for McpNames {
	fn from_iter<T: IntoIterator<Item=(String, String)>>(iter: T) -> McpNames {
		McpNames { names: iter.into_iter().collect() }
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::mcp::McpNames;

	#[test]
	fn params_and_later_entries() {
		let mut names = McpNames::default();
		names.read_csv("param,name,side\np_1_0_,value,2\n".as_bytes()).unwrap();
		names.read_csv("searge,name,side,desc\nfield_1_a,first,2,\nfield_1_a,second,2,\"Quoted, with a comma.\"\n".as_bytes()).unwrap();

		assert_eq!(names.len(), 2);
		assert_eq!(names.get("p_1_0_"), Some("value"));
		assert_eq!(names.get("field_1_a"), Some("second"));
	}

	#[test]
	fn missing_column() {
		let mut names = McpNames::default();
		assert!(names.read_csv("searge,side\nfield_1_a,2\n".as_bytes()).is_err());
	}
}
