use std::fmt::{Display, Formatter};
use std::str::FromStr;
use maven_dependency_resolver::coord::MavenCoord;
use crate::error::BridgeError;

/// The identifier of a set of MCP names, like `snapshot_20210309-1.16.5` or `stable_65-1.16.5`.
///
/// It's split on the last `_`, into the channel and the version.
/// ```
/// use std::str::FromStr;
/// use yarnforge::mcp::McpMappingsVersion;
///
/// let version = McpMappingsVersion::from_str("snapshot_20210309-1.16.5").unwrap();
/// assert_eq!(version.channel, "snapshot");
/// assert_eq!(version.version, "20210309-1.16.5");
/// assert_eq!(version.to_string(), "snapshot_20210309-1.16.5");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct McpMappingsVersion {
	pub channel: String,
	pub version: String,
}

impl McpMappingsVersion {
	/// The maven coordinate of the names archive, `de.oceanlabs.mcp:mcp_<channel>:<version>@zip`.
	pub fn to_coord(&self) -> MavenCoord {
		MavenCoord {
			group: "de.oceanlabs.mcp".to_owned(),
			artifact: format!("mcp_{}", self.channel),
			version: self.version.clone(),
			classifier: None,
			extension: "zip".to_owned(),
		}
	}
}

impl FromStr for McpMappingsVersion {
	type Err = BridgeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.rsplit_once('_') {
			Some((channel, version)) if !channel.is_empty() && !version.is_empty() => Ok(McpMappingsVersion {
				channel: channel.to_owned(),
				version: version.to_owned(),
			}),
			_ => Err(BridgeError::InvalidMappingsIdentifier(s.to_owned())),
		}
	}
}

impl Display for McpMappingsVersion {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}_{}", self.channel, self.version)
	}
}
