use thiserror::Error;

/// The errors of the bridge that callers may want to tell apart.
///
/// These are returned inside an [`anyhow::Error`], use [`anyhow::Error::downcast_ref`] to get them back out.
#[derive(Debug, Error)]
pub enum BridgeError {
	/// The MCP mappings identifier has no `_` separating the channel from the version.
	#[error("invalid mcp mappings identifier {0:?}, expected `<channel>_<version>`")]
	InvalidMappingsIdentifier(String),
	/// Neither the project nor the `clean` project configure the `minecraft` extension.
	#[error("no `minecraft` extension with mcp mappings configured, neither for the project nor for the `clean` project")]
	MissingExtension,
	/// An external tool failed.
	#[error("failed to run {tool}")]
	Tool {
		tool: &'static str,
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},
}

impl BridgeError {
	pub(crate) fn tool(tool: &'static str, source: anyhow::Error) -> BridgeError {
		BridgeError::Tool { tool, source: source.into() }
	}
}
