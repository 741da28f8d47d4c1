//! The launcher metadata Mojang publishes for every version.
//!
//! Only the parts needed to find the client jar are read, everything else is ignored.

use serde::Deserialize;

pub(crate) const VERSION_MANIFEST: &str = "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// The list of all versions, usually found at [`VERSION_MANIFEST`].
#[derive(Debug, Deserialize)]
pub(crate) struct VersionManifest {
	pub(crate) latest: Latest,
	pub(crate) versions: Vec<VersionInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Latest {
	pub(crate) release: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VersionInfo {
	pub(crate) id: String,
	/// The url of the [`VersionDetails`] of this version.
	pub(crate) url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VersionDetails {
	pub(crate) downloads: DownloadsInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DownloadsInfo {
	pub(crate) client: DownloadInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DownloadInfo {
	pub(crate) size: usize,
	pub(crate) url: String,
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::download::version_manifest::{VersionDetails, VersionManifest};

	#[test]
	fn parse() -> Result<()> {
		let manifest = r#"{
			"latest": { "release": "1.16.5", "snapshot": "21w10a" },
			"versions": [
				{
					"id": "1.16.5",
					"type": "release",
					"url": "https://piston-meta.mojang.com/v1/packages/abc/1.16.5.json",
					"time": "2021-01-14T16:05:32+00:00",
					"releaseTime": "2021-01-14T16:05:32+00:00",
					"sha1": "abc",
					"complianceLevel": 1
				}
			]
		}"#;
		let manifest: VersionManifest = serde_json::from_str(manifest)?;
		assert_eq!(manifest.latest.release, "1.16.5");
		assert_eq!(manifest.versions[0].id, "1.16.5");
		assert_eq!(manifest.versions[0].url, "https://piston-meta.mojang.com/v1/packages/abc/1.16.5.json");

		let details = r#"{
			"id": "1.16.5",
			"downloads": {
				"client": { "sha1": "37fd", "size": 17547153, "url": "https://piston-data.mojang.com/v1/objects/37fd/client.jar" }
			},
			"mainClass": "net.minecraft.client.main.Main"
		}"#;
		let details: VersionDetails = serde_json::from_str(details)?;
		assert_eq!(details.downloads.client.size, 17547153);
		assert_eq!(details.downloads.client.url, "https://piston-data.mojang.com/v1/objects/37fd/client.jar");

		Ok(())
	}
}
