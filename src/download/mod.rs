use anyhow::{anyhow, bail, Context, Result};
use log::trace;
use maven_dependency_resolver::Downloader;
use reqwest::blocking::Client;
use reqwest::StatusCode;

pub(crate) mod version_manifest;

/// Downloads over http(s), blocking the current thread.
#[derive(Debug, Default)]
pub struct HttpDownloader {
	client: Client,
}

impl HttpDownloader {
	pub fn new() -> HttpDownloader {
		HttpDownloader::default()
	}
}

impl Downloader for HttpDownloader {
	fn download(&self, url: &str) -> Result<Option<Vec<u8>>> {
		trace!("GET {url}");
		let response = self.client.get(url).send()
			.with_context(|| anyhow!("failed to send request for {url:?}"))?;

		let status = response.status();
		if status == StatusCode::NOT_FOUND {
			return Ok(None);
		}
		if !status.is_success() {
			bail!("got a {status:?} for {url:?}");
		}

		let bytes = response.bytes()
			.with_context(|| anyhow!("failed to read response body of {url:?}"))?;
		Ok(Some(bytes.to_vec()))
	}
}
