//! Download of the dataset files into the data directory

use crate::{
    config::Config,
    datasets::DatasetName,
    progress::ProgressReport,
    Result,
};
use anyhow::Context;
use futures::StreamExt;
use indicatif::ProgressBar;
use reqwest::Response;
use std::{
    io::{self, ErrorKind},
    path::PathBuf,
    sync::Arc,
};
use tokio::{fs::File, io::AsyncWriteExt};
use tokio_util::io::StreamReader;

/// Downloader that populates the data directory
#[derive(Clone, Debug)]
pub struct Fetcher {
    /// Download location, destination and timeout
    config: Arc<Config>,

    /// HTTP client, with the configured timeout
    client: reqwest::Client,
}
//
impl Fetcher {
    /// Set up a downloader
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("setting up the HTTP client")?;
        Ok(Self { config, client })
    }

    /// URL from which a dataset's file is downloaded
    pub fn url(&self, name: DatasetName) -> String {
        format!("{}{}", self.config.base_url, name.file_name())
    }

    /// Download every dataset file into the data directory
    ///
    /// Files are downloaded one after the other. A file that fails to download
    /// is reported in the logs and skipped, it does not stop the other
    /// downloads. Existing files are overwritten.
    ///
    /// Only a failure to create the data directory is reported as an error.
    pub async fn download_all(&self, report: &ProgressReport) -> Result<()> {
        let data_home = &self.config.data_home;
        tokio::fs::create_dir_all(data_home)
            .await
            .with_context(|| format!("creating data directory {}", data_home.display()))?;

        // Track file downloads
        let files = report.files(DatasetName::ALL.len());
        let bytes = report.bytes();

        for name in DatasetName::ALL {
            let file_name = name.file_name();
            match self.download(name, &bytes).await {
                Ok(path) => {
                    log::info!("Downloaded {file_name} into {}", path.display());
                    report.println(format!("Successfully downloaded {file_name}"));
                }
                Err(e) => {
                    let url = self.url(name);
                    log::error!("Error downloading {file_name} from {url}: {e:#}");
                    report.println(format!("Error downloading {file_name} from {url}: {e:#}"));
                }
            }
            files.inc(1);
        }
        files.finish_and_clear();
        bytes.finish_and_clear();
        Ok(())
    }

    /// Download one dataset file, return where it was saved
    async fn download(&self, name: DatasetName, bytes: &ProgressBar) -> Result<PathBuf> {
        // Start the download
        let url = self.url(name);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .with_context(|| format!("initiating download of {url}"))?;
        if let Some(length) = response.content_length() {
            bytes.inc_length(length);
        }

        // Stream the response body into the destination file
        let body = StreamReader::new(response.bytes_stream().map(|res| {
            res
                // Track how many bytes have been downloaded so far
                .inspect(|block| bytes.inc(block.len() as u64))
                // Translate reqwest errors into I/O errors
                .map_err(|e| io::Error::new(ErrorKind::Other, Box::new(e)))
        }));
        tokio::pin!(body);
        let path = self.config.data_home.join(name.file_name());
        let context = || format!("saving {url} to {}", path.display());
        let mut file = File::create(&path).await.with_context(context)?;
        tokio::io::copy(&mut body, &mut file)
            .await
            .with_context(context)?;
        file.flush().await.with_context(context)?;
        Ok(path)
    }
}
