//! Loader and fetcher configuration

use crate::Result;
use anyhow::Context;
use directories::ProjectDirs;
use std::{path::Path, sync::Arc, time::Duration};

/// Location from which the data files are downloaded by default
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/erictleung/pixarfilms/refs/heads/main/data-raw/";

/// Default bound on the duration of each download request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration shared by the [`Loader`](crate::Loader) and the
/// [`Fetcher`](crate::Fetcher)
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Config {
    /// Directory where the dataset CSV files are stored
    pub data_home: Box<Path>,

    /// URL prefix that data file names are appended to when downloading
    pub base_url: Box<str>,

    /// Per-request download timeout
    pub timeout: Duration,
}
//
impl Config {
    /// Configuration with an explicit data directory
    ///
    /// The directory does not need to exist yet. It is only checked when a
    /// dataset is loaded from it.
    pub fn new(data_home: impl Into<Box<Path>>) -> Self {
        Self {
            data_home: data_home.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Configuration using [`default_data_home()`]
    pub fn with_default_data_home() -> Result<Self> {
        Ok(Self::new(default_data_home()?))
    }

    /// Download from a different location
    pub fn with_base_url(self, base_url: impl Into<Box<str>>) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }

    /// Use a different per-request download timeout
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Share the configuration
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

/// Default data directory
///
/// This is the per-user data directory of the `pixarfilms` application, as
/// defined by the platform conventions, e.g. `$XDG_DATA_HOME/pixarfilms` on
/// Linux. Nothing is created here.
pub fn default_data_home() -> Result<Box<Path>> {
    let dirs = ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
        .context("determining the default data directory")?;
    Ok(dirs.data_dir().into())
}
