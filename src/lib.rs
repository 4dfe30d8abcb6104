//! Access to the Pixar films datasets
//!
//! The datasets are six CSV files published at
//! <https://github.com/erictleung/pixarfilms>. A [`Fetcher`] downloads them
//! into a data directory, then a [`Loader`] reads them into Arrow record
//! batches ([`Table`]s):
//!
//! ```no_run
//! # async fn example() -> pixarfilms::Result<()> {
//! use pixarfilms::{Config, Fetcher, LoadOptions, Loader, ProgressReport};
//!
//! let config = Config::with_default_data_home()?.into_shared();
//! Fetcher::new(config.clone())?
//!     .download_all(&ProgressReport::new())
//!     .await?;
//!
//! let mut loader = Loader::new(config);
//! let people = loader.load_people(LoadOptions::default()).await?;
//! let box_office = loader
//!     .load("box_office", LoadOptions::default().as_frame(false))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cache;
pub mod config;
pub mod datasets;
pub mod fetch;
pub mod loader;
pub mod progress;
pub mod reader;
pub mod table;

pub use crate::{
    cache::DatasetCache,
    config::Config,
    datasets::{DatasetName, UnknownDataset},
    fetch::Fetcher,
    loader::{LoadError, LoadOptions, Loaded, Loader},
    progress::ProgressReport,
    table::{RawArray, Table, Value},
};

/// Use anyhow for Result type erasure
pub use anyhow::Result;
