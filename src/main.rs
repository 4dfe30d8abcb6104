//! Command-line access to the Pixar films datasets, whose source you can find
//! at <https://github.com/erictleung/pixarfilms>.

use anyhow::Context;
use clap::{Parser, Subcommand};
use csv_async::AsyncWriterBuilder;
use log::LevelFilter;
use pixarfilms::{
    analysis::{self, BarChart},
    config::{self, Config},
    datasets, table, DatasetName, Fetcher, LoadOptions, Loader, ProgressReport, Result,
};
use std::{num::NonZeroUsize, path::PathBuf, sync::Arc, time::Duration};
use tokio::io::BufWriter;

/// Download, load and explore the Pixar films datasets
#[derive(Parser, Debug)]
#[command(version, author)]
struct Args {
    /// Directory where the dataset CSV files are stored
    ///
    /// Defaults to the per-user data directory of this program, e.g.
    /// ~/.local/share/pixarfilms on Linux.
    #[arg(long, env = "PIXARFILMS_DATA_HOME")]
    data_home: Option<PathBuf>,

    /// Operation to be performed
    #[command(subcommand)]
    command: Command,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> Result<Self> {
        let args = Args::parse();
        if let Command::Download { timeout, .. } = &args.command {
            anyhow::ensure!(*timeout > 0, "the download timeout must be nonzero");
        }
        Ok(args)
    }

    /// Final configuration
    pub fn config(&self) -> Result<Arc<Config>> {
        let mut config = match &self.data_home {
            Some(data_home) => Config::new(data_home.clone()),
            None => Config::with_default_data_home()?,
        };
        if let Command::Download { base_url, timeout } = &self.command {
            config = config
                .with_base_url(base_url.clone())
                .with_timeout(Duration::from_secs(*timeout));
        }
        Ok(config.into_shared())
    }
}

/// Supported operations
#[derive(Subcommand, Debug)]
enum Command {
    /// Download every dataset into the data directory
    ///
    /// Files that fail to download are reported and skipped.
    Download {
        /// URL prefix of the dataset files
        #[arg(long, default_value = config::DEFAULT_BASE_URL)]
        base_url: Box<str>,

        /// Per-file download timeout, in seconds
        #[arg(long, default_value_t = config::DEFAULT_TIMEOUT.as_secs())]
        timeout: u64,
    },

    /// Display the first rows of a dataset
    Show {
        /// Dataset name, e.g. "box_office"
        ///
        /// Will interactively prompt for a dataset if not specified.
        name: Option<Box<str>>,

        /// Number of rows to display
        #[arg(short, long, default_value = "5")]
        rows: usize,

        /// Print label-free rows as CSV instead of a table
        #[arg(long, default_value_t = false)]
        raw: bool,
    },

    /// Count the occurences of each value of a dataset column
    Count {
        /// Column whose values should be counted, e.g. "role_type"
        column: Box<str>,

        /// Dataset name, e.g. "people"
        ///
        /// Will interactively prompt for a dataset if not specified.
        #[arg(short, long)]
        dataset: Option<Box<str>>,

        /// Only display the most frequent values
        #[arg(short, long)]
        top: Option<NonZeroUsize>,
    },

    /// Team composition of Pixar films: roles and top contributors
    People {
        /// Number of top contributors to display
        #[arg(short, long, default_value = "10")]
        top: NonZeroUsize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging
    setup_logging().map_err(|e| anyhow::format_err!("{e}"))?;

    // Decode CLI arguments
    let args = Args::parse_and_check()?;
    let config = args.config()?;
    log::debug!("Running with {config:?}");

    let mut loader = Loader::new(config.clone());
    match args.command {
        Command::Download { .. } => {
            let report = ProgressReport::new();
            Fetcher::new(config)?.download_all(&report).await?;
        }
        Command::Show { name, rows, raw } => {
            let name = pick_dataset(name.as_deref())?;
            let table = loader
                .load(name.as_str(), LoadOptions::default())
                .await?
                .into_frame()
                .context("loading the dataset as a table")?;
            let head = table::head(&table, rows);
            if raw {
                write_raw(&head).await?;
            } else {
                println!("{}", table::pretty(&head)?);
            }
        }
        Command::Count {
            column,
            dataset,
            top,
        } => {
            let name = pick_dataset(dataset.as_deref())?;
            let table = loader
                .load(name.as_str(), LoadOptions::default())
                .await?
                .into_frame()
                .context("loading the dataset as a table")?;
            let mut counts = analysis::value_counts(&table, &column)?;
            if let Some(top) = top {
                counts.truncate(top.get());
            }
            let chart = BarChart::new(
                format!("Distribution of {column} in {name}"),
                &*column,
                "Count",
                counts,
            );
            println!("{chart}");
        }
        Command::People { top } => analyze_people(&mut loader, top).await?,
    }
    Ok(())
}

/// Use the user-specified dataset or prompt for one
fn pick_dataset(name: Option<&str>) -> Result<DatasetName> {
    match name {
        Some(name) => Ok(name.parse()?),
        None => datasets::prompt().context("prompting for a dataset"),
    }
}

/// Print label-free rows of a table as CSV on stdout
async fn write_raw(table: &pixarfilms::Table) -> Result<()> {
    let mut writer = AsyncWriterBuilder::new()
        .has_headers(false)
        .create_serializer(BufWriter::new(tokio::io::stdout()));
    for row in table::to_array(table).rows() {
        writer.serialize(row).await.context("writing a raw row")?;
    }
    writer.flush().await.context("flushing raw rows")?;
    Ok(())
}

/// Roles and top contributors across Pixar films
async fn analyze_people(loader: &mut Loader, top: NonZeroUsize) -> Result<()> {
    let people = loader
        .load_people(LoadOptions::default())
        .await?
        .into_frame()
        .context("loading the people dataset as a table")?;
    println!("Pixar People Dataset Header");
    println!("{}\n", table::pretty(&table::head(&people, 5))?);

    // Team composition: roles and contributors
    let role_counts = analysis::value_counts(&people, "role_type")?;
    let mut top_contributors = analysis::value_counts(&people, "name")?;
    top_contributors.truncate(top.get());
    println!(
        "{}",
        BarChart::new(
            "Distribution of Roles in Pixar Films",
            "Role Type",
            "Count",
            role_counts
        )
    );
    println!(
        "{}",
        BarChart::new(
            format!("Top {top} Contributors to Pixar Films"),
            "Name",
            "Number of Films Contributed",
            top_contributors
        )
    );

    // Unique contributors and their roles
    println!("Unique Contributors and Their Roles:");
    let groups = analysis::group_sizes(&people, &["name", "role_type"])?;
    for (key, count) in groups.into_iter().take(10) {
        let (name, role) = (key[0].to_string(), key[1].to_string());
        println!("{name:<30} {role:<20} {count}");
    }
    Ok(())
}

/// Set up logging
fn setup_logging() -> syslog::Result<()> {
    syslog::init(
        syslog::Facility::LOG_USER,
        if cfg!(feature = "log-trace") {
            LevelFilter::Trace
        } else if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        None,
    )
}
