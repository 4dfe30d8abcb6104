//! Loading datasets from the data directory

use crate::{
    cache::DatasetCache,
    config::Config,
    datasets::{DatasetName, UnknownDataset},
    reader::{self, ReadError},
    table::{self, RawArray, Table},
};
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;

/// Reasons why a dataset could not be loaded
#[derive(Debug, Error)]
pub enum LoadError {
    /// The requested name is not in the registry
    #[error(transparent)]
    UnknownDataset(#[from] UnknownDataset),

    /// The backing file is not where it should be
    #[error("Dataset file '{}' not found.", path.display())]
    FileNotFound { path: PathBuf },

    /// The backing file exists but could not be decoded
    #[error("reading dataset file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ReadError,
    },
}

/// Options of a [`Loader::load()`] call
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LoadOptions {
    /// Read from and write to the loader's cache
    pub cache: bool,

    /// Directory to read from instead of the configured one
    ///
    /// This is ignored when `cache` is set and the dataset is already cached,
    /// see [`DatasetCache`].
    pub data_home: Option<PathBuf>,

    /// Return a labeled [`Table`] rather than a [`RawArray`]
    pub as_frame: bool,
}
//
impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            cache: true,
            data_home: None,
            as_frame: true,
        }
    }
}
//
impl LoadOptions {
    /// Enable or disable the cache
    pub fn cache(self, cache: bool) -> Self {
        Self { cache, ..self }
    }

    /// Read from a specific directory
    pub fn data_home(self, data_home: impl Into<PathBuf>) -> Self {
        Self {
            data_home: Some(data_home.into()),
            ..self
        }
    }

    /// Pick between a labeled table and a raw array
    pub fn as_frame(self, as_frame: bool) -> Self {
        Self { as_frame, ..self }
    }
}

/// Outcome of a successful load
#[derive(Clone, Debug, PartialEq)]
pub enum Loaded {
    /// Labeled table, shared with the cache if caching was enabled
    Frame(Arc<Table>),

    /// Label-free array
    Array(RawArray),
}
//
impl Loaded {
    /// Labeled table, if that's what was asked for
    pub fn into_frame(self) -> Option<Arc<Table>> {
        match self {
            Self::Frame(table) => Some(table),
            Self::Array(_) => None,
        }
    }

    /// Raw array, if that's what was asked for
    pub fn into_array(self) -> Option<RawArray> {
        match self {
            Self::Frame(_) => None,
            Self::Array(array) => Some(array),
        }
    }
}

/// Dataset loader with its own cache
#[derive(Clone, Debug)]
pub struct Loader {
    /// Data directory and other settings
    config: Arc<Config>,

    /// Previously loaded tables
    cache: DatasetCache,
}
//
impl Loader {
    /// Set up a loader with an empty cache
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_cache(config, DatasetCache::new())
    }

    /// Set up a loader around an existing cache
    pub fn with_cache(config: Arc<Config>, cache: DatasetCache) -> Self {
        Self { config, cache }
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Cache in use
    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// Extract the cache, e.g. to hand it over to another loader
    pub fn into_cache(self) -> DatasetCache {
        self.cache
    }

    /// Load a dataset by name
    ///
    /// The name is matched case-insensitively against the registry.
    pub async fn load(&mut self, name: &str, options: LoadOptions) -> Result<Loaded, LoadError> {
        let name = name.parse::<DatasetName>()?;
        self.load_dataset(name, options).await
    }

    /// Load a dataset
    pub async fn load_dataset(
        &mut self,
        name: DatasetName,
        options: LoadOptions,
    ) -> Result<Loaded, LoadError> {
        let LoadOptions {
            cache,
            data_home,
            as_frame,
        } = options;

        // Reuse the cached table if allowed to
        let cached = cache.then(|| self.cache.get(name)).flatten();
        let table = if let Some(table) = cached {
            log::debug!("Using cached table for dataset {name}");
            table
        } else {
            let data_home = data_home.as_deref().unwrap_or(&*self.config.data_home);
            let table = Arc::new(read_dataset(data_home, name).await?);
            if cache {
                self.cache.insert(name, table.clone());
            }
            table
        };

        // Strip labels if asked to
        Ok(if as_frame {
            Loaded::Frame(table)
        } else {
            Loaded::Array(table::to_array(&table))
        })
    }

    /// Load the Academy Awards dataset
    pub async fn load_academy(&mut self, options: LoadOptions) -> Result<Loaded, LoadError> {
        self.load_dataset(DatasetName::Academy, options).await
    }

    /// Load the Genres dataset
    pub async fn load_genres(&mut self, options: LoadOptions) -> Result<Loaded, LoadError> {
        self.load_dataset(DatasetName::Genres, options).await
    }

    /// Load the Pixar Films dataset
    pub async fn load_films(&mut self, options: LoadOptions) -> Result<Loaded, LoadError> {
        self.load_dataset(DatasetName::Films, options).await
    }

    /// Load the Pixar People dataset
    pub async fn load_people(&mut self, options: LoadOptions) -> Result<Loaded, LoadError> {
        self.load_dataset(DatasetName::People, options).await
    }

    /// Load the Public Response dataset
    pub async fn load_public_response(
        &mut self,
        options: LoadOptions,
    ) -> Result<Loaded, LoadError> {
        self.load_dataset(DatasetName::PublicResponse, options).await
    }

    /// Load the Box Office dataset
    pub async fn load_box_office(&mut self, options: LoadOptions) -> Result<Loaded, LoadError> {
        self.load_dataset(DatasetName::BoxOffice, options).await
    }
}

/// Read a dataset's backing file from a data directory
async fn read_dataset(data_home: &Path, name: DatasetName) -> Result<Table, LoadError> {
    let path = data_home.join(name.file_name());
    log::debug!("Reading dataset {name} from {}", path.display());
    match tokio::fs::try_exists(&path).await {
        Ok(true) => {}
        Ok(false) => return Err(LoadError::FileNotFound { path }),
        Err(e) => {
            return Err(LoadError::Read {
                path,
                source: ReadError::Io(e),
            })
        }
    }
    reader::read_csv_file(&path)
        .await
        .map_err(|source| match source {
            ReadError::Io(e) if e.kind() == io::ErrorKind::NotFound => {
                LoadError::FileNotFound { path: path.clone() }
            }
            source => LoadError::Read {
                path: path.clone(),
                source,
            },
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{column_names, column_values, to_array, Value};
    use std::fs;
    use tempfile::TempDir;

    /// Data directory holding a small CSV file for every dataset
    fn populated_data_home() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in DatasetName::ALL {
            fs::write(
                dir.path().join(name.file_name()),
                format!("dataset,value\n{name},1\n{name},2\n"),
            )
            .expect("write dataset file");
        }
        dir
    }

    fn loader(data_home: &Path) -> Loader {
        Loader::new(Config::new(data_home).into_shared())
    }

    fn shape(table: &Table) -> (usize, usize) {
        (table.num_rows(), table.num_columns())
    }

    fn first_column(table: &Table) -> Vec<Value> {
        column_values(table.column(0).as_ref())
    }

    #[tokio::test]
    async fn every_dataset_loads() {
        let dir = populated_data_home();
        let mut loader = loader(dir.path());
        for name in DatasetName::ALL {
            let table = loader
                .load(name.as_str(), LoadOptions::default())
                .await
                .unwrap()
                .into_frame()
                .unwrap();
            assert_eq!(shape(&table), (2, 2));
            assert_eq!(first_column(&table)[0], Value::Str(name.as_str().into()));
        }
        assert_eq!(loader.cache().len(), DatasetName::ALL.len());
    }

    #[tokio::test]
    async fn named_accessors_pick_their_dataset() {
        let dir = populated_data_home();
        let mut loader = loader(dir.path());
        let options = || LoadOptions::default().cache(false);
        let results = [
            (DatasetName::Academy, loader.load_academy(options()).await),
            (DatasetName::Genres, loader.load_genres(options()).await),
            (DatasetName::Films, loader.load_films(options()).await),
            (DatasetName::People, loader.load_people(options()).await),
            (DatasetName::PublicResponse, loader.load_public_response(options()).await),
            (DatasetName::BoxOffice, loader.load_box_office(options()).await),
        ];
        for (name, result) in results {
            let table = result.unwrap().into_frame().unwrap();
            assert_eq!(first_column(&table)[1], Value::Str(name.as_str().into()));
        }
        assert!(loader.cache().is_empty());
    }

    #[tokio::test]
    async fn names_are_case_insensitive() {
        let dir = populated_data_home();
        let mut loader = loader(dir.path());
        let loaded = loader.load("Box_Office", LoadOptions::default()).await.unwrap();
        assert!(loaded.into_frame().is_some());
        assert!(loader.cache().contains(DatasetName::BoxOffice));
    }

    #[tokio::test]
    async fn unknown_dataset_lists_valid_names() {
        let dir = populated_data_home();
        let mut loader = loader(dir.path());
        let err = loader
            .load("not_a_dataset", LoadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::UnknownDataset(_)));
        let message = err.to_string();
        for name in DatasetName::ALL {
            assert!(message.contains(name.as_str()), "{message}");
        }
        assert!(loader.cache().is_empty());
    }

    #[tokio::test]
    async fn cached_table_survives_file_removal() {
        let dir = populated_data_home();
        let mut loader = loader(dir.path());
        let first = loader.load_films(LoadOptions::default()).await.unwrap();
        fs::remove_file(dir.path().join("pixar_films.csv")).unwrap();
        let second = loader.load_films(LoadOptions::default()).await.unwrap();
        assert!(Arc::ptr_eq(
            &first.into_frame().unwrap(),
            &second.into_frame().unwrap()
        ));

        // Without the cache, the missing file is noticed
        let err = loader
            .load_films(LoadOptions::default().cache(false))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn uncached_loads_reread_the_file() {
        let dir = populated_data_home();
        let mut loader = loader(dir.path());
        let options = LoadOptions::default().cache(false);
        let first = loader.load_genres(options.clone()).await.unwrap();
        fs::write(dir.path().join("genres.csv"), "film,genre\nUp,Adventure\n").unwrap();
        let second = loader.load_genres(options).await.unwrap().into_frame().unwrap();
        assert_ne!(first.into_frame().unwrap(), second);
        assert_eq!(column_names(&second), ["film", "genre"]);
        assert!(loader.cache().is_empty());
    }

    #[tokio::test]
    async fn cache_ignores_data_home() {
        let dir = populated_data_home();
        let other = tempfile::tempdir().unwrap();
        let mut loader = loader(dir.path());
        let first = loader.load_academy(LoadOptions::default()).await.unwrap();
        let second = loader
            .load_academy(LoadOptions::default().data_home(other.path()))
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn raw_array_preserves_shape() {
        let dir = populated_data_home();
        fs::write(
            dir.path().join("box_office.csv"),
            "film,budget,box_office_us_canada\nToy Story,30000000,223225679\nCars,120000000,NA\n",
        )
        .unwrap();
        let mut loader = loader(dir.path());
        let table = loader
            .load_box_office(LoadOptions::default())
            .await
            .unwrap()
            .into_frame()
            .unwrap();
        assert_eq!(
            column_names(&table),
            ["film", "budget", "box_office_us_canada"]
        );
        let array = loader
            .load_box_office(LoadOptions::default().as_frame(false))
            .await
            .unwrap()
            .into_array()
            .unwrap();
        assert_eq!(array.shape(), shape(&table));
        assert_eq!(array, to_array(&table));
        assert_eq!(array.get(1, 2), Some(&Value::Null));
        assert_eq!(array.get(0, 1), Some(&Value::Int(30_000_000)));
    }

    #[tokio::test]
    async fn data_home_override() {
        let default = populated_data_home();
        let mut loader = loader(default.path());

        // Reads from the requested directory
        let custom = tempfile::tempdir().unwrap();
        fs::write(custom.path().join("academy.csv"), "a,b\n1,x\n2,y\n3,z\n").unwrap();
        let table = loader
            .load_academy(LoadOptions::default().cache(false).data_home(custom.path()))
            .await
            .unwrap()
            .into_frame()
            .unwrap();
        assert_eq!(column_names(&table), ["a", "b"]);
        assert_eq!(table.num_rows(), 3);
        assert_eq!(
            column_values(table.column_by_name("b").unwrap().as_ref()),
            [Value::Str("x".into()), Value::Str("y".into()), Value::Str("z".into())]
        );

        // Doesn't fall back to the default directory
        let empty = tempfile::tempdir().unwrap();
        let err = loader
            .load_academy(LoadOptions::default().data_home(empty.path()))
            .await
            .unwrap_err();
        match err {
            LoadError::FileNotFound { path } => {
                assert_eq!(path, empty.path().join("academy.csv"))
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(loader.cache().is_empty());
    }

    #[tokio::test]
    async fn malformed_file_is_a_read_error() {
        let dir = populated_data_home();
        fs::write(dir.path().join("pixar_people.csv"), "").unwrap();
        let mut loader = loader(dir.path());
        let err = loader.load_people(LoadOptions::default()).await.unwrap_err();
        assert!(matches!(
            err,
            LoadError::Read {
                source: ReadError::Empty,
                ..
            }
        ));
        assert!(!loader.cache().contains(DatasetName::People));
    }

    #[tokio::test]
    async fn cache_can_be_handed_over() {
        let dir = populated_data_home();
        let mut first = loader(dir.path());
        let table = first.load_genres(LoadOptions::default()).await.unwrap();
        let empty = tempfile::tempdir().unwrap();
        let mut second = Loader::with_cache(Config::new(empty.path()).into_shared(), first.into_cache());
        let cached = second.load_genres(LoadOptions::default()).await.unwrap();
        assert_eq!(table, cached);
    }
}
