//! In-memory cache of loaded datasets

use crate::{datasets::DatasetName, table::Table};
use std::{collections::HashMap, sync::Arc};

/// Tables that were already loaded, keyed by dataset name
///
/// Entries are added on the first cache-enabled load of a dataset and are
/// never evicted.
///
/// The key is the dataset name alone, not the directory the table was read
/// from. Once a dataset is cached, cache-enabled loads return the cached table
/// even if they ask for another data directory. Load with caching disabled, or
/// use a separate cache, to read the same dataset from several directories.
#[derive(Clone, Debug, Default)]
pub struct DatasetCache(HashMap<DatasetName, Arc<Table>>);
//
impl DatasetCache {
    /// Set up an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached table for a dataset, if any
    pub fn get(&self, name: DatasetName) -> Option<Arc<Table>> {
        self.0.get(&name).cloned()
    }

    /// Record a table, returning the one it replaces (if any)
    pub fn insert(&mut self, name: DatasetName, table: Arc<Table>) -> Option<Arc<Table>> {
        self.0.insert(name, table)
    }

    /// Truth that a dataset is cached
    pub fn contains(&self, name: DatasetName) -> bool {
        self.0.contains_key(&name)
    }

    /// Number of cached datasets
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Truth that nothing is cached
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
