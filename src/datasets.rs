//! Registry of the supported Pixar films datasets

use dialoguer::FuzzySelect;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Logical name of one of the Pixar films datasets
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum DatasetName {
    /// Academy Awards nominations and wins
    Academy,

    /// Genres associated with each film
    Genres,

    /// Release dates, runtimes and ratings of the films
    Films,

    /// People involved in making each film, with their role
    People,

    /// Critic and audience scores
    PublicResponse,

    /// Budgets and box office receipts
    BoxOffice,
}
//
impl DatasetName {
    /// Every dataset, in the order in which they are listed to users
    pub const ALL: [Self; 6] = [
        Self::Academy,
        Self::Genres,
        Self::Films,
        Self::People,
        Self::PublicResponse,
        Self::BoxOffice,
    ];

    /// Normalized (lowercase) name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Academy => "academy",
            Self::Genres => "genres",
            Self::Films => "films",
            Self::People => "people",
            Self::PublicResponse => "public_response",
            Self::BoxOffice => "box_office",
        }
    }

    /// Name of the backing CSV file, relative to the data directory
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Academy => "academy.csv",
            Self::Genres => "genres.csv",
            Self::Films => "pixar_films.csv",
            Self::People => "pixar_people.csv",
            Self::PublicResponse => "public_response.csv",
            Self::BoxOffice => "box_office.csv",
        }
    }

    /// Human-readable description, used when prompting
    pub fn description(self) -> &'static str {
        match self {
            Self::Academy => "Academy Awards",
            Self::Genres => "Genres",
            Self::Films => "Pixar Films",
            Self::People => "Pixar People",
            Self::PublicResponse => "Public Response",
            Self::BoxOffice => "Box Office",
        }
    }

    /// Comma-separated list of every valid dataset name
    pub fn available() -> String {
        Self::ALL
            .iter()
            .map(|name| name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
//
impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
//
impl FromStr for DatasetName {
    type Err = UnknownDataset;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|dataset| dataset.as_str() == key)
            .ok_or_else(|| UnknownDataset(name.into()))
    }
}

/// Requested dataset name is not part of the registry
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error(
    "Dataset '{0}' is not available. Available datasets are: {}.",
    DatasetName::available()
)]
pub struct UnknownDataset(pub Box<str>);

/// Ask the user to select a dataset
pub fn prompt() -> dialoguer::Result<DatasetName> {
    let choices = DatasetName::ALL
        .iter()
        .map(|name| format!("{} ({name})", name.description()))
        .collect::<Vec<_>>();
    let idx = FuzzySelect::new()
        .with_prompt("Which dataset should I load?")
        .items(&choices)
        .default(0)
        .max_length(usize::MAX)
        .interact()?;
    Ok(DatasetName::ALL[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!("academy".parse(), Ok(DatasetName::Academy));
        assert_eq!("BOX_OFFICE".parse(), Ok(DatasetName::BoxOffice));
        assert_eq!("Public_Response".parse(), Ok(DatasetName::PublicResponse));
    }

    #[test]
    fn case_folding_does_not_merge_distinct_letters() {
        // Long s folds to "s" under full Unicode case folding
        assert!("genre\u{17F}".parse::<DatasetName>().is_err());
        assert!("GENRE\u{17F}".parse::<DatasetName>().is_err());
    }

    #[test]
    fn every_name_round_trips() {
        for name in DatasetName::ALL {
            assert_eq!(name.as_str().parse(), Ok(name));
            assert_eq!(name.to_string(), name.as_str());
        }
    }

    #[test]
    fn unknown_name_lists_valid_names() {
        let err = "not_a_dataset".parse::<DatasetName>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Dataset 'not_a_dataset' is not available. Available datasets are: \
             academy, genres, films, people, public_response, box_office."
        );
    }

    #[test]
    fn file_names_are_distinct_csv_files() {
        let mut files = DatasetName::ALL.map(DatasetName::file_name).to_vec();
        assert!(files.iter().all(|file| file.ends_with(".csv")));
        files.sort_unstable();
        files.dedup();
        assert_eq!(files.len(), DatasetName::ALL.len());
        assert_eq!(DatasetName::People.file_name(), "pixar_people.csv");
    }
}
