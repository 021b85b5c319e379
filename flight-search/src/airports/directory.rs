//! The static airport directory.
//!
//! Loaded once at startup from a JSON array of `{code, name, city?}` records
//! and kept for the life of the process.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::Airport;
use crate::results::Page;

use super::error::DirectoryError;
use super::ranker::AirportRanker;

/// Airport lookup by code and by free-text query.
#[derive(Debug, Clone, Default)]
pub struct AirportDirectory {
    airports: Vec<Airport>,

    /// Upper-cased code → index into `airports`. First record wins.
    by_code: HashMap<String, usize>,

    ranker: AirportRanker,
}

impl AirportDirectory {
    /// Build a directory from records, in dataset order.
    pub fn from_airports(airports: Vec<Airport>) -> Self {
        let mut by_code = HashMap::with_capacity(airports.len());
        for (idx, airport) in airports.iter().enumerate() {
            if airport.code.is_empty() {
                continue;
            }
            let code = airport.code.to_uppercase();
            if by_code.contains_key(&code) {
                warn!(%code, "duplicate airport code in dataset, keeping first");
                continue;
            }
            by_code.insert(code, idx);
        }

        Self {
            airports,
            by_code,
            ranker: AirportRanker::default(),
        }
    }

    /// Parse a JSON array of airports.
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        let airports: Vec<Airport> = serde_json::from_str(json)?;
        Ok(Self::from_airports(airports))
    }

    /// Load the dataset from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DirectoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let directory = Self::from_json(&json)?;
        debug!(path = %path.display(), airports = directory.len(), "loaded airport directory");
        Ok(directory)
    }

    /// Use a different ranker for searches.
    pub fn with_ranker(mut self, ranker: AirportRanker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// All airports in dataset order.
    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    /// Look up an airport by code, ignoring case.
    pub fn resolve(&self, code: &str) -> Option<&Airport> {
        self.by_code
            .get(&code.trim().to_uppercase())
            .map(|&idx| &self.airports[idx])
    }

    /// Human-readable label for a code, falling back to the raw code for
    /// airports missing from the dataset.
    pub fn display_name(&self, code: &str) -> String {
        match self.resolve(code) {
            Some(airport) if !airport.name.is_empty() => {
                format!("{} ({})", airport.name, airport.code)
            }
            _ => code.to_string(),
        }
    }

    /// Ranked search over the directory.
    pub fn search(&self, query: &str, offset: usize, limit: usize) -> Vec<Airport> {
        self.ranker.search(query, &self.airports, offset, limit)
    }

    /// Ranked search with a cursor for incremental lookups.
    pub fn search_page(&self, query: &str, offset: usize, limit: usize) -> Page<Airport> {
        self.ranker.search_page(query, &self.airports, offset, limit)
    }
}
