//! Relevance ranking of airports against a free-text query.
//!
//! Each searchable field earns at most one bonus: an exact match beats a
//! prefix match, which beats a substring match. An airport's score is the
//! sum over its fields; airports scoring zero are left out.

use crate::domain::Airport;
use crate::results::{CursorPolicy, Page, page};

/// Default number of airports per lookup.
pub const DEFAULT_LIMIT: usize = 10;

/// Bonuses for one field: (exact, prefix, substring).
type Bonuses = (u32, u32, u32);

const CODE: Bonuses = (100, 80, 50);
const NAME: Bonuses = (90, 70, 40);
const CITY: Bonuses = (85, 60, 35);

/// Scores and orders airports for a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AirportRanker {
    match_city: bool,
}

impl AirportRanker {
    /// Rank by code and name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank by code, name and city.
    pub fn city_aware() -> Self {
        Self { match_city: true }
    }

    /// Relevance of `airport` for an already trimmed, lower-cased query.
    pub fn score(&self, airport: &Airport, q: &str) -> u32 {
        if q.is_empty() {
            return 0;
        }

        let mut score = field_score(&airport.code, q, CODE) + field_score(&airport.name, q, NAME);
        if self.match_city {
            score += field_score(airport.city.as_deref().unwrap_or(""), q, CITY);
        }
        score
    }

    /// All matching airports, best first. Ties keep directory order.
    pub fn rank<'a>(&self, query: &str, directory: &'a [Airport]) -> Vec<&'a Airport> {
        let q = normalize(query);
        if q.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(u32, &Airport)> = directory
            .iter()
            .map(|airport| (self.score(airport, &q), airport))
            .filter(|(score, _)| *score > 0)
            .collect();

        // Stable, so equal scores stay in directory order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, airport)| airport).collect()
    }

    /// The window `[offset, offset + limit)` of the ranking.
    pub fn search(&self, query: &str, directory: &[Airport], offset: usize, limit: usize) -> Vec<Airport> {
        self.rank(query, directory)
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Like [`search`](Self::search), with a cursor for incremental lookups.
    pub fn search_page(
        &self,
        query: &str,
        directory: &[Airport],
        offset: usize,
        limit: usize,
    ) -> Page<Airport> {
        let ranked = self.rank(query, directory);
        page(&ranked, offset, limit, CursorPolicy::LengthHeuristic).map(Clone::clone)
    }
}

/// Rank `directory` by code and name and return one window.
///
/// A blank query returns nothing. Never fails.
///
/// # Examples
///
/// ```
/// use flight_search::airports::search_airports;
/// use flight_search::domain::Airport;
///
/// let directory = vec![
///     Airport::new("LAS", "Harry Reid International Airport"),
///     Airport::new("LAX", "Los Angeles International Airport"),
/// ];
///
/// let found = search_airports("lax", &directory, 0, 10);
/// assert_eq!(found[0].code, "LAX");
/// assert!(search_airports("   ", &directory, 0, 10).is_empty());
/// ```
pub fn search_airports(query: &str, directory: &[Airport], offset: usize, limit: usize) -> Vec<Airport> {
    AirportRanker::new().search(query, directory, offset, limit)
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

fn field_score(field: &str, q: &str, (exact, prefix, substring): Bonuses) -> u32 {
    let field = field.to_lowercase();
    if field == q {
        exact
    } else if field.starts_with(q) {
        prefix
    } else if field.contains(q) {
        substring
    } else {
        0
    }
}
