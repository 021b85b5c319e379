//! Sort specification for flight results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Key flights are ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Price,
    Duration,
    Departure,
    Stops,
}

/// Direction of a sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// The single active sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub by: SortBy,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(by: SortBy, order: SortOrder) -> Self {
        Self { by, order }
    }

    pub fn asc(by: SortBy) -> Self {
        Self::new(by, SortOrder::Asc)
    }

    pub fn desc(by: SortBy) -> Self {
        Self::new(by, SortOrder::Desc)
    }

    /// The same key in the opposite direction.
    pub fn reversed(self) -> Self {
        let order = match self.order {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        };
        Self { order, ..self }
    }
}

/// Error returned when a sort key or order string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort {kind}: {value}")]
pub struct InvalidSort {
    kind: &'static str,
    value: String,
}

impl FromStr for SortBy {
    type Err = InvalidSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(SortBy::Price),
            "duration" => Ok(SortBy::Duration),
            "departure" => Ok(SortBy::Departure),
            "stops" => Ok(SortBy::Stops),
            _ => Err(InvalidSort {
                kind: "key",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for SortOrder {
    type Err = InvalidSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(InvalidSort {
                kind: "order",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortBy::Price => "price",
            SortBy::Duration => "duration",
            SortBy::Departure => "departure",
            SortBy::Stops => "stops",
        })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.by, self.order)
    }
}
