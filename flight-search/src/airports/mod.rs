//! Airport directory and query ranking.
//!
//! Provides IATA code → airport lookup and ranked free-text search for the
//! origin/destination pickers, over a static dataset loaded at startup.

mod directory;
mod error;
mod ranker;

pub use directory::AirportDirectory;
pub use error::DirectoryError;
pub use ranker::{AirportRanker, DEFAULT_LIMIT, search_airports};
