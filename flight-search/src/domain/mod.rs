//! Domain types for flight search.
//!
//! Airports, flight offers, sort specifications and search criteria. Types
//! with invariants enforce them at construction time, so code that receives
//! them can trust their validity.

mod airport;
mod criteria;
mod error;
mod flight;
mod sort;

pub use airport::{Airport, IataCode, InvalidIataCode};
pub use criteria::{FilterCriteria, Passengers};
pub use error::DomainError;
pub use flight::{Flight, FlightEndpoint, FlightItinerary, parse_local_datetime};
pub use sort::{InvalidSort, SortBy, SortOrder, SortSpec};
