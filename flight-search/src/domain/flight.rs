//! Flight offers as returned by the upstream provider.
//!
//! Providers deliver flights in two shapes: a flat record describing a single
//! one-way itinerary, and a nested record carrying `itineraries` (outbound
//! plus return). Both deserialize into [`Flight`], which always holds at
//! least one itinerary, so consumers read the primary leg without caring
//! which shape arrived.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::error::DomainError;

/// One end of an itinerary: an airport and a local timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightEndpoint {
    /// ISO-8601 timestamp, usually local wall time without offset
    /// (e.g. `2025-05-21T22:45:00`).
    pub at: String,

    /// IATA code of the airport.
    pub iata: String,
}

impl FlightEndpoint {
    pub fn new(at: impl Into<String>, iata: impl Into<String>) -> Self {
        Self {
            at: at.into(),
            iata: iata.into(),
        }
    }

    /// Parse the timestamp as local wall time.
    ///
    /// See [`parse_local_datetime`].
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        parse_local_datetime(&self.at)
    }
}

/// Parse an ISO-8601 timestamp as local wall time.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DDTHH:MM` and RFC 3339 with an
/// offset (the offset is dropped, keeping the wall time). Returns `None`
/// for anything else.
pub fn parse_local_datetime(raw: &str) -> Option<NaiveDateTime> {
    let at = raw.trim();
    NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(at).ok().map(|dt| dt.naive_local()))
}

/// One directional journey (outbound or return) of a flight offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightItinerary {
    /// Total duration as zero-padded "HH:MM".
    pub duration: String,

    /// Marketing airline name(s).
    #[serde(default, alias = "airlines")]
    pub airline: String,

    pub departure: FlightEndpoint,

    pub arrival: FlightEndpoint,

    /// Intermediate airports, in flying order.
    #[serde(default)]
    pub stops: Vec<String>,
}

impl FlightItinerary {
    pub fn new(
        duration: impl Into<String>,
        airline: impl Into<String>,
        departure: FlightEndpoint,
        arrival: FlightEndpoint,
    ) -> Self {
        Self {
            duration: duration.into(),
            airline: airline.into(),
            departure,
            arrival,
            stops: Vec::new(),
        }
    }

    /// Set the intermediate stops.
    pub fn with_stops<I, S>(mut self, stops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stops = stops.into_iter().map(Into::into).collect();
        self
    }

    /// Number of intermediate stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Whether the itinerary flies without intermediate stops.
    pub fn is_direct(&self) -> bool {
        self.stops.is_empty()
    }
}

/// A priced flight offer.
///
/// Immutable once returned by the provider. Always holds at least one
/// itinerary; the first is the primary leg used for sorting and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FlightRecord", into = "FlightRecord")]
pub struct Flight {
    /// Identifier, unique within one search result set.
    pub id: String,

    itineraries: Vec<FlightItinerary>,

    /// Decimal price as sent by the provider (e.g. `"530.22"`).
    pub price: String,

    /// ISO 4217 currency code.
    pub currency: String,
}

impl Flight {
    /// Create a one-way flight with a single itinerary.
    pub fn new(
        id: impl Into<String>,
        itinerary: FlightItinerary,
        price: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            itineraries: vec![itinerary],
            price: price.into(),
            currency: currency.into(),
        }
    }

    /// Create a flight from several itineraries (outbound first).
    pub fn with_itineraries(
        id: impl Into<String>,
        itineraries: Vec<FlightItinerary>,
        price: impl Into<String>,
        currency: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        if itineraries.is_empty() {
            return Err(DomainError::EmptyItineraries(id));
        }
        Ok(Self {
            id,
            itineraries,
            price: price.into(),
            currency: currency.into(),
        })
    }

    /// The primary (outbound) itinerary.
    pub fn primary_leg(&self) -> &FlightItinerary {
        // Non-empty by construction.
        &self.itineraries[0]
    }

    /// All itineraries, outbound first.
    pub fn itineraries(&self) -> &[FlightItinerary] {
        &self.itineraries
    }

    /// Whether the offer includes a return itinerary.
    pub fn is_round_trip(&self) -> bool {
        self.itineraries.len() > 1
    }

    /// Numeric price.
    ///
    /// A price that does not parse is a provider defect; it is reported as
    /// NaN rather than panicking.
    pub fn price_value(&self) -> f64 {
        self.price.trim().parse().unwrap_or(f64::NAN)
    }
}

/// Wire representation accepting both the flat and the nested shape.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FlightRecord {
    Nested(NestedFlight),
    Flat(FlatFlight),
}

#[derive(Serialize, Deserialize)]
struct NestedFlight {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    itineraries: Vec<FlightItinerary>,
    #[serde(deserialize_with = "string_or_number")]
    price: String,
    currency: String,
}

#[derive(Serialize, Deserialize)]
struct FlatFlight {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(flatten)]
    leg: FlightItinerary,
    #[serde(deserialize_with = "string_or_number")]
    price: String,
    currency: String,
}

impl TryFrom<FlightRecord> for Flight {
    type Error = DomainError;

    fn try_from(record: FlightRecord) -> Result<Self, Self::Error> {
        match record {
            FlightRecord::Nested(n) => {
                Flight::with_itineraries(n.id, n.itineraries, n.price, n.currency)
            }
            FlightRecord::Flat(f) => Ok(Flight::new(f.id, f.leg, f.price, f.currency)),
        }
    }
}

impl From<Flight> for FlightRecord {
    fn from(flight: Flight) -> Self {
        let Flight {
            id,
            mut itineraries,
            price,
            currency,
        } = flight;

        if itineraries.len() == 1 {
            if let Some(leg) = itineraries.pop() {
                return FlightRecord::Flat(FlatFlight {
                    id,
                    leg,
                    price,
                    currency,
                });
            }
        }

        FlightRecord::Nested(NestedFlight {
            id,
            itineraries,
            price,
            currency,
        })
    }
}

/// Accept `"530.22"` as well as `530.22`, keeping the provider's text.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
