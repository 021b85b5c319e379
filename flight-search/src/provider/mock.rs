//! Static flight provider for development and testing without API access.
//!
//! Serves a fixed list of flights, optionally loaded from a JSON file in
//! either the flat or the nested flight shape.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::domain::{FilterCriteria, Flight};

use super::FlightProvider;
use super::error::ProviderError;

/// Provider that answers every search from a fixed flight list.
#[derive(Debug, Clone, Default)]
pub struct StaticFlightProvider {
    flights: Arc<Vec<Flight>>,
}

impl StaticFlightProvider {
    pub fn new(flights: Vec<Flight>) -> Self {
        Self {
            flights: Arc::new(flights),
        }
    }

    /// Load flights from a JSON array.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ProviderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let flights: Vec<Flight> = serde_json::from_str(&json).map_err(|e| ProviderError::Json {
            message: format!("{}: {e}", path.display()),
        })?;

        debug!(path = %path.display(), flights = flights.len(), "loaded static flights");
        Ok(Self::new(flights))
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

impl FlightProvider for StaticFlightProvider {
    async fn search_flights(&self, criteria: &FilterCriteria) -> Result<Vec<Flight>, ProviderError> {
        let origin = criteria.origin();
        let destination = criteria.destination();

        Ok(self
            .flights
            .iter()
            .filter(|f| {
                let leg = f.primary_leg();
                leg.departure.iata.eq_ignore_ascii_case(origin.as_str())
                    && leg.arrival.iata.eq_ignore_ascii_case(destination.as_str())
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IataCode;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FLIGHTS: &str = r#"[
        {
            "id": 1,
            "departure": {"at": "2025-05-21T09:00:00", "iata": "KUL"},
            "arrival": {"at": "2025-05-21T12:30:00", "iata": "IKA"},
            "duration": "03:30",
            "airline": "MALAYSIA AIRLINES",
            "stops": [],
            "price": "412.00",
            "currency": "EUR"
        },
        {
            "id": "2",
            "itineraries": [{
                "departure": {"at": "2025-05-21T10:00:00", "iata": "kul"},
                "arrival": {"at": "2025-05-21T18:00:00", "iata": "ika"},
                "duration": "08:00",
                "airlines": "QATAR AIRWAYS",
                "stops": ["DOH"]
            }],
            "price": 530.22,
            "currency": "EUR"
        },
        {
            "id": "3",
            "departure": {"at": "2025-05-21T11:00:00", "iata": "KUL"},
            "arrival": {"at": "2025-05-21T13:00:00", "iata": "DXB"},
            "duration": "02:00",
            "airline": "EMIRATES",
            "price": "300.00",
            "currency": "EUR"
        }
    ]"#;

    fn criteria(origin: &str, destination: &str) -> FilterCriteria {
        FilterCriteria::new(
            IataCode::parse(origin).unwrap(),
            IataCode::parse(destination).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 21).unwrap(),
        )
        .unwrap()
    }

    fn provider() -> StaticFlightProvider {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FLIGHTS.as_bytes()).unwrap();
        StaticFlightProvider::load(file.path()).unwrap()
    }

    #[test]
    fn loads_both_shapes() {
        let provider = provider();
        assert_eq!(provider.len(), 3);
    }

    #[tokio::test]
    async fn filters_by_route_ignoring_case() {
        let flights = provider().search_flights(&criteria("KUL", "IKA")).await.unwrap();
        let ids: Vec<&str> = flights.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[tokio::test]
    async fn unknown_route_is_empty() {
        let flights = provider().search_flights(&criteria("IKA", "KUL")).await.unwrap();
        assert!(flights.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = StaticFlightProvider::load("/nonexistent/flights.json").unwrap_err();
        assert!(matches!(err, ProviderError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"not\": \"a list\"}").unwrap();
        let err = StaticFlightProvider::load(file.path()).unwrap_err();
        assert!(matches!(err, ProviderError::Json { .. }));
    }
}
