//! Conversion from Amadeus DTOs to domain flights.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::{DomainError, Flight, FlightEndpoint, FlightItinerary};

use super::types::{FlightOffer, FlightOffersResponse, OfferItinerary, SegmentEndpoint};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Duration not of the form `PT#H#M`
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// Itinerary without segments
    #[error("itinerary has no segments")]
    NoSegments,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Convert a flight-offers response to domain flights.
///
/// Offers that fail to convert are logged and skipped.
pub fn convert_offers(response: &FlightOffersResponse) -> Vec<Flight> {
    let carriers = &response.dictionaries.carriers;

    response
        .data
        .iter()
        .filter_map(|offer| match convert_offer(offer, carriers) {
            Ok(flight) => Some(flight),
            Err(e) => {
                warn!(offer = %offer.id, error = %e, "skipping flight offer");
                None
            }
        })
        .collect()
}

/// Convert a single offer, one itinerary per offer itinerary.
pub fn convert_offer(
    offer: &FlightOffer,
    carriers: &HashMap<String, String>,
) -> Result<Flight, ConversionError> {
    let itineraries = offer
        .itineraries
        .iter()
        .map(|it| convert_itinerary(it, carriers))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Flight::with_itineraries(
        offer.id.clone(),
        itineraries,
        offer.price.grand_total.clone(),
        offer.price.currency.clone(),
    )?)
}

fn convert_itinerary(
    itinerary: &OfferItinerary,
    carriers: &HashMap<String, String>,
) -> Result<FlightItinerary, ConversionError> {
    let (first, last) = match itinerary.segments.as_slice() {
        [] => return Err(ConversionError::NoSegments),
        [only] => (only, only),
        [first, .., last] => (first, last),
    };

    // Every segment but the last lands somewhere the passenger changes.
    let stops = itinerary.segments[..itinerary.segments.len() - 1]
        .iter()
        .map(|seg| seg.arrival.iata_code.clone());

    let airline = carriers
        .get(&first.carrier_code)
        .cloned()
        .unwrap_or_else(|| first.carrier_code.clone());

    Ok(FlightItinerary::new(
        iso_duration_to_hhmm(&itinerary.duration)?,
        airline,
        endpoint(&first.departure),
        endpoint(&last.arrival),
    )
    .with_stops(stops))
}

fn endpoint(e: &SegmentEndpoint) -> FlightEndpoint {
    FlightEndpoint::new(e.at.clone(), e.iata_code.clone())
}

/// Render an ISO 8601 `PT#H#M` duration as zero-padded `HH:MM`.
///
/// Either component may be absent (`PT2H`, `PT45M`), but not both.
pub fn iso_duration_to_hhmm(iso: &str) -> Result<String, ConversionError> {
    let invalid = || ConversionError::InvalidDuration(iso.to_string());

    let rest = iso.strip_prefix("PT").ok_or_else(invalid)?;
    if rest.is_empty() {
        return Err(invalid());
    }

    let (hours, rest) = take_component(rest, 'H').ok_or_else(invalid)?;
    let (minutes, rest) = take_component(rest, 'M').ok_or_else(invalid)?;
    if !rest.is_empty() {
        return Err(invalid());
    }

    Ok(format!("{hours:02}:{minutes:02}"))
}

/// Split a leading `<digits><unit>` off `s`. A missing unit counts as zero.
fn take_component(s: &str, unit: char) -> Option<(u32, &str)> {
    match s.find(unit) {
        Some(idx) => {
            let digits = &s[..idx];
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            Some((digits.parse().ok()?, &s[idx + unit.len_utf8()..]))
        }
        None => Some((0, s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "data": [
            {
                "id": "1",
                "itineraries": [
                    {
                        "duration": "PT14H35M",
                        "segments": [
                            {
                                "departure": {"iataCode": "KUL", "at": "2025-05-21T02:10:00"},
                                "arrival": {"iataCode": "DOH", "at": "2025-05-21T05:15:00"},
                                "carrierCode": "QR"
                            },
                            {
                                "departure": {"iataCode": "DOH", "at": "2025-05-21T11:40:00"},
                                "arrival": {"iataCode": "IKA", "at": "2025-05-21T14:15:00"},
                                "carrierCode": "QR"
                            }
                        ]
                    }
                ],
                "price": {"currency": "EUR", "total": "530.22", "grandTotal": "530.22"}
            },
            {
                "id": "2",
                "itineraries": [
                    {
                        "duration": "PT7H",
                        "segments": [
                            {
                                "departure": {"iataCode": "KUL", "at": "2025-05-21T09:00:00"},
                                "arrival": {"iataCode": "IKA", "at": "2025-05-21T12:30:00"},
                                "carrierCode": "ZZ"
                            }
                        ]
                    }
                ],
                "price": {"currency": "EUR", "grandTotal": "610.00"}
            },
            {
                "id": "3",
                "itineraries": [{"duration": "PT7H", "segments": []}],
                "price": {"currency": "EUR", "grandTotal": "1.00"}
            }
        ],
        "dictionaries": {"carriers": {"QR": "QATAR AIRWAYS"}}
    }"#;

    fn response() -> FlightOffersResponse {
        serde_json::from_str(RESPONSE).unwrap()
    }

    #[test]
    fn converts_connecting_offer() {
        let flights = convert_offers(&response());
        let flight = &flights[0];
        let leg = flight.primary_leg();

        assert_eq!(flight.id, "1");
        assert_eq!(flight.price, "530.22");
        assert_eq!(flight.currency, "EUR");
        assert_eq!(leg.duration, "14:35");
        assert_eq!(leg.airline, "QATAR AIRWAYS");
        assert_eq!(leg.departure.iata, "KUL");
        assert_eq!(leg.departure.at, "2025-05-21T02:10:00");
        assert_eq!(leg.arrival.iata, "IKA");
        assert_eq!(leg.stops, vec!["DOH".to_string()]);
    }

    #[test]
    fn unknown_carrier_falls_back_to_code() {
        let flights = convert_offers(&response());
        let leg = flights[1].primary_leg();
        assert_eq!(leg.airline, "ZZ");
        assert_eq!(leg.duration, "07:00");
        assert!(leg.is_direct());
    }

    #[test]
    fn skips_offers_without_segments() {
        let flights = convert_offers(&response());
        assert_eq!(flights.len(), 2);
    }

    #[test]
    fn offer_without_itineraries_is_rejected() {
        let offer: FlightOffer = serde_json::from_str(
            r#"{"id": "9", "itineraries": [], "price": {"currency": "EUR", "grandTotal": "1"}}"#,
        )
        .unwrap();
        let err = convert_offer(&offer, &HashMap::new()).unwrap_err();
        assert!(matches!(err, ConversionError::Domain(DomainError::EmptyItineraries(_))));
    }

    #[test]
    fn duration_formats() {
        assert_eq!(iso_duration_to_hhmm("PT14H35M").unwrap(), "14:35");
        assert_eq!(iso_duration_to_hhmm("PT2H5M").unwrap(), "02:05");
        assert_eq!(iso_duration_to_hhmm("PT2H").unwrap(), "02:00");
        assert_eq!(iso_duration_to_hhmm("PT45M").unwrap(), "00:45");
        assert_eq!(iso_duration_to_hhmm("PT26H0M").unwrap(), "26:00");
    }

    #[test]
    fn rejects_malformed_durations() {
        for bad in ["", "PT", "14H35M", "PTH", "PT1M2H", "PT1H2M3S", "PT-1H"] {
            assert!(iso_duration_to_hhmm(bad).is_err(), "{bad} should be rejected");
        }
    }
}
