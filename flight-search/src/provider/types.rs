//! Amadeus flight-offers API response types.
//!
//! Only the fields the converter reads are modelled; everything else in the
//! payload is ignored.

use std::collections::HashMap;

use serde::Deserialize;

/// OAuth client-credentials token response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: u64,
}

/// `GET /v2/shopping/flight-offers` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightOffersResponse {
    #[serde(default)]
    pub data: Vec<FlightOffer>,

    #[serde(default)]
    pub dictionaries: Dictionaries,
}

/// Lookup tables shared by all offers in a response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dictionaries {
    /// Carrier code → carrier name
    #[serde(default)]
    pub carriers: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlightOffer {
    pub id: String,

    #[serde(default)]
    pub itineraries: Vec<OfferItinerary>,

    pub price: OfferPrice,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferItinerary {
    /// ISO 8601 duration, e.g. `PT14H35M`
    pub duration: String,

    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub departure: SegmentEndpoint,
    pub arrival: SegmentEndpoint,
    pub carrier_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentEndpoint {
    pub iata_code: String,

    /// Local time, `YYYY-MM-DDTHH:MM:SS`
    pub at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPrice {
    pub currency: String,
    pub grand_total: String,
}
