//! Data transfer objects for web requests and responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Airport, Flight};

/// Query for `GET /api/airports/search`.
#[derive(Debug, Deserialize)]
pub struct AirportSearchRequest {
    /// Free-text query
    #[serde(default)]
    pub q: String,

    pub offset: Option<usize>,

    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AirportSearchResponse {
    pub airports: Vec<Airport>,

    /// Offset of the next page, absent when exhausted
    pub next_offset: Option<usize>,
}

/// An airport resolved by code.
#[derive(Debug, Serialize)]
pub struct AirportResponse {
    #[serde(flatten)]
    pub airport: Airport,

    /// "Name (CODE)" label for pickers
    pub label: String,
}

/// Query for `GET /api/flights`, using the provider's parameter names.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchRequest {
    pub origin_location_code: String,

    pub destination_location_code: String,

    pub departure_date: NaiveDate,

    /// Blank for one-way searches
    #[serde(default)]
    pub return_date: Option<String>,

    pub adults: Option<u32>,

    pub children: Option<u32>,

    pub infants: Option<u32>,

    /// `price`, `duration`, `departure` or `stops`
    pub sort_by: Option<String>,

    /// `asc` or `desc`
    pub order: Option<String>,

    pub offset: Option<usize>,

    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct FlightSearchResponse {
    pub flights: Vec<Flight>,

    /// Offset of the next page, absent when exhausted
    pub next_offset: Option<usize>,

    /// Flights in the filtered result set
    pub total: usize,
}

/// Body of `POST /api/me/bookmarks`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmarkRequest {
    /// Query string of the search to save
    pub search_params: String,

    /// Local departure time, e.g. `2025-05-21T09:00`
    pub departure_at: String,
}

/// Query of `GET /api/me/bookmarks`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkListRequest {
    /// Only bookmarks departing at or after this date or time
    pub departure_at: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
