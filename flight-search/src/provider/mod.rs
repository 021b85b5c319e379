//! Flight offer providers.
//!
//! A provider answers one search: given the criteria, it returns the raw
//! offers in provider order. Sorting, sanity filtering and paging happen
//! downstream in [`crate::results`].
//!
//! - [`AmadeusClient`] talks to the Amadeus Self-Service flight-offers API.
//! - [`StaticFlightProvider`] serves a fixed list, for development.
//! - [`FlightSource`] picks one of them at startup.

mod amadeus;
mod convert;
mod error;
mod mock;
mod types;

use std::future::Future;
use std::sync::Arc;

use crate::cache::CachedFlightProvider;
use crate::domain::{FilterCriteria, Flight};

pub use amadeus::{AmadeusClient, AmadeusConfig};
pub use convert::{ConversionError, convert_offer, convert_offers, iso_duration_to_hhmm};
pub use error::ProviderError;
pub use mock::StaticFlightProvider;
pub use types::{
    Dictionaries, FlightOffer, FlightOffersResponse, OfferItinerary, OfferPrice, Segment,
    SegmentEndpoint, TokenResponse,
};

/// Source of flight offers for a set of criteria.
pub trait FlightProvider: Send + Sync {
    fn search_flights(
        &self,
        criteria: &FilterCriteria,
    ) -> impl Future<Output = Result<Vec<Flight>, ProviderError>> + Send;
}

impl<P: FlightProvider> FlightProvider for Arc<P> {
    fn search_flights(
        &self,
        criteria: &FilterCriteria,
    ) -> impl Future<Output = Result<Vec<Flight>, ProviderError>> + Send {
        (**self).search_flights(criteria)
    }
}

/// The provider selected by configuration.
#[derive(Clone)]
pub enum FlightSource {
    /// Live Amadeus API behind a response cache
    Amadeus(Arc<CachedFlightProvider<AmadeusClient>>),

    /// Fixed flight list
    Static(StaticFlightProvider),
}

impl FlightProvider for FlightSource {
    async fn search_flights(&self, criteria: &FilterCriteria) -> Result<Vec<Flight>, ProviderError> {
        match self {
            FlightSource::Amadeus(p) => p.search_flights(criteria).await,
            FlightSource::Static(p) => p.search_flights(criteria).await,
        }
    }
}
